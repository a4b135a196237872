#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;

use std::io;
use std::path;

use anyhow::bail;
use anyhow::Result;
use chrono::Local;
use chrono::TimeZone;
use clap::builder::PossibleValuesParser;
use clap::value_parser;
use clap::Arg;
use clap::ArgAction;
use clap::ArgGroup;
use clap::ArgMatches;
use clap::Command;
use clap_complete::generate;
use clap_complete::Generator;
use clap_complete::Shell;
use dialoguer::theme::ColorfulTheme;
use dialoguer::Select;
use strum::VariantNames;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use yansi::Paint;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::PanoramicImage;
use crate::domain::models::StagingSessionRecord;
use crate::domain::models::StorageName;
use crate::domain::services::StagingSessions;
use crate::domain::services::HELP_TEXT;
use crate::infrastructure::backends::BackendManager;
use crate::infrastructure::storage::StorageManager;

/// What the binary should run once arguments and config are resolved.
pub enum Launch {
    Chat,
    Panorama {
        images: Vec<PanoramicImage>,
        handheld: bool,
    },
    Compare {
        before: String,
        after: String,
    },
}

fn print_completions<G: Generator>(gen: G, cmd: &mut Command, out: &mut (dyn io::Write + Send)) {
    generate(gen, cmd, cmd.get_name().to_string(), out);
}

fn format_record(record: &StagingSessionRecord) -> String {
    let created = Local
        .timestamp_millis_opt(record.created_at)
        .single()
        .map(|e| return e.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default();

    return format!(
        "- (Property: {}) Session: {}, Created: {created}",
        record.property_id, record.session_id
    );
}

async fn staging_sessions() -> Result<StagingSessions> {
    let storage_name = StorageName::parse(Config::get(ConfigKey::Storage))
        .unwrap_or(StorageName::File);
    let storage = StorageManager::get(storage_name).await?;

    return Ok(StagingSessions::new(storage));
}

async fn print_staging_list() -> Result<()> {
    let records = staging_sessions()
        .await?
        .list()
        .await?
        .iter()
        .map(|record| {
            return format_record(record);
        })
        .collect::<Vec<String>>();

    if records.is_empty() {
        println!("There are no staging sessions. Open one with `vista staging open -p <property-id>`.");
    } else {
        println!("{}", records.join("\n"));
    }

    return Ok(());
}

async fn open_staging_session(property_id: &str) -> Result<Vec<PanoramicImage>> {
    let sessions = staging_sessions().await?;
    let service = BackendManager::staging();
    let session_id = sessions
        .ensure_session(&service, property_id, &Config::get(ConfigKey::UserID))
        .await?;

    let session = service.get_session(&session_id).await?;
    let images = PanoramicImage::from_staging_session(&session);
    println!(
        "Staging session {session_id} for {property_id} has {} panoramic image(s).",
        images.len()
    );

    return Ok(images);
}

async fn delete_staging_interactive() -> Result<()> {
    let sessions = staging_sessions().await?;
    let records = sessions.list().await?;
    if records.is_empty() {
        println!("There are no staging sessions to delete.");
        return Ok(());
    }

    let options = records
        .iter()
        .map(|record| {
            return format_record(record);
        })
        .collect::<Vec<String>>();

    let idx = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Which staging session would you like to forget?")
        .default(0)
        .items(&options)
        .interact_opt()?;

    if let Some(idx) = idx {
        sessions.remove_session(&records[idx].property_id).await?;
        println!("Deleted staging session for {}", records[idx].property_id);
    }

    return Ok(());
}

async fn generate_staging(matches: &ArgMatches) -> Result<()> {
    let property_id = required_arg(matches, "property-id")?;
    let prompt = required_arg(matches, "prompt")?;
    let message = matches
        .get_one::<String>("message")
        .map(|e| return e.to_string())
        .unwrap_or_else(|| return prompt.to_string());
    let image_index = matches.get_one::<usize>("image-index").copied().unwrap_or(0);

    let res = staging_sessions()
        .await?
        .generate(
            &BackendManager::staging(),
            &property_id,
            &Config::get(ConfigKey::UserID),
            image_index,
            &prompt,
            &message,
        )
        .await;

    match res {
        Ok(res) => {
            if let Some(message) = res.message {
                println!("{message}");
            }
            if let Some(image_url) = res.image_url {
                println!("{image_url}");
            }
        }
        Err(err) => {
            eprintln!("{}", Paint::red(format!("Staging failed: {err}")));
        }
    }

    return Ok(());
}

fn required_arg(matches: &ArgMatches, name: &str) -> Result<String> {
    if let Some(val) = matches.get_one::<String>(name) {
        return Ok(val.to_string());
    }

    bail!(format!("Missing required argument --{name}"));
}

async fn create_config_file() -> Result<()> {
    let config_file_path_str = Config::default(ConfigKey::ConfigFile);
    let config_file_path = path::PathBuf::from(&config_file_path_str);
    if config_file_path.exists() {
        bail!(format!(
            "Config file already exists at {config_file_path_str}"
        ));
    }

    if let Some(parent) = config_file_path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).await?;
        }
    }

    let mut file = fs::File::create(config_file_path.clone()).await?;
    file.write_all(Config::serialize_default(build()).as_bytes())
        .await?;

    println!("Created default config file at {config_file_path_str}");
    return Ok(());
}

fn subcommand_completions() -> Command {
    return Command::new("completions")
        .about("Generates shell completions.")
        .arg(
            clap::Arg::new("shell")
                .short('s')
                .long("shell")
                .help("Which shell to generate completions for.")
                .action(ArgAction::Set)
                .value_parser(value_parser!(Shell))
                .required(true),
        );
}

fn subcommand_config() -> Command {
    return Command::new("config")
        .about("Configuration file options.")
        .subcommand(
            Command::new("create").about("Saves the default config file to the configuration file path. This command will fail if the file exists already.")
        )
        .subcommand(
            Command::new("default").about("Outputs the default configuration file to stdout.")
        )
        .subcommand(
            Command::new("path").about("Returns the default path for the configuration file.")
        );
}

fn arg_property_id() -> Arg {
    return Arg::new("property-id")
        .short('p')
        .long("property-id")
        .help("Marketplace property ID.")
        .num_args(1);
}

fn subcommand_chat() -> Command {
    return Command::new("chat").about("Chat with Mark about properties. This is the default command.");
}

fn subcommand_panorama() -> Command {
    return Command::new("panorama")
        .about("Walk through a 360 panoramic image in the terminal.")
        .arg(
            Arg::new("url")
                .short('u')
                .long("url")
                .help("Equirectangular image URL to view.")
                .num_args(1),
        )
        .arg(arg_property_id().help("View the panoramic images of a property's staging session."))
        .arg(
            Arg::new("handheld")
                .long("handheld")
                .help("Steer the camera with simulated device tilt (W/A/S/D, Z/X, R to reset) instead of dragging.")
                .action(ArgAction::SetTrue),
        )
        .group(
            ArgGroup::new("panorama-source")
                .args(["url", "property-id"])
                .required(true),
        );
}

fn subcommand_compare() -> Command {
    return Command::new("compare")
        .about("Drag a divider across before and after images of a room.")
        .arg(
            Arg::new("before")
                .short('b')
                .long("before")
                .help("Image URL shown left of the divider.")
                .num_args(1)
                .required(true),
        )
        .arg(
            Arg::new("after")
                .short('a')
                .long("after")
                .help("Image URL shown right of the divider.")
                .num_args(1)
                .required(true),
        );
}

fn subcommand_staging_delete() -> Command {
    return Command::new("delete")
        .about("Forget one or all stored staging sessions. Omit arguments for an interactive selection.")
        .arg(arg_property_id())
        .arg(
            clap::Arg::new("all")
                .long("all")
                .help("Delete all staging sessions.")
                .action(ArgAction::SetTrue),
        )
        .group(ArgGroup::new("delete-args").args(["property-id", "all"]));
}

fn subcommand_staging() -> Command {
    return Command::new("staging")
        .about("Manage virtual staging sessions.")
        .arg_required_else_help(true)
        .subcommand(Command::new("list").about("List stored staging sessions that have not expired."))
        .subcommand(
            Command::new("open")
                .about("Reuse or create the staging session for a property.")
                .arg(arg_property_id().required(true)),
        )
        .subcommand(subcommand_staging_delete())
        .subcommand(
            Command::new("generate")
                .about("Ask the staging service to redecorate a property's room.")
                .arg(arg_property_id().required(true))
                .arg(
                    Arg::new("prompt")
                        .long("prompt")
                        .help("What to stage, e.g. \"mid-century living room\".")
                        .num_args(1)
                        .required(true),
                )
                .arg(
                    Arg::new("message")
                        .long("message")
                        .help("Message shown alongside the request. Defaults to the prompt.")
                        .num_args(1),
                )
                .arg(
                    Arg::new("image-index")
                        .long("image-index")
                        .help("Which panoramic image of the session to stage.")
                        .value_parser(clap::value_parser!(usize))
                        .default_value("0")
                        .num_args(1),
                ),
        );
}

pub fn build() -> Command {
    let about = format!(
        "{}\n\nVersion: {}\nCommit: {}",
        env!("CARGO_PKG_DESCRIPTION"),
        env!("CARGO_PKG_VERSION"),
        env!("VERGEN_GIT_DESCRIBE")
    );

    let commands_text = format!(
        "{}\n{}",
        Paint::new("CHAT COMMANDS:").underline().bold(),
        HELP_TEXT
            .split(" · ")
            .map(|line| {
                return format!("  - {line}");
            })
            .collect::<Vec<String>>()
            .join("\n")
    );

    return Command::new("vista")
        .about(about)
        .author(env!("CARGO_PKG_AUTHORS"))
        .version(env!("CARGO_PKG_VERSION"))
        .after_help(commands_text)
        .arg_required_else_help(false)
        .subcommand(subcommand_chat())
        .subcommand(subcommand_compare())
        .subcommand(subcommand_completions())
        .subcommand(subcommand_config())
        .subcommand(subcommand_panorama())
        .subcommand(subcommand_staging())
        .arg(
            Arg::new(ConfigKey::ConfigFile.to_string())
                .short('c')
                .long(ConfigKey::ConfigFile.to_string())
                .env("VISTA_CONFIG_FILE")
                .num_args(1)
                .help(format!("Path to configuration file [default: {}]", Config::default(ConfigKey::ConfigFile)))
                .global(true)
        )
        .arg(
            Arg::new(ConfigKey::ApiURL.to_string())
                .long(ConfigKey::ApiURL.to_string())
                .env("VISTA_API_URL")
                .num_args(1)
                .help(format!("Marketplace API URL hosting the Mark summary endpoint. [default: {}]", Config::default(ConfigKey::ApiURL)))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::ImageProxyURL.to_string())
                .long(ConfigKey::ImageProxyURL.to_string())
                .env("VISTA_IMAGE_PROXY_URL")
                .num_args(1)
                .help(format!("Image proxy panoramas are fetched through. [default: {}]", Config::default(ConfigKey::ImageProxyURL)))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::RequestTimeout.to_string())
                .long(ConfigKey::RequestTimeout.to_string())
                .env("VISTA_REQUEST_TIMEOUT")
                .num_args(1)
                .help(format!("Time to wait in milliseconds before timing out HTTP requests. [default: {}]", Config::default(ConfigKey::RequestTimeout)))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::StagingURL.to_string())
                .long(ConfigKey::StagingURL.to_string())
                .env("VISTA_STAGING_URL")
                .num_args(1)
                .help(format!("Virtual staging service URL. [default: {}]", Config::default(ConfigKey::StagingURL)))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::Storage.to_string())
                .long(ConfigKey::Storage.to_string())
                .env("VISTA_STORAGE")
                .num_args(1)
                .help(format!("Where chat history and staging sessions are kept. [default: {}]", Config::default(ConfigKey::Storage)))
                .value_parser(PossibleValuesParser::new(StorageName::VARIANTS))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::StorageFile.to_string())
                .long(ConfigKey::StorageFile.to_string())
                .env("VISTA_STORAGE_FILE")
                .num_args(1)
                .help(format!("JSON file used by the file storage. [default: {}]", Config::default(ConfigKey::StorageFile)))
                .global(true),
        )
        .arg(
            Arg::new(ConfigKey::UserID.to_string())
                .long(ConfigKey::UserID.to_string())
                .env("VISTA_USER_ID")
                .num_args(1)
                .help(format!("User ID sent when creating staging sessions. [default: {}]", Config::default(ConfigKey::UserID)))
                .global(true),
        );
}

pub async fn parse() -> Result<Option<Launch>> {
    return dispatch(build().get_matches(), &mut io::stdout()).await;
}

async fn dispatch(matches: ArgMatches, out: &mut (dyn io::Write + Send)) -> Result<Option<Launch>> {
    match matches.subcommand() {
        Some(("chat", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
        }
        Some(("compare", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
            return Ok(Some(Launch::Compare {
                before: required_arg(subcmd_matches, "before")?,
                after: required_arg(subcmd_matches, "after")?,
            }));
        }
        Some(("completions", subcmd_matches)) => {
            if let Some(completions) = subcmd_matches.get_one::<Shell>("shell").copied() {
                let mut app = build();
                print_completions(completions, &mut app, out);
            }

            return Ok(None);
        }
        Some(("config", subcmd_matches)) => match subcmd_matches.subcommand() {
            Some(("create", _)) => {
                create_config_file().await?;
                return Ok(None);
            }
            Some(("default", _)) => {
                println!("{}", Config::serialize_default(build()));
                return Ok(None);
            }
            Some(("path", _)) => {
                println!("{}", Config::default(ConfigKey::ConfigFile));
                return Ok(None);
            }
            _ => {
                subcommand_config().print_long_help()?;
                return Ok(None);
            }
        },
        Some(("panorama", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
            let images = match subcmd_matches.get_one::<String>("url") {
                Some(url) => vec![PanoramicImage {
                    url: url.to_string(),
                    title: "".to_string(),
                    description: "".to_string(),
                }],
                None => open_staging_session(&required_arg(subcmd_matches, "property-id")?).await?,
            };

            if images.is_empty() {
                bail!("There are no panoramic images to show");
            }

            return Ok(Some(Launch::Panorama {
                images,
                handheld: subcmd_matches.get_flag("handheld"),
            }));
        }
        Some(("staging", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
            match subcmd_matches.subcommand() {
                Some(("list", _)) => {
                    print_staging_list().await?;
                }
                Some(("open", open_matches)) => {
                    open_staging_session(&required_arg(open_matches, "property-id")?).await?;
                }
                Some(("delete", delete_matches)) => {
                    if let Some(property_id) = delete_matches.get_one::<String>("property-id") {
                        staging_sessions()
                            .await?
                            .remove_session(property_id)
                            .await?;
                        println!("Deleted staging session for {property_id}");
                    } else if delete_matches.get_flag("all") {
                        let count = staging_sessions().await?.clear_all().await?;
                        println!("Deleted {count} staging session(s)");
                    } else {
                        delete_staging_interactive().await?;
                    }
                }
                Some(("generate", generate_matches)) => {
                    generate_staging(generate_matches).await?;
                }
                _ => {
                    subcommand_staging().print_long_help()?;
                }
            }

            return Ok(None);
        }
        _ => {
            Config::load(build(), vec![&matches]).await?;
        }
    }

    return Ok(Some(Launch::Chat));
}
