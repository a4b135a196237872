use super::SlashCommand;

#[test]
fn it_parse_empty_string() {
    let text = "";
    assert!(SlashCommand::parse(text).is_none());
}
#[test]
fn it_parse_space_only() {
    let text = " ";
    assert!(SlashCommand::parse(text).is_none());
}
#[test]
fn it_parse_single_slash() {
    let text = "/";
    assert!(SlashCommand::parse(text).is_none());
}
#[test]
fn it_parse_invalid_prefix() {
    let text = "!q";
    assert!(SlashCommand::parse(text).is_none());
}
#[test]
fn it_parse_plain_chat_text() {
    let text = "show me condos in Makati";
    assert!(SlashCommand::parse(text).is_none());
}
#[test]
fn it_parse_valid_prefix() {
    let text = "/q";
    let cmd = SlashCommand::parse(text);
    assert!(cmd.is_some());
    assert_eq!(cmd.unwrap().command, "/q");
}

#[test]
fn it_is_short_quit() {
    let cmd = SlashCommand::parse("/q").unwrap();
    assert!(cmd.is_quit());
}
#[test]
fn it_is_quit() {
    let cmd = SlashCommand::parse("/quit").unwrap();
    assert!(cmd.is_quit());
}
#[test]
fn it_is_exit() {
    let cmd = SlashCommand::parse("/exit").unwrap();
    assert!(cmd.is_quit());
}
#[test]
fn it_is_not_is_quit() {
    let cmd = SlashCommand::parse("/help").unwrap();
    assert!(!cmd.is_quit());
}

#[test]
fn it_is_short_help() {
    let cmd = SlashCommand::parse("/h").unwrap();
    assert!(cmd.is_help());
}
#[test]
fn it_is_help() {
    let cmd = SlashCommand::parse("/help").unwrap();
    assert!(cmd.is_help());
}

#[test]
fn it_is_clear() {
    let cmd = SlashCommand::parse("/clear").unwrap();
    assert!(cmd.is_clear());
    assert!(cmd.property_id().is_none());
}

#[test]
fn it_is_view() {
    let cmd = SlashCommand::parse("/view prop-42").unwrap();
    assert!(cmd.is_view());
    assert_eq!(cmd.property_id(), Some("prop-42"));
}
#[test]
fn it_is_short_view_with_extra_spaces() {
    let cmd = SlashCommand::parse("  /v   prop-42 ").unwrap();
    assert!(cmd.is_view());
    assert_eq!(cmd.property_id(), Some("prop-42"));
}
#[test]
fn it_is_not_view_without_id() {
    assert!(SlashCommand::parse("/view").is_none());
}

#[test]
fn it_is_open() {
    let cmd = SlashCommand::parse("/open prop-42").unwrap();
    assert!(cmd.is_open());
    assert!(!cmd.is_view());
    assert_eq!(cmd.property_id(), Some("prop-42"));
}
