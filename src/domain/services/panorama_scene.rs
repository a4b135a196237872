#[cfg(test)]
#[path = "panorama_scene_test.rs"]
mod tests;

use std::sync::Arc;

use anyhow::Result;
use percent_encoding::utf8_percent_encode;
use percent_encoding::AsciiSet;
use percent_encoding::NON_ALPHANUMERIC;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::domain::models::Mesh;
use crate::domain::models::Texture;
use crate::domain::models::TextureLoaderBox;

pub const DEFAULT_IMAGE_PROXY: &str = "https://images.weserv.nl/";
pub const LOAD_ERROR_MESSAGE: &str = "Failed to load panoramic image.";

// Left unescaped, as in a URI component.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Routes an image through the CORS image proxy, `<proxy>?url=<encoded>`.
pub fn proxied_url(proxy_url: &str, image_url: &str) -> Result<String> {
    url::Url::parse(proxy_url)?;
    let encoded = utf8_percent_encode(image_url, URI_COMPONENT);

    return Ok(format!("{proxy_url}?url={encoded}"));
}

type TextureLoad = (u64, Result<Texture>);

/// Loads one panoramic image into a sphere mesh. Load results arrive on a
/// channel tagged with the generation they were started for, so a result for
/// a previous URL can never land in the current scene.
pub struct PanoramaScene {
    image_url: String,
    proxy_url: String,
    loader: TextureLoaderBox,
    generation: u64,
    mesh: Option<Mesh>,
    error: Option<String>,
    ready_fired: bool,
    task: Option<JoinHandle<()>>,
    loads_tx: mpsc::UnboundedSender<TextureLoad>,
    loads_rx: mpsc::UnboundedReceiver<TextureLoad>,
}

impl PanoramaScene {
    pub fn new(image_url: &str, proxy_url: &str, loader: TextureLoaderBox) -> PanoramaScene {
        let (loads_tx, loads_rx) = mpsc::unbounded_channel::<TextureLoad>();

        return PanoramaScene {
            image_url: image_url.to_string(),
            proxy_url: proxy_url.to_string(),
            loader,
            generation: 0,
            mesh: None,
            error: None,
            ready_fired: false,
            task: None,
            loads_tx,
            loads_rx,
        };
    }

    pub fn image_url(&self) -> &str {
        return &self.image_url;
    }

    pub fn generation(&self) -> u64 {
        return self.generation;
    }

    pub fn mesh(&self) -> Option<&Mesh> {
        return self.mesh.as_ref();
    }

    pub fn error(&self) -> Option<&str> {
        return self.error.as_deref();
    }

    pub fn is_ready(&self) -> bool {
        return self.ready_fired;
    }

    pub fn is_loading(&self) -> bool {
        return self.mesh.is_none();
    }

    pub fn start(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }

        self.generation += 1;
        let generation = self.generation;
        let loader = self.loader.clone();
        let tx = self.loads_tx.clone();
        let image_url = self.image_url.to_string();
        let proxy_url = self.proxy_url.to_string();

        tracing::debug!(generation, image_url, "loading panorama");

        self.task = Some(tokio::spawn(async move {
            let res = match proxied_url(&proxy_url, &image_url) {
                Ok(url) => loader.load(&url).await,
                Err(err) => Err(err),
            };

            // Receiver only goes away with the scene.
            let _ = tx.send((generation, res));
        }));
    }

    pub fn set_image_url(&mut self, image_url: &str) {
        if image_url == self.image_url && self.task.is_some() {
            return;
        }

        self.image_url = image_url.to_string();
        self.mesh = None;
        self.error = None;
        self.ready_fired = false;
        self.start();
    }

    /// Applies finished loads. Returns true exactly once per URL, the first
    /// time its texture is in place.
    pub fn poll(&mut self) -> bool {
        let mut fired = false;
        while let Ok((generation, res)) = self.loads_rx.try_recv() {
            fired |= self.apply(generation, res);
        }

        return fired;
    }

    pub async fn wait_for_load(&mut self) -> bool {
        while self.is_loading() {
            let (generation, res) = match self.loads_rx.recv().await {
                Some(load) => load,
                None => return false,
            };
            if self.apply(generation, res) {
                return true;
            }
        }

        return false;
    }

    fn apply(&mut self, generation: u64, res: Result<Texture>) -> bool {
        if generation != self.generation {
            tracing::debug!(
                generation,
                current = self.generation,
                "dropping stale panorama load"
            );
            return false;
        }

        match res {
            Ok(texture) => {
                tracing::debug!(
                    generation,
                    width = texture.width,
                    height = texture.height,
                    "panorama texture ready"
                );
                self.mesh = Some(Mesh::panorama(Arc::new(texture)));
                self.error = None;

                if self.ready_fired {
                    return false;
                }
                self.ready_fired = true;
                return true;
            }
            Err(err) => {
                tracing::error!(generation, image_url = self.image_url, error = ?err, "panorama load failed");
                self.mesh = Some(Mesh::placeholder());
                self.error = Some(LOAD_ERROR_MESSAGE.to_string());
                return false;
            }
        }
    }
}

impl Drop for PanoramaScene {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
