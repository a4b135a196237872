#[cfg(test)]
#[path = "panorama_viewer_test.rs"]
mod tests;

use super::OrbitControls;
use super::OrbitInput;
use super::OrientationController;
use super::OrientationStatus;
use super::PanoramaScene;
use crate::domain::models::Camera;
use crate::domain::models::OrientationSourceBox;
use crate::domain::models::Platform;
use crate::domain::models::TextureLoaderBox;

pub type ReadyCallback = Box<dyn FnMut() + Send>;

pub struct ViewerOptions {
    pub image_url: String,
    pub proxy_url: String,
    pub platform: Platform,
    pub loader: TextureLoaderBox,
    pub orientation_source: Option<OrientationSourceBox>,
    pub on_ready: Option<ReadyCallback>,
}

pub struct PanoramaViewer {
    camera: Camera,
    scene: PanoramaScene,
    orbit: OrbitControls,
    orientation: Option<OrientationController>,
    on_ready: Option<ReadyCallback>,
}

impl PanoramaViewer {
    pub async fn mount(options: ViewerOptions) -> PanoramaViewer {
        let mut orientation = None;
        if options.platform.is_handheld {
            if let Some(source) = options.orientation_source {
                let mut controller = OrientationController::new(source);
                controller.mount().await;
                orientation = Some(controller);
            }
        }

        let mut scene = PanoramaScene::new(&options.image_url, &options.proxy_url, options.loader);
        scene.start();

        tracing::debug!(
            image_url = options.image_url,
            handheld = options.platform.is_handheld,
            orientation = orientation.is_some(),
            "mounted panorama viewer"
        );

        return PanoramaViewer {
            camera: Camera::default(),
            scene,
            orbit: OrbitControls::default(),
            orientation,
            on_ready: options.on_ready,
        };
    }

    pub fn camera(&self) -> &Camera {
        return &self.camera;
    }

    pub fn scene(&self) -> &PanoramaScene {
        return &self.scene;
    }

    pub fn orbit(&self) -> &OrbitControls {
        return &self.orbit;
    }

    pub fn orientation_status(&self) -> OrientationStatus {
        if let Some(orientation) = &self.orientation {
            return orientation.status();
        }

        return OrientationStatus::Inactive;
    }

    pub fn handle_pointer(&mut self, input: OrbitInput, viewport_height: f64) {
        self.orbit.handle(input, viewport_height);
    }

    pub fn set_image_url(&mut self, image_url: &str) {
        self.scene.set_image_url(image_url);
    }

    /// One frame: finished loads, then orbit, then the orientation override.
    pub fn frame(&mut self) {
        if self.scene.poll() {
            self.fire_ready();
        }

        self.orbit.update(&mut self.camera);

        if let Some(orientation) = self.orientation.as_mut() {
            orientation.apply(&mut self.camera);
        }
    }

    pub async fn wait_for_load(&mut self) {
        if self.scene.wait_for_load().await {
            self.fire_ready();
        }
    }

    pub fn unmount(&mut self) {
        if let Some(orientation) = self.orientation.as_mut() {
            orientation.unmount();
        }
        self.orbit.reset();
    }

    fn fire_ready(&mut self) {
        if let Some(on_ready) = self.on_ready.as_mut() {
            on_ready();
        }
    }
}
