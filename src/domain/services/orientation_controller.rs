#[cfg(test)]
#[path = "orientation_controller_test.rs"]
mod tests;

use glam::DQuat;
use glam::EulerRot;
use tokio::sync::mpsc;

use crate::domain::models::Camera;
use crate::domain::models::OrientationReading;
use crate::domain::models::OrientationSourceBox;
use crate::domain::models::OrientationState;
use crate::domain::models::PermissionState;

#[derive(Copy, Clone, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum OrientationStatus {
    Uninitialized,
    PermissionPending,
    Listening,
    Active,
    Inactive,
}

pub struct OrientationController {
    source: OrientationSourceBox,
    status: OrientationStatus,
    state: OrientationState,
    attached: bool,
    readings_tx: mpsc::UnboundedSender<OrientationReading>,
    readings_rx: mpsc::UnboundedReceiver<OrientationReading>,
}

impl OrientationController {
    pub fn new(source: OrientationSourceBox) -> OrientationController {
        let (readings_tx, readings_rx) = mpsc::unbounded_channel::<OrientationReading>();

        return OrientationController {
            source,
            status: OrientationStatus::Uninitialized,
            state: OrientationState::default(),
            attached: false,
            readings_tx,
            readings_rx,
        };
    }

    pub fn status(&self) -> OrientationStatus {
        return self.status;
    }

    pub fn state(&self) -> OrientationState {
        return self.state;
    }

    /// Subscribes right away, then asks for permission where the source needs
    /// it. A refusal keeps the best-effort subscription in place.
    pub async fn mount(&mut self) {
        self.attach();

        if self.source.requires_permission() {
            self.status = OrientationStatus::PermissionPending;
            match self.source.request_permission().await {
                Ok(PermissionState::Granted) => {
                    self.attach();
                }
                Ok(PermissionState::Denied) => {
                    tracing::debug!("device orientation permission denied");
                }
                Err(err) => {
                    tracing::debug!(error = ?err, "device orientation permission request failed");
                }
            }
        }

        self.status = OrientationStatus::Listening;
        if self.state.is_mobile {
            self.status = OrientationStatus::Active;
        }
    }

    pub fn unmount(&mut self) {
        self.source.unsubscribe();
        self.attached = false;
        self.status = OrientationStatus::Inactive;
    }

    pub fn drain(&mut self) -> bool {
        let mut latest = None;
        while let Ok(reading) = self.readings_rx.try_recv() {
            latest = Some(reading);
        }

        let reading = match latest {
            Some(reading) => reading,
            None => return false,
        };

        self.state.update(reading);
        if self.status == OrientationStatus::Listening {
            self.status = OrientationStatus::Active;
        }

        return true;
    }

    /// Per-frame camera override. Euler order is YXZ with x = beta,
    /// y = alpha and z = -gamma.
    pub fn apply(&mut self, camera: &mut Camera) -> bool {
        self.drain();
        if !self.state.is_mobile {
            return false;
        }

        camera.orientation =
            DQuat::from_euler(EulerRot::YXZ, self.state.alpha, self.state.beta, -self.state.gamma);
        return true;
    }

    fn attach(&mut self) {
        if self.attached {
            return;
        }

        self.source.subscribe(self.readings_tx.clone());
        self.attached = true;
    }
}

impl Drop for OrientationController {
    fn drop(&mut self) {
        if self.status != OrientationStatus::Inactive {
            self.unmount();
        }
    }
}
