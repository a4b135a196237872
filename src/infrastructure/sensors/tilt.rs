#[cfg(test)]
#[path = "tilt_test.rs"]
mod tests;

use std::sync::Arc;
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::domain::models::OrientationReading;
use crate::domain::models::OrientationSource;
use crate::domain::models::PermissionState;

pub const TILT_STEP: f64 = 5.0;

#[derive(Default)]
struct TiltState {
    reading: OrientationReading,
    handler: Option<mpsc::UnboundedSender<OrientationReading>>,
}

#[derive(Default)]
pub struct KeyTiltSource {
    state: Arc<Mutex<TiltState>>,
}

/// Writer half of a [`KeyTiltSource`]. Readings are dropped while nothing is
/// subscribed.
#[derive(Clone)]
pub struct TiltHandle {
    state: Arc<Mutex<TiltState>>,
}

impl KeyTiltSource {
    pub fn new() -> (KeyTiltSource, TiltHandle) {
        let source = KeyTiltSource::default();
        let handle = TiltHandle {
            state: source.state.clone(),
        };

        return (source, handle);
    }
}

impl TiltHandle {
    pub fn nudge(&self, alpha: f64, beta: f64, gamma: f64) {
        let mut state = match self.state.lock() {
            Ok(state) => state,
            Err(_) => return,
        };

        let current = state.reading;
        let next = OrientationReading::new(
            (current.alpha.unwrap_or(0.0) + alpha).rem_euclid(360.0),
            (current.beta.unwrap_or(0.0) + beta).clamp(-180.0, 180.0),
            (current.gamma.unwrap_or(0.0) + gamma).clamp(-90.0, 90.0),
        );
        state.reading = next;

        let dropped = match &state.handler {
            Some(handler) => handler.send(next).is_err(),
            None => false,
        };
        if dropped {
            tracing::debug!("Tilt reading dropped, viewer has gone away");
            state.handler = None;
        }
    }

    pub fn reset(&self) {
        let mut state = match self.state.lock() {
            Ok(state) => state,
            Err(_) => return,
        };

        let next = OrientationReading::new(0.0, 0.0, 0.0);
        state.reading = next;
        if let Some(handler) = &state.handler {
            let _ = handler.send(next);
        }
    }

    pub fn is_subscribed(&self) -> bool {
        return match self.state.lock() {
            Ok(state) => state.handler.is_some(),
            Err(_) => false,
        };
    }
}

#[async_trait]
impl OrientationSource for KeyTiltSource {
    fn requires_permission(&self) -> bool {
        return true;
    }

    #[allow(clippy::implicit_return)]
    async fn request_permission(&mut self) -> Result<PermissionState> {
        return Ok(PermissionState::Granted);
    }

    fn subscribe(&mut self, handler: mpsc::UnboundedSender<OrientationReading>) {
        if let Ok(mut state) = self.state.lock() {
            state.handler = Some(handler);
        }
    }

    fn unsubscribe(&mut self) {
        if let Ok(mut state) = self.state.lock() {
            state.handler = None;
        }
    }
}
