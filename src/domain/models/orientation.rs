#[cfg(test)]
#[path = "orientation_test.rs"]
mod tests;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::mpsc;

/// Raw device orientation sample in degrees. Sensors may omit any angle.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct OrientationReading {
    pub alpha: Option<f64>,
    pub beta: Option<f64>,
    pub gamma: Option<f64>,
}

impl OrientationReading {
    pub fn new(alpha: f64, beta: f64, gamma: f64) -> OrientationReading {
        return OrientationReading {
            alpha: Some(alpha),
            beta: Some(beta),
            gamma: Some(gamma),
        };
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct OrientationState {
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
    pub is_mobile: bool,
}

impl OrientationState {
    pub fn update(&mut self, reading: OrientationReading) {
        self.is_mobile = true;
        self.alpha = reading.alpha.unwrap_or(0.0).to_radians();
        self.beta = reading.beta.unwrap_or(0.0).to_radians();
        self.gamma = reading.gamma.unwrap_or(0.0).to_radians();
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum PermissionState {
    Granted,
    Denied,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Platform {
    pub is_handheld: bool,
}

impl Platform {
    pub fn desktop() -> Platform {
        return Platform { is_handheld: false };
    }

    pub fn handheld() -> Platform {
        return Platform { is_handheld: true };
    }

    pub fn from_user_agent(user_agent: &str) -> Platform {
        let user_agent = user_agent.to_lowercase();
        let is_handheld = ["iphone", "ipad", "ipod", "android"]
            .iter()
            .any(|needle| return user_agent.contains(needle));

        return Platform { is_handheld };
    }
}

/// Device orientation sensor. Readings are pushed into the subscribed channel
/// until `unsubscribe` is called.
#[async_trait]
pub trait OrientationSource {
    fn requires_permission(&self) -> bool;

    async fn request_permission(&mut self) -> Result<PermissionState>;

    fn subscribe(&mut self, handler: mpsc::UnboundedSender<OrientationReading>);

    fn unsubscribe(&mut self);
}

pub type OrientationSourceBox = Box<dyn OrientationSource + Send + Sync>;
