use std::f64::consts::PI;
use std::sync::Arc;
use std::sync::Mutex;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use glam::DQuat;
use glam::DVec3;
use glam::EulerRot;
use tokio::sync::mpsc;

use super::OrientationController;
use super::OrientationStatus;
use crate::domain::models::Camera;
use crate::domain::models::OrientationReading;
use crate::domain::models::OrientationSource;
use crate::domain::models::PermissionState;

#[derive(Default)]
struct SensorLog {
    handler: Option<mpsc::UnboundedSender<OrientationReading>>,
    subscribes: usize,
    unsubscribes: usize,
    permission_requests: usize,
}

impl SensorLog {
    fn push(&self, reading: OrientationReading) -> Result<()> {
        if let Some(handler) = &self.handler {
            handler.send(reading)?;
            return Ok(());
        }

        bail!("no handler attached");
    }
}

struct FakeSensor {
    permission: Option<PermissionState>,
    log: Arc<Mutex<SensorLog>>,
}

#[async_trait]
impl OrientationSource for FakeSensor {
    fn requires_permission(&self) -> bool {
        return self.permission.is_some();
    }

    #[allow(clippy::implicit_return)]
    async fn request_permission(&mut self) -> Result<PermissionState> {
        self.log.lock().unwrap().permission_requests += 1;
        if let Some(permission) = self.permission {
            return Ok(permission);
        }

        bail!("permission API unavailable");
    }

    fn subscribe(&mut self, handler: mpsc::UnboundedSender<OrientationReading>) {
        let mut log = self.log.lock().unwrap();
        log.handler = Some(handler);
        log.subscribes += 1;
    }

    fn unsubscribe(&mut self) {
        let mut log = self.log.lock().unwrap();
        log.handler = None;
        log.unsubscribes += 1;
    }
}

fn controller(permission: Option<PermissionState>) -> (OrientationController, Arc<Mutex<SensorLog>>) {
    let log = Arc::new(Mutex::new(SensorLog::default()));
    let sensor = FakeSensor {
        permission,
        log: log.clone(),
    };

    return (OrientationController::new(Box::new(sensor)), log);
}

fn assert_quat_close(a: DQuat, b: DQuat) {
    assert!(a.abs_diff_eq(b, 1e-9), "{a:?} != {b:?}");
}

#[tokio::test]
async fn it_subscribes_without_permission() -> Result<()> {
    let (mut controller, log) = controller(None);
    assert_eq!(controller.status(), OrientationStatus::Uninitialized);

    controller.mount().await;
    assert_eq!(controller.status(), OrientationStatus::Listening);

    let log = log.lock().unwrap();
    assert_eq!(log.subscribes, 1);
    assert_eq!(log.permission_requests, 0);

    return Ok(());
}

#[tokio::test]
async fn it_does_not_attach_twice_after_a_grant() -> Result<()> {
    let (mut controller, log) = controller(Some(PermissionState::Granted));

    controller.mount().await;
    assert_eq!(controller.status(), OrientationStatus::Listening);

    let log = log.lock().unwrap();
    assert_eq!(log.permission_requests, 1);
    assert_eq!(log.subscribes, 1);

    return Ok(());
}

#[tokio::test]
async fn it_keeps_listening_after_a_denial() -> Result<()> {
    let (mut controller, log) = controller(Some(PermissionState::Denied));
    controller.mount().await;

    log.lock().unwrap().push(OrientationReading::new(10.0, 20.0, 30.0))?;
    let mut camera = Camera::default();
    assert!(controller.apply(&mut camera));
    assert_eq!(controller.status(), OrientationStatus::Active);

    return Ok(());
}

#[tokio::test]
async fn it_leaves_the_camera_alone_until_a_reading_arrives() -> Result<()> {
    let (mut controller, _) = controller(None);
    controller.mount().await;

    let mut camera = Camera::default();
    let before = camera.orientation;
    assert!(!controller.apply(&mut camera));
    assert_eq!(camera.orientation, before);
    assert!(!controller.state().is_mobile);

    return Ok(());
}

#[tokio::test]
async fn it_applies_only_the_latest_reading() -> Result<()> {
    let (mut controller, log) = controller(None);
    controller.mount().await;

    {
        let log = log.lock().unwrap();
        log.push(OrientationReading::new(10.0, 20.0, 30.0))?;
        log.push(OrientationReading::new(90.0, 45.0, -15.0))?;
    }

    let mut camera = Camera::default();
    assert!(controller.apply(&mut camera));

    let state = controller.state();
    assert!((state.alpha - PI / 2.0).abs() < 1e-12);
    assert!((state.beta - PI / 4.0).abs() < 1e-12);
    assert_quat_close(
        camera.orientation,
        DQuat::from_euler(EulerRot::YXZ, PI / 2.0, PI / 4.0, 15.0_f64.to_radians()),
    );

    return Ok(());
}

#[tokio::test]
async fn it_treats_missing_angles_as_zero() -> Result<()> {
    let (mut controller, log) = controller(None);
    controller.mount().await;

    log.lock().unwrap().push(OrientationReading {
        alpha: None,
        beta: Some(90.0),
        gamma: None,
    })?;

    let mut camera = Camera::default();
    controller.apply(&mut camera);
    assert_quat_close(camera.orientation, DQuat::from_euler(EulerRot::YXZ, 0.0, PI / 2.0, 0.0));

    return Ok(());
}

#[tokio::test]
async fn it_keeps_overriding_every_frame() -> Result<()> {
    let (mut controller, log) = controller(None);
    controller.mount().await;
    log.lock().unwrap().push(OrientationReading::new(0.0, 10.0, 0.0))?;

    let mut camera = Camera::default();
    controller.apply(&mut camera);
    let expected = camera.orientation;

    camera.look_at(DVec3::X);
    assert!(controller.apply(&mut camera));
    assert_eq!(camera.orientation, expected);

    return Ok(());
}

#[tokio::test]
async fn it_unsubscribes_idempotently() -> Result<()> {
    let (mut controller, log) = controller(None);
    controller.mount().await;

    controller.unmount();
    controller.unmount();
    assert_eq!(controller.status(), OrientationStatus::Inactive);
    drop(controller);

    let log = log.lock().unwrap();
    assert!(log.handler.is_none());
    assert_eq!(log.unsubscribes, 2);

    return Ok(());
}

#[tokio::test]
async fn it_unsubscribes_when_dropped() -> Result<()> {
    let (mut controller, log) = controller(Some(PermissionState::Granted));
    controller.mount().await;
    drop(controller);

    assert_eq!(log.lock().unwrap().unsubscribes, 1);
    return Ok(());
}
