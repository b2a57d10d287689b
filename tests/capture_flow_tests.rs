// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for the permission gate, session controller and capture
//! flow, using test doubles for the host capability interfaces.

use futures::future::BoxFuture;
use shutter::errors::{AccessError, PhotoError, SessionError};
use shutter::permission::{self, AccessDecision, CameraAuthority};
use shutter::session::{
    BindRequest, CapturePipeline, FrameSender, PipelineBinder, Rotation, SessionController,
};
use shutter::storage::{AssetDescriptor, SavedAsset, photo_display_name};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

// ===== Doubles =====

#[derive(Default)]
struct PipelineProbe {
    rotation: Mutex<Rotation>,
    rotation_at_capture: Mutex<Vec<Rotation>>,
    captures: Mutex<Vec<AssetDescriptor>>,
    binds: AtomicUsize,
    shutdowns: AtomicUsize,
}

struct FakePipeline {
    probe: Arc<PipelineProbe>,
    capture_error: Option<PhotoError>,
}

impl CapturePipeline for FakePipeline {
    fn set_target_rotation(&self, rotation: Rotation) {
        *self.probe.rotation.lock().unwrap() = rotation;
    }

    fn target_rotation(&self) -> Rotation {
        *self.probe.rotation.lock().unwrap()
    }

    fn capture(
        &self,
        destination: AssetDescriptor,
    ) -> BoxFuture<'static, Result<SavedAsset, PhotoError>> {
        let probe = Arc::clone(&self.probe);
        let error = self.capture_error.clone();
        Box::pin(async move {
            let rotation = *probe.rotation.lock().unwrap();
            probe.rotation_at_capture.lock().unwrap().push(rotation);
            let path = PathBuf::from(&destination.display_name);
            probe.captures.lock().unwrap().push(destination);
            match error {
                Some(err) => Err(err),
                None => Ok(SavedAsset { path }),
            }
        })
    }

    fn shutdown(&self) {
        self.probe.shutdowns.fetch_add(1, Ordering::SeqCst);
    }
}

struct FakeBinder {
    probe: Arc<PipelineProbe>,
    fail_bind: bool,
    capture_error: Option<PhotoError>,
}

impl FakeBinder {
    fn new(probe: Arc<PipelineProbe>) -> Self {
        Self {
            probe,
            fail_bind: false,
            capture_error: None,
        }
    }
}

impl PipelineBinder for FakeBinder {
    type Pipeline = FakePipeline;

    fn bind(
        &self,
        _request: &BindRequest,
        _frames: FrameSender,
    ) -> Result<FakePipeline, SessionError> {
        if self.fail_bind {
            return Err(SessionError::BindFailed("device is busy".to_string()));
        }
        self.probe.binds.fetch_add(1, Ordering::SeqCst);
        Ok(FakePipeline {
            probe: Arc::clone(&self.probe),
            capture_error: self.capture_error.clone(),
        })
    }
}

struct FixedAuthority {
    granted: bool,
    request_grants: bool,
}

impl CameraAuthority for FixedAuthority {
    async fn already_granted(&self) -> bool {
        self.granted
    }

    async fn request_access(&self) -> Result<bool, AccessError> {
        Ok(self.request_grants)
    }
}

fn is_timestamp_name(name: &str) -> bool {
    // yyyyMMdd_HHmmss.jpg
    let Some(stem) = name.strip_suffix(".jpg") else {
        return false;
    };
    stem.len() == 15
        && stem.as_bytes()[8] == b'_'
        && stem[..8].bytes().all(|b| b.is_ascii_digit())
        && stem[9..].bytes().all(|b| b.is_ascii_digit())
}

// ===== Tests =====

#[test]
fn test_grant_bind_rotate_capture_scenario() {
    let probe = Arc::new(PipelineProbe::default());
    let mut session = SessionController::new(FakeBinder::new(Arc::clone(&probe)));

    // Permission gate grants, session binds
    let decision = pollster::block_on(permission::resolve(&FixedAuthority {
        granted: false,
        request_grants: true,
    }));
    assert_eq!(decision, AccessDecision::Granted);
    session.start(BindRequest::default()).unwrap();
    assert!(session.is_bound());

    // Device held at heading 100 degrees
    session.heading_changed(100);

    // Capture: the pipeline sees rotation 270 and a timestamped name
    let descriptor =
        AssetDescriptor::photo(chrono::Local::now().naive_local(), "Shutter");
    let result = pollster::block_on(session.capture(descriptor).unwrap());
    let asset = result.unwrap();

    assert_eq!(
        *probe.rotation_at_capture.lock().unwrap(),
        vec![Rotation::Deg270]
    );
    let captures = probe.captures.lock().unwrap();
    assert_eq!(captures.len(), 1);
    assert!(is_timestamp_name(&captures[0].display_name));
    assert_eq!(captures[0].mime_type, "image/jpeg");
    assert_eq!(captures[0].relative_path.as_deref(), Some("Pictures/Shutter"));
    assert_eq!(asset.path, PathBuf::from(&captures[0].display_name));
}

#[test]
fn test_denial_never_binds_session() {
    let probe = Arc::new(PipelineProbe::default());
    let mut session = SessionController::new(FakeBinder::new(Arc::clone(&probe)));

    let decision = pollster::block_on(permission::resolve(&FixedAuthority {
        granted: false,
        request_grants: false,
    }));
    assert_eq!(decision, AccessDecision::Denied);

    // The application only starts the session on a grant
    if decision == AccessDecision::Granted {
        session.start(BindRequest::default()).unwrap();
    }

    assert!(!session.is_bound());
    assert_eq!(probe.binds.load(Ordering::SeqCst), 0);
    assert!(matches!(
        session.capture(AssetDescriptor::photo(
            chrono::Local::now().naive_local(),
            "Shutter"
        )),
        Err(SessionError::NotBound)
    ));
}

#[test]
fn test_bind_failure_leaves_session_unbound() {
    let probe = Arc::new(PipelineProbe::default());
    let mut binder = FakeBinder::new(Arc::clone(&probe));
    binder.fail_bind = true;
    let mut session = SessionController::new(binder);

    let err = session.start(BindRequest::default()).unwrap_err();
    assert!(matches!(err, SessionError::BindFailed(_)));
    assert!(!session.is_bound());
}

#[test]
fn test_rebind_releases_previous_pipeline_first() {
    let probe = Arc::new(PipelineProbe::default());
    let mut session = SessionController::new(FakeBinder::new(Arc::clone(&probe)));

    session.start(BindRequest::default()).unwrap();
    session.start(BindRequest::default()).unwrap();

    assert_eq!(probe.binds.load(Ordering::SeqCst), 2);
    assert_eq!(probe.shutdowns.load(Ordering::SeqCst), 1);

    // Controller teardown releases exactly once more
    drop(session);
    assert_eq!(probe.shutdowns.load(Ordering::SeqCst), 2);
}

#[test]
fn test_rotation_survives_rebind() {
    let probe = Arc::new(PipelineProbe::default());
    let mut session = SessionController::new(FakeBinder::new(Arc::clone(&probe)));

    session.heading_changed(200);
    assert_eq!(session.target_rotation(), Rotation::Deg180);

    // A later bind picks up the rotation already in effect
    session.start(BindRequest::default()).unwrap();
    assert_eq!(*probe.rotation.lock().unwrap(), Rotation::Deg180);
}

#[test]
fn test_capture_failure_carries_error_description_verbatim() {
    let probe = Arc::new(PipelineProbe::default());
    let mut binder = FakeBinder::new(Arc::clone(&probe));
    binder.capture_error = Some(PhotoError::SaveFailed("disk full".to_string()));
    let mut session = SessionController::new(binder);
    session.start(BindRequest::default()).unwrap();

    let descriptor = AssetDescriptor::photo(chrono::Local::now().naive_local(), "Shutter");
    let result = pollster::block_on(session.capture(descriptor).unwrap());
    let err = result.unwrap_err();

    // The user-visible notice is built from Display; the description must
    // come through verbatim
    assert_eq!(err.to_string(), "Save failed: disk full");
}

#[test]
fn test_fixed_clock_filename() {
    let time = chrono::NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(3, 4, 5)
        .unwrap();
    assert_eq!(photo_display_name(time), "20240102_030405.jpg");
    assert!(is_timestamp_name(&photo_display_name(time)));
}
