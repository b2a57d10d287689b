// SPDX-License-Identifier: GPL-3.0-only

//! Capture session controller
//!
//! Owns the single live capture pipeline for the application's visible
//! lifetime: binds preview plus still-capture to the fixed default device,
//! unbinds any previous binding before rebinding, keeps the pipeline's
//! target rotation in sync with the physical device heading, and releases
//! the pipeline exactly once on teardown.

use crate::backends::camera::types::CameraFrame;
use crate::errors::{PhotoError, SessionError};
use crate::storage::{AssetDescriptor, SavedAsset};
use futures::channel::mpsc;
use futures::future::BoxFuture;
use tracing::{debug, info};

/// Bounded capacity of the preview frame channel. The pipeline drops frames
/// when the UI falls behind; only the latest frame matters for a viewfinder.
pub const FRAME_CHANNEL_CAPACITY: usize = 8;

pub type FrameSender = mpsc::Sender<CameraFrame>;
pub type FrameReceiver = mpsc::Receiver<CameraFrame>;

/// Output rotation of the still-capture path, in degrees clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    pub fn degrees(self) -> u16 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }
}

/// Map a raw device heading in degrees [0,360) to the still-capture target
/// rotation.
///
/// The buckets are centered on the four cardinal orientations so that a saved
/// photo is upright however the device was physically held at capture time.
/// The live preview is not affected.
pub fn rotation_for_heading(heading: u16) -> Rotation {
    match heading {
        45..=134 => Rotation::Deg270,
        135..=224 => Rotation::Deg180,
        225..=314 => Rotation::Deg90,
        _ => Rotation::Deg0,
    }
}

/// Which physical lens to bind. Fixed policy: the back camera. On desktop
/// hardware without a facing distinction this selects the platform default
/// device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LensFacing {
    #[default]
    Back,
    Front,
}

/// Everything a pipeline needs to bind: lens selection today, capture
/// configuration as it grows.
#[derive(Debug, Clone, Copy, Default)]
pub struct BindRequest {
    pub facing: LensFacing,
}

/// Narrow interface over the host capture pipeline.
///
/// The production implementation is GStreamer-backed
/// ([`crate::backends::camera::GstCapturePipeline`]); tests inject doubles.
pub trait CapturePipeline {
    /// Set the output rotation applied to subsequent still captures.
    fn set_target_rotation(&self, rotation: Rotation);

    /// The rotation currently in effect.
    fn target_rotation(&self) -> Rotation;

    /// Persist one frame to the given destination. Resolution is deferred;
    /// the continuation runs on the caller's executor.
    fn capture(
        &self,
        destination: AssetDescriptor,
    ) -> BoxFuture<'static, Result<SavedAsset, PhotoError>>;

    /// Release the device. Called exactly once, before the handle is dropped.
    fn shutdown(&self);
}

/// Factory binding a concrete pipeline to a device.
pub trait PipelineBinder {
    type Pipeline: CapturePipeline;

    fn bind(
        &self,
        request: &BindRequest,
        frames: FrameSender,
    ) -> Result<Self::Pipeline, SessionError>;
}

/// Controller owning the one live pipeline handle.
pub struct SessionController<B: PipelineBinder> {
    binder: B,
    pipeline: Option<B::Pipeline>,
    rotation: Rotation,
}

impl<B: PipelineBinder> SessionController<B> {
    pub fn new(binder: B) -> Self {
        Self {
            binder,
            pipeline: None,
            rotation: Rotation::default(),
        }
    }

    /// Bind preview and still capture, unbinding any previous pipeline first
    /// to avoid a duplicate claim on the device. Returns the preview frame
    /// stream on success.
    pub fn start(&mut self, request: BindRequest) -> Result<FrameReceiver, SessionError> {
        self.stop();

        let (sender, receiver) = mpsc::channel(FRAME_CHANNEL_CAPACITY);
        let pipeline = self.binder.bind(&request, sender)?;
        pipeline.set_target_rotation(self.rotation);
        self.pipeline = Some(pipeline);
        info!(facing = ?request.facing, "Capture session bound");

        Ok(receiver)
    }

    /// Release the pipeline. Idempotent; the underlying device release runs
    /// at most once per binding.
    pub fn stop(&mut self) {
        if let Some(pipeline) = self.pipeline.take() {
            pipeline.shutdown();
            info!("Capture session released");
        }
    }

    pub fn is_bound(&self) -> bool {
        self.pipeline.is_some()
    }

    /// Feed a raw heading sample from the orientation sensor. The derived
    /// rotation is pushed into the pipeline immediately so that the value in
    /// effect at capture time reflects how the device is held.
    pub fn heading_changed(&mut self, heading: u16) {
        let rotation = rotation_for_heading(heading);
        if rotation != self.rotation {
            debug!(heading, ?rotation, "Target rotation updated");
        }
        self.rotation = rotation;
        if let Some(pipeline) = &self.pipeline {
            pipeline.set_target_rotation(rotation);
        }
    }

    /// The rotation that a capture issued right now would be saved with.
    pub fn target_rotation(&self) -> Rotation {
        self.rotation
    }

    /// Request a still capture to `destination`.
    ///
    /// No synchronization barrier against concurrent heading updates: the
    /// rotation read by the pipeline at this moment is the one applied.
    pub fn capture(
        &self,
        destination: AssetDescriptor,
    ) -> Result<BoxFuture<'static, Result<SavedAsset, PhotoError>>, SessionError> {
        match &self.pipeline {
            Some(pipeline) => Ok(pipeline.capture(destination)),
            None => Err(SessionError::NotBound),
        }
    }
}

impl<B: PipelineBinder> Drop for SessionController<B> {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_mapping_buckets() {
        assert_eq!(rotation_for_heading(0), Rotation::Deg0);
        assert_eq!(rotation_for_heading(44), Rotation::Deg0);
        assert_eq!(rotation_for_heading(45), Rotation::Deg270);
        assert_eq!(rotation_for_heading(134), Rotation::Deg270);
        assert_eq!(rotation_for_heading(135), Rotation::Deg180);
        assert_eq!(rotation_for_heading(224), Rotation::Deg180);
        assert_eq!(rotation_for_heading(225), Rotation::Deg90);
        assert_eq!(rotation_for_heading(314), Rotation::Deg90);
        assert_eq!(rotation_for_heading(315), Rotation::Deg0);
        assert_eq!(rotation_for_heading(359), Rotation::Deg0);
    }

    #[test]
    fn test_rotation_mapping_is_total() {
        for heading in 0..360u16 {
            // Must not panic, and must land in one of the four buckets
            let rotation = rotation_for_heading(heading);
            assert!(matches!(
                rotation,
                Rotation::Deg0 | Rotation::Deg90 | Rotation::Deg180 | Rotation::Deg270
            ));
        }
    }

    #[test]
    fn test_rotation_degrees() {
        assert_eq!(Rotation::Deg0.degrees(), 0);
        assert_eq!(Rotation::Deg90.degrees(), 90);
        assert_eq!(Rotation::Deg180.degrees(), 180);
        assert_eq!(Rotation::Deg270.degrees(), 270);
    }
}
