// SPDX-License-Identifier: GPL-3.0-only

//! GStreamer capture pipeline
//!
//! One pipeline serves both outputs: the appsink feeds the live viewfinder
//! through a bounded channel, and still capture reuses the most recent frame,
//! bakes the target rotation into the pixels, encodes JPEG off the UI
//! context, and hands the bytes to the storage collaborator.

use super::types::CameraFrame;
use crate::errors::{PhotoError, SessionError};
use crate::session::{BindRequest, CapturePipeline, FrameSender, PipelineBinder, Rotation};
use crate::storage::{AssetDescriptor, MediaStore, SavedAsset};
use futures::future::BoxFuture;
use gstreamer::prelude::*;
use gstreamer_app::AppSink;
use gstreamer_video::VideoInfo;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU8, Ordering};
use tracing::{debug, error, info, warn};

/// Maximum frames queued in the appsink before old ones are dropped.
const MAX_BUFFERS: u32 = 2;
/// Seconds to wait for the pipeline to reach the PLAYING state.
const START_TIMEOUT_SECS: u64 = 5;

fn rotation_to_index(rotation: Rotation) -> u8 {
    match rotation {
        Rotation::Deg0 => 0,
        Rotation::Deg90 => 1,
        Rotation::Deg180 => 2,
        Rotation::Deg270 => 3,
    }
}

fn rotation_from_index(index: u8) -> Rotation {
    match index {
        1 => Rotation::Deg90,
        2 => Rotation::Deg180,
        3 => Rotation::Deg270,
        _ => Rotation::Deg0,
    }
}

/// Binder creating GStreamer-backed pipelines for the session controller.
pub struct GstBinder {
    store: Arc<dyn MediaStore>,
}

impl GstBinder {
    pub fn new(store: Arc<dyn MediaStore>) -> Self {
        Self { store }
    }
}

impl PipelineBinder for GstBinder {
    type Pipeline = GstCapturePipeline;

    fn bind(
        &self,
        request: &BindRequest,
        frames: FrameSender,
    ) -> Result<GstCapturePipeline, SessionError> {
        gstreamer::init().map_err(|e| SessionError::ProviderUnavailable(e.to_string()))?;
        GstCapturePipeline::bind(request, frames, Arc::clone(&self.store))
    }
}

/// The single live capture pipeline handle, exclusively owned by the session
/// controller.
pub struct GstCapturePipeline {
    pipeline: gstreamer::Pipeline,
    appsink: AppSink,
    last_frame: Arc<Mutex<Option<CameraFrame>>>,
    rotation: Arc<AtomicU8>,
    store: Arc<dyn MediaStore>,
}

impl GstCapturePipeline {
    fn bind(
        request: &BindRequest,
        frame_sender: FrameSender,
        store: Arc<dyn MediaStore>,
    ) -> Result<Self, SessionError> {
        // Desktop hardware has no lens facing distinction; the fixed policy
        // resolves to the platform default device.
        info!(facing = ?request.facing, "Creating capture pipeline");

        let pipeline = gstreamer::parse::launch(
            "pipewiresrc ! queue ! videoconvert ! video/x-raw,format=RGBA ! appsink name=sink",
        )
        .map_err(|e| SessionError::BindFailed(e.to_string()))?
        .downcast::<gstreamer::Pipeline>()
        .map_err(|_| SessionError::BindFailed("parsed element is not a pipeline".to_string()))?;

        let appsink = pipeline
            .by_name("sink")
            .ok_or_else(|| SessionError::BindFailed("appsink missing from pipeline".to_string()))?
            .dynamic_cast::<AppSink>()
            .map_err(|_| SessionError::BindFailed("failed to cast appsink".to_string()))?;

        appsink.set_property("sync", false);
        appsink.set_property("max-buffers", MAX_BUFFERS);
        appsink.set_property("drop", true);
        appsink.set_property("enable-last-sample", false);

        let last_frame: Arc<Mutex<Option<CameraFrame>>> = Arc::new(Mutex::new(None));
        let callback_frame = Arc::clone(&last_frame);

        appsink.set_callbacks(
            gstreamer_app::AppSinkCallbacks::builder()
                .new_sample(move |appsink| {
                    let sample = appsink
                        .pull_sample()
                        .map_err(|_| gstreamer::FlowError::Eos)?;
                    let buffer = sample.buffer().ok_or(gstreamer::FlowError::Error)?;
                    let caps = sample.caps().ok_or(gstreamer::FlowError::Error)?;
                    let video_info =
                        VideoInfo::from_caps(caps).map_err(|_| gstreamer::FlowError::Error)?;
                    let map = buffer
                        .map_readable()
                        .map_err(|_| gstreamer::FlowError::Error)?;

                    let frame = pack_rgba(&video_info, map.as_slice());

                    if let Ok(mut slot) = callback_frame.lock() {
                        *slot = Some(frame.clone());
                    }

                    // Dropping preview frames when the UI is busy is fine;
                    // only the latest one matters.
                    let mut sender = frame_sender.clone();
                    if let Err(e) = sender.try_send(frame)
                        && e.is_disconnected()
                    {
                        return Err(gstreamer::FlowError::Eos);
                    }

                    Ok(gstreamer::FlowSuccess::Ok)
                })
                .build(),
        );

        pipeline
            .set_state(gstreamer::State::Playing)
            .map_err(|e| SessionError::BindFailed(format!("failed to start pipeline: {e}")))?;

        let (result, state, _pending) =
            pipeline.state(gstreamer::ClockTime::from_seconds(START_TIMEOUT_SECS));
        debug!(result = ?result, state = ?state, "Pipeline state after start");
        if state != gstreamer::State::Playing {
            warn!("Pipeline did not reach PLAYING state");
        }

        Ok(Self {
            pipeline,
            appsink,
            last_frame,
            rotation: Arc::new(AtomicU8::new(rotation_to_index(Rotation::Deg0))),
            store,
        })
    }

    fn release(&self) {
        // Clear callbacks first so no new samples arrive during teardown
        self.appsink
            .set_callbacks(gstreamer_app::AppSinkCallbacks::builder().build());
        if let Err(e) = self.pipeline.set_state(gstreamer::State::Null) {
            error!(error = %e, "Failed to stop pipeline");
        }
    }
}

impl CapturePipeline for GstCapturePipeline {
    fn set_target_rotation(&self, rotation: Rotation) {
        self.rotation
            .store(rotation_to_index(rotation), Ordering::Release);
    }

    fn target_rotation(&self) -> Rotation {
        rotation_from_index(self.rotation.load(Ordering::Acquire))
    }

    fn capture(
        &self,
        destination: AssetDescriptor,
    ) -> BoxFuture<'static, Result<SavedAsset, PhotoError>> {
        // Snapshot frame and rotation now; a concurrent heading update after
        // this point does not affect the capture already in flight.
        let frame = self.last_frame.lock().ok().and_then(|slot| slot.clone());
        let rotation = self.target_rotation();
        let store = Arc::clone(&self.store);

        Box::pin(async move {
            let frame = frame.ok_or(PhotoError::NoFrameAvailable)?;
            info!(
                width = frame.width,
                height = frame.height,
                rotation = rotation.degrees(),
                name = %destination.display_name,
                "Capturing photo"
            );

            let bytes = tokio::task::spawn_blocking(move || encode_jpeg(&frame, rotation))
                .await
                .map_err(|e| PhotoError::EncodingFailed(e.to_string()))??;

            store.persist(&destination, &bytes)
        })
    }

    fn shutdown(&self) {
        self.release();
    }
}

impl Drop for GstCapturePipeline {
    fn drop(&mut self) {
        // Safety net; the controller already calls shutdown, and setting an
        // already-NULL pipeline to NULL is a no-op.
        self.release();
    }
}

/// Copy an RGBA buffer into a tightly packed frame, honoring row stride.
fn pack_rgba(info: &VideoInfo, raw: &[u8]) -> CameraFrame {
    let width = info.width();
    let height = info.height();
    let stride = info.stride()[0] as usize;
    let row_bytes = width as usize * 4;

    let data: Arc<[u8]> = if stride == row_bytes {
        Arc::from(&raw[..row_bytes * height as usize])
    } else {
        let mut packed = Vec::with_capacity(row_bytes * height as usize);
        for row in 0..height as usize {
            let start = row * stride;
            packed.extend_from_slice(&raw[start..start + row_bytes]);
        }
        Arc::from(packed.into_boxed_slice())
    };

    CameraFrame {
        width,
        height,
        data,
    }
}

/// Rotate per the target rotation and encode as JPEG.
fn encode_jpeg(frame: &CameraFrame, rotation: Rotation) -> Result<Vec<u8>, PhotoError> {
    let image = image::RgbaImage::from_raw(frame.width, frame.height, frame.data.to_vec())
        .ok_or_else(|| PhotoError::EncodingFailed("frame dimensions mismatch".to_string()))?;
    let image = image::DynamicImage::ImageRgba8(image);

    let image = match rotation {
        Rotation::Deg0 => image,
        Rotation::Deg90 => image.rotate90(),
        Rotation::Deg180 => image.rotate180(),
        Rotation::Deg270 => image.rotate270(),
    };

    // JPEG has no alpha channel
    let mut bytes = Vec::new();
    image
        .to_rgb8()
        .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Jpeg)
        .map_err(|e| PhotoError::EncodingFailed(e.to_string()))?;

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::GenericImageView;

    fn solid_frame(width: u32, height: u32) -> CameraFrame {
        CameraFrame {
            width,
            height,
            data: Arc::from(vec![127u8; (width * height * 4) as usize].into_boxed_slice()),
        }
    }

    #[test]
    fn test_encode_jpeg_swaps_dimensions_on_quarter_turns() {
        let frame = solid_frame(4, 2);

        for (rotation, expected) in [
            (Rotation::Deg0, (4, 2)),
            (Rotation::Deg90, (2, 4)),
            (Rotation::Deg180, (4, 2)),
            (Rotation::Deg270, (2, 4)),
        ] {
            let bytes = encode_jpeg(&frame, rotation).unwrap();
            let decoded = image::load_from_memory(&bytes).unwrap();
            assert_eq!(
                (decoded.width(), decoded.height()),
                expected,
                "rotation {rotation:?}"
            );
        }
    }

    #[test]
    fn test_encode_jpeg_rejects_truncated_frame() {
        let frame = CameraFrame {
            width: 4,
            height: 2,
            data: Arc::from(vec![0u8; 3].into_boxed_slice()),
        };
        assert!(matches!(
            encode_jpeg(&frame, Rotation::Deg0),
            Err(PhotoError::EncodingFailed(_))
        ));
    }

    #[test]
    fn test_rotation_index_roundtrip() {
        for rotation in [
            Rotation::Deg0,
            Rotation::Deg90,
            Rotation::Deg180,
            Rotation::Deg270,
        ] {
            assert_eq!(rotation_from_index(rotation_to_index(rotation)), rotation);
        }
    }
}
