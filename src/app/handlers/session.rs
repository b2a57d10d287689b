// SPDX-License-Identifier: GPL-3.0-only

//! Permission and capture-session handlers

use crate::app::state::{AccessState, AppModel, Message};
use crate::backends::camera::types::CameraFrame;
use crate::fl;
use crate::layout::DisplayOrientation;
use crate::permission::AccessDecision;
use crate::session::BindRequest;
use cosmic::Task;
use cosmic::widget;
use tracing::{error, info};

impl AppModel {
    // =========================================================================
    // Permission Gate
    // =========================================================================

    pub(crate) fn handle_access_decided(
        &mut self,
        decision: AccessDecision,
    ) -> Task<cosmic::Action<Message>> {
        match decision {
            AccessDecision::Granted => {
                self.access = AccessState::Granted;
                self.start_session()
            }
            AccessDecision::Denied => {
                // Capture stays disabled for this run; no retry loop
                self.access = AccessState::Denied;
                self.toast(fl!("camera-denied"))
            }
        }
    }

    // =========================================================================
    // Capture Session
    // =========================================================================

    /// Bind preview and still capture, and run the preview frame stream
    /// until the pipeline goes away.
    pub(crate) fn start_session(&mut self) -> Task<cosmic::Action<Message>> {
        match self.session.start(BindRequest::default()) {
            Ok(frames) => {
                Task::run(frames, |frame| {
                    cosmic::Action::App(Message::PreviewFrame(frame))
                })
            }
            Err(err) => {
                error!(error = %err, "Failed to start capture session");
                self.toast(fl!("camera-start-failed", error = err.to_string()))
            }
        }
    }

    pub(crate) fn handle_preview_frame(
        &mut self,
        frame: CameraFrame,
    ) -> Task<cosmic::Action<Message>> {
        self.viewfinder = Some(widget::image::Handle::from_rgba(
            frame.width,
            frame.height,
            frame.data.to_vec(),
        ));
        Task::none()
    }

    // =========================================================================
    // Orientation
    // =========================================================================

    pub(crate) fn handle_heading_changed(
        &mut self,
        heading: u16,
    ) -> Task<cosmic::Action<Message>> {
        // Only the still-capture target rotation follows the physical
        // heading; the viewfinder framing is untouched.
        self.session.heading_changed(heading);
        Task::none()
    }

    pub(crate) fn handle_surface_resized(
        &mut self,
        width: f32,
        height: f32,
    ) -> Task<cosmic::Action<Message>> {
        let orientation = DisplayOrientation::from_size(width, height);
        if orientation != self.display_orientation {
            info!(?orientation, "Display orientation changed");
            self.display_orientation = orientation;
        }
        Task::none()
    }
}
