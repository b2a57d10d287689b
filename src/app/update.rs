// SPDX-License-Identifier: GPL-3.0-only

//! Message update handling
//!
//! The main `update()` function dispatches to focused handler methods in the
//! `handlers` submodules:
//!
//! - `handlers::session`: permission gate outcome, session binding, preview
//!   frames, orientation events
//! - `handlers::capture`: photo capture and its completion
//! - `handlers::ui`: navigation stubs, context drawer, toasts, config

use crate::app::state::{AppModel, Message};
use cosmic::Task;

impl AppModel {
    /// Main message handler - routes messages to appropriate handler methods.
    pub fn update(&mut self, message: Message) -> Task<cosmic::Action<Message>> {
        match message {
            // ===== Permission & Session =====
            Message::CameraAccessDecided(decision) => self.handle_access_decided(decision),
            Message::PreviewFrame(frame) => self.handle_preview_frame(frame),
            Message::HeadingChanged(heading) => self.handle_heading_changed(heading),
            Message::SurfaceResized(width, height) => self.handle_surface_resized(width, height),

            // ===== Capture =====
            Message::Capture => self.handle_capture(),
            Message::PhotoSaved(result) => self.handle_photo_saved(result),

            // ===== Navigation & UI =====
            Message::OpenGallery => self.handle_open_gallery(),
            Message::OpenSettings => self.handle_open_settings(),
            Message::ToggleContextPage(page) => self.handle_toggle_context_page(page),
            Message::LaunchUrl(url) => self.handle_launch_url(url),
            Message::UpdateConfig(config) => self.handle_update_config(config),
            Message::CloseToast(id) => self.handle_close_toast(id),
        }
    }
}
