// SPDX-License-Identifier: GPL-3.0-only

//! Application state

use crate::backends::camera::GstBinder;
use crate::backends::camera::types::CameraFrame;
use crate::config::Config;
use crate::errors::PhotoError;
use crate::layout::DisplayOrientation;
use crate::permission::AccessDecision;
use crate::session::SessionController;
use crate::storage::SavedAsset;
use cosmic::cosmic_config;
use cosmic::widget;
use cosmic::widget::about::About;

/// Where the permission gate left us.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessState {
    /// Gate still resolving
    #[default]
    Undetermined,
    Granted,
    /// Capture disabled until the next application start
    Denied,
}

/// Context drawer pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContextPage {
    #[default]
    About,
}

/// All user interactions and system events.
#[derive(Debug, Clone)]
pub enum Message {
    /// Permission gate resolved
    CameraAccessDecided(AccessDecision),
    /// New viewfinder frame from the capture pipeline
    PreviewFrame(CameraFrame),
    /// Raw device heading sample from the orientation sensor
    HeadingChanged(u16),
    /// Window size changed; may flip the display orientation
    SurfaceResized(f32, f32),
    /// Shutter button pressed
    Capture,
    /// Still capture finished
    PhotoSaved(Result<SavedAsset, PhotoError>),
    OpenGallery,
    OpenSettings,
    ToggleContextPage(ContextPage),
    LaunchUrl(String),
    UpdateConfig(Config),
    CloseToast(widget::ToastId),
}

/// Main application model.
pub struct AppModel {
    pub core: cosmic::Core,
    pub context_page: ContextPage,
    pub about: About,
    pub config: Config,
    pub config_handler: Option<cosmic_config::Config>,
    pub toasts: widget::toaster::Toasts<Message>,
    /// The one live capture session for this run
    pub session: SessionController<GstBinder>,
    pub access: AccessState,
    pub display_orientation: DisplayOrientation,
    /// Latest preview frame, ready for display
    pub viewfinder: Option<widget::image::Handle>,
    /// A capture is in flight; the shutter is ignored until it resolves
    pub is_capturing: bool,
}
