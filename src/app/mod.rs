// SPDX-License-Identifier: GPL-3.0-only

//! Main application module for Shutter
//!
//! - `state`: application state types (`AppModel`, `Message`)
//! - `update`: message dispatch
//! - `handlers`: focused handler methods per functional domain
//! - `view`: main view rendering with the orientation-adaptive layout

mod handlers;
mod state;
mod update;
mod view;

use crate::config::Config;
use crate::fl;
use crate::permission;
use crate::portal::PortalAuthority;
use cosmic::app::context_drawer;
use cosmic::cosmic_config::{self, CosmicConfigEntry};
use cosmic::iced::Subscription;
use cosmic::widget::{self, about::About};
use cosmic::{Element, Task};
pub use state::{AccessState, AppModel, ContextPage, Message};
use tracing::{debug, error};

const REPOSITORY: &str = "https://github.com/cosmic-utils/shutter";
const APP_ICON: &[u8] =
    include_bytes!("../../resources/icons/hicolor/scalable/apps/io.github.cosmic-utils.shutter.svg");

impl cosmic::Application for AppModel {
    /// The async executor that will be used to run your application's commands.
    type Executor = cosmic::executor::Default;

    /// Data that your application receives to its init method.
    type Flags = ();

    /// Messages which the application and its widgets will emit.
    type Message = Message;

    /// Unique identifier in RDNN (reverse domain name notation) format.
    const APP_ID: &'static str = "io.github.cosmic-utils.shutter";

    fn core(&self) -> &cosmic::Core {
        &self.core
    }

    fn core_mut(&mut self) -> &mut cosmic::Core {
        &mut self.core
    }

    /// Initializes the application with any given flags and startup commands.
    fn init(
        core: cosmic::Core,
        _flags: Self::Flags,
    ) -> (Self, Task<cosmic::Action<Self::Message>>) {
        let about = About::default()
            .name(fl!("app-title"))
            .icon(widget::icon::from_svg_bytes(APP_ICON))
            .version(env!("CARGO_PKG_VERSION"))
            .links([(fl!("repository"), REPOSITORY)])
            .license(env!("CARGO_PKG_LICENSE"));

        // Load configuration
        let (config_handler, config) =
            match cosmic_config::Config::new(Self::APP_ID, Config::VERSION) {
                Ok(handler) => {
                    let config = match Config::get_entry(&handler) {
                        Ok(config) => config,
                        Err((errors, config)) => {
                            error!(?errors, "Errors loading config");
                            config
                        }
                    };
                    (Some(handler), config)
                }
                Err(err) => {
                    error!(%err, "Failed to create config handler");
                    (None, Config::default())
                }
            };

        // Acquire the process-wide capture provider early; binding happens
        // after the permission gate resolves.
        if let Err(e) = gstreamer::init() {
            error!(error = %e, "Failed to initialize GStreamer");
        }

        let app = AppModel {
            core,
            context_page: ContextPage::default(),
            about,
            config,
            config_handler,
            toasts: widget::toaster::Toasts::new(Message::CloseToast),
            session: Self::make_session(),
            access: AccessState::default(),
            display_orientation: crate::layout::DisplayOrientation::default(),
            viewfinder: None,
            is_capturing: false,
        };

        // Permission gate runs before anything touches the camera; the
        // continuation comes back on the main context as a message.
        let gate_task = Task::perform(
            async move { permission::resolve(&PortalAuthority::new()).await },
            |decision| cosmic::Action::App(Message::CameraAccessDecided(decision)),
        );

        (app, gate_task)
    }

    /// Elements to pack at the end of the header bar.
    fn header_end(&self) -> Vec<Element<'_, Self::Message>> {
        vec![
            widget::button::icon(widget::icon::from_name("help-about-symbolic"))
                .on_press(Message::ToggleContextPage(ContextPage::About))
                .into(),
        ]
    }

    /// Display a context drawer if the context page is requested.
    fn context_drawer(&self) -> Option<context_drawer::ContextDrawer<'_, Self::Message>> {
        if !self.core.window.show_context {
            return None;
        }

        Some(match self.context_page {
            ContextPage::About => context_drawer::about(
                &self.about,
                |url| Message::LaunchUrl(url.to_string()),
                Message::ToggleContextPage(ContextPage::About),
            ),
        })
    }

    /// Describes the interface based on the current state of the application model.
    fn view(&self) -> Element<'_, Self::Message> {
        self.view()
    }

    /// Register subscriptions for this application.
    fn subscription(&self) -> Subscription<Self::Message> {
        let config_sub = self
            .core()
            .watch_config::<Config>(Self::APP_ID)
            .map(|update| Message::UpdateConfig(update.config));

        // Continuous physical-orientation stream, independent of the UI
        // thread; only the still-capture rotation consumes it.
        let sensor_sub = Subscription::run_with_id(
            "orientation-sensor",
            cosmic::iced::stream::channel(16, |output| async move {
                if let Err(err) = crate::sensors::watch_headings(output, Message::HeadingChanged).await
                {
                    debug!(error = %err, "Orientation sensor unavailable");
                }
            }),
        );

        // Display-orientation changes arrive as window resizes
        let resize_sub = cosmic::iced::event::listen_with(|event, _status, _id| match event {
            cosmic::iced::Event::Window(cosmic::iced::window::Event::Resized(size)) => {
                Some(Message::SurfaceResized(size.width, size.height))
            }
            _ => None,
        });

        Subscription::batch([config_sub, sensor_sub, resize_sub])
    }

    /// Handles messages emitted by the application and its widgets.
    fn update(&mut self, message: Self::Message) -> Task<cosmic::Action<Self::Message>> {
        self.update(message)
    }
}

impl AppModel {
    fn make_session()
    -> crate::session::SessionController<crate::backends::camera::GstBinder> {
        let store = std::sync::Arc::new(crate::storage::PicturesStore);
        crate::session::SessionController::new(crate::backends::camera::GstBinder::new(store))
    }
}
