// SPDX-License-Identifier: GPL-3.0-only

//! Navigation stubs, context drawer, toasts and config handlers

use crate::app::state::{AppModel, ContextPage, Message};
use crate::fl;
use cosmic::Task;
use cosmic::widget;
use tracing::{error, info};

impl AppModel {
    // =========================================================================
    // Navigation Stubs
    // =========================================================================

    /// Fire-and-forget: hand the photo directory to the default viewer. No
    /// result is awaited; a missing handler only shows up in the log.
    pub(crate) fn handle_open_gallery(&self) -> Task<cosmic::Action<Message>> {
        let photo_dir = crate::storage::photo_directory(&self.config.save_folder_name);
        info!(path = %photo_dir.display(), "Opening gallery directory");

        if let Err(e) = open::that(&photo_dir) {
            error!(error = %e, path = %photo_dir.display(), "Failed to open gallery directory");
        }
        Task::none()
    }

    pub(crate) fn handle_open_settings(&mut self) -> Task<cosmic::Action<Message>> {
        // Placeholder; there is no settings screen yet
        self.toast(fl!("settings-placeholder"))
    }

    // =========================================================================
    // Context Drawer & Toasts
    // =========================================================================

    pub(crate) fn handle_toggle_context_page(
        &mut self,
        page: ContextPage,
    ) -> Task<cosmic::Action<Message>> {
        if self.context_page == page {
            self.core.window.show_context = !self.core.window.show_context;
        } else {
            self.context_page = page;
            self.core.window.show_context = true;
        }
        Task::none()
    }

    pub(crate) fn handle_launch_url(&self, url: String) -> Task<cosmic::Action<Message>> {
        if let Err(e) = open::that_detached(&url) {
            error!(error = %e, url = %url, "Failed to open URL");
        }
        Task::none()
    }

    /// Push a transient toast-style notice.
    pub(crate) fn toast(&mut self, message: String) -> Task<cosmic::Action<Message>> {
        self.toasts
            .push(widget::toaster::Toast::new(message))
            .map(cosmic::Action::App)
    }

    pub(crate) fn handle_close_toast(
        &mut self,
        id: widget::ToastId,
    ) -> Task<cosmic::Action<Message>> {
        self.toasts.remove(id);
        Task::none()
    }

    // =========================================================================
    // Config
    // =========================================================================

    pub(crate) fn handle_update_config(
        &mut self,
        config: crate::config::Config,
    ) -> Task<cosmic::Action<Message>> {
        let theme_changed = config.app_theme != self.config.app_theme;
        self.config = config;

        if theme_changed {
            return cosmic::command::set_theme(self.config.app_theme.theme());
        }
        Task::none()
    }
}
