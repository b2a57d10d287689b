// SPDX-License-Identifier: GPL-3.0-only

//! Capture operation handlers

use crate::app::state::{AppModel, Message};
use crate::errors::PhotoError;
use crate::fl;
use crate::storage::{AssetDescriptor, SavedAsset};
use cosmic::Task;
use tracing::{error, info};

impl AppModel {
    /// Shutter pressed: name the asset from the local wall clock and hand the
    /// destination descriptor to the pipeline. The pipeline does the rest.
    pub(crate) fn handle_capture(&mut self) -> Task<cosmic::Action<Message>> {
        if self.is_capturing {
            return Task::none();
        }

        let descriptor = AssetDescriptor::photo(
            chrono::Local::now().naive_local(),
            &self.config.save_folder_name,
        );

        match self.session.capture(descriptor) {
            Ok(pending) => {
                self.is_capturing = true;
                Task::perform(pending, |result| {
                    cosmic::Action::App(Message::PhotoSaved(result))
                })
            }
            Err(err) => {
                error!(error = %err, "Capture requested without a bound session");
                self.toast(fl!("camera-unavailable"))
            }
        }
    }

    pub(crate) fn handle_photo_saved(
        &mut self,
        result: Result<SavedAsset, PhotoError>,
    ) -> Task<cosmic::Action<Message>> {
        self.is_capturing = false;

        match result {
            Ok(asset) => {
                info!(path = %asset.path.display(), "Photo saved");
                self.toast(fl!("photo-saved"))
            }
            Err(err) => {
                // Recoverable by re-triggering; surface the description as-is
                error!(error = %err, "Photo capture failed");
                self.toast(fl!("capture-failed", error = err.to_string()))
            }
        }
    }
}
