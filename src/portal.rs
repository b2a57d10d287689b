// SPDX-License-Identifier: GPL-3.0-only

//! XDG desktop portal integration for camera access
//!
//! Talks to `org.freedesktop.portal.Camera` on the session bus. The portal's
//! `AccessCamera` call replies with a request handle whose `Response` signal
//! carries the grant/deny outcome; when the user has already allowed the
//! application the portal answers without prompting.

use crate::errors::AccessError;
use crate::permission::CameraAuthority;
use futures::StreamExt;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info};
use zbus::zvariant::{OwnedObjectPath, OwnedValue, Value};

const PORTAL_SERVICE: &str = "org.freedesktop.portal.Desktop";
const PORTAL_PATH: &str = "/org/freedesktop/portal/desktop";
const CAMERA_INTERFACE: &str = "org.freedesktop.portal.Camera";
const REQUEST_INTERFACE: &str = "org.freedesktop.portal.Request";

/// Response code the portal uses for a successful (granted) request.
const RESPONSE_GRANTED: u32 = 0;

static REQUEST_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Camera authority backed by the XDG desktop portal.
///
/// On systems without a portal (plain device access, no sandbox gatekeeper)
/// access is treated as granted so the session can bind directly.
#[derive(Debug, Default)]
pub struct PortalAuthority;

impl PortalAuthority {
    pub fn new() -> Self {
        Self
    }

    /// Whether a camera portal is present on the session bus.
    async fn portal_available(&self) -> bool {
        let Ok(connection) = zbus::Connection::session().await else {
            return false;
        };
        let Ok(proxy) =
            zbus::Proxy::new(&connection, PORTAL_SERVICE, PORTAL_PATH, CAMERA_INTERFACE).await
        else {
            return false;
        };
        proxy.get_property::<u32>("version").await.is_ok()
    }
}

impl CameraAuthority for PortalAuthority {
    async fn already_granted(&self) -> bool {
        // The portal has no query-without-prompt API; a previously allowed
        // application is granted silently inside AccessCamera instead. Only
        // the no-portal case short-circuits here.
        if !self.portal_available().await {
            info!("No camera portal on the session bus, assuming direct device access");
            return true;
        }
        false
    }

    async fn request_access(&self) -> Result<bool, AccessError> {
        let connection = zbus::Connection::session()
            .await
            .map_err(|e| AccessError::PortalUnavailable(e.to_string()))?;

        let camera = zbus::Proxy::new(&connection, PORTAL_SERVICE, PORTAL_PATH, CAMERA_INTERFACE)
            .await
            .map_err(|e| AccessError::PortalUnavailable(e.to_string()))?;

        // The request object's path is derivable from our unique name and the
        // handle token, so the Response signal can be subscribed to before
        // AccessCamera is called (no window to miss the reply).
        let token = format!(
            "shutter_{}_{}",
            std::process::id(),
            REQUEST_COUNTER.fetch_add(1, Ordering::Relaxed)
        );
        let sender = connection
            .unique_name()
            .map(|name| name.trim_start_matches(':').replace('.', "_"))
            .ok_or_else(|| AccessError::PortalUnavailable("no unique bus name".to_string()))?;
        let request_path = format!("/org/freedesktop/portal/desktop/request/{sender}/{token}");

        let request = zbus::Proxy::new(
            &connection,
            PORTAL_SERVICE,
            request_path.as_str(),
            REQUEST_INTERFACE,
        )
        .await
        .map_err(|e| AccessError::RequestFailed(e.to_string()))?;
        let mut responses = request
            .receive_signal("Response")
            .await
            .map_err(|e| AccessError::RequestFailed(e.to_string()))?;

        let mut options: HashMap<&str, Value> = HashMap::new();
        options.insert("handle_token", Value::new(token.as_str()));

        let handle: OwnedObjectPath = camera
            .call("AccessCamera", &(options,))
            .await
            .map_err(|e| AccessError::RequestFailed(e.to_string()))?;
        debug!(handle = %handle, "Camera access request in flight");

        let message = responses
            .next()
            .await
            .ok_or_else(|| AccessError::RequestFailed("request closed without response".to_string()))?;
        let (code, _results): (u32, HashMap<String, OwnedValue>) = message
            .body()
            .deserialize()
            .map_err(|e| AccessError::RequestFailed(e.to_string()))?;

        Ok(code == RESPONSE_GRANTED)
    }
}
