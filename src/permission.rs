// SPDX-License-Identifier: GPL-3.0-only

//! Camera permission gate
//!
//! Runs once at startup, before the capture session controller: check whether
//! camera access is already granted, and if not, issue exactly one
//! asynchronous capability request. A denial leaves the application in a
//! capture-disabled state for the rest of the run; there is no retry loop,
//! the gate is only consulted again on the next application start.

use crate::errors::AccessError;
use tracing::{info, warn};

/// Outcome of the permission gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Granted,
    Denied,
}

/// Capability interface over the host permission system.
///
/// The production implementation talks to the XDG desktop portal
/// ([`crate::portal::PortalAuthority`]); tests inject doubles.
pub trait CameraAuthority {
    /// Cheap check whether access is already granted, without prompting.
    fn already_granted(&self) -> impl Future<Output = bool> + Send;

    /// One-shot asynchronous capability request. `Ok(true)` means the user
    /// granted access, `Ok(false)` means they declined.
    fn request_access(&self) -> impl Future<Output = Result<bool, AccessError>> + Send;
}

/// Resolve camera access against the given authority.
///
/// A failed request (as opposed to a user denial) is treated as denied, since
/// capture cannot proceed either way.
pub async fn resolve<A: CameraAuthority>(authority: &A) -> AccessDecision {
    if authority.already_granted().await {
        info!("Camera access already granted");
        return AccessDecision::Granted;
    }

    match authority.request_access().await {
        Ok(true) => {
            info!("Camera access granted by user");
            AccessDecision::Granted
        }
        Ok(false) => {
            info!("Camera access denied by user");
            AccessDecision::Denied
        }
        Err(err) => {
            warn!(error = %err, "Camera access request failed");
            AccessDecision::Denied
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeAuthority {
        granted: bool,
        request_result: Result<bool, AccessError>,
        requests: AtomicUsize,
    }

    impl FakeAuthority {
        fn new(granted: bool, request_result: Result<bool, AccessError>) -> Self {
            Self {
                granted,
                request_result,
                requests: AtomicUsize::new(0),
            }
        }
    }

    impl CameraAuthority for FakeAuthority {
        async fn already_granted(&self) -> bool {
            self.granted
        }

        async fn request_access(&self) -> Result<bool, AccessError> {
            self.requests.fetch_add(1, Ordering::SeqCst);
            self.request_result.clone()
        }
    }

    #[test]
    fn test_already_granted_skips_request() {
        let authority = FakeAuthority::new(true, Ok(false));
        let decision = pollster::block_on(resolve(&authority));
        assert_eq!(decision, AccessDecision::Granted);
        assert_eq!(authority.requests.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_grant_after_request() {
        let authority = FakeAuthority::new(false, Ok(true));
        let decision = pollster::block_on(resolve(&authority));
        assert_eq!(decision, AccessDecision::Granted);
        assert_eq!(authority.requests.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_denial_issues_exactly_one_request() {
        let authority = FakeAuthority::new(false, Ok(false));
        let decision = pollster::block_on(resolve(&authority));
        assert_eq!(decision, AccessDecision::Denied);
        assert_eq!(authority.requests.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_request_failure_counts_as_denial() {
        let authority = FakeAuthority::new(
            false,
            Err(AccessError::PortalUnavailable("no bus".to_string())),
        );
        let decision = pollster::block_on(resolve(&authority));
        assert_eq!(decision, AccessDecision::Denied);
    }
}
