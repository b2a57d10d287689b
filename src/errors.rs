// SPDX-License-Identifier: GPL-3.0-only

//! Error types for the camera application

use std::fmt;

/// Camera permission errors
#[derive(Debug, Clone)]
pub enum AccessError {
    /// The permission portal could not be reached
    PortalUnavailable(String),
    /// The access request itself failed (not a user denial)
    RequestFailed(String),
}

/// Capture session errors
#[derive(Debug, Clone)]
pub enum SessionError {
    /// The capture provider (GStreamer) could not be initialized
    ProviderUnavailable(String),
    /// Binding the preview/still-capture pipeline to the device failed
    BindFailed(String),
    /// An operation required a bound session but none exists
    NotBound,
}

/// Photo capture errors
#[derive(Debug, Clone)]
pub enum PhotoError {
    /// No frame available for capture
    NoFrameAvailable,
    /// Encoding failed
    EncodingFailed(String),
    /// Save failed
    SaveFailed(String),
}

impl fmt::Display for AccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessError::PortalUnavailable(msg) => {
                write!(f, "Permission portal unavailable: {msg}")
            }
            AccessError::RequestFailed(msg) => write!(f, "Access request failed: {msg}"),
        }
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::ProviderUnavailable(msg) => {
                write!(f, "Capture provider unavailable: {msg}")
            }
            SessionError::BindFailed(msg) => write!(f, "Failed to bind camera: {msg}"),
            SessionError::NotBound => write!(f, "No camera session bound"),
        }
    }
}

impl fmt::Display for PhotoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhotoError::NoFrameAvailable => write!(f, "No frame available for capture"),
            PhotoError::EncodingFailed(msg) => write!(f, "Encoding failed: {msg}"),
            PhotoError::SaveFailed(msg) => write!(f, "Save failed: {msg}"),
        }
    }
}

impl std::error::Error for AccessError {}
impl std::error::Error for SessionError {}
impl std::error::Error for PhotoError {}

impl From<std::io::Error> for PhotoError {
    fn from(err: std::io::Error) -> Self {
        PhotoError::SaveFailed(err.to_string())
    }
}
