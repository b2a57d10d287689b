// SPDX-License-Identifier: GPL-3.0-only

//! Shutter - a simple camera application for the COSMIC desktop
//!
//! A single-screen viewfinder with one-shot photo capture to the shared
//! Pictures directory. The crate is organized into:
//!
//! - [`app`]: application shell, message handling and UI
//! - [`backends`]: GStreamer capture pipeline
//! - [`permission`] / [`portal`]: camera permission gate and its XDG portal
//!   authority
//! - [`session`]: capture session controller and rotation mapping
//! - [`layout`]: orientation-adaptive layout
//! - [`sensors`]: physical orientation readings via iio-sensor-proxy
//! - [`storage`]: asset naming and the shared picture store
//! - [`config`]: user configuration handling

pub mod app;
pub mod backends;
pub mod config;
pub mod errors;
pub mod i18n;
pub mod layout;
pub mod permission;
pub mod portal;
pub mod sensors;
pub mod session;
pub mod storage;

// Re-export commonly used types
pub use app::{AppModel, Message};
pub use config::Config;
