// SPDX-License-Identifier: GPL-3.0-only

//! GStreamer camera backend

mod pipeline;
pub mod types;

pub use pipeline::{GstBinder, GstCapturePipeline};
