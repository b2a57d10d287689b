// SPDX-License-Identifier: GPL-3.0-only

//! Host capture backend

pub mod camera;
