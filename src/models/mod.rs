// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod marathon;
pub mod record;

pub use marathon::MarathonUpdate;
pub use record::{record_from_json, record_to_json, records_to_json};
