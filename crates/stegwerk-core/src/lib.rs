// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stegwerk — Core types, error taxonomy, and configuration shared across all
// crates of the capability bridge.

pub mod config;
pub mod error;
pub mod guidance;
pub mod types;

pub use config::BridgeConfig;
pub use error::CapabilityError;
pub use types::*;
