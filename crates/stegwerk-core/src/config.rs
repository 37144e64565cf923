// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Startup-time bridge configuration.
//
// The bridge persists nothing itself — permission state is in-memory only
// and re-derived from the platform after a restart. This record is the one
// thing a host hands in at construction time.

use serde::{Deserialize, Serialize};

use crate::types::{CapabilityId, LocationAccuracy};

/// Startup-time declaration of enabled capabilities and per-capability
/// defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Capabilities the host wants exposed. Calls to anything else fail
    /// with `Unavailable` before touching an adapter.
    pub enabled: Vec<CapabilityId>,
    pub camera: CameraDefaults,
    pub geolocation: GeolocationDefaults,
    pub native: NativeBridgeConfig,
}

/// Defaults applied to seeded capture requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraDefaults {
    /// Default encoding quality, 0–100.
    pub quality: u8,
}

/// Defaults applied to seeded position queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeolocationDefaults {
    pub accuracy: LocationAccuracy,
    pub timeout_ms: u64,
}

/// Tuning for the native transport path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NativeBridgeConfig {
    /// How long to wait for a correlated native reply before the call
    /// fails with `Timeout`.
    pub reply_timeout_ms: u64,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            enabled: CapabilityId::ALL.to_vec(),
            camera: CameraDefaults { quality: 90 },
            geolocation: GeolocationDefaults {
                accuracy: LocationAccuracy::Coarse,
                timeout_ms: 10_000,
            },
            native: NativeBridgeConfig {
                reply_timeout_ms: 15_000,
            },
        }
    }
}

impl BridgeConfig {
    pub fn is_enabled(&self, capability: CapabilityId) -> bool {
        self.enabled.contains(&capability)
    }

    /// Load configuration from a JSON file. Returns `None` when the file is
    /// missing or malformed — callers fall back to `Default`.
    pub fn load(path: &std::path::Path) -> Option<Self> {
        let data = std::fs::read_to_string(path).ok()?;
        serde_json::from_str(&data).ok()
    }
}
