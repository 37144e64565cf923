// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Environment detection. The probe runs once; the answer is cached for the
// detector's lifetime and no capability call can trigger re-detection.

use std::sync::OnceLock;

use tracing::info;

use stegwerk_core::types::Environment;

/// Answers whether a native bridge endpoint is reachable.
///
/// Detection never fails — a probe that cannot confirm the bridge simply
/// answers `false` and the environment defaults to Web.
pub trait NativeProbe: Send + Sync {
    fn native_bridge_present(&self) -> bool;
}

/// Fixed-answer probe, used when the host's wiring already decides the
/// question (a registry constructed with native adapters has a bridge).
pub struct StaticProbe(pub bool);

impl NativeProbe for StaticProbe {
    fn native_bridge_present(&self) -> bool {
        self.0
    }
}

/// Resolves the runtime environment exactly once.
pub struct EnvironmentDetector {
    probe: Box<dyn NativeProbe>,
    resolved: OnceLock<Environment>,
}

impl EnvironmentDetector {
    pub fn new(probe: Box<dyn NativeProbe>) -> Self {
        Self {
            probe,
            resolved: OnceLock::new(),
        }
    }

    /// The resolved environment. The first call consults the probe; every
    /// later call returns the cached answer.
    pub fn current(&self) -> Environment {
        *self.resolved.get_or_init(|| {
            let env = if self.probe.native_bridge_present() {
                Environment::Native
            } else {
                Environment::Web
            };
            info!(environment = %env, "environment resolved");
            env
        })
    }
}
