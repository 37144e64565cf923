// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Web device-info fallback: a synchronous best-effort read of whatever the
// hosting runtime exposes. This call never fails — attributes the runtime
// cannot see simply stay absent, which is the documented web behavior.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use stegwerk_bridge::traits::{DeviceInfoAdapter, DevicePayload, WebDeviceSnapshot};
use stegwerk_core::error::Result;

/// Attributes readable from the hosting runtime without any permission.
///
/// Implementations must not fail; unavailable attributes are `None`.
pub trait HostEnvironment: Send + Sync {
    fn snapshot(&self) -> WebDeviceSnapshot;
}

/// Default host read backed by `sysinfo`.
///
/// User agent and battery are not host-OS attributes `sysinfo` can see; a
/// browser-embedded shell overrides this implementation to fill them in.
pub struct SysinfoHost;

impl HostEnvironment for SysinfoHost {
    fn snapshot(&self) -> WebDeviceSnapshot {
        let sys = sysinfo::System::new_all();
        WebDeviceSnapshot {
            user_agent: None,
            platform: sysinfo::System::name(),
            os_version: sysinfo::System::os_version(),
            cpu_count: Some(sys.cpus().len()),
            memory_bytes: Some(sys.total_memory()),
            battery_level: None,
            battery_charging: None,
        }
    }
}

/// Device info capability backed by a [`HostEnvironment`].
pub struct WebDeviceInfoAdapter {
    host: Arc<dyn HostEnvironment>,
}

impl WebDeviceInfoAdapter {
    pub fn new(host: Arc<dyn HostEnvironment>) -> Self {
        Self { host }
    }
}

#[async_trait]
impl DeviceInfoAdapter for WebDeviceInfoAdapter {
    async fn device_info(&self) -> Result<DevicePayload> {
        let snapshot = self.host.snapshot();
        debug!(
            has_battery = snapshot.battery_level.is_some(),
            cpu_count = snapshot.cpu_count,
            "host snapshot read"
        );
        Ok(DevicePayload::Web(snapshot))
    }
}
