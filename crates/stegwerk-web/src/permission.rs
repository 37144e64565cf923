// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Web permission backend. The hosting runtime's permission model sits
// behind the `PermissionGate` seam; this adapter maps its three-valued
// answers into the bridge's permission states. Web runtimes have no
// "restricted" state, so that value is never produced here.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use stegwerk_bridge::traits::PermissionBackend;
use stegwerk_core::error::Result;
use stegwerk_core::types::{CapabilityId, PermissionState};

/// Authorization answer from the hosting runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Granted,
    Denied,
    /// Not yet decided — the runtime would prompt on first use.
    Prompt,
}

/// The hosting runtime's permission model. Supplied by the shell.
#[async_trait]
pub trait PermissionGate: Send + Sync {
    /// Current state without prompting.
    async fn query_state(&self, capability: CapabilityId) -> Result<GateState>;

    /// Ask for access; the runtime may prompt the user once.
    async fn request_access(&self, capability: CapabilityId) -> Result<GateState>;
}

/// Permission backend for the web path.
pub struct WebPermissionBackend {
    gate: Arc<dyn PermissionGate>,
}

impl WebPermissionBackend {
    pub fn new(gate: Arc<dyn PermissionGate>) -> Self {
        Self { gate }
    }
}

#[async_trait]
impl PermissionBackend for WebPermissionBackend {
    async fn query(&self, capability: CapabilityId) -> Result<PermissionState> {
        let state = match self.gate.query_state(capability).await? {
            GateState::Granted => PermissionState::Granted,
            GateState::Denied => PermissionState::Denied,
            GateState::Prompt => PermissionState::Unknown,
        };
        Ok(state)
    }

    async fn request(&self, capability: CapabilityId) -> Result<PermissionState> {
        let state = match self.gate.request_access(capability).await? {
            GateState::Granted => PermissionState::Granted,
            GateState::Denied => PermissionState::Denied,
            // A request must settle to granted or denied. A gate still
            // prompting afterwards is treated as a refusal.
            GateState::Prompt => {
                warn!(%capability, "gate still prompting after request; treating as denied");
                PermissionState::Denied
            }
        };
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedGate(GateState, GateState);

    #[async_trait]
    impl PermissionGate for FixedGate {
        async fn query_state(&self, _capability: CapabilityId) -> Result<GateState> {
            Ok(self.0)
        }

        async fn request_access(&self, _capability: CapabilityId) -> Result<GateState> {
            Ok(self.1)
        }
    }

    #[tokio::test]
    async fn prompt_maps_to_unknown_on_query() {
        let backend = WebPermissionBackend::new(Arc::new(FixedGate(
            GateState::Prompt,
            GateState::Granted,
        )));
        let state = backend.query(CapabilityId::Camera).await.unwrap();
        assert_eq!(state, PermissionState::Unknown);
    }

    #[tokio::test]
    async fn request_settles_to_granted_or_denied() {
        let backend = WebPermissionBackend::new(Arc::new(FixedGate(
            GateState::Prompt,
            GateState::Granted,
        )));
        let state = backend.request(CapabilityId::Camera).await.unwrap();
        assert_eq!(state, PermissionState::Granted);

        let backend = WebPermissionBackend::new(Arc::new(FixedGate(
            GateState::Prompt,
            GateState::Prompt,
        )));
        let state = backend.request(CapabilityId::Geolocation).await.unwrap();
        assert_eq!(state, PermissionState::Denied);
    }

    #[tokio::test]
    async fn restricted_is_never_produced() {
        for gate in [GateState::Granted, GateState::Denied, GateState::Prompt] {
            let backend = WebPermissionBackend::new(Arc::new(FixedGate(gate, gate)));
            let q = backend.query(CapabilityId::Camera).await.unwrap();
            let r = backend.request(CapabilityId::Camera).await.unwrap();
            assert_ne!(q, PermissionState::Restricted);
            assert_ne!(r, PermissionState::Restricted);
        }
    }
}
