// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Per-capability permission ledger.
//
// The ledger is the only writer of permission state. Granted, Denied, and
// Restricted are sticky for `ensure_authorized`; only an explicit `query`
// can observe an out-of-band change (the user flipping a toggle in system
// settings). Device info never enters the machine — implicitly granted.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, instrument};

use stegwerk_bridge::traits::PermissionBackend;
use stegwerk_core::error::Result;
use stegwerk_core::types::{CapabilityId, PermissionState};

/// Tracks authorization per capability and drives the prompt sequencing.
pub struct PermissionLedger {
    states: Mutex<HashMap<CapabilityId, PermissionState>>,
    backend: Arc<dyn PermissionBackend>,
}

impl PermissionLedger {
    pub fn new(backend: Arc<dyn PermissionBackend>) -> Self {
        Self {
            states: Mutex::new(HashMap::new()),
            backend,
        }
    }

    /// Cached state, without consulting the platform.
    pub async fn state(&self, capability: CapabilityId) -> PermissionState {
        if !capability.requires_permission() {
            return PermissionState::Granted;
        }
        self.states
            .lock()
            .await
            .get(&capability)
            .copied()
            .unwrap_or(PermissionState::Unknown)
    }

    /// Settle authorization for a capability call.
    ///
    /// Unknown triggers one permission request (the platform may prompt);
    /// Granted, Denied, and Restricted return as-is without re-prompting.
    /// The prompt outcome is written last-writer-wins — the underlying
    /// platform prompt is exclusive, so concurrent requests settle to the
    /// same answer.
    #[instrument(skip(self), fields(capability = %capability))]
    pub async fn ensure_authorized(&self, capability: CapabilityId) -> Result<PermissionState> {
        if !capability.requires_permission() {
            return Ok(PermissionState::Granted);
        }

        let cached = self.state(capability).await;
        if cached != PermissionState::Unknown {
            return Ok(cached);
        }

        debug!("permission unknown; requesting");
        // The lock is not held across the prompt — a prompt can take as
        // long as the user does.
        let settled = self.backend.request(capability).await?;
        self.states.lock().await.insert(capability, settled);
        debug!(state = %settled, "permission settled");
        Ok(settled)
    }

    /// Non-prompting probe of the platform's current answer.
    ///
    /// This is also the only path out of Denied/Restricted, when platform
    /// settings changed out-of-band. The ledger does not poll for that.
    pub async fn query(&self, capability: CapabilityId) -> Result<PermissionState> {
        if !capability.requires_permission() {
            return Ok(PermissionState::Granted);
        }
        let state = self.backend.query(capability).await?;
        self.states.lock().await.insert(capability, state);
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Backend with scripted answers and call counters.
    struct ScriptedBackend {
        request_answer: PermissionState,
        query_answer: PermissionState,
        requests: AtomicUsize,
        queries: AtomicUsize,
    }

    impl ScriptedBackend {
        fn new(request_answer: PermissionState, query_answer: PermissionState) -> Arc<Self> {
            Arc::new(Self {
                request_answer,
                query_answer,
                requests: AtomicUsize::new(0),
                queries: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl PermissionBackend for ScriptedBackend {
        async fn query(&self, _capability: CapabilityId) -> Result<PermissionState> {
            self.queries.fetch_add(1, Ordering::SeqCst);
            Ok(self.query_answer)
        }

        async fn request(&self, _capability: CapabilityId) -> Result<PermissionState> {
            self.requests.fetch_add(1, Ordering::SeqCst);
            Ok(self.request_answer)
        }
    }

    #[tokio::test]
    async fn granted_is_idempotent_without_reprompting() {
        let backend = ScriptedBackend::new(PermissionState::Granted, PermissionState::Granted);
        let ledger = PermissionLedger::new(Arc::clone(&backend) as Arc<dyn PermissionBackend>);

        for _ in 0..3 {
            let state = ledger.ensure_authorized(CapabilityId::Camera).await.unwrap();
            assert_eq!(state, PermissionState::Granted);
        }
        assert_eq!(backend.requests.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn denied_is_sticky_for_ensure_authorized() {
        let backend = ScriptedBackend::new(PermissionState::Denied, PermissionState::Granted);
        let ledger = PermissionLedger::new(Arc::clone(&backend) as Arc<dyn PermissionBackend>);

        let first = ledger
            .ensure_authorized(CapabilityId::Geolocation)
            .await
            .unwrap();
        let second = ledger
            .ensure_authorized(CapabilityId::Geolocation)
            .await
            .unwrap();

        assert_eq!(first, PermissionState::Denied);
        assert_eq!(second, PermissionState::Denied);
        // One prompt for the first call, none for the second.
        assert_eq!(backend.requests.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn query_is_the_path_out_of_denied() {
        let backend = ScriptedBackend::new(PermissionState::Denied, PermissionState::Granted);
        let ledger = PermissionLedger::new(Arc::clone(&backend) as Arc<dyn PermissionBackend>);

        ledger
            .ensure_authorized(CapabilityId::Camera)
            .await
            .unwrap();
        assert_eq!(ledger.state(CapabilityId::Camera).await, PermissionState::Denied);

        // User flipped the toggle in settings; an explicit query sees it.
        let state = ledger.query(CapabilityId::Camera).await.unwrap();
        assert_eq!(state, PermissionState::Granted);
        assert_eq!(ledger.state(CapabilityId::Camera).await, PermissionState::Granted);
    }

    #[tokio::test]
    async fn device_info_never_touches_the_backend() {
        let backend = ScriptedBackend::new(PermissionState::Denied, PermissionState::Denied);
        let ledger = PermissionLedger::new(Arc::clone(&backend) as Arc<dyn PermissionBackend>);

        let state = ledger
            .ensure_authorized(CapabilityId::DeviceInfo)
            .await
            .unwrap();
        assert_eq!(state, PermissionState::Granted);
        assert_eq!(ledger.query(CapabilityId::DeviceInfo).await.unwrap(), PermissionState::Granted);
        assert_eq!(backend.requests.load(Ordering::SeqCst), 0);
        assert_eq!(backend.queries.load(Ordering::SeqCst), 0);
    }
}
