// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Web geolocation fallback: a single one-shot position query under the
// request's timeout. No watching, no caching, no retry.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use stegwerk_bridge::traits::{GeolocationAdapter, PositionPayload, WebPosition};
use stegwerk_core::error::{CapabilityError, Result};
use stegwerk_core::types::{CapabilityId, LocationAccuracy, LocationRequest};

/// One successful position fix from the hosting runtime.
#[derive(Debug, Clone)]
pub struct PositionFix {
    pub latitude: f64,
    pub longitude: f64,
    /// Horizontal accuracy radius in metres.
    pub accuracy_m: f64,
    /// Milliseconds since the Unix epoch.
    pub epoch_ms: i64,
}

/// One-shot position queries. Supplied by the hosting shell.
#[async_trait]
pub trait PositionSource: Send + Sync {
    async fn current_position(&self, accuracy: LocationAccuracy) -> Result<PositionFix>;
}

/// Geolocation capability backed by a [`PositionSource`].
pub struct WebGeolocationAdapter {
    source: Arc<dyn PositionSource>,
}

impl WebGeolocationAdapter {
    pub fn new(source: Arc<dyn PositionSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl GeolocationAdapter for WebGeolocationAdapter {
    async fn current_position(&self, request: &LocationRequest) -> Result<PositionPayload> {
        let bound = Duration::from_millis(request.timeout_ms);
        let fix = tokio::time::timeout(bound, self.source.current_position(request.accuracy))
            .await
            .map_err(|_| {
                CapabilityError::timeout(
                    CapabilityId::Geolocation,
                    format!("no position fix within {}ms", request.timeout_ms),
                )
            })??;

        Ok(PositionPayload::Web(WebPosition {
            latitude: fix.latitude,
            longitude: fix.longitude,
            accuracy: fix.accuracy_m,
            timestamp_ms: fix.epoch_ms,
        }))
    }
}
