// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The capability registry — the one façade callers talk to.
//
// Every operation follows the same path: enabled-check, request validation,
// permission sequencing, adapter selection for the cached environment,
// invocation, normalization. The registry is constructed explicitly and
// handed to callers; there is no process-wide instance.

use std::sync::Arc;

use tracing::{debug, instrument};

use stegwerk_bridge::traits::{
    CameraAdapter, DeviceInfoAdapter, GeolocationAdapter, PermissionBackend,
};
use stegwerk_core::config::BridgeConfig;
use stegwerk_core::error::{CapabilityError, Result};
use stegwerk_core::types::{
    CapabilityId, CaptureRequest, CaptureResult, DeviceInfoRequest, DeviceInfoResult,
    Environment, LocationRequest, LocationResult, PermissionState,
};

use crate::detect::{EnvironmentDetector, NativeProbe, StaticProbe};
use crate::normalize;
use crate::permission::PermissionLedger;

/// The three adapters of one backend family.
#[derive(Clone)]
pub struct AdapterSet {
    pub camera: Arc<dyn CameraAdapter>,
    pub geolocation: Arc<dyn GeolocationAdapter>,
    pub device_info: Arc<dyn DeviceInfoAdapter>,
}

/// Dispatches capability calls to the backend the environment selects.
pub struct CapabilityRegistry {
    config: BridgeConfig,
    detector: EnvironmentDetector,
    permissions: PermissionLedger,
    native: Option<AdapterSet>,
    web: AdapterSet,
}

impl CapabilityRegistry {
    /// Build a registry. The environment probe defaults to "native bridge
    /// present iff native adapters were wired".
    pub fn new(
        config: BridgeConfig,
        web: AdapterSet,
        native: Option<AdapterSet>,
        permission_backend: Arc<dyn PermissionBackend>,
    ) -> Self {
        let probe = StaticProbe(native.is_some());
        Self::with_probe(config, web, native, permission_backend, Box::new(probe))
    }

    /// Build a registry with an explicit probe, for hosts where wiring
    /// alone cannot answer whether the bridge is actually reachable.
    pub fn with_probe(
        config: BridgeConfig,
        web: AdapterSet,
        native: Option<AdapterSet>,
        permission_backend: Arc<dyn PermissionBackend>,
        probe: Box<dyn NativeProbe>,
    ) -> Self {
        Self {
            config,
            detector: EnvironmentDetector::new(probe),
            permissions: PermissionLedger::new(permission_backend),
            native,
            web,
        }
    }

    /// The environment this process resolved to. Cached; never re-detected.
    pub fn environment(&self) -> Environment {
        self.detector.current()
    }

    /// A capture request seeded with the configured defaults.
    pub fn default_capture_request(&self) -> CaptureRequest {
        CaptureRequest {
            quality: self.config.camera.quality,
            ..CaptureRequest::default()
        }
    }

    /// A location request seeded with the configured defaults.
    pub fn default_location_request(&self) -> LocationRequest {
        LocationRequest {
            accuracy: self.config.geolocation.accuracy,
            timeout_ms: self.config.geolocation.timeout_ms,
        }
    }

    /// Capture one photo.
    #[instrument(skip(self, request), fields(source = ?request.source))]
    pub async fn take_photo(&self, request: CaptureRequest) -> Result<CaptureResult> {
        let cap = CapabilityId::Camera;
        self.ensure_enabled(cap)?;
        validate_capture(&request)?;
        self.authorize(cap).await?;

        let payload = self.adapters(cap)?.camera.take_photo(&request).await?;
        let result = normalize::capture(payload)?;
        debug!(format = %result.format, "photo captured");
        Ok(result)
    }

    /// One-shot position query.
    #[instrument(skip(self, request), fields(timeout_ms = request.timeout_ms))]
    pub async fn current_position(&self, request: LocationRequest) -> Result<LocationResult> {
        let cap = CapabilityId::Geolocation;
        self.ensure_enabled(cap)?;
        validate_location(&request)?;
        self.authorize(cap).await?;

        let payload = self
            .adapters(cap)?
            .geolocation
            .current_position(&request)
            .await?;
        normalize::position(payload)
    }

    /// Read device metadata. No permission step — device info is exempt.
    #[instrument(skip(self, _request))]
    pub async fn device_info(&self, _request: DeviceInfoRequest) -> Result<DeviceInfoResult> {
        let cap = CapabilityId::DeviceInfo;
        self.ensure_enabled(cap)?;

        let payload = self.adapters(cap)?.device_info.device_info().await?;
        Ok(normalize::device(payload))
    }

    /// Request authorization for a capability, prompting if still unknown.
    ///
    /// Returns the resulting state; a Denied answer is a state here, not an
    /// error — only capability calls turn it into one.
    pub async fn request_permission(&self, capability: CapabilityId) -> Result<PermissionState> {
        self.ensure_enabled(capability)?;
        self.permissions.ensure_authorized(capability).await
    }

    /// Probe the platform's current permission answer without prompting.
    pub async fn query_permission(&self, capability: CapabilityId) -> Result<PermissionState> {
        self.ensure_enabled(capability)?;
        self.permissions.query(capability).await
    }

    /// Cached permission state, without consulting the platform.
    pub async fn permission_state(&self, capability: CapabilityId) -> PermissionState {
        self.permissions.state(capability).await
    }

    fn ensure_enabled(&self, capability: CapabilityId) -> Result<()> {
        if self.config.is_enabled(capability) {
            Ok(())
        } else {
            Err(CapabilityError::unavailable(
                capability,
                "capability disabled by configuration",
            ))
        }
    }

    async fn authorize(&self, capability: CapabilityId) -> Result<()> {
        let state = self.permissions.ensure_authorized(capability).await?;
        if state.authorized() {
            Ok(())
        } else {
            Err(CapabilityError::permission_denied(
                capability,
                format!("permission {state}"),
            ))
        }
    }

    fn adapters(&self, capability: CapabilityId) -> Result<&AdapterSet> {
        match self.detector.current() {
            Environment::Web => Ok(&self.web),
            Environment::Native => self.native.as_ref().ok_or_else(|| {
                CapabilityError::unavailable(
                    capability,
                    "environment resolved native but no native adapters are wired",
                )
            }),
        }
    }
}

fn validate_capture(request: &CaptureRequest) -> Result<()> {
    if request.quality > 100 {
        return Err(CapabilityError::invalid(
            CapabilityId::Camera,
            format!("quality {} outside 0-100", request.quality),
        ));
    }
    Ok(())
}

fn validate_location(request: &LocationRequest) -> Result<()> {
    if request.timeout_ms == 0 {
        return Err(CapabilityError::invalid(
            CapabilityId::Geolocation,
            "timeout_ms must be positive",
        ));
    }
    Ok(())
}
