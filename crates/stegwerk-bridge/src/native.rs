// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Native adapters — each capability forwards its request over the bridge
// transport and deserializes the correlated reply into the raw native
// payload shape. Normalization happens later, in the dispatcher.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use stegwerk_core::error::{CapabilityError, Result};
use stegwerk_core::types::{CapabilityId, CaptureRequest, LocationRequest, PermissionState};

use crate::traits::{
    CameraAdapter, CapturePayload, DeviceInfoAdapter, DevicePayload, GeolocationAdapter,
    NativeCapture, NativeDeviceInfo, NativePosition, PermissionBackend, PositionPayload,
};
use crate::transport::BridgeTransport;

const OP_CAPTURE: &str = "camera.capture";
const OP_POSITION: &str = "geolocation.current";
const OP_DEVICE_INFO: &str = "device.info";
const OP_PERMISSION_QUERY: &str = "permissions.query";
const OP_PERMISSION_REQUEST: &str = "permissions.request";

fn encode<T: serde::Serialize>(
    capability: CapabilityId,
    request: &T,
) -> Result<serde_json::Value> {
    serde_json::to_value(request)
        .map_err(|e| CapabilityError::backend(capability, format!("unserializable request: {e}")))
}

fn decode<T: for<'de> Deserialize<'de>>(
    capability: CapabilityId,
    reply: serde_json::Value,
) -> Result<T> {
    serde_json::from_value(reply)
        .map_err(|e| CapabilityError::backend(capability, format!("malformed native reply: {e}")))
}

/// Camera over the native bridge.
pub struct NativeCameraAdapter {
    transport: Arc<BridgeTransport>,
}

impl NativeCameraAdapter {
    pub fn new(transport: Arc<BridgeTransport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl CameraAdapter for NativeCameraAdapter {
    async fn take_photo(&self, request: &CaptureRequest) -> Result<CapturePayload> {
        let cap = CapabilityId::Camera;
        let reply = self
            .transport
            .send(cap, OP_CAPTURE, encode(cap, request)?)
            .await?;
        let capture: NativeCapture = decode(cap, reply)?;
        debug!(has_uri = capture.uri.is_some(), "native capture reply");
        Ok(CapturePayload::Native(capture))
    }
}

/// Geolocation over the native bridge.
///
/// The request's own `timeout_ms` bounds the whole exchange; the tighter of
/// it and the transport-wide reply bound wins.
pub struct NativeGeolocationAdapter {
    transport: Arc<BridgeTransport>,
}

impl NativeGeolocationAdapter {
    pub fn new(transport: Arc<BridgeTransport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl GeolocationAdapter for NativeGeolocationAdapter {
    async fn current_position(&self, request: &LocationRequest) -> Result<PositionPayload> {
        let cap = CapabilityId::Geolocation;
        let bound = Duration::from_millis(request.timeout_ms);
        let sent = self.transport.send(cap, OP_POSITION, encode(cap, request)?);
        let reply = tokio::time::timeout(bound, sent).await.map_err(|_| {
            CapabilityError::timeout(
                cap,
                format!("no position fix within {}ms", request.timeout_ms),
            )
        })??;
        let position: NativePosition = decode(cap, reply)?;
        Ok(PositionPayload::Native(position))
    }
}

/// Device info over the native bridge.
pub struct NativeDeviceInfoAdapter {
    transport: Arc<BridgeTransport>,
}

impl NativeDeviceInfoAdapter {
    pub fn new(transport: Arc<BridgeTransport>) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl DeviceInfoAdapter for NativeDeviceInfoAdapter {
    async fn device_info(&self) -> Result<DevicePayload> {
        let cap = CapabilityId::DeviceInfo;
        let reply = self
            .transport
            .send(cap, OP_DEVICE_INFO, serde_json::json!({}))
            .await?;
        let info: NativeDeviceInfo = decode(cap, reply)?;
        Ok(DevicePayload::Native(info))
    }
}

#[derive(Deserialize)]
struct PermissionReply {
    state: PermissionState,
}

/// Permission queries and requests over the native bridge.
pub struct NativePermissionBroker {
    transport: Arc<BridgeTransport>,
}

impl NativePermissionBroker {
    pub fn new(transport: Arc<BridgeTransport>) -> Self {
        Self { transport }
    }

    async fn exchange(&self, op: &str, capability: CapabilityId) -> Result<PermissionState> {
        let reply = self
            .transport
            .send(capability, op, serde_json::json!({ "capability": capability }))
            .await?;
        let parsed: PermissionReply = decode(capability, reply)?;
        Ok(parsed.state)
    }
}

#[async_trait]
impl PermissionBackend for NativePermissionBroker {
    async fn query(&self, capability: CapabilityId) -> Result<PermissionState> {
        self.exchange(OP_PERMISSION_QUERY, capability).await
    }

    async fn request(&self, capability: CapabilityId) -> Result<PermissionState> {
        self.exchange(OP_PERMISSION_REQUEST, capability).await
    }
}
