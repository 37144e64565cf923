// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Backend-agnostic trait definitions for the three capabilities, plus the
// raw payload shapes each backend produces.
//
// Exactly two implementations exist per trait: the native adapters in this
// crate and the web adapters in `stegwerk-web`. Adapters never inspect the
// environment themselves — the dispatcher alone picks which one runs.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use stegwerk_core::error::Result;
use stegwerk_core::types::{CapabilityId, CaptureRequest, LocationRequest, PermissionState};

/// Captures a single photo.
#[async_trait]
pub trait CameraAdapter: Send + Sync {
    /// Take one photo per call. Two calls are two distinct user
    /// interactions — nothing is coalesced.
    async fn take_photo(&self, request: &CaptureRequest) -> Result<CapturePayload>;
}

/// One-shot position queries. No watch/stream variant exists.
#[async_trait]
pub trait GeolocationAdapter: Send + Sync {
    async fn current_position(&self, request: &LocationRequest) -> Result<PositionPayload>;
}

/// Reads device metadata.
#[async_trait]
pub trait DeviceInfoAdapter: Send + Sync {
    async fn device_info(&self) -> Result<DevicePayload>;
}

/// Reaches the platform's actual permission model.
///
/// The permission ledger in `stegwerk-dispatch` owns all state; this trait
/// is only the probe/prompt seam beneath it.
#[async_trait]
pub trait PermissionBackend: Send + Sync {
    /// Current authorization without showing a prompt.
    async fn query(&self, capability: CapabilityId) -> Result<PermissionState>;

    /// Request authorization. The platform may show a prompt at most once
    /// per call; suppression and re-prompt cooldown are the platform's.
    async fn request(&self, capability: CapabilityId) -> Result<PermissionState>;
}

// ---------------------------------------------------------------------------
// Raw payload shapes — consumed only by the result normalizer
// ---------------------------------------------------------------------------

/// Raw photo capture payload, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum CapturePayload {
    Native(NativeCapture),
    Web(WebCapture),
}

/// Capture reply as the native side shapes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NativeCapture {
    /// File URI when the platform saved the photo to disk.
    #[serde(default)]
    pub uri: Option<String>,
    /// Encoded image bytes when returned inline instead.
    #[serde(default)]
    pub data: Option<Vec<u8>>,
    /// Encoding tag as the platform reports it ("jpeg", "png"...).
    #[serde(default)]
    pub format: Option<String>,
}

/// One encoded frame grabbed from a media stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebCapture {
    pub frame: Vec<u8>,
    /// MIME type the stream encoded to ("image/jpeg"...).
    pub mime: String,
}

/// Raw position payload, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum PositionPayload {
    Native(NativePosition),
    Web(WebPosition),
}

/// Position reply as the native side shapes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NativePosition {
    pub lat: f64,
    pub lon: f64,
    /// Horizontal accuracy radius in metres.
    pub acc: f64,
    /// Milliseconds since the Unix epoch.
    pub epoch_ms: i64,
}

/// Position fix as the web fallback shapes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebPosition {
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy: f64,
    pub timestamp_ms: i64,
}

/// Raw device metadata payload, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum DevicePayload {
    Native(NativeDeviceInfo),
    Web(WebDeviceSnapshot),
}

/// Device metadata as the native side shapes it. Everything past the
/// platform tag is optional — older platform glue omits fields freely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NativeDeviceInfo {
    /// Platform tag as reported ("ios", "android").
    pub platform: String,
    #[serde(default)]
    pub os_version: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    /// Charge fraction in 0.0–1.0.
    #[serde(default)]
    pub battery_level: Option<f64>,
    #[serde(default)]
    pub charging: Option<bool>,
}

/// Best-effort attributes read from the hosting runtime. Absent attributes
/// stay `None` — partial data is the documented web behavior, not an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebDeviceSnapshot {
    pub user_agent: Option<String>,
    /// Platform string of the runtime ("Linux x86_64", "MacIntel").
    pub platform: Option<String>,
    pub os_version: Option<String>,
    pub cpu_count: Option<usize>,
    /// Approximate total memory in bytes.
    pub memory_bytes: Option<u64>,
    /// Charge fraction in 0.0–1.0, when a battery API exists.
    pub battery_level: Option<f64>,
    pub battery_charging: Option<bool>,
}
