// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Stegwerk capability bridge.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sentinel for device attributes the backend could not read.
pub const UNKNOWN: &str = "unknown";

/// One discrete platform capability exposed through the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityId {
    Camera,
    Geolocation,
    DeviceInfo,
}

impl CapabilityId {
    /// Every capability the bridge knows about.
    pub const ALL: [CapabilityId; 3] = [
        CapabilityId::Camera,
        CapabilityId::Geolocation,
        CapabilityId::DeviceInfo,
    ];

    /// Device info reads no sensor and needs no user consent — it is
    /// implicitly granted and never enters the permission state machine.
    pub fn requires_permission(&self) -> bool {
        !matches!(self, Self::DeviceInfo)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Camera => "camera",
            Self::Geolocation => "geolocation",
            Self::DeviceInfo => "device_info",
        }
    }
}

impl std::fmt::Display for CapabilityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which backend family serves capability calls for this process.
///
/// Resolved once at startup by the environment detector and never
/// re-detected mid-session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    /// A native platform bridge endpoint is reachable.
    Native,
    /// Only the portable web-style fallback is available.
    Web,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Native => f.write_str("native"),
            Self::Web => f.write_str("web"),
        }
    }
}

/// Per-capability authorization status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionState {
    /// Not yet determined — the next use triggers a permission request.
    Unknown,
    /// The user (or platform policy) allowed the capability.
    Granted,
    /// The user refused. Terminal for capability use; only an explicit
    /// query can observe an out-of-band change.
    Denied,
    /// Blocked by platform policy (parental controls, MDM profile).
    Restricted,
}

impl PermissionState {
    pub fn authorized(&self) -> bool {
        matches!(self, Self::Granted)
    }

    /// Denied and Restricted block capability use without re-prompting.
    pub fn blocks_use(&self) -> bool {
        matches!(self, Self::Denied | Self::Restricted)
    }
}

impl std::fmt::Display for PermissionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Unknown => "unknown",
            Self::Granted => "granted",
            Self::Denied => "denied",
            Self::Restricted => "restricted",
        };
        f.write_str(s)
    }
}

/// Where a photo capture should come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureSource {
    /// Live camera device.
    Camera,
    /// Existing photo from the device library.
    PhotoLibrary,
}

/// Encoded image formats the bridge can hand back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageFormat {
    Jpeg,
    Png,
    WebP,
}

impl ImageFormat {
    /// MIME type string for the encoded payload.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::WebP => "image/webp",
        }
    }

    /// Parse a bare format tag as reported by a backend ("jpeg", "png"...).
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "webp" => Some(Self::WebP),
            _ => None,
        }
    }

    /// Parse a MIME type ("image/jpeg", "image/png"...).
    pub fn from_mime(mime: &str) -> Option<Self> {
        Self::from_tag(mime.strip_prefix("image/").unwrap_or(mime))
    }
}

impl std::fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::WebP => "webp",
        };
        f.write_str(s)
    }
}

/// Configuration for a single photo capture. Immutable once submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureRequest {
    /// Encoding quality, 0–100. Values above 100 are rejected as invalid.
    pub quality: u8,
    /// Let the user crop/rotate before the result is returned. Ignored by
    /// backends without an editing surface.
    pub allow_editing: bool,
    pub source: CaptureSource,
}

impl Default for CaptureRequest {
    fn default() -> Self {
        Self {
            quality: 90,
            allow_editing: false,
            source: CaptureSource::Camera,
        }
    }
}

/// Requested position accuracy. `Fine` may cost more power and time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationAccuracy {
    Coarse,
    Fine,
}

/// Configuration for a single one-shot position query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRequest {
    pub accuracy: LocationAccuracy,
    /// Upper bound on the whole query. Zero is rejected as invalid.
    pub timeout_ms: u64,
}

impl Default for LocationRequest {
    fn default() -> Self {
        Self {
            accuracy: LocationAccuracy::Coarse,
            timeout_ms: 10_000,
        }
    }
}

/// Device info takes no parameters; the record exists so every capability
/// call has the same request/response shape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfoRequest {}

/// How a captured photo is handed back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureData {
    /// File URI on the device — the native path saves to disk.
    Uri(String),
    /// Encoded image bytes returned inline — the web path has no filesystem.
    Bytes(Vec<u8>),
}

/// Canonical photo capture result, identical for both backends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureResult {
    pub data: CaptureData,
    pub format: ImageFormat,
}

/// Canonical one-shot position result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationResult {
    pub latitude: f64,
    pub longitude: f64,
    /// Horizontal accuracy radius in metres.
    pub accuracy_m: f64,
    pub timestamp: DateTime<Utc>,
}

/// Platform family reported by device info.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlatformTag {
    Ios,
    Android,
    /// The web fallback always reports this tag — it cannot see past the
    /// hosting runtime, and that limitation is deliberate.
    Web,
}

impl std::fmt::Display for PlatformTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Ios => "ios",
            Self::Android => "android",
            Self::Web => "web",
        };
        f.write_str(s)
    }
}

/// Canonical device metadata. Battery fields are `None` when the backend
/// does not expose a battery (common on web); string fields fall back to
/// the [`UNKNOWN`] sentinel rather than failing the call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceInfoResult {
    pub platform: PlatformTag,
    pub os_version: String,
    pub model: String,
    /// Charge fraction in 0.0–1.0.
    pub battery_level: Option<f32>,
    pub battery_charging: Option<bool>,
}
