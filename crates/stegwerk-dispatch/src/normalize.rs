// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Result normalization — pure mapping functions from raw backend payloads
// to the canonical result records. Missing optional fields become documented
// defaults; backend field names never leak into the canonical shape.

use chrono::DateTime;
use tracing::debug;

use stegwerk_bridge::traits::{CapturePayload, DevicePayload, PositionPayload};
use stegwerk_core::error::{CapabilityError, Result};
use stegwerk_core::types::{
    CapabilityId, CaptureData, CaptureResult, DeviceInfoResult, ImageFormat, LocationResult,
    PlatformTag, UNKNOWN,
};

/// Normalize a raw capture payload.
///
/// An unrecognized or absent format tag defaults to jpeg — both backends
/// encode jpeg unless told otherwise. A native reply carrying neither a URI
/// nor inline data is malformed.
pub fn capture(payload: CapturePayload) -> Result<CaptureResult> {
    match payload {
        CapturePayload::Native(native) => {
            let format = native
                .format
                .as_deref()
                .and_then(ImageFormat::from_tag)
                .unwrap_or(ImageFormat::Jpeg);
            let data = match (native.uri, native.data) {
                (Some(uri), _) => CaptureData::Uri(uri),
                (None, Some(bytes)) => CaptureData::Bytes(bytes),
                (None, None) => {
                    return Err(CapabilityError::backend(
                        CapabilityId::Camera,
                        "native capture reply carried neither uri nor data",
                    ));
                }
            };
            Ok(CaptureResult { data, format })
        }
        CapturePayload::Web(web) => Ok(CaptureResult {
            data: CaptureData::Bytes(web.frame),
            format: ImageFormat::from_mime(&web.mime).unwrap_or(ImageFormat::Jpeg),
        }),
    }
}

/// Normalize a raw position payload.
///
/// Both backends express the same fact with different field names; the
/// canonical record is identical either way.
pub fn position(payload: PositionPayload) -> Result<LocationResult> {
    let (latitude, longitude, accuracy_m, epoch_ms) = match payload {
        PositionPayload::Native(n) => (n.lat, n.lon, n.acc, n.epoch_ms),
        PositionPayload::Web(w) => (w.latitude, w.longitude, w.accuracy, w.timestamp_ms),
    };
    let timestamp = DateTime::from_timestamp_millis(epoch_ms).ok_or_else(|| {
        CapabilityError::backend(
            CapabilityId::Geolocation,
            format!("position timestamp {epoch_ms} out of range"),
        )
    })?;
    Ok(LocationResult {
        latitude,
        longitude,
        accuracy_m,
        timestamp,
    })
}

/// Normalize a raw device payload. Never fails.
///
/// The web snapshot always maps to the fixed `web` platform tag with
/// whatever partial data the runtime exposed; that limitation is documented
/// behavior, not something to paper over.
pub fn device(payload: DevicePayload) -> DeviceInfoResult {
    match payload {
        DevicePayload::Native(native) => DeviceInfoResult {
            platform: parse_platform(&native.platform),
            os_version: native.os_version.unwrap_or_else(|| UNKNOWN.into()),
            model: native.model.unwrap_or_else(|| UNKNOWN.into()),
            battery_level: native.battery_level.map(clamp_level),
            battery_charging: native.charging,
        },
        DevicePayload::Web(snapshot) => DeviceInfoResult {
            platform: PlatformTag::Web,
            os_version: snapshot.os_version.unwrap_or_else(|| UNKNOWN.into()),
            // The runtime's platform string is the closest thing to a model
            // the web path can see; the user agent is the fallback.
            model: snapshot
                .platform
                .or(snapshot.user_agent)
                .unwrap_or_else(|| UNKNOWN.into()),
            battery_level: snapshot.battery_level.map(clamp_level),
            battery_charging: snapshot.battery_charging,
        },
    }
}

fn parse_platform(tag: &str) -> PlatformTag {
    match tag.to_ascii_lowercase().as_str() {
        "ios" => PlatformTag::Ios,
        "android" => PlatformTag::Android,
        other => {
            debug!(tag = other, "unrecognized platform tag; reporting web");
            PlatformTag::Web
        }
    }
}

fn clamp_level(level: f64) -> f32 {
    level.clamp(0.0, 1.0) as f32
}
