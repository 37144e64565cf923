// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable guidance for capability errors.
//
// Every technical error is mapped to plain English with a clear suggestion.
// Hosts render these directly; the taxonomy's three severity levels drive
// presentation (toast vs. blocking dialog vs. settings deep-link).

use crate::error::{CapabilityError, ErrorKind};
use crate::types::CapabilityId;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Momentary problem — trying again may work.
    Transient,
    /// The user must do something (grant access in settings, free the
    /// camera from another app).
    ActionRequired,
    /// Cannot be fixed by retrying or user action in this session.
    Permanent,
}

/// A plain-English message with an actionable suggestion.
#[derive(Debug, Clone)]
pub struct Guidance {
    /// Shown as a heading.
    pub message: String,
    /// Shown as body text.
    pub suggestion: String,
    /// Whether trying the same call again is worthwhile.
    pub retriable: bool,
    pub severity: Severity,
}

/// Convert a [`CapabilityError`] into guidance a non-technical user can act on.
pub fn advise(err: &CapabilityError) -> Guidance {
    match err.kind {
        ErrorKind::PermissionDenied => denied_guidance(err.capability),

        ErrorKind::Unavailable => Guidance {
            message: match err.capability {
                CapabilityId::Camera => "No camera is available here.".into(),
                CapabilityId::Geolocation => "Location isn't available here.".into(),
                CapabilityId::DeviceInfo => "Device details aren't available here.".into(),
            },
            suggestion: "This feature isn't supported on this device or in this app build."
                .into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        ErrorKind::Timeout => Guidance {
            message: match err.capability {
                CapabilityId::Geolocation => "Finding your location took too long.".into(),
                _ => "The device took too long to respond.".into(),
            },
            suggestion: match err.capability {
                CapabilityId::Geolocation => {
                    "Move somewhere with a clearer view of the sky or better signal, then try again.".into()
                }
                _ => "Please try again in a moment.".into(),
            },
            retriable: true,
            severity: Severity::Transient,
        },

        ErrorKind::BackendFailure => Guidance {
            message: match err.capability {
                CapabilityId::Camera => "The camera couldn't take a photo.".into(),
                CapabilityId::Geolocation => "Your location couldn't be read.".into(),
                CapabilityId::DeviceInfo => "Device details couldn't be read.".into(),
            },
            suggestion:
                "Close any other app that might be using this feature, then try again.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        ErrorKind::InvalidRequest => Guidance {
            message: "The app asked for something impossible.".into(),
            suggestion: format!(
                "This is a bug in the app, not your device. ({})",
                err.message
            ),
            retriable: false,
            severity: Severity::Permanent,
        },
    }
}

fn denied_guidance(capability: CapabilityId) -> Guidance {
    let (message, suggestion) = match capability {
        CapabilityId::Camera => (
            "Camera access is turned off.",
            "Open your device Settings, find this app, and allow Camera access. Then come back and try again.",
        ),
        CapabilityId::Geolocation => (
            "Location access is turned off.",
            "Open your device Settings, find this app, and allow Location access. Then come back and try again.",
        ),
        // Device info never prompts; a denial here means the platform glue
        // is misreporting.
        CapabilityId::DeviceInfo => (
            "Device details were blocked.",
            "Restart the app. If this keeps happening, report it to the app maker.",
        ),
    };
    Guidance {
        message: message.into(),
        suggestion: suggestion.into(),
        retriable: false,
        severity: Severity::ActionRequired,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn denied_errors_require_user_action() {
        let err = CapabilityError::permission_denied(CapabilityId::Camera, "denied");
        let g = advise(&err);
        assert_eq!(g.severity, Severity::ActionRequired);
        assert!(!g.retriable);
        assert!(g.suggestion.contains("Settings"));
    }

    #[test]
    fn timeouts_are_retriable() {
        let err = CapabilityError::timeout(CapabilityId::Geolocation, "no fix");
        let g = advise(&err);
        assert_eq!(g.severity, Severity::Transient);
        assert!(g.retriable);
    }

    #[test]
    fn invalid_requests_blame_the_app() {
        let err = CapabilityError::invalid(CapabilityId::Camera, "quality 250 outside 0-100");
        let g = advise(&err);
        assert_eq!(g.severity, Severity::Permanent);
        assert!(g.suggestion.contains("quality 250"));
    }

    #[test]
    fn every_kind_produces_nonempty_guidance() {
        let kinds = [
            ErrorKind::PermissionDenied,
            ErrorKind::Unavailable,
            ErrorKind::Timeout,
            ErrorKind::BackendFailure,
            ErrorKind::InvalidRequest,
        ];
        for kind in kinds {
            for cap in CapabilityId::ALL {
                let g = advise(&CapabilityError::new(kind, cap, "detail"));
                assert!(!g.message.is_empty());
                assert!(!g.suggestion.is_empty());
            }
        }
    }
}
