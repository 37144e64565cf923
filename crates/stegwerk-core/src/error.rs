// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error shape for all capability operations.
//
// Adapters translate every backend-specific failure into one of the five
// kinds below before returning; the dispatcher only forwards or
// short-circuits, it never invents new kinds.

use thiserror::Error;

use crate::types::CapabilityId;

/// Classification of a capability failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Permission state resolved to Denied or Restricted.
    PermissionDenied,
    /// The capability is not supported by the current environment or
    /// hardware (no camera device, capability disabled by config).
    Unavailable,
    /// The native bridge or a collaborator call exceeded its bound.
    Timeout,
    /// Unexpected rejection from the backend (stream acquisition failure,
    /// malformed native reply).
    BackendFailure,
    /// Caller-supplied configuration out of the allowed range.
    InvalidRequest,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PermissionDenied => "permission denied",
            Self::Unavailable => "unavailable",
            Self::Timeout => "timeout",
            Self::BackendFailure => "backend failure",
            Self::InvalidRequest => "invalid request",
        }
    }

    /// Parse a kind tag carried in a native bridge reply. Unknown tags
    /// collapse to `BackendFailure` — the native side never gets to extend
    /// the taxonomy on its own.
    pub fn from_wire(tag: &str) -> Self {
        match tag {
            "permission_denied" => Self::PermissionDenied,
            "unavailable" => Self::Unavailable,
            "timeout" => Self::Timeout,
            "invalid_request" => Self::InvalidRequest,
            _ => Self::BackendFailure,
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single error type every capability call can resolve to.
#[derive(Debug, Clone, Error)]
#[error("{capability}: {kind}: {message}")]
pub struct CapabilityError {
    pub kind: ErrorKind,
    pub capability: CapabilityId,
    pub message: String,
}

impl CapabilityError {
    pub fn new(kind: ErrorKind, capability: CapabilityId, message: impl Into<String>) -> Self {
        Self {
            kind,
            capability,
            message: message.into(),
        }
    }

    pub fn permission_denied(capability: CapabilityId, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::PermissionDenied, capability, message)
    }

    pub fn unavailable(capability: CapabilityId, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unavailable, capability, message)
    }

    pub fn timeout(capability: CapabilityId, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Timeout, capability, message)
    }

    pub fn backend(capability: CapabilityId, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::BackendFailure, capability, message)
    }

    pub fn invalid(capability: CapabilityId, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidRequest, capability, message)
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, CapabilityError>;
