// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stegwerk Dispatch — the façade callers use.
//
// `CapabilityRegistry` resolves the environment once, sequences every call
// through the permission ledger, routes it to the matching adapter, and
// normalizes the raw payload before handing it back. This crate never talks
// to a platform itself; it only composes the seams defined in
// `stegwerk-bridge`.

pub mod detect;
pub mod normalize;
pub mod permission;
pub mod registry;

pub use detect::{EnvironmentDetector, NativeProbe, StaticProbe};
pub use permission::PermissionLedger;
pub use registry::{AdapterSet, CapabilityRegistry};
