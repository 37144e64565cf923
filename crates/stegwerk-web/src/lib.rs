// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stegwerk Web — fallback adapters used when no native bridge is present.
//
// Each adapter maps one capability onto a single long-lived runtime
// primitive behind a collaborator trait: a media stream for the camera, a
// one-shot position source for geolocation, and a synchronous host snapshot
// for device info. The hosting shell supplies the collaborators; tests
// supply fakes.

pub mod camera;
pub mod device;
pub mod geolocation;
pub mod permission;

pub use camera::{EncodedFrame, MediaSource, MediaStream, WebCameraAdapter};
pub use device::{HostEnvironment, SysinfoHost, WebDeviceInfoAdapter};
pub use geolocation::{PositionFix, PositionSource, WebGeolocationAdapter};
pub use permission::{GateState, PermissionGate, WebPermissionBackend};
