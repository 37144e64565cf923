// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stegwerk Bridge — the capability seam and the native platform path.
//
// `traits` defines one interface per capability plus the raw payload shapes
// both backends produce. `transport` carries correlated request/reply frames
// to whatever platform glue sits behind the `BridgeEndpoint` seam. `native`
// implements the capability traits on top of that transport.
//
// The web counterparts of these adapters live in `stegwerk-web`; selection
// between the two is solely the dispatcher's job.

pub mod native;
pub mod traits;
pub mod transport;

pub use native::{
    NativeCameraAdapter, NativeDeviceInfoAdapter, NativeGeolocationAdapter,
    NativePermissionBroker,
};
pub use traits::{
    CameraAdapter, CapturePayload, DeviceInfoAdapter, DevicePayload, GeolocationAdapter,
    NativeCapture, NativeDeviceInfo, NativePosition, PermissionBackend, PositionPayload,
    WebCapture, WebDeviceSnapshot, WebPosition,
};
pub use transport::{BridgeEndpoint, BridgeTransport, ReplyBody, ReplySink, RequestFrame};
