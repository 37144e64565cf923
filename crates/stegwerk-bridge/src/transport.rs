// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Correlated request/reply transport for the native platform path.
//
// Each outbound frame carries a UUID correlation id; replies are matched
// back through a pending map of oneshot channels, so concurrent in-flight
// calls for different capabilities never cross-deliver. The wire past the
// `BridgeEndpoint` seam belongs to the platform glue and is opaque here.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::oneshot;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use stegwerk_core::error::{CapabilityError, ErrorKind, Result};
use stegwerk_core::types::CapabilityId;

/// One outbound capability request on the native wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestFrame {
    pub correlation: Uuid,
    pub capability: CapabilityId,
    /// Operation selector within the capability ("camera.capture"...).
    pub op: String,
    pub payload: Value,
}

/// Body of a native reply, matched to its request by correlation id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReplyBody {
    Ok { payload: Value },
    Err { kind: String, message: String },
}

type PendingMap = Arc<Mutex<HashMap<Uuid, oneshot::Sender<ReplyBody>>>>;

/// Hands native replies back to the transport that sent the request.
///
/// Cheap to clone; platform glue keeps one per in-flight frame (or one for
/// its lifetime — resolution is keyed by correlation id either way).
#[derive(Clone)]
pub struct ReplySink {
    pending: PendingMap,
}

impl ReplySink {
    /// Deliver a reply. Late replies and unknown correlation ids are
    /// discarded — the caller that wanted them already timed out or left.
    pub fn resolve(&self, correlation: Uuid, body: ReplyBody) {
        let sender = self
            .pending
            .lock()
            .expect("pending lock poisoned")
            .remove(&correlation);
        match sender {
            Some(tx) => {
                // The receiver may have been dropped by an abandoned caller;
                // nothing to do then.
                let _ = tx.send(body);
            }
            None => debug!(%correlation, "discarding reply with no pending request"),
        }
    }
}

/// Delivers request frames to the native side.
///
/// Implemented by the platform glue (out of scope here) and by stubs in
/// tests. `transmit` must not block — replies come back asynchronously
/// through the provided [`ReplySink`].
pub trait BridgeEndpoint: Send + Sync {
    fn transmit(&self, frame: RequestFrame, replies: ReplySink);
}

/// Removes a pending entry when its caller leaves, however it leaves —
/// completion, timeout, or an abandoned future. Removing an entry that a
/// reply already claimed is a no-op.
struct PendingGuard {
    pending: PendingMap,
    correlation: Uuid,
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        if let Ok(mut map) = self.pending.lock() {
            map.remove(&self.correlation);
        }
    }
}

/// Correlates capability requests with their asynchronous native replies.
pub struct BridgeTransport {
    endpoint: Arc<dyn BridgeEndpoint>,
    pending: PendingMap,
    reply_timeout: Duration,
}

impl BridgeTransport {
    pub fn new(endpoint: Arc<dyn BridgeEndpoint>, reply_timeout: Duration) -> Self {
        Self {
            endpoint,
            pending: Arc::new(Mutex::new(HashMap::new())),
            reply_timeout,
        }
    }

    /// Send one request and await its correlated reply.
    ///
    /// Fails with `Timeout` when no reply arrives within the configured
    /// bound; the call is not retried and a late reply is discarded.
    #[instrument(skip(self, payload), fields(capability = %capability, op))]
    pub async fn send(&self, capability: CapabilityId, op: &str, payload: Value) -> Result<Value> {
        let correlation = Uuid::new_v4();
        let (tx, rx) = oneshot::channel();
        self.pending
            .lock()
            .expect("pending lock poisoned")
            .insert(correlation, tx);
        let _guard = PendingGuard {
            pending: Arc::clone(&self.pending),
            correlation,
        };

        let frame = RequestFrame {
            correlation,
            capability,
            op: op.to_string(),
            payload,
        };
        debug!(%correlation, "transmitting bridge request");
        self.endpoint.transmit(
            frame,
            ReplySink {
                pending: Arc::clone(&self.pending),
            },
        );

        match tokio::time::timeout(self.reply_timeout, rx).await {
            Err(_elapsed) => {
                warn!(%correlation, timeout_ms = self.reply_timeout.as_millis() as u64,
                    "no native reply within bound");
                Err(CapabilityError::timeout(
                    capability,
                    format!(
                        "no native reply for {op} within {}ms",
                        self.reply_timeout.as_millis()
                    ),
                ))
            }
            Ok(Err(_closed)) => Err(CapabilityError::backend(
                capability,
                format!("bridge endpoint dropped the {op} request"),
            )),
            Ok(Ok(ReplyBody::Ok { payload })) => Ok(payload),
            Ok(Ok(ReplyBody::Err { kind, message })) => Err(CapabilityError::new(
                ErrorKind::from_wire(&kind),
                capability,
                message,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Endpoint that replies immediately, echoing the op back.
    struct EchoEndpoint;

    impl BridgeEndpoint for EchoEndpoint {
        fn transmit(&self, frame: RequestFrame, replies: ReplySink) {
            replies.resolve(
                frame.correlation,
                ReplyBody::Ok {
                    payload: serde_json::json!({ "op": frame.op }),
                },
            );
        }
    }

    /// Endpoint that swallows every frame.
    struct SilentEndpoint;

    impl BridgeEndpoint for SilentEndpoint {
        fn transmit(&self, _frame: RequestFrame, _replies: ReplySink) {}
    }

    /// Endpoint that parks frames and answers them later, in reverse order.
    struct ReorderingEndpoint {
        parked: Mutex<Vec<(RequestFrame, ReplySink)>>,
    }

    impl ReorderingEndpoint {
        fn flush_reversed(&self) {
            let mut parked = self.parked.lock().unwrap();
            while let Some((frame, sink)) = parked.pop() {
                sink.resolve(
                    frame.correlation,
                    ReplyBody::Ok {
                        payload: serde_json::json!({ "op": frame.op }),
                    },
                );
            }
        }
    }

    impl BridgeEndpoint for ReorderingEndpoint {
        fn transmit(&self, frame: RequestFrame, replies: ReplySink) {
            self.parked.lock().unwrap().push((frame, replies));
        }
    }

    #[tokio::test]
    async fn send_resolves_with_reply_payload() {
        let transport = BridgeTransport::new(Arc::new(EchoEndpoint), Duration::from_secs(1));
        let reply = transport
            .send(CapabilityId::Camera, "camera.capture", serde_json::json!({}))
            .await
            .unwrap();
        assert_eq!(reply, serde_json::json!({ "op": "camera.capture" }));
    }

    #[tokio::test]
    async fn silent_endpoint_times_out() {
        let transport = BridgeTransport::new(Arc::new(SilentEndpoint), Duration::from_millis(50));
        let err = transport
            .send(CapabilityId::Geolocation, "geolocation.current", serde_json::json!({}))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Timeout);
        assert_eq!(err.capability, CapabilityId::Geolocation);
    }

    #[tokio::test]
    async fn concurrent_sends_never_cross_deliver() {
        let endpoint = Arc::new(ReorderingEndpoint {
            parked: Mutex::new(Vec::new()),
        });
        let transport = Arc::new(BridgeTransport::new(
            Arc::clone(&endpoint) as Arc<dyn BridgeEndpoint>,
            Duration::from_secs(1),
        ));

        let a = tokio::spawn({
            let t = Arc::clone(&transport);
            async move {
                t.send(CapabilityId::Camera, "camera.capture", serde_json::json!({}))
                    .await
            }
        });
        let b = tokio::spawn({
            let t = Arc::clone(&transport);
            async move {
                t.send(CapabilityId::DeviceInfo, "device.info", serde_json::json!({}))
                    .await
            }
        });

        // Wait until both frames are parked, then answer in reverse order.
        while endpoint.parked.lock().unwrap().len() < 2 {
            tokio::task::yield_now().await;
        }
        endpoint.flush_reversed();

        let reply_a = a.await.unwrap().unwrap();
        let reply_b = b.await.unwrap().unwrap();
        assert_eq!(reply_a, serde_json::json!({ "op": "camera.capture" }));
        assert_eq!(reply_b, serde_json::json!({ "op": "device.info" }));
    }

    #[tokio::test]
    async fn wire_error_kinds_map_into_the_taxonomy() {
        struct FailingEndpoint(&'static str);
        impl BridgeEndpoint for FailingEndpoint {
            fn transmit(&self, frame: RequestFrame, replies: ReplySink) {
                replies.resolve(
                    frame.correlation,
                    ReplyBody::Err {
                        kind: self.0.to_string(),
                        message: "nope".into(),
                    },
                );
            }
        }

        let cases = [
            ("unavailable", ErrorKind::Unavailable),
            ("permission_denied", ErrorKind::PermissionDenied),
            ("made_up_by_the_glue", ErrorKind::BackendFailure),
        ];
        for (wire, expected) in cases {
            let transport =
                BridgeTransport::new(Arc::new(FailingEndpoint(wire)), Duration::from_secs(1));
            let err = transport
                .send(CapabilityId::Camera, "camera.capture", serde_json::json!({}))
                .await
                .unwrap_err();
            assert_eq!(err.kind, expected);
        }
    }

    #[tokio::test]
    async fn late_replies_are_discarded() {
        struct LateEndpoint {
            stash: Mutex<Option<(Uuid, ReplySink)>>,
        }
        impl BridgeEndpoint for LateEndpoint {
            fn transmit(&self, frame: RequestFrame, replies: ReplySink) {
                *self.stash.lock().unwrap() = Some((frame.correlation, replies));
            }
        }

        let endpoint = Arc::new(LateEndpoint {
            stash: Mutex::new(None),
        });
        let transport = BridgeTransport::new(
            Arc::clone(&endpoint) as Arc<dyn BridgeEndpoint>,
            Duration::from_millis(20),
        );

        let err = transport
            .send(CapabilityId::Camera, "camera.capture", serde_json::json!({}))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Timeout);

        // Replying after the timeout must be a silent no-op.
        let (correlation, sink) = endpoint.stash.lock().unwrap().take().unwrap();
        sink.resolve(
            correlation,
            ReplyBody::Ok {
                payload: serde_json::json!(null),
            },
        );
    }
}
