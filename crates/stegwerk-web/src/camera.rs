// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Web camera fallback: open a media stream, grab exactly one encoded frame,
// release the stream immediately. The stream is never left dangling, even
// when the frame grab fails.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use stegwerk_bridge::traits::{CameraAdapter, CapturePayload, WebCapture};
use stegwerk_core::error::{CapabilityError, Result};
use stegwerk_core::types::{CapabilityId, CaptureRequest, CaptureSource};

/// One encoded video frame handed back by a media stream.
#[derive(Debug, Clone)]
pub struct EncodedFrame {
    pub bytes: Vec<u8>,
    /// MIME type of the encoding ("image/jpeg"...).
    pub mime: String,
}

/// Opens camera-backed media streams. Supplied by the hosting shell.
#[async_trait]
pub trait MediaSource: Send + Sync {
    /// Acquire a stream from the default camera. Fails with `Unavailable`
    /// when no camera exists and `BackendFailure` when acquisition breaks.
    async fn open_stream(&self) -> Result<Box<dyn MediaStream>>;
}

/// A live camera stream. One frame per capture call.
#[async_trait]
pub trait MediaStream: Send {
    /// Grab and encode one frame at the given quality (0–100).
    async fn capture_frame(&mut self, quality: u8) -> Result<EncodedFrame>;

    /// Release the underlying device. Must be infallible; a stream that
    /// cannot be released cleanly should log and drop its handles anyway.
    async fn release(&mut self);
}

/// Camera capability backed by a [`MediaSource`].
pub struct WebCameraAdapter {
    source: Arc<dyn MediaSource>,
}

impl WebCameraAdapter {
    pub fn new(source: Arc<dyn MediaSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl CameraAdapter for WebCameraAdapter {
    async fn take_photo(&self, request: &CaptureRequest) -> Result<CapturePayload> {
        if request.source == CaptureSource::PhotoLibrary {
            return Err(CapabilityError::unavailable(
                CapabilityId::Camera,
                "photo library source is not available through the media-stream fallback",
            ));
        }
        if request.allow_editing {
            // The fallback has no edit surface; the flag is ignored.
            debug!("allow_editing ignored by the media-stream fallback");
        }

        let mut stream = self.source.open_stream().await?;
        let grabbed = stream.capture_frame(request.quality).await;
        // Release before inspecting the outcome — no dangling stream handles.
        stream.release().await;
        let frame = grabbed?;

        debug!(bytes = frame.bytes.len(), mime = %frame.mime, "frame captured");
        Ok(CapturePayload::Web(WebCapture {
            frame: frame.bytes,
            mime: frame.mime,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    struct FakeStream {
        released: Arc<AtomicBool>,
        fail_capture: bool,
    }

    #[async_trait]
    impl MediaStream for FakeStream {
        async fn capture_frame(&mut self, quality: u8) -> Result<EncodedFrame> {
            assert!(quality <= 100);
            if self.fail_capture {
                return Err(CapabilityError::backend(
                    CapabilityId::Camera,
                    "encoder fell over",
                ));
            }
            Ok(EncodedFrame {
                bytes: vec![0u8; 10],
                mime: "image/jpeg".into(),
            })
        }

        async fn release(&mut self) {
            self.released.store(true, Ordering::SeqCst);
        }
    }

    struct FakeSource {
        released: Arc<AtomicBool>,
        opened: AtomicUsize,
        fail_capture: bool,
    }

    #[async_trait]
    impl MediaSource for FakeSource {
        async fn open_stream(&self) -> Result<Box<dyn MediaStream>> {
            self.opened.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(FakeStream {
                released: Arc::clone(&self.released),
                fail_capture: self.fail_capture,
            }))
        }
    }

    fn source(fail_capture: bool) -> (Arc<FakeSource>, Arc<AtomicBool>) {
        let released = Arc::new(AtomicBool::new(false));
        let source = Arc::new(FakeSource {
            released: Arc::clone(&released),
            opened: AtomicUsize::new(0),
            fail_capture,
        });
        (source, released)
    }

    #[tokio::test]
    async fn captures_one_frame_and_releases() {
        let (source, released) = source(false);
        let adapter = WebCameraAdapter::new(Arc::clone(&source) as Arc<dyn MediaSource>);

        let payload = adapter
            .take_photo(&CaptureRequest::default())
            .await
            .unwrap();
        match payload {
            CapturePayload::Web(capture) => {
                assert_eq!(capture.frame.len(), 10);
                assert_eq!(capture.mime, "image/jpeg");
            }
            CapturePayload::Native(_) => panic!("web adapter produced a native payload"),
        }
        assert!(released.load(Ordering::SeqCst));
        assert_eq!(source.opened.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn releases_even_when_capture_fails() {
        let (source, released) = source(true);
        let adapter = WebCameraAdapter::new(source as Arc<dyn MediaSource>);

        let err = adapter
            .take_photo(&CaptureRequest::default())
            .await
            .unwrap_err();
        assert_eq!(err.kind, stegwerk_core::error::ErrorKind::BackendFailure);
        assert!(released.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn library_source_is_unavailable() {
        let (source, _released) = source(false);
        let adapter = WebCameraAdapter::new(source.clone() as Arc<dyn MediaSource>);

        let request = CaptureRequest {
            source: CaptureSource::PhotoLibrary,
            ..Default::default()
        };
        let err = adapter.take_photo(&request).await.unwrap_err();
        assert_eq!(err.kind, stegwerk_core::error::ErrorKind::Unavailable);
        // The stream must not even be opened.
        assert_eq!(source.opened.load(Ordering::SeqCst), 0);
    }
}
