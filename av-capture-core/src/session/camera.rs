use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;

use crate::models::config::VideoConfig;
use crate::models::error::CaptureError;
use crate::models::media::{Frame, VideoParams};
use crate::processing::latest_cell::LatestCell;
use crate::traits::video_source::{VideoSource, VideoStream};

use super::{join_bounded, READ_RETRY_PAUSE};

/// Threaded video capture with a latest-frame slot.
///
/// `start()` opens the device on a dedicated thread which overwrites a
/// single shared slot with each captured frame; [`Camera::frame`] clones
/// the most recent one without blocking. A fast producer with a slow
/// consumer loses intermediate frames silently; that is the contract.
///
/// Dropping a running camera stops it, so a camera owned by a scope is
/// released on every exit path, panics included.
pub struct Camera<S: VideoSource> {
    source: Arc<S>,
    config: VideoConfig,
    latest: Arc<LatestCell<Frame>>,
    running: Arc<AtomicBool>,
    worker: Option<thread::JoinHandle<()>>,
    params: Option<VideoParams>,
}

impl<S: VideoSource> Camera<S> {
    /// Create a camera over `source`. No device is touched until `start()`.
    pub fn new(source: S, config: VideoConfig) -> Self {
        Self {
            source: Arc::new(source),
            config,
            latest: Arc::new(LatestCell::new()),
            running: Arc::new(AtomicBool::new(false)),
            worker: None,
            params: None,
        }
    }

    /// Whether the capture thread is active.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Latest captured frame, or `None` before the first capture.
    ///
    /// Never blocks; the returned frame is an independent copy.
    pub fn frame(&self) -> Option<Frame> {
        self.latest.get()
    }

    /// Parameters the device granted, available while running.
    pub fn params(&self) -> Option<&VideoParams> {
        self.params.as_ref()
    }

    /// Open the device and begin capturing. A no-op when already running.
    pub fn start(&mut self) -> Result<(), CaptureError> {
        if self.is_running() {
            return Ok(());
        }
        self.config
            .validate()
            .map_err(CaptureError::ConfigurationFailed)?;

        let (ready_tx, ready_rx) = mpsc::channel();
        let source = Arc::clone(&self.source);
        let config = self.config.clone();
        let latest = Arc::clone(&self.latest);
        let running = Arc::clone(&self.running);
        running.store(true, Ordering::SeqCst);

        let worker = thread::Builder::new()
            .name("camera-capture".into())
            .spawn(move || {
                // The stream lives and dies on this thread; the device is
                // released only after the loop has exited.
                let stream = match source.open(&config) {
                    Ok(stream) => {
                        let _ = ready_tx.send(Ok(stream.params()));
                        stream
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };
                capture_loop(stream, &latest, &running);
            })
            .map_err(|e| {
                self.running.store(false, Ordering::SeqCst);
                CaptureError::Backend(format!("failed to spawn capture thread: {e}"))
            })?;

        match ready_rx.recv() {
            Ok(Ok(params)) => {
                log::info!(
                    "camera opened: {}x{} @ {:.1}fps",
                    params.width,
                    params.height,
                    params.fps
                );
                self.params = Some(params);
                self.worker = Some(worker);
                Ok(())
            }
            Ok(Err(e)) => {
                self.running.store(false, Ordering::SeqCst);
                let _ = worker.join();
                Err(e)
            }
            Err(_) => {
                self.running.store(false, Ordering::SeqCst);
                let _ = worker.join();
                Err(CaptureError::Backend(
                    "capture thread exited during open".into(),
                ))
            }
        }
    }

    /// Stop capturing and release the device. Idempotent.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(worker) = self.worker.take() {
            join_bounded(worker, "camera-capture");
        }
        self.params = None;
    }
}

impl<S: VideoSource> Drop for Camera<S> {
    fn drop(&mut self) {
        self.stop();
    }
}

fn capture_loop<T: VideoStream>(mut stream: T, latest: &LatestCell<Frame>, running: &AtomicBool) {
    while running.load(Ordering::SeqCst) {
        match stream.read_frame() {
            Ok(Some(frame)) => latest.put(frame),
            Ok(None) => thread::sleep(READ_RETRY_PAUSE),
            Err(e) => {
                log::warn!("frame read failed: {e}");
                thread::sleep(READ_RETRY_PAUSE);
            }
        }
    }
}
