use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;

use crate::models::config::AudioConfig;
use crate::models::error::CaptureError;
use crate::models::media::{AudioBlock, AudioParams};
use crate::processing::drop_queue::DropQueue;
use crate::processing::level::rms_level;
use crate::traits::audio_source::{AudioSource, AudioStream};

use super::{join_bounded, READ_RETRY_PAUSE};

/// How long one loop iteration waits for a block before re-checking the
/// run flag. Blocks arriving mid-wait are delivered immediately, so this
/// bounds stop latency, not handoff latency.
const BLOCK_POLL: Duration = Duration::from_millis(20);

/// Threaded audio capture with a bounded block queue and a running
/// loudness level.
///
/// `start()` opens the input device on a dedicated thread which pushes
/// each captured block into a drop-oldest queue and refreshes the RMS
/// [`level`](Microphone::level). When consumers fall behind, the oldest
/// blocks are discarded; the level always tracks the newest captured
/// block, dropped or not.
///
/// Dropping a running microphone stops it, mirroring [`Camera`].
///
/// [`Camera`]: crate::session::camera::Camera
pub struct Microphone<S: AudioSource> {
    source: Arc<S>,
    config: AudioConfig,
    queue: Arc<DropQueue<AudioBlock>>,
    level: Arc<Mutex<f32>>,
    running: Arc<AtomicBool>,
    worker: Option<thread::JoinHandle<()>>,
    params: Option<AudioParams>,
}

impl<S: AudioSource> Microphone<S> {
    /// Create a microphone over `source`. No device is touched until
    /// `start()`.
    pub fn new(source: S, config: AudioConfig) -> Self {
        let capacity = config.queue_capacity.max(1);
        Self {
            source: Arc::new(source),
            config,
            queue: Arc::new(DropQueue::new(capacity)),
            level: Arc::new(Mutex::new(0.0)),
            running: Arc::new(AtomicBool::new(false)),
            worker: None,
            params: None,
        }
    }

    /// Whether the capture thread is active.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// RMS level of the most recently captured block, in `[0.0, 1.0]`.
    /// 0.0 before any data.
    pub fn level(&self) -> f32 {
        *self.level.lock()
    }

    /// Dequeue the next block, waiting up to `timeout`. Returns `None`
    /// after the timeout.
    pub fn read(&self, timeout: Duration) -> Option<AudioBlock> {
        self.queue.pop(timeout)
    }

    /// Number of blocks currently buffered.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Parameters the device granted, available while running.
    pub fn params(&self) -> Option<&AudioParams> {
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
        let queue = Arc::clone(&self.queue);
        let level = Arc::clone(&self.level);
        let running = Arc::clone(&self.running);
        running.store(true, Ordering::SeqCst);

        let worker = thread::Builder::new()
            .name("mic-capture".into())
            .spawn(move || {
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
                capture_loop(stream, &queue, &level, &running);
            })
            .map_err(|e| {
                self.running.store(false, Ordering::SeqCst);
                CaptureError::Backend(format!("failed to spawn capture thread: {e}"))
            })?;

        match ready_rx.recv() {
            Ok(Ok(params)) => {
                log::info!(
                    "microphone opened: {} - {}ch @ {}Hz",
                    params.device_name,
                    params.channels,
                    params.sample_rate
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

    /// Stop capturing and release the device. Idempotent. Buffered blocks
    /// and the last level stay readable after stopping.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(worker) = self.worker.take() {
            join_bounded(worker, "mic-capture");
        }
        self.params = None;
    }
}

impl<S: AudioSource> Drop for Microphone<S> {
    fn drop(&mut self) {
        self.stop();
    }
}

fn capture_loop<T: AudioStream>(
    mut stream: T,
    queue: &DropQueue<AudioBlock>,
    level: &Mutex<f32>,
    running: &AtomicBool,
) {
    while running.load(Ordering::SeqCst) {
        match stream.read_block(BLOCK_POLL) {
            Ok(Some(block)) => {
                // Level first: it reflects every captured block, including
                // ones the queue later evicts.
                *level.lock() = rms_level(&block.samples);
                queue.push(block);
            }
            Ok(None) => {}
            Err(e) => {
                log::warn!("audio read failed: {e}");
                thread::sleep(READ_RETRY_PAUSE);
            }
        }
    }
}
