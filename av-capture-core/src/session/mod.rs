//! Capture sessions: the [`Camera`](camera::Camera) and
//! [`Microphone`](microphone::Microphone) orchestrators.
//!
//! Both follow the same lifecycle: `start()` spawns a dedicated capture
//! thread which opens the device, reports the negotiated parameters back
//! over a handshake channel, and then loops reading and publishing until
//! the run flag clears. `stop()` clears the flag and joins with a bounded
//! wait; the device handle lives and dies on the capture thread.

pub mod camera;
pub mod microphone;

use std::thread::JoinHandle;
use std::time::{Duration, Instant};

/// Pause between retries when the device reports "no data yet".
pub(crate) const READ_RETRY_PAUSE: Duration = Duration::from_millis(1);

/// Bound on how long `stop()` waits for the capture thread to exit.
pub(crate) const JOIN_TIMEOUT: Duration = Duration::from_secs(3);

/// Join `handle`, giving up after [`JOIN_TIMEOUT`].
///
/// A thread stuck past the bound (a hung device read) is left detached
/// with a warning rather than hanging the caller; the handle it owns is
/// released whenever the thread finally exits.
pub(crate) fn join_bounded(handle: JoinHandle<()>, name: &str) {
    let deadline = Instant::now() + JOIN_TIMEOUT;
    while !handle.is_finished() {
        if Instant::now() >= deadline {
            log::warn!("{name} thread did not exit within {JOIN_TIMEOUT:?}, abandoning join");
            return;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    if handle.join().is_err() {
        log::warn!("{name} thread panicked");
    }
}
