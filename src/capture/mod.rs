//! Live Capture Layer
//!
//! Decodes a stream of recognized frames one pass at a time. A frame that
//! arrives while a pass is still running is dropped rather than queued, so a
//! slow decode or slow OCR never builds a backlog. Results follow the same
//! rule: at most one unread result is kept and a newer one replaces it.

pub mod frame;

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use parking_lot::RwLock;
use tracing::{debug, info, warn};

use crate::vision::{DecodeOutcome, DecodePipeline, GlyphLocator};

pub use frame::{observation_path_for, SourceFrame};

/// Decode result for one accepted frame
#[derive(Debug, Clone)]
pub struct FrameResult {
    /// Sequence number of the frame
    pub sequence: u64,
    /// Pipeline output
    pub outcome: DecodeOutcome,
    /// Time from capture to result
    pub latency: Duration,
}

/// Frame counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LiveStats {
    /// Frames handed to the worker
    pub accepted: u64,
    /// Frames dropped because a pass was in flight
    pub dropped: u64,
    /// Passes finished
    pub completed: u64,
}

#[derive(Debug, Default)]
struct Counters {
    accepted: AtomicU64,
    dropped: AtomicU64,
    completed: AtomicU64,
}

/// Single-flight decoder for a live frame stream
pub struct LiveDecoder<L> {
    /// Capacity-1 channel into the worker
    sender: Option<Sender<SourceFrame<L>>>,
    /// Newest unread result; capacity 1, a newer result evicts an unread one
    results: Receiver<FrameResult>,
    /// Most recent result for presentation
    latest: Arc<RwLock<Option<FrameResult>>>,
    /// Set while a frame is queued or being decoded
    in_flight: Arc<AtomicBool>,
    counters: Arc<Counters>,
    handle: Option<JoinHandle<()>>,
}

impl<L> LiveDecoder<L>
where
    L: GlyphLocator + Send + 'static,
{
    /// Start the worker thread
    pub fn spawn(pipeline: DecodePipeline) -> Self {
        let (sender, frames) = bounded::<SourceFrame<L>>(1);
        let (results_tx, results) = bounded(1);
        let worker_results = ResultSlot {
            sender: results_tx,
            stale: results.clone(),
        };
        let latest = Arc::new(RwLock::new(None));
        let in_flight = Arc::new(AtomicBool::new(false));
        let counters = Arc::new(Counters::default());

        let worker_latest = latest.clone();
        let worker_in_flight = in_flight.clone();
        let worker_counters = counters.clone();

        let handle = std::thread::spawn(move || {
            info!("Decode worker starting...");
            run_worker(
                pipeline,
                frames,
                worker_results,
                worker_latest,
                worker_in_flight,
                worker_counters,
            );
            info!("Decode worker exiting...");
        });

        Self {
            sender: Some(sender),
            results,
            latest,
            in_flight,
            counters,
            handle: Some(handle),
        }
    }

    /// Offer a frame. Returns `false` if it was dropped because a pass is
    /// still running or the worker has stopped. Never blocks.
    pub fn submit(&self, frame: SourceFrame<L>) -> bool {
        let Some(sender) = &self.sender else {
            return false;
        };

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            self.counters.dropped.fetch_add(1, Ordering::Relaxed);
            debug!("Decode in flight, dropping frame {}", frame.sequence);
            return false;
        }

        match sender.try_send(frame) {
            Ok(()) => {
                self.counters.accepted.fetch_add(1, Ordering::Relaxed);
                true
            }
            Err(TrySendError::Full(frame)) | Err(TrySendError::Disconnected(frame)) => {
                self.in_flight.store(false, Ordering::Release);
                self.counters.dropped.fetch_add(1, Ordering::Relaxed);
                warn!("Decode worker unavailable, dropping frame {}", frame.sequence);
                false
            }
        }
    }
}

impl<L> LiveDecoder<L> {
    /// Completed results. Holds at most the newest unread one, so a
    /// caller that only reads [`latest`](Self::latest) never accumulates a backlog.
    pub fn results(&self) -> &Receiver<FrameResult> {
        &self.results
    }

    /// Most recent completed result
    pub fn latest(&self) -> Option<FrameResult> {
        self.latest.read().clone()
    }

    /// Shared handle to the most recent result
    pub fn latest_handle(&self) -> Arc<RwLock<Option<FrameResult>>> {
        self.latest.clone()
    }

    /// Whether a pass is queued or running
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn stats(&self) -> LiveStats {
        LiveStats {
            accepted: self.counters.accepted.load(Ordering::Relaxed),
            dropped: self.counters.dropped.load(Ordering::Relaxed),
            completed: self.counters.completed.load(Ordering::Relaxed),
        }
    }

    /// Stop accepting frames, let the running pass finish and join the worker
    pub fn shutdown(&mut self) {
        self.sender.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::error!("Decode worker panicked");
            }
        }
    }
}

impl<L> Drop for LiveDecoder<L> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Capacity-1 result channel where the newest result wins
struct ResultSlot {
    sender: Sender<FrameResult>,
    /// Worker-side receiver used to evict an unread result
    stale: Receiver<FrameResult>,
}

impl ResultSlot {
    fn publish(&self, mut result: FrameResult) {
        // Only the worker sends, so at most one eviction is needed
        loop {
            match self.sender.try_send(result) {
                Ok(()) => return,
                Err(TrySendError::Full(pending)) => {
                    if let Ok(old) = self.stale.try_recv() {
                        debug!("Result {} unread, replaced by {}", old.sequence, pending.sequence);
                    }
                    result = pending;
                }
                Err(TrySendError::Disconnected(_)) => {
                    debug!("Result receiver gone");
                    return;
                }
            }
        }
    }
}

fn run_worker<L: GlyphLocator>(
    pipeline: DecodePipeline,
    frames: Receiver<SourceFrame<L>>,
    results: ResultSlot,
    latest: Arc<RwLock<Option<FrameResult>>>,
    in_flight: Arc<AtomicBool>,
    counters: Arc<Counters>,
) {
    for frame in frames.iter() {
        let outcome = pipeline.run(&frame.line, &frame.locator, &frame.image);
        let result = FrameResult {
            sequence: frame.sequence,
            outcome,
            latency: frame.captured_at.elapsed(),
        };
        debug!(
            "Frame {} decoded in {:?}: {}",
            result.sequence, result.latency, result.outcome.line
        );

        *latest.write() = Some(result.clone());
        counters.completed.fetch_add(1, Ordering::Relaxed);
        // Cleared before publishing so a consumer reacting to the result can
        // submit the next frame immediately
        in_flight.store(false, Ordering::Release);

        results.publish(result);
    }
}
