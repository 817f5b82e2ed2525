use std::any::Any;
use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use super::{DecodeError, DecodedImage, ImageDecoder, RasterBytes};

/// Shared cancellation flag for one decode job.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// One `apply_image` request in flight.
#[derive(Debug)]
pub struct DecodeJob {
    pub generation: u64,
    pub raster: RasterBytes,
    pub cancel: CancelToken,
}

/// Result of a finished (not cancelled) job.
#[derive(Debug)]
pub struct DecodeCompletion {
    pub generation: u64,
    pub result: Result<DecodedImage, DecodeError>,
}

impl DecodeJob {
    /// Decodes the raster unless the job was cancelled before or during decode.
    ///
    /// A panicking decoder is reported as `DecodeError::Unsupported`.
    pub fn run(self, decoder: &dyn ImageDecoder) -> Option<DecodeCompletion> {
        if self.cancel.is_cancelled() {
            return None;
        }

        let raster = self.raster;
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            raster.into_encoded().and_then(|bytes| decoder.decode(&bytes))
        }))
        .unwrap_or_else(|payload| {
            let reason = panic_message(payload.as_ref());
            log::error!("decode #{} panicked: {reason}", self.generation);
            Err(DecodeError::Unsupported(format!("decoder panicked: {reason}")))
        });

        if self.cancel.is_cancelled() {
            return None;
        }
        Some(DecodeCompletion {
            generation: self.generation,
            result,
        })
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

/// Runs decode jobs somewhere and hands completions back on the UI thread.
///
/// `drain` must never block; completions are delivered in whatever order the
/// executor finishes them. A job the executor can no longer run still completes,
/// with an error.
pub trait DecodeExecutor {
    fn submit(&mut self, job: DecodeJob);

    fn drain(&mut self) -> Vec<DecodeCompletion>;
}

/// Decodes on submit, on the calling thread, and delivers at the next `drain`.
///
/// Suitable for small captures and for hosts without threads.
pub struct InlineExecutor<D> {
    decoder: D,
    done: VecDeque<DecodeCompletion>,
}

impl<D: ImageDecoder> InlineExecutor<D> {
    pub fn new(decoder: D) -> Self {
        Self {
            decoder,
            done: VecDeque::new(),
        }
    }
}

impl<D: ImageDecoder> DecodeExecutor for InlineExecutor<D> {
    fn submit(&mut self, job: DecodeJob) {
        if let Some(done) = job.run(&self.decoder) {
            self.done.push_back(done);
        }
    }

    fn drain(&mut self) -> Vec<DecodeCompletion> {
        self.done.drain(..).collect()
    }
}
