use std::collections::VecDeque;
use std::thread::JoinHandle;

use anyhow::{Context, Result};
use crossbeam_channel::{Receiver, Sender, TryRecvError};

use super::{DecodeCompletion, DecodeError, DecodeExecutor, DecodeJob, ImageDecoder};

/// Background decode thread.
///
/// Jobs are decoded in submission order; a job cancelled while queued is skipped
/// without decoding. Only CPU work happens here; the GPU upload stays on the
/// thread that drains completions.
///
/// If the thread stops, the newest submitted job and every later one complete
/// with an error instead of vanishing.
pub struct DecodeWorker {
    jobs: Option<Sender<DecodeJob>>,
    done: Receiver<DecodeCompletion>,
    thread: Option<JoinHandle<()>>,
    /// Newest submitted generation not yet seen in `done`.
    awaiting: Option<u64>,
    orphaned: VecDeque<DecodeCompletion>,
}

impl DecodeWorker {
    pub fn spawn<D>(decoder: D) -> Result<Self>
    where
        D: ImageDecoder + 'static,
    {
        let (job_tx, job_rx) = crossbeam_channel::unbounded::<DecodeJob>();
        let (done_tx, done_rx) = crossbeam_channel::unbounded::<DecodeCompletion>();

        let thread = std::thread::Builder::new()
            .name("snapcube-decode".into())
            .spawn(move || {
                for job in job_rx.iter() {
                    let generation = job.generation;
                    match job.run(&decoder) {
                        Some(done) => {
                            if done_tx.send(done).is_err() {
                                break;
                            }
                        }
                        None => log::debug!("decode #{generation} cancelled"),
                    }
                }
                log::debug!("decode worker stopped");
            })
            .context("failed to spawn decode worker thread")?;

        Ok(Self {
            jobs: Some(job_tx),
            done: done_rx,
            thread: Some(thread),
            awaiting: None,
            orphaned: VecDeque::new(),
        })
    }

    fn orphan(&mut self, generation: u64) {
        self.orphaned.push_back(DecodeCompletion {
            generation,
            result: Err(DecodeError::Unsupported("decode worker stopped".into())),
        });
    }
}

impl DecodeExecutor for DecodeWorker {
    fn submit(&mut self, job: DecodeJob) {
        let generation = job.generation;
        let sent = self.jobs.as_ref().is_some_and(|jobs| jobs.send(job).is_ok());
        if sent {
            self.awaiting = Some(generation);
        } else {
            log::error!("decode worker is gone; decode #{generation} failed");
            self.jobs = None;
            self.orphan(generation);
        }
    }

    fn drain(&mut self) -> Vec<DecodeCompletion> {
        let mut out: Vec<DecodeCompletion> = self.orphaned.drain(..).collect();
        loop {
            match self.done.try_recv() {
                Ok(done) => {
                    if self.awaiting == Some(done.generation) {
                        self.awaiting = None;
                    }
                    out.push(done);
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if let Some(generation) = self.awaiting.take() {
                        log::error!("decode worker stopped; decode #{generation} failed");
                        out.push(DecodeCompletion {
                            generation,
                            result: Err(DecodeError::Unsupported("decode worker stopped".into())),
                        });
                    }
                    break;
                }
            }
        }
        out
    }
}

impl Drop for DecodeWorker {
    fn drop(&mut self) {
        // Closing the job channel ends the worker loop.
        self.jobs = None;
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::error!("decode worker panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;
    use crate::testing::png_bytes;
    use crate::texture::{CancelToken, DecodedImage, RasterBytes, RasterDecoder};

    fn wait_for(worker: &mut DecodeWorker, n: usize) -> Vec<DecodeCompletion> {
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut out = Vec::new();
        while out.len() < n && Instant::now() < deadline {
            out.extend(worker.drain());
            std::thread::sleep(Duration::from_millis(5));
        }
        out
    }

    #[test]
    fn decodes_in_background() {
        let mut worker = DecodeWorker::spawn(RasterDecoder::default()).unwrap();
        worker.submit(DecodeJob {
            generation: 1,
            raster: RasterBytes::encoded(png_bytes(4, 4, [255, 0, 0, 255])),
            cancel: CancelToken::new(),
        });

        let done = wait_for(&mut worker, 1);
        assert_eq!(done.len(), 1);
        let img = done[0].result.as_ref().unwrap();
        assert_eq!((img.width, img.height), (4, 4));
    }

    /// Panics on a marker payload, decodes everything else.
    struct FragileDecoder;

    impl ImageDecoder for FragileDecoder {
        fn decode(&self, encoded: &[u8]) -> std::result::Result<DecodedImage, DecodeError> {
            if encoded == b"boom" {
                panic!("decoder blew up");
            }
            RasterDecoder::default().decode(encoded)
        }
    }

    fn job(generation: u64, raster: RasterBytes) -> DecodeJob {
        DecodeJob {
            generation,
            raster,
            cancel: CancelToken::new(),
        }
    }

    #[test]
    fn decoder_panic_fails_the_job_and_keeps_the_worker() {
        let mut worker = DecodeWorker::spawn(FragileDecoder).unwrap();
        worker.submit(job(1, RasterBytes::encoded(b"boom".to_vec())));

        let done = wait_for(&mut worker, 1);
        assert_eq!(done.len(), 1);
        assert!(matches!(done[0].result, Err(DecodeError::Unsupported(_))));

        worker.submit(job(2, RasterBytes::encoded(png_bytes(2, 2, [0, 0, 255, 255]))));
        let done = wait_for(&mut worker, 1);
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].generation, 2);
        assert!(done[0].result.is_ok());
    }

    #[test]
    fn stopped_worker_fails_pending_and_new_jobs() {
        let mut worker = DecodeWorker::spawn(RasterDecoder::default()).unwrap();
        worker.awaiting = Some(4);
        // Simulate the thread going away.
        worker.jobs = None;
        if let Some(thread) = worker.thread.take() {
            thread.join().unwrap();
        }

        let done = worker.drain();
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].generation, 4);
        assert!(done[0].result.is_err());

        worker.submit(job(5, RasterBytes::encoded(png_bytes(1, 1, [0, 0, 0, 255]))));
        let done = worker.drain();
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].generation, 5);
        assert!(done[0].result.is_err());
    }

    #[test]
    fn pre_cancelled_job_is_skipped() {
        let mut worker = DecodeWorker::spawn(RasterDecoder::default()).unwrap();
        let cancel = CancelToken::new();
        cancel.cancel();
        worker.submit(DecodeJob {
            generation: 1,
            raster: RasterBytes::encoded(png_bytes(1, 1, [0, 0, 0, 255])),
            cancel,
        });
        worker.submit(DecodeJob {
            generation: 2,
            raster: RasterBytes::encoded(png_bytes(1, 1, [0, 0, 0, 255])),
            cancel: CancelToken::new(),
        });

        let done = wait_for(&mut worker, 1);
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].generation, 2);
    }
}
