//! Dedicated estimation thread.
//!
//! A [TunerWorker] owns one [PitchEstimator] on its own thread. Capture code
//! submits buffers, the worker estimates them strictly in submission order and
//! forwards one [Estimate] per buffer on the results channel. Stopping the
//! worker lets an estimate that is already running finish, then discards any
//! queued buffers and joins the thread.

use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender, TryRecvError};
use log::{debug, info, warn};

use crate::config::Config;
use crate::detector::internals::Estimate;
use crate::error::WorkerError;
use crate::estimator::PitchEstimator;
use crate::float::Float;
use crate::utils::buffer::SampleBuffer;

pub struct TunerWorker<T>
where
    T: Float,
{
    frames: Option<Sender<SampleBuffer<T>>>,
    shutdown: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl<T> TunerWorker<T>
where
    T: Float,
{
    /// Validates `config` and starts the worker thread. Estimates arrive on the
    /// returned receiver.
    pub fn spawn(config: Config) -> Result<(Self, Receiver<Estimate<T>>), WorkerError> {
        let mut estimator = PitchEstimator::new(config)?;
        let (frames_tx, frames_rx) = crossbeam_channel::unbounded::<SampleBuffer<T>>();
        let (results_tx, results_rx) = crossbeam_channel::unbounded();
        let (shutdown_tx, shutdown_rx) = crossbeam_channel::bounded(1);

        let handle = thread::Builder::new()
            .name("tuner-worker".into())
            .spawn(move || {
                debug!("tuner worker started");
                loop {
                    crossbeam_channel::select! {
                        recv(shutdown_rx) -> _ => break,
                        recv(frames_rx) -> msg => match msg {
                            Ok(frame) => {
                                if stopping(&shutdown_rx) {
                                    break;
                                }
                                let estimate = estimator.estimate(&frame);
                                if results_tx.send(estimate).is_err() {
                                    debug!("results receiver dropped");
                                    break;
                                }
                            }
                            Err(_) => break,
                        },
                    }
                }
                info!("tuner worker finished");
            })
            .map_err(|e| WorkerError::Spawn(e.to_string()))?;

        let worker = TunerWorker {
            frames: Some(frames_tx),
            shutdown: Some(shutdown_tx),
            handle: Some(handle),
        };
        Ok((worker, results_rx))
    }

    /// Queues `buffer` for estimation.
    pub fn submit(&self, buffer: SampleBuffer<T>) -> Result<(), WorkerError> {
        match &self.frames {
            Some(frames) => frames.send(buffer).map_err(|_| WorkerError::Stopped),
            None => Err(WorkerError::Stopped),
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().map_or(false, |h| !h.is_finished())
    }

    /// Signals the thread to stop and waits for it. Calling this on a stopped
    /// worker does nothing.
    pub fn stop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.try_send(());
        }
        self.frames = None;
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("tuner worker panicked");
            }
        }
    }
}

impl<T> Drop for TunerWorker<T>
where
    T: Float,
{
    fn drop(&mut self) {
        self.stop();
    }
}

fn stopping(shutdown: &Receiver<()>) -> bool {
    !matches!(shutdown.try_recv(), Err(TryRecvError::Empty))
}
