use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;

use adc_capture_core::{
    BufferHandle, BufferId, CaptureError, ChannelId, ChannelSet, CompletionSink, Sample,
    SamplingUnit,
};

use crate::signal::SignalSource;
use crate::transfer::TransferChain;
use crate::SIM_CHANNEL_CAPACITY;

struct SharedState<T: Sample> {
    chain: TransferChain<T>,
    scan: Vec<ChannelId>,
    scan_pos: usize,
}

/// Free-running simulated sampling unit.
///
/// A dedicated producer thread stands in for the conversion clock and the
/// transfer engine: it scans the configured channels round-robin, draws
/// conversion results from a [`SignalSource`], and writes them into the
/// active leg's buffer. Completion sinks fire on that thread — the
/// interrupt-equivalent context.
pub struct FreeRunningAdc<T: Sample, S: SignalSource<T>> {
    shared: Arc<Mutex<SharedState<T>>>,
    source: Arc<Mutex<S>>,
    sample_rate_hz: u32,
    running: Arc<AtomicBool>,
    worker: Mutex<Option<thread::JoinHandle<()>>>,
}

impl<T: Sample, S: SignalSource<T>> FreeRunningAdc<T, S> {
    pub fn new(source: S, sample_rate_hz: u32) -> Self {
        Self {
            shared: Arc::new(Mutex::new(SharedState {
                chain: TransferChain::new(),
                scan: Vec::new(),
                scan_pos: 0,
            })),
            source: Arc::new(Mutex::new(source)),
            sample_rate_hz: sample_rate_hz.max(1),
            running: Arc::new(AtomicBool::new(false)),
            worker: Mutex::new(None),
        }
    }

    /// Samples that arrived with no armed write target.
    pub fn dropped_samples(&self) -> u64 {
        self.shared.lock().chain.dropped_samples()
    }

    /// The write targets currently programmed into the legs.
    pub fn leg_targets(&self) -> Option<[BufferHandle<T>; 2]> {
        self.shared.lock().chain.leg_targets()
    }
}

impl<T: Sample, S: SignalSource<T>> SamplingUnit<T> for FreeRunningAdc<T, S> {
    fn channel_capacity(&self) -> u8 {
        SIM_CHANNEL_CAPACITY
    }

    fn configure(&self, channels: &ChannelSet, depth: usize) -> Result<(), CaptureError> {
        if depth == 0 {
            return Err(CaptureError::Configuration(
                "capture depth must be at least 1".into(),
            ));
        }
        if let Some(ch) = channels.iter().find(|&ch| ch >= SIM_CHANNEL_CAPACITY) {
            return Err(CaptureError::Configuration(format!(
                "channel {ch} beyond unit capacity {SIM_CHANNEL_CAPACITY}"
            )));
        }
        let mut shared = self.shared.lock();
        shared.scan = channels.iter().collect();
        shared.scan_pos = 0;
        log::debug!(
            "configured: channels={}, depth={}, width={:?}",
            channels.len(),
            depth,
            T::WIDTH
        );
        Ok(())
    }

    fn chain_legs(
        &self,
        leg_a: BufferHandle<T>,
        leg_b: BufferHandle<T>,
    ) -> Result<(), CaptureError> {
        self.shared.lock().chain.set_legs(leg_a, leg_b);
        Ok(())
    }

    fn register_completion_sink(&self, sink: CompletionSink) {
        self.shared.lock().chain.set_sink(sink);
    }

    fn start_sampling(&self) -> Result<(), CaptureError> {
        {
            let shared = self.shared.lock();
            if shared.scan.is_empty() {
                return Err(CaptureError::Configuration(
                    "sampling unit not configured".into(),
                ));
            }
            if !shared.chain.has_legs() {
                return Err(CaptureError::Configuration("no transfer legs chained".into()));
            }
        }
        if self.running.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        self.shared.lock().chain.reset_to_leg_a();

        let shared = Arc::clone(&self.shared);
        let source = Arc::clone(&self.source);
        let running = Arc::clone(&self.running);
        let batch = (self.sample_rate_hz / 1000).max(1) as usize;

        let handle = thread::Builder::new()
            .name("adc-sim-capture".into())
            .spawn(move || {
                log::debug!("simulated sampling started, {} samples/ms", batch);
                while running.load(Ordering::SeqCst) {
                    thread::sleep(Duration::from_millis(1));

                    let mut remaining = batch;
                    while remaining > 0 {
                        let mut fired = None;
                        {
                            let mut shared = shared.lock();
                            let mut source = source.lock();
                            while remaining > 0 {
                                let pos = shared.scan_pos;
                                let channel = shared.scan[pos];
                                shared.scan_pos = (pos + 1) % shared.scan.len();
                                let value = source.sample(channel);
                                remaining -= 1;
                                if let Some(event) = shared.chain.push(value) {
                                    fired = Some(event);
                                    break;
                                }
                            }
                        }
                        // Service each completion before producing further
                        // samples, as the chained hardware would. The
                        // engine's handler re-arms through rearm_leg, which
                        // takes the unit lock; it must not be held here.
                        if let Some((id, sink)) = fired {
                            sink(id);
                        }
                    }
                }
                log::debug!("simulated sampling stopped");
            })
            .map_err(|e| {
                self.running.store(false, Ordering::SeqCst);
                CaptureError::ResourceExhaustion(format!("failed to spawn producer: {e}"))
            })?;

        *self.worker.lock() = Some(handle);
        Ok(())
    }

    fn stop_sampling(&self) -> Result<(), CaptureError> {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.worker.lock().take() {
            let _ = handle.join();
        }
        Ok(())
    }

    fn rearm_leg(&self, leg: BufferId) {
        let target = self.shared.lock().chain.acknowledge(leg);
        if let Some(target) = target {
            target.rearm();
        }
    }
}
