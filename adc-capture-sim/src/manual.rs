use parking_lot::Mutex;

use adc_capture_core::{
    BufferHandle, BufferId, CaptureError, ChannelSet, CompletionSink, Sample, SamplingUnit,
};

use crate::transfer::TransferChain;
use crate::SIM_CHANNEL_CAPACITY;

struct ManualState<T: Sample> {
    chain: TransferChain<T>,
    round_robin_mask: u32,
    transfer_unit: usize,
    free_legs: u8,
    running: bool,
}

/// Hand-cranked sampling unit.
///
/// Stands in for the hardware in deterministic tests: conversions are
/// delivered by calling [`feed`](ManualAdc::feed), and completions fire
/// synchronously on the caller's thread, which plays the role of the
/// interrupt context.
pub struct ManualAdc<T: Sample> {
    state: Mutex<ManualState<T>>,
}

impl<T: Sample> ManualAdc<T> {
    pub fn new() -> Self {
        Self::with_free_legs(2)
    }

    /// A unit with fewer than two claimable transfer legs, for exercising
    /// resource exhaustion.
    pub fn with_free_legs(free_legs: u8) -> Self {
        Self {
            state: Mutex::new(ManualState {
                chain: TransferChain::new(),
                round_robin_mask: 0,
                transfer_unit: 0,
                free_legs,
                running: false,
            }),
        }
    }

    /// Deliver conversion results one at a time, firing completion signals
    /// synchronously as buffers fill. Returns how many samples the unit
    /// accepted; feeding a stopped unit accepts none.
    pub fn feed(&self, samples: &[T]) -> usize {
        let mut accepted = 0;
        for &value in samples {
            let fired = {
                let mut state = self.state.lock();
                if !state.running {
                    break;
                }
                accepted += 1;
                state.chain.push(value)
            };
            if let Some((id, sink)) = fired {
                sink(id);
            }
        }
        accepted
    }

    /// Raise `leg`'s completion signal without filling its buffer.
    ///
    /// Test hook for exercising teardown with a completion in flight.
    pub fn raise_completion(&self, leg: BufferId) {
        let sink = self.state.lock().chain.sink();
        if let Some(sink) = sink {
            sink(leg);
        }
    }

    /// Samples that arrived with no armed write target.
    pub fn dropped_samples(&self) -> u64 {
        self.state.lock().chain.dropped_samples()
    }

    /// The write targets currently programmed into the legs.
    pub fn leg_targets(&self) -> Option<[BufferHandle<T>; 2]> {
        self.state.lock().chain.leg_targets()
    }

    /// The round-robin selection mask programmed by `configure`.
    pub fn round_robin_mask(&self) -> u32 {
        self.state.lock().round_robin_mask
    }

    /// Per-unit transfer size programmed by `configure`, derived from the
    /// sample width.
    pub fn transfer_unit_bytes(&self) -> usize {
        self.state.lock().transfer_unit
    }
}

impl<T: Sample> Default for ManualAdc<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Sample> SamplingUnit<T> for ManualAdc<T> {
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
        let mut state = self.state.lock();
        state.round_robin_mask = channels.mask();
        state.transfer_unit = T::WIDTH.bytes_per_sample();
        Ok(())
    }

    fn chain_legs(
        &self,
        leg_a: BufferHandle<T>,
        leg_b: BufferHandle<T>,
    ) -> Result<(), CaptureError> {
        let mut state = self.state.lock();
        if state.free_legs < 2 {
            return Err(CaptureError::ResourceExhaustion(format!(
                "need 2 transfer legs, {} free",
                state.free_legs
            )));
        }
        state.chain.set_legs(leg_a, leg_b);
        Ok(())
    }

    fn register_completion_sink(&self, sink: CompletionSink) {
        self.state.lock().chain.set_sink(sink);
    }

    fn start_sampling(&self) -> Result<(), CaptureError> {
        let mut state = self.state.lock();
        if !state.chain.has_legs() {
            return Err(CaptureError::Configuration("no transfer legs chained".into()));
        }
        if !state.running {
            state.chain.reset_to_leg_a();
            state.running = true;
        }
        Ok(())
    }

    fn stop_sampling(&self) -> Result<(), CaptureError> {
        self.state.lock().running = false;
        Ok(())
    }

    fn rearm_leg(&self, leg: BufferId) {
        let target = self.state.lock().chain.acknowledge(leg);
        if let Some(target) = target {
            target.rearm();
        }
    }
}
