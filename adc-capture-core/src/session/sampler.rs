use std::sync::Arc;

use crate::engine::double_buffer::DoubleBufferEngine;
use crate::models::config::CaptureConfig;
use crate::models::diagnostics::CaptureDiagnostics;
use crate::models::error::CaptureError;
use crate::models::sample::{BufferId, Sample};
use crate::models::state::EngineState;
use crate::traits::observer::CompletionCallback;
use crate::traits::sampling_unit::SamplingUnit;

/// Public-facing sampler: one sampling unit and one double-buffer engine
/// behind a single lifecycle.
///
/// Construct → [`start_capture`](Self::start_capture) → stream of completion
/// events → [`stop_capture`](Self::stop_capture) →
/// [`teardown`](Self::teardown) (or drop).
///
/// ```ignore
/// let adc = Arc::new(FreeRunningAdc::new(Ramp::new(0.001), 48_000));
/// let config = CaptureConfig::new(ChannelSet::new([0, 1])?).with_depth(1_000);
/// let mut sampler = AdcSampler::<u8, _>::new(adc, config)?;
/// sampler.on_sampling_complete(Arc::new(|id, samples| {
///     // interrupt-equivalent context: copy out, return quickly
/// }));
/// sampler.start_capture()?;
/// ```
pub struct AdcSampler<T: Sample, U: SamplingUnit<T> + 'static> {
    engine: DoubleBufferEngine<T, U>,
}

impl<T: Sample, U: SamplingUnit<T> + 'static> AdcSampler<T, U> {
    /// Construct and arm a sampler over `unit`.
    pub fn new(unit: Arc<U>, config: CaptureConfig) -> Result<Self, CaptureError> {
        Ok(Self {
            engine: DoubleBufferEngine::new(unit, config)?,
        })
    }

    /// Register the completion observer, replacing any previous one.
    ///
    /// The observer is invoked from interrupt-equivalent context with the
    /// completed buffer's identity and a transient view of its samples; it
    /// must not block, allocate, or re-enter `start_capture`/`stop_capture`.
    pub fn on_sampling_complete(&self, observer: CompletionCallback<T>) {
        self.engine.set_observer(observer);
    }

    /// Start free-running capture.
    pub fn start_capture(&mut self) -> Result<(), CaptureError> {
        self.engine.start()
    }

    /// Stop capture; buffers are frozen and the sampler is restartable.
    pub fn stop_capture(&mut self) -> Result<(), CaptureError> {
        self.engine.stop()
    }

    /// Copy out the current contents of buffer `id`.
    ///
    /// Only the identity delivered by the most recent completion event is
    /// guaranteed coherent; the buffer currently being filled is not.
    pub fn read_buffer(&self, id: BufferId) -> Result<Vec<T>, CaptureError> {
        self.engine.read_buffer(id)
    }

    pub fn state(&self) -> EngineState {
        self.engine.state()
    }

    pub fn diagnostics(&self) -> CaptureDiagnostics {
        self.engine.diagnostics()
    }

    /// Quiesce the unit and permanently disable dispatch. Also runs on drop.
    pub fn teardown(&mut self) {
        self.engine.teardown();
    }
}
