use std::sync::Arc;

use parking_lot::Mutex;

use crate::engine::buffer::{BufferHandle, CaptureBuffer};
use crate::engine::dispatcher::CompletionDispatcher;
use crate::models::config::CaptureConfig;
use crate::models::diagnostics::CaptureDiagnostics;
use crate::models::error::CaptureError;
use crate::models::sample::{BufferId, Sample};
use crate::models::state::EngineState;
use crate::traits::observer::CompletionCallback;
use crate::traits::sampling_unit::SamplingUnit;

/// Foreground-visible engine state, one lock for both fields so a state
/// transition and its counters move together.
struct SharedInner {
    state: EngineState,
    diagnostics: CaptureDiagnostics,
}

/// Double-buffered capture engine.
///
/// Owns the two capture buffers and the swap protocol. The sampling unit
/// fills the active leg's buffer; at each buffer-full boundary the engine's
/// completion handler re-arms the drained leg (write target re-pointed and
/// completion acknowledged together) and notifies the observer while the
/// other buffer is already filling, so no sample window is lost between
/// buffers.
///
/// Data flow:
/// ```text
/// [SamplingUnit] → leg A / leg B (chained) → completion sink
///       ↑                                        │ re-arm leg
///       └────────────────────────────────────────┤
///                                                └→ [CompletionDispatcher] → observer
/// ```
pub struct DoubleBufferEngine<T: Sample, U: SamplingUnit<T> + 'static> {
    unit: Arc<U>,
    legs: [BufferHandle<T>; 2],
    dispatcher: CompletionDispatcher<T>,
    shared: Arc<Mutex<SharedInner>>,
    depth: usize,
}

impl<T: Sample, U: SamplingUnit<T> + 'static> DoubleBufferEngine<T, U> {
    /// Configure the unit, allocate both buffers, and chain the transfer
    /// legs. On success the engine is `Armed`; on failure no engine exists
    /// and nothing is left armed.
    pub fn new(unit: Arc<U>, config: CaptureConfig) -> Result<Self, CaptureError> {
        config.validate().map_err(CaptureError::Configuration)?;

        let capacity = unit.channel_capacity();
        if let Some(ch) = config.channels.iter().find(|&ch| ch >= capacity) {
            return Err(CaptureError::Configuration(format!(
                "channel {ch} beyond unit capacity {capacity}"
            )));
        }

        unit.configure(&config.channels, config.depth)?;

        let legs = [
            CaptureBuffer::allocate(config.depth),
            CaptureBuffer::allocate(config.depth),
        ];
        unit.chain_legs(Arc::clone(&legs[0]), Arc::clone(&legs[1]))?;

        let engine = Self {
            unit,
            legs,
            dispatcher: CompletionDispatcher::new(),
            shared: Arc::new(Mutex::new(SharedInner {
                state: EngineState::Armed,
                diagnostics: CaptureDiagnostics::default(),
            })),
            depth: config.depth,
        };
        engine.install_sink();

        log::debug!(
            "capture engine armed: depth={} channels={} width={:?}",
            config.depth,
            config.channels.len(),
            T::WIDTH
        );
        Ok(engine)
    }

    /// Install the completion handler on the unit. The handler runs in the
    /// unit's completion context and must stay allocation-free and
    /// infallible: a missing observer degrades to swap-without-notification,
    /// never to a skipped swap.
    fn install_sink(&self) {
        let unit = Arc::clone(&self.unit);
        let legs = [Arc::clone(&self.legs[0]), Arc::clone(&self.legs[1])];
        let dispatcher = self.dispatcher.clone();
        let shared = Arc::clone(&self.shared);
        let depth = self.depth;

        self.unit.register_completion_sink(Arc::new(move |id: BufferId| {
            // Re-arm before notifying: the write target must be programmed
            // and the signal acknowledged before the chained leg can hand
            // the pair back.
            unit.rearm_leg(id);

            let leg = &legs[id.index()];
            let observed = leg.with_samples(|samples| dispatcher.dispatch(id, samples));

            shared
                .lock()
                .diagnostics
                .record_completion(id, depth, observed);
        }));
    }

    /// Begin free-running capture (`Armed`/`Stopped` → `Running`).
    ///
    /// Both write targets are armed before the sampling clock starts; the
    /// first conversions land in leg A. Calling this while already running
    /// is a no-op.
    pub fn start(&mut self) -> Result<(), CaptureError> {
        self.check_live()?;
        if self.state().is_running() {
            return Ok(());
        }

        self.legs[0].rearm();
        self.legs[1].rearm();
        self.unit.start_sampling()?;

        self.set_state(EngineState::Running);
        log::debug!("capture running");
        Ok(())
    }

    /// Halt the sampling clock and drain both legs (`Running` → `Stopped`).
    ///
    /// Safe to call while a completion is in flight: the unit quiesces its
    /// producer before returning, after which neither leg is left armed.
    /// Restartable via [`start`](Self::start) without reallocation.
    pub fn stop(&mut self) -> Result<(), CaptureError> {
        self.check_live()?;
        if self.state().is_restartable() {
            return Ok(());
        }

        self.unit.stop_sampling()?;
        self.legs[0].disarm();
        self.legs[1].disarm();

        self.set_state(EngineState::Stopped);
        log::debug!("capture stopped");
        Ok(())
    }

    /// Quiesce the transfer machinery and disable dispatch (terminal).
    ///
    /// Ordering: the sampling clock stops and the unit's sink is replaced
    /// with a no-op before the observer slot is cleared, so no callback can
    /// run after this returns, even for a completion raised concurrently.
    /// Infallible and idempotent.
    pub fn teardown(&mut self) {
        if self.state().is_torn_down() {
            return;
        }

        let _ = self.unit.stop_sampling();
        self.unit.register_completion_sink(Arc::new(|_| {}));
        self.dispatcher.clear();
        self.legs[0].disarm();
        self.legs[1].disarm();

        self.set_state(EngineState::TornDown);
        log::debug!("capture engine torn down");
    }

    /// Install or replace the completion observer (last writer wins).
    ///
    /// The observer runs in interrupt-equivalent context: it must not block,
    /// allocate, or re-enter `start`/`stop`, and must copy samples out
    /// before returning if it needs them beyond the call.
    pub fn set_observer(&self, observer: CompletionCallback<T>) {
        if self.state().is_torn_down() {
            debug_assert!(false, "capture engine used after teardown");
            return;
        }
        self.dispatcher.set(observer);
    }

    /// Copy out the current contents of buffer `id`.
    ///
    /// Coherent only for the identity delivered by the most recent
    /// completion; the slot currently being filled may be mid-write.
    pub fn read_buffer(&self, id: BufferId) -> Result<Vec<T>, CaptureError> {
        self.check_live()?;
        Ok(self.legs[id.index()].snapshot())
    }

    pub fn state(&self) -> EngineState {
        self.shared.lock().state
    }

    pub fn diagnostics(&self) -> CaptureDiagnostics {
        self.shared.lock().diagnostics
    }

    /// Samples per capture buffer.
    pub fn depth(&self) -> usize {
        self.depth
    }

    fn set_state(&self, state: EngineState) {
        self.shared.lock().state = state;
    }

    /// Post-teardown use is a programming error: fatal in debug builds, a
    /// checked error in release.
    fn check_live(&self) -> Result<(), CaptureError> {
        if self.state().is_torn_down() {
            debug_assert!(false, "capture engine used after teardown");
            return Err(CaptureError::PostTeardown);
        }
        Ok(())
    }
}

impl<T: Sample, U: SamplingUnit<T> + 'static> Drop for DoubleBufferEngine<T, U> {
    fn drop(&mut self) {
        if self.state().is_torn_down() {
            return;
        }
        let _ = self.unit.stop_sampling();
        self.unit.register_completion_sink(Arc::new(|_| {}));
        self.dispatcher.clear();
        self.legs[0].disarm();
        self.legs[1].disarm();
        self.set_state(EngineState::TornDown);
    }
}
