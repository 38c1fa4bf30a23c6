use std::sync::Arc;

use adc_capture_core::{BufferHandle, BufferId, CompletionSink, PushOutcome, Sample};

/// Software model of a chained two-leg transfer engine.
///
/// Tracks which leg is the active write target, the programmed buffer
/// handles, and the raised-but-unacknowledged completion signals. Both
/// simulated units drive their conversions through this; the caller must
/// invoke the returned sink only after releasing whatever lock guards this
/// state, since the engine's handler calls back into the unit to re-arm.
pub(crate) struct TransferChain<T: Sample> {
    legs: Option<[BufferHandle<T>; 2]>,
    active: BufferId,
    sink: Option<CompletionSink>,
    pending: [bool; 2],
    dropped: u64,
}

impl<T: Sample> TransferChain<T> {
    pub fn new() -> Self {
        Self {
            legs: None,
            active: BufferId::A,
            sink: None,
            pending: [false; 2],
            dropped: 0,
        }
    }

    pub fn set_legs(&mut self, leg_a: BufferHandle<T>, leg_b: BufferHandle<T>) {
        self.legs = Some([leg_a, leg_b]);
    }

    pub fn has_legs(&self) -> bool {
        self.legs.is_some()
    }

    pub fn set_sink(&mut self, sink: CompletionSink) {
        self.sink = Some(sink);
    }

    pub fn sink(&self) -> Option<CompletionSink> {
        self.sink.clone()
    }

    /// Transfers start over from leg A, as on a fresh sampling-clock enable.
    pub fn reset_to_leg_a(&mut self) {
        self.active = BufferId::A;
    }

    /// Push one conversion result into the active leg's write target.
    ///
    /// When the push fills the buffer, the chained leg becomes the active
    /// target immediately (it was armed before this completion is serviced)
    /// and the completed leg's signal plus the sink to notify are returned.
    /// A push with no armed target is dropped and counted.
    pub fn push(&mut self, value: T) -> Option<(BufferId, CompletionSink)> {
        let legs = match &self.legs {
            Some(legs) => legs,
            None => {
                self.dropped += 1;
                return None;
            }
        };

        let id = self.active;
        match legs[id.index()].push(value) {
            PushOutcome::Stored => None,
            PushOutcome::NotArmed => {
                self.dropped += 1;
                None
            }
            PushOutcome::Filled => {
                self.pending[id.index()] = true;
                self.active = id.other();
                self.sink.clone().map(|sink| (id, sink))
            }
        }
    }

    /// Acknowledge `leg`'s completion signal and hand back its buffer so the
    /// caller can re-point the write target, with no push possible in
    /// between while the caller holds the unit lock.
    pub fn acknowledge(&mut self, leg: BufferId) -> Option<BufferHandle<T>> {
        self.pending[leg.index()] = false;
        self.legs.as_ref().map(|legs| Arc::clone(&legs[leg.index()]))
    }

    /// Samples that arrived with no armed write target.
    pub fn dropped_samples(&self) -> u64 {
        self.dropped
    }

    /// The write targets currently programmed into the legs.
    pub fn leg_targets(&self) -> Option<[BufferHandle<T>; 2]> {
        self.legs
            .as_ref()
            .map(|legs| [Arc::clone(&legs[0]), Arc::clone(&legs[1])])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adc_capture_core::CaptureBuffer;

    #[test]
    fn unarmed_targets_drop_samples() {
        let mut chain = TransferChain::<u8>::new();
        assert!(chain.push(1).is_none());
        assert_eq!(chain.dropped_samples(), 1);

        let a = CaptureBuffer::allocate(2);
        let b = CaptureBuffer::allocate(2);
        chain.set_legs(Arc::clone(&a), Arc::clone(&b));
        chain.push(2);
        assert_eq!(chain.dropped_samples(), 2);

        a.rearm();
        b.rearm();
        assert!(chain.push(3).is_none());
        // No sink registered: the swap still happens silently.
        assert!(chain.push(4).is_none());
        assert_eq!(a.snapshot(), vec![3, 4]);
        assert!(!a.is_armed());
        assert!(chain.push(5).is_none());
        assert_eq!(b.snapshot(), vec![5, 0]);
    }
}
