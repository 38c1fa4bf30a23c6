use std::sync::Arc;

use crate::engine::buffer::BufferHandle;
use crate::models::channel::ChannelSet;
use crate::models::error::CaptureError;
use crate::models::sample::{BufferId, Sample};

/// Sink invoked by a sampling unit when a transfer leg fills its buffer.
///
/// Fires in the unit's completion context (interrupt-equivalent). The
/// installed handler re-arms the completed leg and dispatches to the
/// observer before returning; the unit must not re-trigger that leg until
/// the sink has returned.
pub type CompletionSink = Arc<dyn Fn(BufferId) + Send + Sync + 'static>;

/// Capability set of a sampling unit and its transfer engine.
///
/// Implemented by hardware back-ends and by the software units in
/// `adc-capture-sim`. Methods take `&self`: a unit is interior-mutable the
/// way a register file is, and `rearm_leg` must be callable from completion
/// context where no exclusive borrow exists.
///
/// The unit owns no buffers. It is handed [`BufferHandle`]s at chain time
/// and writes through them; the engine keeps its own handles, so a transfer
/// that outlives an engine can never touch freed memory.
pub trait SamplingUnit<T: Sample>: Send + Sync {
    /// Number of addressable input channels.
    fn channel_capacity(&self) -> u8;

    /// Program round-robin scanning over `channels` with a transfer request
    /// raised after every completed conversion.
    ///
    /// Fails with [`CaptureError::Configuration`] for an empty set, a zero
    /// depth, or a channel id beyond [`channel_capacity`](Self::channel_capacity).
    /// Allocates no buffers.
    fn configure(&self, channels: &ChannelSet, depth: usize) -> Result<(), CaptureError>;

    /// Claim two transfer legs with independent completion signals and chain
    /// them in a loop: leg A's completion re-triggers leg B and vice versa,
    /// so the next write target is armed before the current completion is
    /// even serviced.
    ///
    /// Fails with [`CaptureError::ResourceExhaustion`] when fewer than two
    /// legs are free.
    fn chain_legs(
        &self,
        leg_a: BufferHandle<T>,
        leg_b: BufferHandle<T>,
    ) -> Result<(), CaptureError>;

    /// Install the downstream completion sink. Exactly one sink is held;
    /// replacing it discards the previous one (last writer wins).
    fn register_completion_sink(&self, sink: CompletionSink);

    /// Start the free-running sampling clock, with leg A's transfer armed
    /// first. Idempotent.
    fn start_sampling(&self) -> Result<(), CaptureError>;

    /// Halt the sampling clock. Idempotent. After this returns, no further
    /// completion sink invocation will occur; teardown relies on this.
    fn stop_sampling(&self) -> Result<(), CaptureError>;

    /// Re-point `leg`'s write target back at its own buffer and acknowledge
    /// its completion signal, together, with no intervening automatic
    /// re-trigger. Callable from completion context.
    fn rearm_leg(&self, leg: BufferId);
}
