use std::sync::Arc;

use crate::models::sample::BufferId;

/// Callback invoked when a capture buffer completes.
///
/// Receives the completed buffer's identity and a read-only view of its
/// samples. The view is only guaranteed stable for one full fill cycle of
/// the other buffer; a long-running observer must copy the data out before
/// returning or risk the next completion overwriting what it is reading.
///
/// Runs in interrupt-equivalent context: it must not block, allocate, or
/// re-enter the engine's `start`/`stop`.
pub type CompletionCallback<T> = Arc<dyn Fn(BufferId, &[T]) + Send + Sync + 'static>;
