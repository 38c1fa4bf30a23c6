//! # adc-capture-core
//!
//! Platform-agnostic double-buffered ADC capture core.
//!
//! Two fixed-size buffers are filled alternately by a sampling unit's
//! chained transfer legs. At each buffer-full boundary the drained leg is
//! re-armed while the other buffer is already filling, and a registered
//! observer is handed a contiguous block of samples — the producer never
//! stalls and no sample window is lost between buffers.
//!
//! Hardware back-ends (and the software units in `adc-capture-sim`)
//! implement the `SamplingUnit` trait and plug into the generic
//! `DoubleBufferEngine` behind the `AdcSampler` facade.
//!
//! ## Architecture
//!
//! ```text
//! adc-capture-core (this crate)
//! ├── traits/   ← SamplingUnit, CompletionSink, CompletionCallback
//! ├── models/   ← CaptureError, EngineState, CaptureConfig, ChannelSet, Sample
//! ├── engine/   ← CaptureBuffer, CompletionDispatcher, DoubleBufferEngine
//! └── session/  ← AdcSampler (facade)
//! ```

pub mod engine;
pub mod models;
pub mod session;
pub mod traits;

// Re-export key types at crate root for convenience.
pub use engine::buffer::{BufferHandle, CaptureBuffer, PushOutcome};
pub use engine::dispatcher::CompletionDispatcher;
pub use engine::double_buffer::DoubleBufferEngine;
pub use models::channel::{ChannelId, ChannelSet};
pub use models::config::{CaptureConfig, DEFAULT_CAPTURE_DEPTH};
pub use models::diagnostics::CaptureDiagnostics;
pub use models::error::CaptureError;
pub use models::sample::{BufferId, Sample, SampleWidth};
pub use models::state::EngineState;
pub use session::sampler::AdcSampler;
pub use traits::observer::CompletionCallback;
pub use traits::sampling_unit::{CompletionSink, SamplingUnit};
