//! # adc-capture-sim
//!
//! Software sampling-unit back-ends for `adc-capture-core`.
//!
//! Provides:
//! - `ManualAdc` — hand-cranked unit; conversions are fed by the caller and
//!   completions fire synchronously, for deterministic tests
//! - `FreeRunningAdc` — threaded unit emulating a free-running conversion
//!   clock driven by a synthetic [`SignalSource`]
//! - `signal` — waveform sources (constant, ramp, sine)
//!
//! ## Usage
//! ```ignore
//! use adc_capture_core::{AdcSampler, CaptureConfig, ChannelSet};
//! use adc_capture_sim::{signal::Ramp, FreeRunningAdc};
//!
//! let adc = Arc::new(FreeRunningAdc::<u8, _>::new(Ramp::new(0.001), 48_000));
//! let config = CaptureConfig::new(ChannelSet::new([0, 1])?).with_depth(1_000);
//! let mut sampler = AdcSampler::new(adc, config)?;
//! ```

pub mod free_running;
pub mod manual;
pub mod signal;

mod transfer;

pub use free_running::FreeRunningAdc;
pub use manual::ManualAdc;
pub use signal::{Constant, FromLevel, Ramp, SignalSource, Sine};

/// Addressable input channels on the simulated unit's multiplexer.
pub const SIM_CHANNEL_CAPACITY: u8 = 5;
