pub mod observer;
pub mod sampling_unit;
