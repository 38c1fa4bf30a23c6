use serde::{Deserialize, Serialize};

/// Storage width of a single sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleWidth {
    /// One byte per sample.
    Narrow,
    /// Two bytes per sample.
    Wide,
}

impl SampleWidth {
    /// Size of one sample in bytes, which is also the transfer unit size a
    /// backend programs into its transfer engine.
    pub fn bytes_per_sample(self) -> usize {
        match self {
            Self::Narrow => 1,
            Self::Wide => 2,
        }
    }
}

/// Sample element type a sampling unit can transfer.
///
/// Implemented for `u8` (narrow) and `u16` (wide). The width is fixed by the
/// chosen type for the lifetime of an engine instance; backends derive their
/// per-unit transfer size, and any data-format flag tied to it, from
/// [`Sample::WIDTH`] rather than re-deriving sample precision here.
pub trait Sample: Copy + Default + Send + Sync + 'static {
    /// Storage width of this sample type.
    const WIDTH: SampleWidth;
}

impl Sample for u8 {
    const WIDTH: SampleWidth = SampleWidth::Narrow;
}

impl Sample for u16 {
    const WIDTH: SampleWidth = SampleWidth::Wide;
}

/// Identity of one of the two capture buffers and its transfer leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferId {
    A,
    B,
}

impl BufferId {
    /// The other buffer of the pair.
    pub fn other(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }

    /// Index into a `[_; 2]` leg array.
    pub fn index(self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
        }
    }
}
