use serde::{Deserialize, Serialize};

use super::channel::ChannelSet;

/// Capture depth used when none is given.
pub const DEFAULT_CAPTURE_DEPTH: usize = 10_000;

/// Configuration for a double-buffered capture session.
///
/// The sample width is not part of the runtime configuration: it is fixed by
/// the engine's [`Sample`](super::sample::Sample) type parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Channels scanned in round-robin order.
    pub channels: ChannelSet,

    /// Samples per capture buffer. A completion fires every `depth` samples.
    #[serde(default = "default_depth")]
    pub depth: usize,
}

fn default_depth() -> usize {
    DEFAULT_CAPTURE_DEPTH
}

impl CaptureConfig {
    /// Configuration with the default capture depth.
    pub fn new(channels: ChannelSet) -> Self {
        Self {
            channels,
            depth: DEFAULT_CAPTURE_DEPTH,
        }
    }

    /// Override the per-buffer sample count.
    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    /// Validate depth and channel set.
    ///
    /// Depth 1 is legal (a swap on every single sample); depth 0 is not.
    pub fn validate(&self) -> Result<(), String> {
        if self.depth == 0 {
            return Err("capture depth must be at least 1".into());
        }
        if self.channels.is_empty() {
            return Err("channel set is empty".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_depth() {
        let config = CaptureConfig::new(ChannelSet::new([0]).unwrap()).with_depth(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn depth_one_is_legal() {
        let config = CaptureConfig::new(ChannelSet::new([0]).unwrap()).with_depth(1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn deserializes_with_default_depth() {
        let config: CaptureConfig = serde_json::from_str(r#"{"channels": [0, 1]}"#).unwrap();
        assert_eq!(config.depth, DEFAULT_CAPTURE_DEPTH);
        assert_eq!(config.channels.iter().collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn deserialization_rejects_duplicate_channels() {
        let parsed: Result<CaptureConfig, _> =
            serde_json::from_str(r#"{"channels": [3, 3], "depth": 16}"#);
        assert!(parsed.is_err());
    }
}
