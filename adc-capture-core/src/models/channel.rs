use serde::{Deserialize, Serialize};

use super::error::CaptureError;

/// A single analog input channel identifier.
pub type ChannelId = u8;

/// Ordered set of channels scanned round-robin by the sampling unit.
///
/// Non-empty and duplicate-free by construction; the scan order is the order
/// given at construction. Changing the set requires a full reconfigure
/// (stop, rebuild the engine, start).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ChannelId>", into = "Vec<ChannelId>")]
pub struct ChannelSet {
    channels: Vec<ChannelId>,
}

impl ChannelSet {
    /// Build a channel set, rejecting empty or duplicated input.
    pub fn new(channels: impl Into<Vec<ChannelId>>) -> Result<Self, CaptureError> {
        let channels = channels.into();
        if channels.is_empty() {
            return Err(CaptureError::Configuration("channel set is empty".into()));
        }
        for (i, ch) in channels.iter().enumerate() {
            if channels[..i].contains(ch) {
                return Err(CaptureError::Configuration(format!(
                    "duplicate channel {ch}"
                )));
            }
        }
        Ok(Self { channels })
    }

    /// Channels in scan order.
    pub fn iter(&self) -> impl Iterator<Item = ChannelId> + '_ {
        self.channels.iter().copied()
    }

    /// Number of channels in the scan cycle.
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// Always `false`; the set is non-empty by construction.
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Hardware round-robin selection mask, one bit per channel id.
    ///
    /// Ids outside the mask range contribute no bit; backends reject them in
    /// `configure` before the mask is consulted.
    pub fn mask(&self) -> u32 {
        self.channels
            .iter()
            .fold(0, |m, &ch| m | 1u32.checked_shl(u32::from(ch)).unwrap_or(0))
    }
}

impl TryFrom<Vec<ChannelId>> for ChannelSet {
    type Error = CaptureError;

    fn try_from(channels: Vec<ChannelId>) -> Result<Self, Self::Error> {
        Self::new(channels)
    }
}

impl From<ChannelSet> for Vec<ChannelId> {
    fn from(set: ChannelSet) -> Self {
        set.channels
    }
}
