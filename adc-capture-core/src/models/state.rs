/// Engine lifecycle state machine.
///
/// State transitions:
/// ```text
/// idle → armed → running ⇄ stopped
///          ↓        ↓         ↓
///          └──→ torn down ←───┘
/// ```
///
/// `TornDown` is terminal: the transfer machinery is quiesced and no further
/// observer invocation can occur.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Constructed but not yet configured.
    Idle,
    /// Buffers allocated and transfer legs chained; not yet running.
    Armed,
    /// Sampling clock active; buffers filling.
    Running,
    /// Clock halted, buffers frozen; restartable without reallocation.
    Stopped,
    /// Terminal; resources released.
    TornDown,
}

impl EngineState {
    pub fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }

    pub fn is_restartable(self) -> bool {
        matches!(self, Self::Armed | Self::Stopped)
    }

    pub fn is_torn_down(self) -> bool {
        matches!(self, Self::TornDown)
    }
}
