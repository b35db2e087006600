//! State-machine types for the signal PU (C10, spec.md §4.10, §5).

/// The nine per-frame synthesis stages, advanced one variant per [`crate::SignalPu::step`]
/// call while a frame is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InnerState {
    /// Snapshot voicing transition bookkeeping for this frame.
    ShiftHistory,
    /// Pull the oldest buffered frame's scalars into scratch state.
    LoadNewFrame,
    /// C4: mel-cepstrum to warped linear envelope.
    EnvWarp,
    /// C5: phase reconstruction.
    Phase,
    /// C6: envelope + phase to complex half-spectrum.
    EnvSpec,
    /// C6: inverse transform to a normalised impulse response.
    ImpulseResponse,
    /// C7 + C8: excitation placement and PSOLA synthesis.
    Psola,
    /// C9: overlap-add into the running waveform buffer.
    OverlapAdd,
    /// Slice two `FRAME` items out of the waveform buffer and emit them.
    Emit,
}

impl InnerState {
    /// The stage that follows this one in the fixed sequence.
    pub fn next(self) -> Option<InnerState> {
        use InnerState::*;
        match self {
            ShiftHistory => Some(LoadNewFrame),
            LoadNewFrame => Some(EnvWarp),
            EnvWarp => Some(Phase),
            Phase => Some(EnvSpec),
            EnvSpec => Some(ImpulseResponse),
            ImpulseResponse => Some(Psola),
            Psola => Some(OverlapAdd),
            OverlapAdd => Some(Emit),
            Emit => None,
        }
    }
}

/// The outer scheduler states (spec.md §9's state-machine mapping guidance).
/// Tracked for diagnostics; `step`'s control flow is the actual source of
/// truth for what happens next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OuterState {
    /// Waiting for / reading the next input item.
    Collect,
    /// Deciding whether the item starts frame synthesis, a side command, or
    /// a pass-through.
    Schedule,
    /// Streaming PCM from an open `PLAY` source.
    Play,
    /// Mid-way through the nine inner synthesis states.
    Process,
    /// Writing completed `FRAME` items to the output transport.
    Feed,
}

/// Result of one [`crate::SignalPu::step`] call (spec.md §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepResult {
    /// No input available; nothing to do.
    Idle,
    /// Work is pending; call `step` again.
    Busy,
    /// One inner transition completed cleanly.
    Atomic,
    /// The output transport has no room for the next item.
    OutFull,
    /// An unrecoverable error occurred.
    Error,
}

/// Reset modes (spec.md §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetMode {
    /// Regenerate tables, zero all state, restore default modifiers.
    Full,
    /// Reset only the state-machine cursors.
    Soft,
}
