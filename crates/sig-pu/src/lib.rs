//! The signal processing unit: the top-level state machine that consumes
//! `FRAME_PAR`/`CMD`/pass-through items on one transport and emits `FRAME`
//! items on another, driving the `sig-synth` stages frame by frame.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod commands;
pub mod error;
pub mod play;
pub mod pu;
pub mod state;

pub use error::{PuError, Result};
pub use pu::SignalPu;
pub use state::{InnerState, OuterState, ResetMode, StepResult};
