//! Ring-item transport: the 4-byte item header codec and the
//! single-writer/single-reader byte ring buffer stages hand frames and
//! commands through.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod header;
pub mod ring;

pub use error::{ItemError, Result};
pub use header::{CmdKind, ItemHeader, ItemType, HEADER_LEN};
pub use ring::RingBuf;
