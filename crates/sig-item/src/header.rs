//! The 4-byte item header `(type, info1, info2, len)` (spec.md §6).

/// Known item types the core distinguishes. Anything else round-trips as
/// `Other`, matching "unknown types are passed through to the output buffer
/// unchanged" (spec.md §4.11).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemType {
    /// Per-frame acoustic parameters.
    FramePar,
    /// A control command; `info1` selects the sub-command.
    Cmd,
    /// Sentence/utterance boundary marker.
    Bound,
    /// Flush request.
    Flush,
    /// Synthesised PCM output.
    Frame,
    /// Any other byte value, passed through verbatim.
    Other(u8),
}

impl ItemType {
    /// Wire encoding for each known type (arbitrary but stable values
    /// distinct from each other and from 0).
    pub const FRAME_PAR: u8 = 1;
    /// See [`Self::FRAME_PAR`].
    pub const CMD: u8 = 2;
    /// See [`Self::FRAME_PAR`].
    pub const BOUND: u8 = 3;
    /// See [`Self::FRAME_PAR`].
    pub const FLUSH: u8 = 4;
    /// See [`Self::FRAME_PAR`].
    pub const FRAME: u8 = 5;

    /// Decode a wire byte into a type tag.
    pub fn from_byte(b: u8) -> ItemType {
        match b {
            Self::FRAME_PAR => ItemType::FramePar,
            Self::CMD => ItemType::Cmd,
            Self::BOUND => ItemType::Bound,
            Self::FLUSH => ItemType::Flush,
            Self::FRAME => ItemType::Frame,
            other => ItemType::Other(other),
        }
    }

    /// Encode back to the wire byte.
    pub fn to_byte(self) -> u8 {
        match self {
            ItemType::FramePar => Self::FRAME_PAR,
            ItemType::Cmd => Self::CMD,
            ItemType::Bound => Self::BOUND,
            ItemType::Flush => Self::FLUSH,
            ItemType::Frame => Self::FRAME,
            ItemType::Other(b) => b,
        }
    }
}

/// Sub-command tags carried in `info1` when [`ItemType::Cmd`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum CmdKind {
    Play,
    Save,
    Unsave,
    Pitch,
    Volume,
    Speaker,
    Other(u8),
}

impl CmdKind {
    /// Decode `info1` of a [`ItemType::Cmd`] item.
    pub fn from_byte(b: u8) -> CmdKind {
        match b {
            1 => CmdKind::Play,
            3 => CmdKind::Save,
            4 => CmdKind::Unsave,
            6 => CmdKind::Pitch,
            7 => CmdKind::Volume,
            8 => CmdKind::Speaker,
            other => CmdKind::Other(other),
        }
    }
}

/// A decoded item header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemHeader {
    /// Item type tag.
    pub item_type: ItemType,
    /// First info byte (sub-command or destination tag, depending on type).
    pub info1: u8,
    /// Second info byte (destination tag or modifier mode byte).
    pub info2: u8,
    /// Payload length in bytes, `0..=255`.
    pub len: u8,
}

/// Size in bytes of an encoded header.
pub const HEADER_LEN: usize = 4;

impl ItemHeader {
    /// Build a header for `item_type` with a payload of `len` bytes.
    pub fn new(item_type: ItemType, info1: u8, info2: u8, len: u8) -> Self {
        ItemHeader {
            item_type,
            info1,
            info2,
            len,
        }
    }

    /// Decode a header from its 4 wire bytes.
    pub fn decode(bytes: [u8; HEADER_LEN]) -> Self {
        ItemHeader {
            item_type: ItemType::from_byte(bytes[0]),
            info1: bytes[1],
            info2: bytes[2],
            len: bytes[3],
        }
    }

    /// Encode to the 4 wire bytes.
    pub fn encode(self) -> [u8; HEADER_LEN] {
        [self.item_type.to_byte(), self.info1, self.info2, self.len]
    }
}
