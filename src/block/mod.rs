/*
    DvFox

    Copyright 2024 Daniel Balsom

    Permission is hereby granted, free of charge, to any person obtaining a
    copy of this software and associated documentation files (the “Software”),
    to deal in the Software without restriction, including without limitation
    the rights to use, copy, modify, merge, publish, distribute, sublicense,
    and/or sell copies of the Software, and to permit persons to whom the
    Software is furnished to do so, subject to the following conditions:

    The above copyright notice and this permission notice shall be included in
    all copies or substantial portions of the Software.

    THE SOFTWARE IS PROVIDED “AS IS”, WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
    IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
    FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
    AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
    LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
    FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER
    DEALINGS IN THE SOFTWARE.

    --------------------------------------------------------------------------

    src/block/mod.rs

    DIF blocks. Every DIF block is 80 bytes: a three byte BlockId followed by
    a 77 byte payload whose layout depends on the block type.
*/
pub mod audio;
pub mod block_id;
pub mod header;
pub mod position;
pub mod subcode;
pub mod vaux;
pub mod video;

use crate::{
    block::{
        audio::Audio,
        block_id::{BlockId, BlockType},
        header::Header,
        position::BlockPosition,
        subcode::Subcode,
        vaux::Vaux,
        video::Video,
    },
    pack::{aaux_source::AudioQuantization, Pack, PackError},
    types::{enums::DvSystem, file_info::FileInfo},
    BLOCK_ID_SIZE,
    BLOCK_PAYLOAD_SIZE,
    BLOCK_SIZE,
    PACK_SIZE,
};
use thiserror::Error;

/// Errors raised while parsing, validating or serializing DIF blocks.
///
/// Structural errors describe bytes that break the fixed bit patterns of the format; these are
/// usually the result of tape dropouts. The remaining errors describe values that are outside the
/// legal range for the video system or block type.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum BlockError {
    #[error("DIF block data must be {expected} bytes, but got {actual} bytes.")]
    WrongSize { expected: usize, actual: usize },
    #[error("Reserved bits in DIF block identifier were unexpectedly cleared.")]
    ReservedBitsCleared,
    #[error("DIF block identifier has reserved section type {0}.")]
    ReservedBlockType(u8),
    #[error("DIF block ID for header or subcode block has unexpected non-0xF sequence number of {sequence:#X}.")]
    UnexpectedSequence { sequence: u8 },
    #[error("DIF block ID has {field} value of {value} that does not fit in its bit field.")]
    FieldOverflow { field: &'static str, value: u8 },
    #[error("DIF block ID has dif_sequence number {dif_sequence} too high for system {system}.")]
    DifSequenceTooHigh { dif_sequence: u8, system: DvSystem },
    #[error("DIF block ID has dif_block number {dif_block} too high for {block_type} block type.")]
    DifBlockTooHigh { dif_block: u8, block_type: BlockType },
    #[error("Expected a {expected} DIF block, but got a {found} DIF block.")]
    WrongBlockType { expected: BlockType, found: BlockType },
    #[error("Zero bit in DIF header block is unexpectedly not zero.")]
    HeaderZeroBit,
    #[error("Reserved bits in DIF {0} block are unexpectedly in use.")]
    ReservedBitsInUse(BlockType),
    #[error("Unexpected value {0:#X} in the track information area of the DIF header block.")]
    TrackInformation(u8),
    #[error("Transmitting flags for some DIF blocks are off in the DIF header block.")]
    TransmittingFlagsOff,
    #[error("DIF header block must specify sequence count of 10 or 12, not {0}.")]
    HeaderSequenceCount(u8),
    #[error("DIF header block does not match with expected system {0}.")]
    HeaderSystemMismatch(DvSystem),
    #[error("Track pitch and pilot frame must be both present or absent together.")]
    TrackPitchPilotFrame,
    #[error("DIF header block must specify a pilot frame of 0 or 1, not {0}.")]
    PilotFrame(u8),
    #[error("Unexpected number of DIF blocks in DIF sequence; expected {expected}.")]
    UnexpectedBlockCount { expected: u8 },
    #[error("Sync block parity byte is not 0xFF for sync block {0}.")]
    SyncBlockParity(u8),
    #[error("All parts of sync block {0} must be all present or absent.")]
    SyncBlockIdPartial(u8),
    #[error("Unexpected number of {field} values in DIF {block_type} block: expected {expected} but got {actual}.")]
    FieldCount {
        block_type: BlockType,
        field: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("Absolute track number byte 0 value {0:#X} does not fit in 7 bits.")]
    AbsoluteTrackNumber(u8),
    #[error("Audio error detection is not supported for {0} quantization.")]
    UnsupportedQuantization(AudioQuantization),
    #[error("DIF block payload could not be read or written: {0}")]
    Layout(String),
    #[error(transparent)]
    Pack(#[from] PackError),
}

impl From<binrw::Error> for BlockError {
    fn from(err: binrw::Error) -> Self {
        BlockError::Layout(err.to_string())
    }
}

/// Common interface of the five DIF block types.
///
/// Implementors provide payload decoding, payload encoding and validation; the provided methods
/// take care of the BlockId and of validating before any bytes are produced.
pub trait DifBlock: Sized {
    /// The block type that this implementation handles.
    const BLOCK_TYPE: BlockType;

    fn block_id(&self) -> &BlockId;

    /// Decode the 77 byte payload that follows an already parsed `BlockId`.
    fn parse_payload(block_id: BlockId, payload: &[u8], file_info: &FileInfo) -> Result<Self, BlockError>;

    /// Encode the payload into the provided 77 byte buffer. The block has already been validated.
    fn write_payload(&self, payload: &mut [u8], file_info: &FileInfo) -> Result<(), BlockError>;

    /// Check that the block could be written back to binary.
    fn validate(&self, file_info: &FileInfo) -> Result<(), BlockError>;

    /// Parse an 80 byte DIF block of this type.
    /// # Arguments
    /// * `bytes` - The complete DIF block, including the three byte BlockId.
    /// * `file_info` - The stream parameters used to validate the block.
    /// # Returns
    /// The parsed block, or an error if the block is malformed, invalid, or of another type.
    fn parse(bytes: &[u8], file_info: &FileInfo) -> Result<Self, BlockError> {
        check_block_size(bytes)?;
        let block_id = BlockId::parse(&bytes[..BLOCK_ID_SIZE], file_info)?;
        if block_id.block_type != Self::BLOCK_TYPE {
            return Err(BlockError::WrongBlockType {
                expected: Self::BLOCK_TYPE,
                found:    block_id.block_type,
            });
        }
        let block = Self::parse_payload(block_id, &bytes[BLOCK_ID_SIZE..], file_info)?;
        block.validate(file_info)?;
        Ok(block)
    }

    /// Validate the block and encode it to its 80 byte binary form.
    fn to_binary(&self, file_info: &FileInfo) -> Result<[u8; BLOCK_SIZE], BlockError> {
        self.validate(file_info)?;
        if self.block_id().block_type != Self::BLOCK_TYPE {
            return Err(BlockError::WrongBlockType {
                expected: Self::BLOCK_TYPE,
                found:    self.block_id().block_type,
            });
        }

        let mut bytes = [0xFF; BLOCK_SIZE];
        bytes[..BLOCK_ID_SIZE].copy_from_slice(&self.block_id().to_binary(file_info)?);
        self.write_payload(&mut bytes[BLOCK_ID_SIZE..], file_info)?;
        Ok(bytes)
    }
}

fn check_block_size(bytes: &[u8]) -> Result<(), BlockError> {
    if bytes.len() != BLOCK_SIZE {
        return Err(BlockError::WrongSize {
            expected: BLOCK_SIZE,
            actual:   bytes.len(),
        });
    }
    Ok(())
}

/// Check the length of a variable sized block field.
pub(crate) fn check_count(
    block_type: BlockType,
    field: &'static str,
    expected: usize,
    actual: usize,
) -> Result<(), BlockError> {
    if expected != actual {
        return Err(BlockError::FieldCount {
            block_type,
            field,
            expected,
            actual,
        });
    }
    Ok(())
}

/// A parsed DIF block of any type.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Block {
    Header(Header),
    Subcode(Subcode),
    Vaux(Vaux),
    Audio(Audio),
    Video(Video),
}

impl Block {
    /// Parse an 80 byte DIF block, choosing the block type from its BlockId.
    pub fn parse(bytes: &[u8], file_info: &FileInfo) -> Result<Block, BlockError> {
        check_block_size(bytes)?;
        let block_id = BlockId::parse(&bytes[..BLOCK_ID_SIZE], file_info)?;
        log::trace!("Block::parse(): {:?}", block_id);
        match block_id.block_type {
            BlockType::Header => Ok(Block::Header(Header::parse(bytes, file_info)?)),
            BlockType::Subcode => Ok(Block::Subcode(Subcode::parse(bytes, file_info)?)),
            BlockType::Vaux => Ok(Block::Vaux(Vaux::parse(bytes, file_info)?)),
            BlockType::Audio => Ok(Block::Audio(Audio::parse(bytes, file_info)?)),
            BlockType::Video => Ok(Block::Video(Video::parse(bytes, file_info)?)),
        }
    }

    /// Parse a DIF block that was read from a known position within a frame.
    ///
    /// Disagreement between the block's own identifier and the position it was read from is not
    /// treated as an error. Such blocks are common with tape damage and with stream variants we
    /// do not model; each mismatch is logged as a warning and the block is returned as parsed.
    pub fn parse_at(bytes: &[u8], position: &BlockPosition, file_info: &FileInfo) -> Result<Block, BlockError> {
        let block = Block::parse(bytes, file_info)?;
        for mismatch in position.check(block.block_id()) {
            log::warn!("Block::parse_at(): {}: {}", position, mismatch);
        }
        Ok(block)
    }

    /// Validate the block and encode it to its 80 byte binary form.
    pub fn to_binary(&self, file_info: &FileInfo) -> Result<[u8; BLOCK_SIZE], BlockError> {
        match self {
            Block::Header(block) => block.to_binary(file_info),
            Block::Subcode(block) => block.to_binary(file_info),
            Block::Vaux(block) => block.to_binary(file_info),
            Block::Audio(block) => block.to_binary(file_info),
            Block::Video(block) => block.to_binary(file_info),
        }
    }

    pub fn validate(&self, file_info: &FileInfo) -> Result<(), BlockError> {
        match self {
            Block::Header(block) => block.validate(file_info),
            Block::Subcode(block) => block.validate(file_info),
            Block::Vaux(block) => block.validate(file_info),
            Block::Audio(block) => block.validate(file_info),
            Block::Video(block) => block.validate(file_info),
        }
    }

    pub fn block_id(&self) -> &BlockId {
        match self {
            Block::Header(block) => block.block_id(),
            Block::Subcode(block) => block.block_id(),
            Block::Vaux(block) => block.block_id(),
            Block::Audio(block) => block.block_id(),
            Block::Video(block) => block.block_id(),
        }
    }

    /// Return the pack slots carried by this block. Header and video blocks carry none.
    pub fn pack_slots(&self) -> &[PackSlot] {
        match self {
            Block::Subcode(block) => &block.packs,
            Block::Vaux(block) => &block.packs,
            Block::Audio(block) => std::slice::from_ref(&block.pack),
            Block::Header(_) | Block::Video(_) => &[],
        }
    }

    /// Return a copy of this block with the pack slot at `slot` replaced. Returns `None` if the
    /// block has no such slot.
    pub fn with_pack_slot(&self, slot: usize, pack_slot: PackSlot) -> Option<Block> {
        let mut block = self.clone();
        match &mut block {
            Block::Subcode(b) => *b.packs.get_mut(slot)? = pack_slot,
            Block::Vaux(b) => *b.packs.get_mut(slot)? = pack_slot,
            Block::Audio(b) if slot == 0 => b.pack = pack_slot,
            _ => return None,
        }
        Some(block)
    }
}

/// A single pack position within a subcode, VAUX or audio block.
///
/// The pack type byte is always kept, even when the pack could not be decoded, so that callers
/// can tell which kind of pack was lost. A slot without a pack is written out as a NO INFO pack.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PackSlot {
    pub pack_type: u8,
    pub pack: Option<Pack>,
}

impl Default for PackSlot {
    fn default() -> Self {
        PackSlot::empty()
    }
}

impl From<Pack> for PackSlot {
    fn from(pack: Pack) -> Self {
        PackSlot::new(pack)
    }
}

impl PackSlot {
    pub fn new(pack: Pack) -> PackSlot {
        PackSlot {
            pack_type: pack.type_byte(),
            pack: Some(pack),
        }
    }

    /// A slot holding no pack at all.
    pub fn empty() -> PackSlot {
        PackSlot {
            pack_type: Pack::NoInfo.type_byte(),
            pack: None,
        }
    }

    /// Decode a pack slot. Packs that fail to decode or validate are dropped, keeping only their
    /// type byte.
    pub(crate) fn parse(bytes: &[u8], system: DvSystem) -> PackSlot {
        let pack_type = bytes[0];
        match Pack::parse(bytes, system) {
            Ok(pack) => PackSlot {
                pack_type,
                pack: Some(pack),
            },
            Err(e) => {
                log::debug!("PackSlot::parse(): dropping pack {:#04X}: {}", pack_type, e);
                PackSlot { pack_type, pack: None }
            }
        }
    }

    pub(crate) fn to_binary(&self, system: DvSystem) -> Result<[u8; PACK_SIZE], PackError> {
        match &self.pack {
            Some(pack) => pack.to_binary(system),
            None => Pack::NoInfo.to_binary(system),
        }
    }
}

/// Parse a run of consecutive pack slots from a payload.
pub(crate) fn parse_pack_slots(bytes: &[u8], system: DvSystem) -> Vec<PackSlot> {
    bytes
        .chunks_exact(PACK_SIZE)
        .map(|chunk| PackSlot::parse(chunk, system))
        .collect()
}

/// Write pack slots consecutively into a payload buffer.
pub(crate) fn write_pack_slots(slots: &[PackSlot], out: &mut [u8], system: DvSystem) -> Result<(), BlockError> {
    for (slot, chunk) in slots.iter().zip(out.chunks_exact_mut(PACK_SIZE)) {
        chunk.copy_from_slice(&slot.to_binary(system)?);
    }
    Ok(())
}

// Payload size is fixed by the format; every block type lays out exactly this many bytes.
const _: () = assert!(BLOCK_PAYLOAD_SIZE == 77);
