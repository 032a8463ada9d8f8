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

    src/block/block_id.rs

    The three byte identifier at the start of every DIF block.

    Byte 0: SCT(3) | 1 | Seq(4)
    Byte 1: Dseq(4) | FSC(1) | 1 1 1
    Byte 2: DBN(8)
*/
use crate::{block::BlockError, types::file_info::FileInfo, BLOCK_ID_SIZE};
use std::{
    fmt,
    fmt::{Display, Formatter},
};

const RESERVED_BITS_0: u8 = 0b0001_0000;
const RESERVED_BITS_1: u8 = 0b0000_0111;

/// The section type of a DIF block.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, strum::EnumIter, strum::FromRepr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BlockType {
    Header = 0,
    Subcode = 1,
    Vaux = 2,
    Audio = 3,
    Video = 4,
}

impl BlockType {
    /// Return the number of blocks of this type in a single DIF sequence.
    pub fn count_per_sequence(&self) -> u8 {
        match self {
            BlockType::Header => 1,
            BlockType::Subcode => 2,
            BlockType::Vaux => 3,
            BlockType::Audio => 9,
            BlockType::Video => 135,
        }
    }

    /// Return the highest DIF block number allowed for this type.
    pub fn max_dif_block(&self) -> u8 {
        self.count_per_sequence() - 1
    }
}

impl Display for BlockType {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            BlockType::Header => write!(f, "HEADER"),
            BlockType::Subcode => write!(f, "SUBCODE"),
            BlockType::Vaux => write!(f, "VAUX"),
            BlockType::Audio => write!(f, "AUDIO"),
            BlockType::Video => write!(f, "VIDEO"),
        }
    }
}

/// The identifier of a DIF block: its type and its position within a video frame.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlockId {
    pub block_type: BlockType,
    /// Sequence number, which increments for each frame. Always 0xF for header and subcode blocks.
    pub sequence: u8,
    /// FSC bit: the channel of a 50 Mbps stream.
    pub channel: u8,
    /// The DIF sequence (tape track) number within the channel.
    pub dif_sequence: u8,
    /// The DIF block number, counted separately for each block type.
    pub dif_block: u8,
}

impl BlockId {
    /// Parse a `BlockId` from the first three bytes of a DIF block, and validate it.
    pub fn parse(bytes: &[u8], file_info: &FileInfo) -> Result<BlockId, BlockError> {
        if bytes.len() < BLOCK_ID_SIZE {
            return Err(BlockError::WrongSize {
                expected: BLOCK_ID_SIZE,
                actual:   bytes.len(),
            });
        }

        if bytes[0] & RESERVED_BITS_0 == 0 || bytes[1] & RESERVED_BITS_1 != RESERVED_BITS_1 {
            return Err(BlockError::ReservedBitsCleared);
        }

        let sct = bytes[0] >> 5;
        let block_type = BlockType::from_repr(sct).ok_or(BlockError::ReservedBlockType(sct))?;

        let block_id = BlockId {
            block_type,
            sequence: bytes[0] & 0x0F,
            channel: (bytes[1] >> 3) & 0x01,
            dif_sequence: bytes[1] >> 4,
            dif_block: bytes[2],
        };

        block_id.validate(file_info)?;
        Ok(block_id)
    }

    /// Check the identifier against the numeric limits of the video system and block type.
    pub fn validate(&self, file_info: &FileInfo) -> Result<(), BlockError> {
        if matches!(self.block_type, BlockType::Header | BlockType::Subcode) && self.sequence != 0xF {
            return Err(BlockError::UnexpectedSequence { sequence: self.sequence });
        }
        if self.sequence > 0xF {
            return Err(BlockError::FieldOverflow {
                field: "sequence",
                value: self.sequence,
            });
        }
        if self.channel > 1 {
            return Err(BlockError::FieldOverflow {
                field: "channel",
                value: self.channel,
            });
        }
        if self.dif_sequence >= file_info.dif_sequence_count() {
            return Err(BlockError::DifSequenceTooHigh {
                dif_sequence: self.dif_sequence,
                system: file_info.system,
            });
        }
        if self.dif_block > self.block_type.max_dif_block() {
            return Err(BlockError::DifBlockTooHigh {
                dif_block:  self.dif_block,
                block_type: self.block_type,
            });
        }
        Ok(())
    }

    /// Validate the identifier and encode it to its three byte binary form.
    pub fn to_binary(&self, file_info: &FileInfo) -> Result<[u8; BLOCK_ID_SIZE], BlockError> {
        self.validate(file_info)?;
        Ok([
            (self.block_type as u8) << 5 | RESERVED_BITS_0 | self.sequence,
            self.dif_sequence << 4 | self.channel << 3 | RESERVED_BITS_1,
            self.dif_block,
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::enums::DvSystem;

    fn ntsc() -> FileInfo {
        FileInfo::new(DvSystem::Sys525_60, 1)
    }

    fn pal() -> FileInfo {
        FileInfo::new(DvSystem::Sys625_50, 1)
    }

    #[test]
    fn parse_header_id() {
        let id = BlockId::parse(&[0x1F, 0x07, 0x00], &ntsc()).unwrap();
        assert_eq!(id.block_type, BlockType::Header);
        assert_eq!(id.sequence, 0xF);
        assert_eq!(id.channel, 0);
        assert_eq!(id.dif_sequence, 0);
        assert_eq!(id.dif_block, 0);
        assert_eq!(id.to_binary(&ntsc()).unwrap(), [0x1F, 0x07, 0x00]);
    }

    #[test]
    fn parse_video_id_with_channel() {
        let id = BlockId::parse(&[0x96, 0x9F, 0x86], &pal()).unwrap();
        assert_eq!(id.block_type, BlockType::Video);
        assert_eq!(id.sequence, 0x6);
        assert_eq!(id.channel, 1);
        assert_eq!(id.dif_sequence, 9);
        assert_eq!(id.dif_block, 0x86);
        assert_eq!(id.to_binary(&pal()).unwrap(), [0x96, 0x9F, 0x86]);
    }

    #[test]
    fn cleared_reserved_bits_are_rejected() {
        assert_eq!(
            BlockId::parse(&[0x00, 0x00, 0x00], &ntsc()),
            Err(BlockError::ReservedBitsCleared)
        );
        assert_eq!(
            BlockId::parse(&[0x1F, 0x03, 0x00], &ntsc()),
            Err(BlockError::ReservedBitsCleared)
        );
    }

    #[test]
    fn reserved_section_type_is_rejected() {
        assert_eq!(
            BlockId::parse(&[0xBF, 0x07, 0x00], &ntsc()),
            Err(BlockError::ReservedBlockType(5))
        );
    }

    #[test]
    fn dif_block_too_high_for_vaux() {
        let err = BlockId::parse(&[0x50, 0x07, 0x03], &ntsc()).unwrap_err();
        assert_eq!(
            err,
            BlockError::DifBlockTooHigh {
                dif_block:  3,
                block_type: BlockType::Vaux,
            }
        );
        assert!(err.to_string().contains("dif_block number 3 too high for VAUX"));
    }

    #[test]
    fn header_sequence_must_be_all_ones() {
        let err = BlockId::parse(&[0x1A, 0x07, 0x00], &ntsc()).unwrap_err();
        assert_eq!(err, BlockError::UnexpectedSequence { sequence: 0xA });
        assert!(err.to_string().contains("0xA"));
    }

    #[test]
    fn dif_sequence_limits_follow_system() {
        let id = BlockId {
            block_type: BlockType::Audio,
            sequence: 0,
            channel: 0,
            dif_sequence: 10,
            dif_block: 0,
        };
        assert!(id.to_binary(&pal()).is_ok());
        let err = id.to_binary(&ntsc()).unwrap_err();
        assert!(err.to_string().contains("dif_sequence number 10 too high for system SYS_525_60"));

        let id = BlockId { dif_sequence: 12, ..id };
        assert!(id.to_binary(&ntsc()).is_err());
        assert!(id.to_binary(&pal()).is_err());
    }

    #[test]
    fn channel_must_fit_in_one_bit() {
        let id = BlockId {
            block_type: BlockType::Video,
            sequence: 0,
            channel: 2,
            dif_sequence: 0,
            dif_block: 0,
        };
        assert!(matches!(
            id.to_binary(&ntsc()),
            Err(BlockError::FieldOverflow { field: "channel", .. })
        ));
    }
}
