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

    src/block/position.rs

    The fixed order in which DIF blocks are transmitted within a frame, and
    checks of a block's own identifier against where it was actually found.
*/
use crate::{
    block::block_id::{BlockId, BlockType},
    types::file_info::FileInfo,
    BLOCK_SIZE,
};
use std::{
    fmt,
    fmt::{Display, Formatter},
};

/// The number of DIF blocks in a single DIF sequence.
pub const BLOCKS_PER_DIF_SEQUENCE: usize = 150;

/// Number of blocks before the first audio block: one header, two subcode and three VAUX.
const LEADING_BLOCKS: usize = 6;
/// Each audio block is followed by 15 video blocks.
const AUDIO_VIDEO_GROUP: usize = 16;
const VIDEO_PER_GROUP: usize = 15;

/// Return the type of the block transmitted at `index` within a DIF sequence, or `None` if the
/// index is past the end of the sequence.
pub fn block_type_at(index: usize) -> Option<BlockType> {
    match index {
        0 => Some(BlockType::Header),
        1..=2 => Some(BlockType::Subcode),
        3..=5 => Some(BlockType::Vaux),
        i if i < BLOCKS_PER_DIF_SEQUENCE => match (i - LEADING_BLOCKS) % AUDIO_VIDEO_GROUP {
            0 => Some(BlockType::Audio),
            _ => Some(BlockType::Video),
        },
        _ => None,
    }
}

/// Return the type-relative DIF block number of the block transmitted at `index` within a DIF
/// sequence, or `None` if the index is past the end of the sequence.
pub fn dif_block_number_at(index: usize) -> Option<u8> {
    let number = match block_type_at(index)? {
        BlockType::Header => 0,
        BlockType::Subcode => index - 1,
        BlockType::Vaux => index - 3,
        BlockType::Audio => (index - LEADING_BLOCKS) / AUDIO_VIDEO_GROUP,
        BlockType::Video => {
            let group = (index - LEADING_BLOCKS) / AUDIO_VIDEO_GROUP;
            let offset = (index - LEADING_BLOCKS) % AUDIO_VIDEO_GROUP;
            group * VIDEO_PER_GROUP + offset - 1
        }
    };
    Some(number as u8)
}

/// One way in which a block's identifier disagrees with the place it was read from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PositionMismatch {
    BlockType { expected: BlockType, found: BlockType },
    Channel { expected: u8, found: u8 },
    DifSequence { expected: u8, found: u8 },
    DifBlock { expected: u8, found: u8 },
}

impl Display for PositionMismatch {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            PositionMismatch::BlockType { expected, found } => write!(
                f,
                "DIF block has an unexpected type: expected {} but got {}.",
                expected, found
            ),
            PositionMismatch::Channel { expected, found } => write!(
                f,
                "DIF block has an unexpected DIF channel number: expected {} but got {}.",
                expected, found
            ),
            PositionMismatch::DifSequence { expected, found } => write!(
                f,
                "DIF block has an unexpected DIF sequence number: expected {} but got {}.",
                expected, found
            ),
            PositionMismatch::DifBlock { expected, found } => write!(
                f,
                "DIF block has an unexpected DIF block number: expected {} but got {}.",
                expected, found
            ),
        }
    }
}

/// The location of a DIF block within a video frame.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BlockPosition {
    pub channel: u8,
    pub dif_sequence: u8,
    /// Index of the block within its DIF sequence, in transmission order.
    pub index: usize,
}

impl Display for BlockPosition {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(
            f,
            "[channel: {} dif_sequence: {} block: {}]",
            self.channel, self.dif_sequence, self.index
        )
    }
}

impl BlockPosition {
    pub fn new(channel: u8, dif_sequence: u8, index: usize) -> Self {
        Self {
            channel,
            dif_sequence,
            index,
        }
    }

    /// Return the position of the `block_number`th block of a frame, counting from the start of
    /// the frame. Returns `None` if the frame does not have that many blocks.
    pub fn from_frame_block(block_number: usize, file_info: &FileInfo) -> Option<BlockPosition> {
        let sequence_count = file_info.dif_sequence_count() as usize;
        let channel = block_number / (sequence_count * BLOCKS_PER_DIF_SEQUENCE);
        if channel >= file_info.channel_count as usize {
            return None;
        }
        Some(BlockPosition {
            channel: channel as u8,
            dif_sequence: ((block_number / BLOCKS_PER_DIF_SEQUENCE) % sequence_count) as u8,
            index: block_number % BLOCKS_PER_DIF_SEQUENCE,
        })
    }

    /// Return the block number of this position counting from the start of the frame.
    pub fn frame_block(&self, file_info: &FileInfo) -> usize {
        let sequence_count = file_info.dif_sequence_count() as usize;
        (self.channel as usize * sequence_count + self.dif_sequence as usize) * BLOCKS_PER_DIF_SEQUENCE + self.index
    }

    /// Return the byte offset of this position from the start of the frame.
    pub fn frame_offset(&self, file_info: &FileInfo) -> usize {
        self.frame_block(file_info) * BLOCK_SIZE
    }

    /// Return the identifier that a block transmitted at this position is expected to carry. The
    /// sequence number is not determined by position; header and subcode blocks use 0xF and all
    /// other blocks use the supplied `sequence`.
    pub fn expected_block_id(&self, sequence: u8) -> Option<BlockId> {
        let block_type = block_type_at(self.index)?;
        Some(BlockId {
            block_type,
            sequence: match block_type {
                BlockType::Header | BlockType::Subcode => 0xF,
                _ => sequence,
            },
            channel: self.channel,
            dif_sequence: self.dif_sequence,
            dif_block: dif_block_number_at(self.index)?,
        })
    }

    /// Compare a block identifier against this position and return every mismatch found.
    pub fn check(&self, block_id: &BlockId) -> Vec<PositionMismatch> {
        let mut mismatches = Vec::new();

        match block_type_at(self.index) {
            Some(expected) if expected != block_id.block_type => {
                mismatches.push(PositionMismatch::BlockType {
                    expected,
                    found: block_id.block_type,
                });
            }
            _ => {}
        }
        if block_id.channel != self.channel {
            mismatches.push(PositionMismatch::Channel {
                expected: self.channel,
                found:    block_id.channel,
            });
        }
        if block_id.dif_sequence != self.dif_sequence {
            mismatches.push(PositionMismatch::DifSequence {
                expected: self.dif_sequence,
                found:    block_id.dif_sequence,
            });
        }
        if let Some(expected) = dif_block_number_at(self.index) {
            if expected != block_id.dif_block {
                mismatches.push(PositionMismatch::DifBlock {
                    expected,
                    found: block_id.dif_block,
                });
            }
        }
        mismatches
    }
}
