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

    src/lib.rs

    dvfox reads and writes the DIF blocks of DV tape data, and the small
    metadata packs carried inside of them.
*/

//! # dvfox
//!
//! A DV frame is transmitted as a series of 80 byte DIF blocks. Each block starts with a three
//! byte [`BlockId`] and is followed by a payload that depends on the block type. Subcode, VAUX
//! and audio blocks carry five byte [`Pack`] records holding timecodes, recording dates, camera
//! settings and other metadata.
//!
//! Parsing and serializing are exact inverses for valid data: `Block::parse` followed by
//! `Block::to_binary` reproduces the input bytes.
//!
//! ```
//! use dvfox::{Block, DvSystem, FileInfo};
//!
//! let file_info = FileInfo::new(DvSystem::Sys525_60, 1);
//! let mut bytes = [0xFF; 80];
//! // A video block in DIF sequence 0, DIF block 0.
//! bytes[0..3].copy_from_slice(&[0x90, 0x07, 0x00]);
//! bytes[3] = 0x00;
//!
//! let block = Block::parse(&bytes, &file_info).unwrap();
//! assert_eq!(block.to_binary(&file_info).unwrap(), bytes);
//! ```

pub mod block;
pub mod pack;
pub mod types;
pub mod util;

use thiserror::Error;

/// The size of a single DIF block, in bytes.
pub const BLOCK_SIZE: usize = 80;
/// The size of the payload following the [`BlockId`] of a DIF block, in bytes.
pub const BLOCK_PAYLOAD_SIZE: usize = BLOCK_SIZE - BLOCK_ID_SIZE;
/// The size of a [`BlockId`], in bytes.
pub const BLOCK_ID_SIZE: usize = 3;
/// The size of a single pack, in bytes. This includes the pack type header byte.
pub const PACK_SIZE: usize = 5;

/// Top level error type for dvfox. Block and pack errors convert into this type, so callers that
/// do not care which layer failed can use `?` freely.
#[derive(Debug, Error)]
pub enum DvError {
    #[error(transparent)]
    Block(#[from] BlockError),
    #[error(transparent)]
    Pack(#[from] PackError),
    #[error("Unsupported DV frame size of {0} bytes")]
    UnsupportedFrameSize(usize),
}

pub use crate::{
    block::{
        audio::{Audio, AUDIO_DATA_SIZE},
        block_id::{BlockId, BlockType},
        header::{ApplicationId, Header, TrackPitch},
        position::{block_type_at, dif_block_number_at, BlockPosition, PositionMismatch, BLOCKS_PER_DIF_SEQUENCE},
        subcode::Subcode,
        vaux::Vaux,
        video::{Video, VIDEO_DATA_SIZE},
        Block,
        BlockError,
        DifBlock,
        PackSlot,
    },
    pack::{Pack, PackError, PackType, TextField, TextFields},
    types::{
        enums::{BlankFlag, DvSystem},
        file_info::FileInfo,
        flags::SubcodeTag,
    },
};
