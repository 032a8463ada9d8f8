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

    src/block/vaux.rs

    The DIF VAUX block: 15 video auxiliary packs followed by two reserved
    bytes.
*/
use crate::{
    block::{
        block_id::{BlockId, BlockType},
        check_count,
        parse_pack_slots,
        write_pack_slots,
        BlockError,
        DifBlock,
        PackSlot,
    },
    types::file_info::FileInfo,
    PACK_SIZE,
};
use binrw::{binrw, BinRead, BinWrite};
use std::io::Cursor;

/// Packs per VAUX DIF block.
pub const VAUX_PACKS: usize = 15;

#[binrw]
#[brw(big)]
struct VauxPayload {
    packs: [u8; PACK_SIZE * VAUX_PACKS],
    reserved: [u8; 2],
}

/// A DIF VAUX block.
///
/// Any pack may appear in any slot. The standard assigns specific positions to the VAUX source,
/// source control, recording date and recording time packs, but we do not enforce them.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vaux {
    pub block_id: BlockId,
    pub packs: Vec<PackSlot>,
}

impl DifBlock for Vaux {
    const BLOCK_TYPE: BlockType = BlockType::Vaux;

    fn block_id(&self) -> &BlockId {
        &self.block_id
    }

    fn parse_payload(block_id: BlockId, payload: &[u8], file_info: &FileInfo) -> Result<Self, BlockError> {
        let raw = VauxPayload::read(&mut Cursor::new(payload))?;

        // These bytes survive tape dropouts as 0xFF, so anything else suggests a format we
        // do not support.
        if raw.reserved.iter().any(|r| *r != 0xFF) {
            return Err(BlockError::ReservedBitsInUse(BlockType::Vaux));
        }

        Ok(Vaux {
            block_id,
            packs: parse_pack_slots(&raw.packs, file_info.system),
        })
    }

    fn write_payload(&self, payload: &mut [u8], file_info: &FileInfo) -> Result<(), BlockError> {
        let mut packs = [0xFF; PACK_SIZE * VAUX_PACKS];
        write_pack_slots(&self.packs, &mut packs, file_info.system)?;

        let raw = VauxPayload {
            packs,
            reserved: [0xFF; 2],
        };
        raw.write(&mut Cursor::new(payload))?;
        Ok(())
    }

    fn validate(&self, _file_info: &FileInfo) -> Result<(), BlockError> {
        check_count(BlockType::Vaux, "pack", VAUX_PACKS, self.packs.len())
    }
}
