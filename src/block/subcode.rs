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

    src/block/subcode.rs

    The DIF subcode block. Each of the two subcode blocks in a DIF sequence
    holds six sync blocks, and each sync block has a three byte ID part and
    one pack.

    ID0:    FR | INDEX SKIP PP  | ABST(4)    or    FR | APP ID(3) | ABST(4)
    ID1:    ABST(3) | BF | SYB(4)            or    ABST(4) | SYB(4)
    Parity: 0xFF
*/
use crate::{
    block::{
        block_id::{BlockId, BlockType},
        check_count,
        header::ApplicationId,
        parse_pack_slots,
        BlockError,
        DifBlock,
        PackSlot,
    },
    types::{enums::BlankFlag, file_info::FileInfo, flags::SubcodeTag},
    PACK_SIZE,
};
use binrw::{binrw, BinRead, BinWrite};
use std::io::Cursor;

/// Sync blocks per subcode DIF block.
pub const SYNC_BLOCKS: usize = 6;
/// Number of absolute track number copies per subcode DIF block.
pub const ABST_COPIES: usize = 2;

const PARITY: u8 = 0xFF;
const ABSENT_SYB: u8 = 0xF;

#[binrw]
#[brw(big)]
#[derive(Copy, Clone, Default)]
struct SyncBlockRaw {
    id0: u8,
    id1: u8,
    parity: u8,
    pack: [u8; PACK_SIZE],
}

#[binrw]
#[brw(big)]
struct SubcodePayload {
    sync_blocks: [SyncBlockRaw; SYNC_BLOCKS],
    reserved: [u8; 29],
}

/// What the ID0 byte of a sync block carries besides the first half flag.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum IdContent {
    ApplicationId3,
    ApplicationIdTrack,
    /// Index into the tag lists.
    Tag(usize),
}

/// Which byte of an absolute track number a sync block carries.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum AbstByte {
    Low,
    Middle,
    High,
}

fn id_content(dif_block: u8, sync_block: usize) -> IdContent {
    match (dif_block, sync_block) {
        (_, 0) => IdContent::ApplicationId3,
        (1, 5) => IdContent::ApplicationIdTrack,
        (_, n) => IdContent::Tag(n - 1),
    }
}

fn abst_slot(sync_block: usize) -> (usize, AbstByte) {
    let byte = match sync_block % 3 {
        0 => AbstByte::Low,
        1 => AbstByte::Middle,
        _ => AbstByte::High,
    };
    (sync_block / 3, byte)
}

fn tag_count(dif_block: u8) -> usize {
    match dif_block {
        0 => 5,
        _ => 4,
    }
}

/// A DIF subcode block.
///
/// All ID part fields are read from tape. A sync block whose ID part could not be read has all
/// of its fields set to `None`; the per-copy lists are indexed by sync block as described on each
/// field.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Subcode {
    pub block_id: BlockId,
    /// Index marks, one per tag-carrying sync block (5 in DIF block 0, 4 in DIF block 1).
    /// `true` means the frame is marked.
    pub index: Vec<Option<bool>>,
    pub skip: Vec<Option<bool>>,
    pub picture: Vec<Option<bool>>,
    /// Only carried by DIF block 1.
    pub application_id_track: Option<ApplicationId>,
    pub application_id_3: Option<ApplicationId>,
    /// Most significant byte of each absolute track number copy.
    pub absolute_track_number_2: [Option<u8>; ABST_COPIES],
    pub absolute_track_number_1: [Option<u8>; ABST_COPIES],
    /// Least significant 7 bits of each absolute track number copy.
    pub absolute_track_number_0: [Option<u8>; ABST_COPIES],
    pub blank_flag: [Option<BlankFlag>; ABST_COPIES],
    pub packs: Vec<PackSlot>,
}

impl Subcode {
    /// Return the full absolute track number of the given copy, if all of its parts are present.
    pub fn absolute_track_number(&self, copy: usize) -> Option<u32> {
        let high = *self.absolute_track_number_2.get(copy)?;
        let middle = *self.absolute_track_number_1.get(copy)?;
        let low = *self.absolute_track_number_0.get(copy)?;
        Some((high? as u32) << 15 | (middle? as u32) << 7 | low? as u32)
    }

    /// Return whether any field of the ID part of `sync_block` is absent.
    fn id_part_missing(&self, sync_block: usize) -> bool {
        let content_missing = match id_content(self.block_id.dif_block, sync_block) {
            IdContent::ApplicationId3 => self.application_id_3.is_none(),
            IdContent::ApplicationIdTrack => self.application_id_track.is_none(),
            IdContent::Tag(t) => self.index[t].is_none() || self.skip[t].is_none() || self.picture[t].is_none(),
        };
        let (copy, byte) = abst_slot(sync_block);
        content_missing
            || match byte {
                AbstByte::Low => self.absolute_track_number_0[copy].is_none() || self.blank_flag[copy].is_none(),
                AbstByte::Middle => self.absolute_track_number_1[copy].is_none(),
                AbstByte::High => self.absolute_track_number_2[copy].is_none(),
            }
    }

    /// Return whether any field of the ID part of `sync_block` is present.
    fn id_part_present(&self, sync_block: usize) -> bool {
        let content_present = match id_content(self.block_id.dif_block, sync_block) {
            IdContent::ApplicationId3 => self.application_id_3.is_some(),
            IdContent::ApplicationIdTrack => self.application_id_track.is_some(),
            IdContent::Tag(t) => self.index[t].is_some() || self.skip[t].is_some() || self.picture[t].is_some(),
        };
        let (copy, byte) = abst_slot(sync_block);
        content_present
            || match byte {
                AbstByte::Low => self.absolute_track_number_0[copy].is_some() || self.blank_flag[copy].is_some(),
                AbstByte::Middle => self.absolute_track_number_1[copy].is_some(),
                AbstByte::High => self.absolute_track_number_2[copy].is_some(),
            }
    }

    fn write_id_part(&self, sync_block: usize, first_half: bool) -> (u8, u8) {
        let valid = !self.id_part_missing(sync_block);
        let syb = self.block_id.dif_block * SYNC_BLOCKS as u8 + sync_block as u8;

        let mut id0 = match id_content(self.block_id.dif_block, sync_block) {
            IdContent::ApplicationId3 => ApplicationId::to_bits(self.application_id_3) << 4,
            IdContent::ApplicationIdTrack => ApplicationId::to_bits(self.application_id_track) << 4,
            IdContent::Tag(t) => SubcodeTag::from_marks(self.index[t], self.skip[t], self.picture[t]).bits(),
        };
        if !valid || first_half {
            id0 |= SubcodeTag::FIRST_HALF.bits();
        }

        let (copy, byte) = abst_slot(sync_block);
        let (abst_hi, id1) = match byte {
            AbstByte::Low => {
                let abst = self.absolute_track_number_0[copy].unwrap_or(0x7F);
                let bf = self.blank_flag[copy].map(|bf| bf as u8).unwrap_or(1);
                (abst >> 3, (abst & 0x07) << 5 | bf << 4)
            }
            AbstByte::Middle => {
                let abst = self.absolute_track_number_1[copy].unwrap_or(0xFF);
                (abst >> 4, (abst & 0x0F) << 4)
            }
            AbstByte::High => {
                let abst = self.absolute_track_number_2[copy].unwrap_or(0xFF);
                (abst >> 4, (abst & 0x0F) << 4)
            }
        };

        id0 |= abst_hi & 0x0F;
        let syb = if valid { syb } else { ABSENT_SYB };
        (id0, id1 | syb)
    }
}

impl DifBlock for Subcode {
    const BLOCK_TYPE: BlockType = BlockType::Subcode;

    fn block_id(&self) -> &BlockId {
        &self.block_id
    }

    fn parse_payload(block_id: BlockId, payload: &[u8], file_info: &FileInfo) -> Result<Self, BlockError> {
        let raw = SubcodePayload::read(&mut Cursor::new(payload))?;
        let tags = tag_count(block_id.dif_block);

        let mut subcode = Subcode {
            block_id,
            index: vec![None; tags],
            skip: vec![None; tags],
            picture: vec![None; tags],
            application_id_track: None,
            application_id_3: None,
            absolute_track_number_2: [None; ABST_COPIES],
            absolute_track_number_1: [None; ABST_COPIES],
            absolute_track_number_0: [None; ABST_COPIES],
            blank_flag: [None; ABST_COPIES],
            packs: Vec::with_capacity(SYNC_BLOCKS),
        };

        let first_half = file_info.is_first_half(block_id.dif_sequence);
        for (n, sync_block) in raw.sync_blocks.iter().enumerate() {
            let expected_syb = block_id.dif_block * SYNC_BLOCKS as u8 + n as u8;
            let tag = SubcodeTag::from_bits_retain(sync_block.id0);
            let application_id = ApplicationId::from_bits(sync_block.id0 >> 4);
            let content = id_content(block_id.dif_block, n);

            // ID parts that disagree with their position were not read correctly from tape.
            if tag.contains(SubcodeTag::FIRST_HALF) != first_half || sync_block.id1 & 0x0F != expected_syb {
                log::trace!("Subcode::parse_payload(): sync block {} ID part unreadable", expected_syb);
                continue;
            }
            if !matches!(content, IdContent::Tag(_)) && application_id.is_none() {
                continue;
            }
            if sync_block.parity != PARITY {
                return Err(BlockError::SyncBlockParity(expected_syb));
            }

            match content {
                IdContent::ApplicationId3 => subcode.application_id_3 = application_id,
                IdContent::ApplicationIdTrack => subcode.application_id_track = application_id,
                IdContent::Tag(t) => {
                    subcode.index[t] = Some(tag.index_marked());
                    subcode.skip[t] = Some(tag.skip_marked());
                    subcode.picture[t] = Some(tag.picture_marked());
                }
            }

            let (copy, byte) = abst_slot(n);
            let abst_hi = sync_block.id0 & 0x0F;
            match byte {
                AbstByte::Low => {
                    subcode.absolute_track_number_0[copy] = Some(abst_hi << 3 | sync_block.id1 >> 5);
                    subcode.blank_flag[copy] = BlankFlag::from_repr((sync_block.id1 >> 4) & 0x01);
                }
                AbstByte::Middle => {
                    subcode.absolute_track_number_1[copy] = Some(abst_hi << 4 | sync_block.id1 >> 4);
                }
                AbstByte::High => {
                    subcode.absolute_track_number_2[copy] = Some(abst_hi << 4 | sync_block.id1 >> 4);
                }
            }
        }

        let pack_bytes: Vec<u8> = raw.sync_blocks.iter().flat_map(|sb| sb.pack).collect();
        subcode.packs = parse_pack_slots(&pack_bytes, file_info.system);

        if raw.reserved.iter().any(|r| *r != 0xFF) {
            return Err(BlockError::ReservedBitsInUse(BlockType::Subcode));
        }
        Ok(subcode)
    }

    fn write_payload(&self, payload: &mut [u8], file_info: &FileInfo) -> Result<(), BlockError> {
        let first_half = file_info.is_first_half(self.block_id.dif_sequence);
        let mut sync_blocks = [SyncBlockRaw::default(); SYNC_BLOCKS];

        for (n, (sync_block, slot)) in sync_blocks.iter_mut().zip(&self.packs).enumerate() {
            let (id0, id1) = self.write_id_part(n, first_half);
            *sync_block = SyncBlockRaw {
                id0,
                id1,
                parity: PARITY,
                pack: slot.to_binary(file_info.system)?,
            };
        }

        let raw = SubcodePayload {
            sync_blocks,
            reserved: [0xFF; 29],
        };
        raw.write(&mut Cursor::new(payload))?;
        Ok(())
    }

    fn validate(&self, _file_info: &FileInfo) -> Result<(), BlockError> {
        if self.block_id.dif_block > 1 {
            return Err(BlockError::UnexpectedBlockCount {
                expected: BlockType::Subcode.count_per_sequence(),
            });
        }
        let tags = tag_count(self.block_id.dif_block);
        check_count(BlockType::Subcode, "index", tags, self.index.len())?;
        check_count(BlockType::Subcode, "skip", tags, self.skip.len())?;
        check_count(BlockType::Subcode, "picture", tags, self.picture.len())?;
        check_count(BlockType::Subcode, "pack", SYNC_BLOCKS, self.packs.len())?;

        for n in 0..SYNC_BLOCKS {
            if self.id_part_missing(n) && self.id_part_present(n) {
                return Err(BlockError::SyncBlockIdPartial(
                    self.block_id.dif_block * SYNC_BLOCKS as u8 + n as u8,
                ));
            }
        }
        for abst in self.absolute_track_number_0.iter().flatten() {
            if *abst > 0x7F {
                return Err(BlockError::AbsoluteTrackNumber(*abst));
            }
        }
        Ok(())
    }
}
