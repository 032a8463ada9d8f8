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

    src/block/header.rs

    The DIF header block, the first block of every DIF sequence. It carries
    the sequence count of the frame, the track information area and the
    application IDs of the track and its three areas.

    Byte 3:    DSF | 0 | 1 1 1 1 1 1
    Byte 4:    DFTIA(4) | 1 | APT(3)
    Byte 5..7: TFn | 1 1 1 1 | APn(3)
    Then 72 bytes of 0xFF.
*/
use crate::{
    block::{
        block_id::{BlockId, BlockType},
        BlockError,
        DifBlock,
    },
    types::{enums::DvSystem, file_info::FileInfo},
};
use binrw::{binrw, BinRead, BinWrite};
use std::io::Cursor;

const ZERO_BIT: u8 = 0b0100_0000;
const DSF_RESERVED: u8 = 0b0011_1111;
const TIA_RESERVED: u8 = 0b0000_1000;
const AREA_RESERVED: u8 = 0b0111_1000;
const TRANSMITTING_FLAG: u8 = 0b1000_0000;
const ABSENT_TIA: u8 = 0xF;
const ABSENT_APPLICATION_ID: u8 = 0x7;

/// The track pitch recorded in the track information area.
#[repr(u8)]
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, strum::EnumIter, strum::EnumString, strum::Display, strum::FromRepr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrackPitch {
    #[strum(serialize = "RESERVED")]
    Reserved = 0,
    #[strum(serialize = "D7_STANDARD_FORMAT")]
    D7StandardFormat = 1,
    /// Most consumer long play recordings use this value.
    LongPlay = 2,
    StandardPlay = 3,
}

/// The application ID of a track, or of one of its areas. It defines the layout of the data that
/// follows, so reserved values may describe formats we cannot interpret.
#[repr(u8)]
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, strum::EnumIter, strum::EnumString, strum::Display, strum::FromRepr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ApplicationId {
    ConsumerDigitalVcr = 0,
    #[strum(serialize = "D7_STANDARD_FORMAT")]
    D7StandardFormat = 1,
    #[strum(serialize = "RESERVED_2")]
    Reserved2 = 2,
    #[strum(serialize = "RESERVED_3")]
    Reserved3 = 3,
    #[strum(serialize = "RESERVED_4")]
    Reserved4 = 4,
    #[strum(serialize = "RESERVED_5")]
    Reserved5 = 5,
    #[strum(serialize = "RESERVED_6")]
    Reserved6 = 6,
}

impl ApplicationId {
    /// Decode a three bit application ID, where all ones means absent.
    pub(crate) fn from_bits(bits: u8) -> Option<ApplicationId> {
        match bits & ABSENT_APPLICATION_ID {
            ABSENT_APPLICATION_ID => None,
            bits => ApplicationId::from_repr(bits),
        }
    }

    pub(crate) fn to_bits(id: Option<ApplicationId>) -> u8 {
        id.map(|id| id as u8).unwrap_or(ABSENT_APPLICATION_ID)
    }
}

#[binrw]
#[brw(big)]
struct HeaderPayload {
    dsf: u8,
    tia: u8,
    areas: [u8; 3],
    reserved: [u8; 72],
}

/// A DIF header block.
///
/// The sequence count is not recorded on tape, so it is reliable. The remaining fields are read
/// from tape and may be absent.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Header {
    pub block_id: BlockId,
    /// Number of DIF sequences in a video frame: 10 for 525/60, 12 for 625/50.
    pub dif_sequence_count: u8,
    /// Track pitch and pilot frame are present or absent together.
    pub track_pitch: Option<TrackPitch>,
    pub pilot_frame: Option<u8>,
    pub application_id_track: Option<ApplicationId>,
    pub application_id_1: Option<ApplicationId>,
    pub application_id_2: Option<ApplicationId>,
    pub application_id_3: Option<ApplicationId>,
}

impl DifBlock for Header {
    const BLOCK_TYPE: BlockType = BlockType::Header;

    fn block_id(&self) -> &BlockId {
        &self.block_id
    }

    fn parse_payload(block_id: BlockId, payload: &[u8], _file_info: &FileInfo) -> Result<Self, BlockError> {
        let raw = HeaderPayload::read(&mut Cursor::new(payload))?;

        if raw.dsf & ZERO_BIT != 0 {
            return Err(BlockError::HeaderZeroBit);
        }
        if raw.dsf & DSF_RESERVED != DSF_RESERVED
            || raw.tia & TIA_RESERVED == 0
            || raw.areas.iter().any(|a| a & AREA_RESERVED != AREA_RESERVED)
            || raw.reserved.iter().any(|r| *r != 0xFF)
        {
            return Err(BlockError::ReservedBitsInUse(BlockType::Header));
        }

        let dftia = raw.tia >> 4;
        let (track_pitch, pilot_frame) = match dftia {
            ABSENT_TIA => (None, None),
            0..=7 => (TrackPitch::from_repr(dftia >> 1), Some(dftia & 0x01)),
            _ => return Err(BlockError::TrackInformation(dftia)),
        };

        // A set TFn bit means area n was not transmitted. We have never seen this in practice, so
        // we refuse to guess at what the rest of the frame looks like.
        if raw.areas.iter().any(|a| a & TRANSMITTING_FLAG != 0) {
            return Err(BlockError::TransmittingFlagsOff);
        }

        Ok(Header {
            block_id,
            dif_sequence_count: if raw.dsf >> 7 == 1 { 12 } else { 10 },
            track_pitch,
            pilot_frame,
            application_id_track: ApplicationId::from_bits(raw.tia),
            application_id_1: ApplicationId::from_bits(raw.areas[0]),
            application_id_2: ApplicationId::from_bits(raw.areas[1]),
            application_id_3: ApplicationId::from_bits(raw.areas[2]),
        })
    }

    fn write_payload(&self, payload: &mut [u8], _file_info: &FileInfo) -> Result<(), BlockError> {
        let dsf = if self.dif_sequence_count == 12 { 0x80 } else { 0x00 };
        let dftia = match (self.track_pitch, self.pilot_frame) {
            (Some(pitch), Some(pilot)) => (pitch as u8) << 1 | pilot,
            _ => ABSENT_TIA,
        };
        let area = |id: Option<ApplicationId>| AREA_RESERVED | ApplicationId::to_bits(id);

        let raw = HeaderPayload {
            dsf: dsf | DSF_RESERVED,
            tia: dftia << 4 | TIA_RESERVED | ApplicationId::to_bits(self.application_id_track),
            areas: [
                area(self.application_id_1),
                area(self.application_id_2),
                area(self.application_id_3),
            ],
            reserved: [0xFF; 72],
        };
        raw.write(&mut Cursor::new(payload))?;
        Ok(())
    }

    fn validate(&self, file_info: &FileInfo) -> Result<(), BlockError> {
        let system = DvSystem::from_dif_sequence_count(self.dif_sequence_count)
            .ok_or(BlockError::HeaderSequenceCount(self.dif_sequence_count))?;
        if system != file_info.system {
            return Err(BlockError::HeaderSystemMismatch(file_info.system));
        }
        if self.track_pitch.is_some() != self.pilot_frame.is_some() {
            return Err(BlockError::TrackPitchPilotFrame);
        }
        match self.pilot_frame {
            Some(pilot) if pilot > 1 => Err(BlockError::PilotFrame(pilot)),
            _ => Ok(()),
        }
    }
}
