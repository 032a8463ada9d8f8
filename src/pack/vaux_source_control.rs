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

    src/pack/vaux_source_control.rs

    The VAUX SOURCE CONTROL pack: copy protection, recording mode, display
    format and frame structure of the recorded video.

    Byte 1: CGMS(2) | ISR(2) | CMP(2) | SS(2)
    Byte 2: REC ST | 1 | REC MODE(2) | 1 | DISP(3)
    Byte 3: FF | FS | FC | IL | ST | SC | BCSYS(2)
    Byte 4: 1 | Genre category(7)

    The three bits that are fixed to 1 are kept as a reserved value.
*/
use crate::{
    pack::{
        source_control::{two_bit_optional, CompressionCount, CopyProtection, InputSource, SourceSituation},
        PackCodec,
        PackError,
    },
    types::enums::DvSystem,
    util::{optional_bool_text, optional_hex, optional_text, parse_bool_optional, parse_name, parse_u8},
};

#[repr(u8)]
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, strum::EnumIter, strum::EnumString, strum::Display, strum::FromRepr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VauxRecordingMode {
    Original = 0,
    Reserved = 1,
    Insert = 2,
    InvalidRecording = 3,
}

#[repr(u8)]
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, strum::EnumIter, strum::EnumString, strum::Display, strum::FromRepr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FrameField {
    OnlyOne = 0,
    Both = 1,
}

#[repr(u8)]
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, strum::EnumIter, strum::EnumString, strum::Display, strum::FromRepr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FrameChange {
    SameAsPrevious = 0,
    DifferentFromPrevious = 1,
}

/// Time elapsed between the two fields of a still frame.
#[repr(u8)]
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, strum::EnumIter, strum::EnumString, strum::Display, strum::FromRepr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StillFieldPicture {
    NoGap = 0,
    /// 1001/60 s on 525/60, 1/50 s on 625/50.
    TwiceFrameTime = 1,
}

/// The contents of a VAUX source control pack.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VauxSourceControl {
    /// Broadcast system type 0-3, which selects the display mode table.
    pub broadcast_system: Option<u8>,
    /// Display mode / aspect ratio, 0-7.
    pub display_mode: Option<u8>,
    pub frame_field: Option<FrameField>,
    /// The field to output first: 1 or 2.
    pub first_second: Option<u8>,
    pub frame_change: Option<FrameChange>,
    pub interlaced: Option<bool>,
    pub still_field_picture: Option<StillFieldPicture>,
    pub still_camera_picture: Option<bool>,
    pub copy_protection: Option<CopyProtection>,
    pub source_situation: Option<SourceSituation>,
    pub input_source: Option<InputSource>,
    pub compression_count: Option<CompressionCount>,
    pub recording_start_point: Option<bool>,
    pub recording_mode: Option<VauxRecordingMode>,
    /// Genre category, 0x00-0x7F.
    pub genre_category: Option<u8>,
    /// Fixed bits, 0-7. Normally 0x7.
    pub reserved: Option<u8>,
}

fn require<T>(value: Option<T>, message: &str) -> Result<T, PackError> {
    value.ok_or_else(|| PackError::invalid(message))
}

impl PackCodec for VauxSourceControl {
    fn decode(data: &[u8; 4], _system: DvSystem) -> Option<Self> {
        let [b1, b2, b3, b4] = *data;
        Some(VauxSourceControl {
            broadcast_system: Some(b3 & 0x03),
            display_mode: Some(b2 & 0x07),
            frame_field: FrameField::from_repr(b3 >> 7),
            first_second: Some(if (b3 >> 6) & 0x01 == 0 { 2 } else { 1 }),
            frame_change: FrameChange::from_repr((b3 >> 5) & 0x01),
            interlaced: Some((b3 >> 4) & 0x01 == 1),
            still_field_picture: StillFieldPicture::from_repr((b3 >> 3) & 0x01),
            still_camera_picture: Some((b3 >> 2) & 0x01 == 0),
            copy_protection: CopyProtection::from_repr(b1 >> 6),
            source_situation: two_bit_optional(b1, SourceSituation::from_repr),
            input_source: two_bit_optional(b1 >> 4, InputSource::from_repr),
            compression_count: two_bit_optional(b1 >> 2, CompressionCount::from_repr),
            recording_start_point: Some(b2 >> 7 == 0),
            recording_mode: VauxRecordingMode::from_repr((b2 >> 4) & 0x03),
            genre_category: Some(b4 & 0x7F),
            reserved: Some(((b2 >> 6) & 0x01) << 2 | ((b2 >> 3) & 0x01) << 1 | b4 >> 7),
        })
    }

    fn validate(&self, _system: DvSystem) -> Result<(), PackError> {
        if require(self.broadcast_system, "A broadcast system is required.")? > 0x3 {
            return Err(PackError::invalid("Broadcast system is out of range."));
        }
        if require(self.display_mode, "A display mode is required.")? > 0x7 {
            return Err(PackError::invalid("Display mode is out of range."));
        }
        require(self.frame_field, "A frame field is required.")?;
        if !matches!(require(self.first_second, "A first second value is required.")?, 1 | 2) {
            return Err(PackError::invalid(
                "The first second value must be 1 or 2 depending on which field is first.",
            ));
        }
        require(self.frame_change, "A frame change value is required.")?;
        require(self.interlaced, "An interlaced field value is required.")?;
        require(self.still_field_picture, "A still field picture value is required.")?;
        require(self.still_camera_picture, "A still camera picture value is required.")?;
        require(self.copy_protection, "Copy protection status is required.")?;
        require(self.recording_start_point, "Recording start point is required.")?;
        require(self.recording_mode, "Recording mode is required.")?;
        if require(self.genre_category, "Genre category is required.")? > 0x7F {
            return Err(PackError::invalid("Genre category is out of range."));
        }
        if require(self.reserved, "Reserved field is required.")? > 0x7 {
            return Err(PackError::invalid("Reserved field is out of range."));
        }
        Ok(())
    }

    fn encode(&self, _system: DvSystem) -> [u8; 4] {
        let two_bits = |value: Option<u8>| value.unwrap_or(0x3);
        let flag = |value: Option<bool>, set_when: bool| u8::from(value == Some(set_when));
        let reserved = self.reserved.unwrap_or(0x7);
        [
            two_bits(self.copy_protection.map(|v| v as u8)) << 6
                | two_bits(self.input_source.map(|v| v as u8)) << 4
                | two_bits(self.compression_count.map(|v| v as u8)) << 2
                | two_bits(self.source_situation.map(|v| v as u8)),
            u8::from(self.recording_start_point != Some(true)) << 7
                | (reserved >> 2 & 0x01) << 6
                | self.recording_mode.map_or(0, |v| v as u8) << 4
                | (reserved >> 1 & 0x01) << 3
                | self.display_mode.unwrap_or(0),
            self.frame_field.map_or(0, |v| v as u8) << 7
                | u8::from(self.first_second != Some(2)) << 6
                | self.frame_change.map_or(0, |v| v as u8) << 5
                | flag(self.interlaced, true) << 4
                | self.still_field_picture.map_or(0, |v| v as u8) << 3
                | flag(self.still_camera_picture, false) << 2
                | self.broadcast_system.unwrap_or(0),
            (reserved & 0x01) << 7 | self.genre_category.unwrap_or(0x7F),
        ]
    }
}

member_text_fields! {
    VauxSourceControl, VauxSourceControlField, VauxSourceControlValue;
    BroadcastSystem(broadcast_system: u8) => |t| parse_u8("broadcast system", t),
        |v: &Option<u8>| optional_hex(v.map(u32::from), 1);
    DisplayMode(display_mode: u8) => |t| parse_u8("display mode", t),
        |v: &Option<u8>| optional_hex(v.map(u32::from), 1);
    FrameField(frame_field: FrameField) => |t| parse_name("frame field", t), optional_text;
    FirstSecond(first_second: u8) => |t| parse_u8("first second", t), optional_text;
    FrameChange(frame_change: FrameChange) => |t| parse_name("frame change", t), optional_text;
    Interlaced(interlaced: bool) => parse_bool_optional, |v: &Option<bool>| optional_bool_text(*v);
    StillFieldPicture(still_field_picture: StillFieldPicture) => |t| parse_name("still field picture", t),
        optional_text;
    StillCameraPicture(still_camera_picture: bool) => parse_bool_optional,
        |v: &Option<bool>| optional_bool_text(*v);
    CopyProtection(copy_protection: CopyProtection) => |t| parse_name("copy protection", t), optional_text;
    SourceSituation(source_situation: SourceSituation) => |t| parse_name("source situation", t), optional_text;
    InputSource(input_source: InputSource) => |t| parse_name("input source", t), optional_text;
    CompressionCount(compression_count: CompressionCount) => |t| parse_name("compression count", t),
        optional_text;
    RecordingStartPoint(recording_start_point: bool) => parse_bool_optional,
        |v: &Option<bool>| optional_bool_text(*v);
    RecordingMode(recording_mode: VauxRecordingMode) => |t| parse_name("recording mode", t), optional_text;
    GenreCategory(genre_category: u8) => |t| parse_u8("genre category", t),
        |v: &Option<u8>| optional_hex(v.map(u32::from), 2);
    Reserved(reserved: u8) => |t| parse_u8("reserved bits", t), |v: &Option<u8>| optional_hex(v.map(u32::from), 1);
}
