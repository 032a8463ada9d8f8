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

    src/pack/vaux_source.rs

    The VAUX SOURCE pack: where the recorded video came from, and the
    basic format of the video signal.

    Byte 1: TV channel tens(4) | TV channel units(4)
    Byte 2: B/W | EN | CLF(2) | TV channel hundreds(4)
    Byte 3: Source code(2) | 50/60(1) | STYPE(5)
    Byte 4: Tuner category(8)
*/
use crate::{
    pack::{PackCodec, PackError},
    types::enums::DvSystem,
    util::{optional_bool_text, optional_hex, optional_text, parse_bool_optional, parse_name, parse_u16, parse_u8},
};
use std::{
    fmt,
    fmt::{Display, Formatter},
    str::FromStr,
};

#[repr(u8)]
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, strum::EnumIter, strum::EnumString, strum::Display, strum::FromRepr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BlackAndWhiteFlag {
    BlackAndWhite = 0,
    Color = 1,
}

/// Color frames identification, per ITU-R Report 624-4.
#[repr(u8)]
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, strum::EnumIter, strum::EnumString, strum::Display, strum::FromRepr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ColorFramesId {
    #[strum(serialize = "CLF_COLOR_FRAME_A_OR_1_2_FIELD")]
    ColorFrameAOr12Field = 0,
    #[strum(serialize = "CLF_COLOR_FRAME_B_OR_3_4_FIELD")]
    ColorFrameBOr34Field = 1,
    /// 625/50 only
    #[strum(serialize = "CLF_5_6_FIELD")]
    Field56 = 2,
    /// 625/50 only
    #[strum(serialize = "CLF_7_8_FIELD")]
    Field78 = 3,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, strum::EnumIter, strum::EnumString, strum::Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SourceCode {
    Camera,
    /// Multiple sub-Nyquist sampling encoding
    LineMuse,
    Line,
    Cable,
    Tuner,
    PrerecordedTape,
}

/// The STYPE field: the video compression format of the source.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SourceType {
    /// 25 Mbps, 4:1:1 chroma subsampling on 525/60.
    StandardDefinitionCompressedChroma,
    AnalogHighDefinition1125_1250,
    /// 50 Mbps, 4:2:2 chroma subsampling.
    StandardDefinitionMoreChroma,
    Reserved(u8),
}

impl SourceType {
    const MAX_BITS: u8 = 0x1F;

    pub fn from_bits(bits: u8) -> SourceType {
        match bits {
            0x00 => SourceType::StandardDefinitionCompressedChroma,
            0x02 => SourceType::AnalogHighDefinition1125_1250,
            0x04 => SourceType::StandardDefinitionMoreChroma,
            bits => SourceType::Reserved(bits),
        }
    }

    pub fn to_bits(self) -> u8 {
        match self {
            SourceType::StandardDefinitionCompressedChroma => 0x00,
            SourceType::AnalogHighDefinition1125_1250 => 0x02,
            SourceType::StandardDefinitionMoreChroma => 0x04,
            SourceType::Reserved(bits) => bits,
        }
    }

    /// A reserved value must fit in five bits and must not shadow a named source type.
    pub(crate) fn is_valid(self) -> bool {
        SourceType::from_bits(self.to_bits()) == self && self.to_bits() <= SourceType::MAX_BITS
    }
}

impl Display for SourceType {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            SourceType::StandardDefinitionCompressedChroma => write!(f, "STANDARD_DEFINITION_COMPRESSED_CHROMA"),
            SourceType::AnalogHighDefinition1125_1250 => write!(f, "ANALOG_HIGH_DEFINITION_1125_1250"),
            SourceType::StandardDefinitionMoreChroma => write!(f, "STANDARD_DEFINITION_MORE_CHROMA"),
            SourceType::Reserved(bits) => write!(f, "RESERVED_{}", bits),
        }
    }
}

impl FromStr for SourceType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let source_type = match s {
            "STANDARD_DEFINITION_COMPRESSED_CHROMA" => SourceType::StandardDefinitionCompressedChroma,
            "ANALOG_HIGH_DEFINITION_1125_1250" => SourceType::AnalogHighDefinition1125_1250,
            "STANDARD_DEFINITION_MORE_CHROMA" => SourceType::StandardDefinitionMoreChroma,
            other => {
                let bits = other
                    .strip_prefix("RESERVED_")
                    .and_then(|n| n.parse::<u8>().ok())
                    .ok_or(())?;
                SourceType::Reserved(bits)
            }
        };
        match source_type.is_valid() {
            true => Ok(source_type),
            false => Err(()),
        }
    }
}

/// The contents of a VAUX source pack.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VauxSource {
    pub source_code: Option<SourceCode>,
    /// 1-999, only for cable and tuner sources.
    pub tv_channel: Option<u16>,
    /// The range of spectrum the tuner channel is taken from.
    pub tuner_category: Option<u8>,
    pub source_type: Option<SourceType>,
    /// 60 or 50, matching the video system.
    pub field_count: Option<u8>,
    pub bw_flag: Option<BlackAndWhiteFlag>,
    pub color_frames_id_valid: Option<bool>,
    pub color_frames_id: Option<ColorFramesId>,
}

fn source_code_name(source_code: Option<SourceCode>) -> String {
    source_code.map_or("None".to_string(), |sc| sc.to_string())
}

impl PackCodec for VauxSource {
    fn decode(data: &[u8; 4], _system: DvSystem) -> Option<Self> {
        let [b1, b2, b3, b4] = *data;
        let digits = [b2 & 0x0F, b1 >> 4, b1 & 0x0F];
        let all = |value: u8| digits.iter().all(|d| *d == value);
        let channel = || match digits {
            [h, t, u] if h <= 9 && t <= 9 && u <= 9 => Some(u16::from(h) * 100 + u16::from(t) * 10 + u16::from(u)),
            _ => None,
        };

        let (source_code, tv_channel) = match b3 >> 6 {
            0x0 if all(0xF) => (Some(SourceCode::Camera), None),
            0x1 if all(0xE) => (Some(SourceCode::LineMuse), None),
            0x1 if all(0xF) => (Some(SourceCode::Line), None),
            0x0 | 0x1 => return None,
            0x2 => (Some(SourceCode::Cable), Some(channel()?)),
            _ if all(0xE) => (Some(SourceCode::PrerecordedTape), None),
            _ if all(0xF) => (None, None),
            _ => (Some(SourceCode::Tuner), Some(channel()?)),
        };

        // Only tuners have a category; everything else must record no information
        let tuner_category = match source_code {
            Some(SourceCode::Tuner) => Some(b4),
            _ if b4 == 0xFF => None,
            _ => return None,
        };

        Some(VauxSource {
            source_code,
            tv_channel,
            tuner_category,
            source_type: Some(SourceType::from_bits(b3 & 0x1F)),
            field_count: Some(if (b3 >> 5) & 0x01 == 1 { 50 } else { 60 }),
            bw_flag: BlackAndWhiteFlag::from_repr(b2 >> 7),
            color_frames_id_valid: Some((b2 >> 6) & 0x01 == 0),
            color_frames_id: ColorFramesId::from_repr((b2 >> 4) & 0x03),
        })
    }

    fn validate(&self, system: DvSystem) -> Result<(), PackError> {
        let name = source_code_name(self.source_code);
        match self.source_code {
            Some(SourceCode::Cable | SourceCode::Tuner) => match self.tv_channel {
                None => {
                    return Err(PackError::invalid(format!(
                        "A TV channel must be provided for source {}.",
                        name
                    )))
                }
                Some(channel) if channel == 0 || channel >= 1000 => {
                    return Err(PackError::invalid(format!(
                        "TV channel is out of range for source {}.",
                        name
                    )))
                }
                Some(_) => {}
            },
            _ if self.tv_channel.is_some() => {
                return Err(PackError::invalid(format!(
                    "No TV channel may be provided for source {}.",
                    name
                )))
            }
            _ => {}
        }

        let is_tuner = self.source_code == Some(SourceCode::Tuner);
        if !is_tuner && self.tuner_category.is_some() {
            return Err(PackError::invalid(format!(
                "A tuner category was provided for source {} that is not a tuner.",
                name
            )));
        }
        if is_tuner && self.tuner_category.is_none() {
            return Err(PackError::invalid(format!(
                "A tuner category was not provided for source {}.",
                name
            )));
        }

        match self.source_type {
            None => return Err(PackError::invalid("Source type is required.")),
            Some(source_type) if !source_type.is_valid() => {
                return Err(PackError::invalid("Source type is out of range."))
            }
            Some(_) => {}
        }

        let field_count = self
            .field_count
            .ok_or_else(|| PackError::invalid("Field count is required."))?;
        if field_count != system.field_count() {
            return Err(PackError::invalid(format!(
                "Field count must be {} for system {}.",
                system.field_count(),
                system
            )));
        }

        if self.bw_flag.is_none() {
            return Err(PackError::invalid("Black and white flag is required."));
        }
        if self.color_frames_id_valid.is_none() {
            return Err(PackError::invalid("Color frames ID valid is required."));
        }
        if self.color_frames_id.is_none() {
            return Err(PackError::invalid("Color frames ID is required."));
        }
        Ok(())
    }

    fn encode(&self, _system: DvSystem) -> [u8; 4] {
        let (source_code, digits) = match self.source_code {
            Some(SourceCode::Camera) => (0x0, [0xF; 3]),
            Some(SourceCode::LineMuse) => (0x1, [0xE; 3]),
            Some(SourceCode::Line) => (0x1, [0xF; 3]),
            Some(SourceCode::Cable | SourceCode::Tuner) => {
                let channel = self.tv_channel.unwrap_or_default();
                let code = if self.source_code == Some(SourceCode::Cable) { 0x2 } else { 0x3 };
                (
                    code,
                    [(channel / 100) as u8, (channel / 10 % 10) as u8, (channel % 10) as u8],
                )
            }
            Some(SourceCode::PrerecordedTape) => (0x3, [0xE; 3]),
            None => (0x3, [0xF; 3]),
        };
        let [hundreds, tens, units] = digits;

        let bw = self.bw_flag.map_or(1, |bw| bw as u8);
        let en = u8::from(self.color_frames_id_valid != Some(true));
        let clf = self.color_frames_id.map_or(0, |clf| clf as u8);
        let fc = u8::from(self.field_count == Some(50));
        let stype = self.source_type.map_or(0, |st| st.to_bits());
        [
            tens << 4 | units,
            bw << 7 | en << 6 | clf << 4 | hundreds,
            source_code << 6 | fc << 5 | stype,
            self.tuner_category.unwrap_or(0xFF),
        ]
    }
}

member_text_fields! {
    VauxSource, VauxSourceField, VauxSourceValue;
    SourceCode(source_code: SourceCode) => |t| parse_name("source code", t), optional_text;
    TvChannel(tv_channel: u16) => |t| parse_u16("TV channel", t), optional_text;
    TunerCategory(tuner_category: u8) => |t| parse_u8("tuner category", t),
        |v: &Option<u8>| optional_hex(v.map(u32::from), 2);
    SourceType(source_type: SourceType) => |t| parse_name("source type", t), optional_text;
    FieldCount(field_count: u8) => |t| parse_u8("field count", t), optional_text;
    BwFlag(bw_flag: BlackAndWhiteFlag) => |t| parse_name("black and white flag", t), optional_text;
    ColorFramesIdValid(color_frames_id_valid: bool) => parse_bool_optional,
        |v: &Option<bool>| optional_bool_text(*v);
    ColorFramesId(color_frames_id: ColorFramesId) => |t| parse_name("color frames ID", t), optional_text;
}
