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

    src/pack/aaux_source_control.rs

    The AAUX SOURCE CONTROL pack: copy protection, recording mode and the
    playback speed of the recorded audio.

    Byte 1: CGMS(2) | ISR(2) | CMP(2) | SS(2)
    Byte 2: REC ST | REC END | REC MODE(3) | INSERT CH(3)
    Byte 3: DRF | SPEED(7)
    Byte 4: 1 | Genre category(7)
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
use regex::Regex;
use std::{
    fmt,
    fmt::{Display, Formatter},
    str::FromStr,
};

const UNKNOWN_SPEED_BITS: u8 = 0x7F;

#[repr(u8)]
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, strum::EnumIter, strum::EnumString, strum::Display, strum::FromRepr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AauxRecordingMode {
    Original = 1,
    #[strum(serialize = "ONE_CHANNEL_INSERT")]
    OneChannelInsert = 3,
    #[strum(serialize = "FOUR_CHANNEL_INSERT")]
    FourChannelInsert = 4,
    #[strum(serialize = "TWO_CHANNEL_INSERT")]
    TwoChannelInsert = 5,
    Invalid = 7,
}

/// The audio channels that were insert edited. Only meaningful for tapes with a memory chip.
#[repr(u8)]
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, strum::EnumIter, strum::EnumString, strum::Display, strum::FromRepr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InsertChannel {
    #[strum(serialize = "CHANNEL_1")]
    Channel1 = 0,
    #[strum(serialize = "CHANNEL_2")]
    Channel2 = 1,
    #[strum(serialize = "CHANNEL_3")]
    Channel3 = 2,
    #[strum(serialize = "CHANNEL_4")]
    Channel4 = 3,
    #[strum(serialize = "CHANNELS_1_2")]
    Channels1_2 = 4,
    #[strum(serialize = "CHANNELS_3_4")]
    Channels3_4 = 5,
    #[strum(serialize = "CHANNELS_1_2_3_4")]
    Channels1_2_3_4 = 6,
}

#[repr(u8)]
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, strum::EnumIter, strum::EnumString, strum::Display, strum::FromRepr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    Reverse = 0,
    Forward = 1,
}

/// Tape playback speed relative to normal speed, as a reduced fraction.
///
/// Only the speeds in the 7-bit speed table can be written to a pack. The table has a special
/// first row of slow speeds (0, 1/32 and 1/16 through 1/3), followed by seven rows that each
/// double the previous row's base speed and split it into 16 even steps.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlaybackSpeed {
    numerator: u32,
    denominator: u32,
}

fn gcd(a: u64, b: u64) -> u64 {
    if b == 0 {
        a
    }
    else {
        gcd(b, a % b)
    }
}

impl PlaybackSpeed {
    pub const NORMAL: PlaybackSpeed = PlaybackSpeed {
        numerator: 1,
        denominator: 1,
    };

    /// Create a speed from a fraction, which is reduced to lowest terms. Returns `None` for a
    /// zero denominator.
    pub fn new(numerator: u32, denominator: u32) -> Option<PlaybackSpeed> {
        if denominator == 0 {
            return None;
        }
        let divisor = gcd(u64::from(numerator), u64::from(denominator)) as u32;
        Some(PlaybackSpeed {
            numerator: numerator / divisor,
            denominator: denominator / divisor,
        })
    }

    pub fn numerator(&self) -> u32 {
        self.numerator
    }

    pub fn denominator(&self) -> u32 {
        self.denominator
    }

    /// Look up the speed stored in the 7-bit speed field. All bits set means the speed is
    /// unknown, and returns `None`.
    pub fn from_bits(bits: u8) -> Option<PlaybackSpeed> {
        let coarse = (bits >> 4) & 0x07;
        let fine = u32::from(bits & 0x0F);
        match (coarse, fine) {
            (0, 0) => PlaybackSpeed::new(0, 1),
            (0, 1) => PlaybackSpeed::new(1, 32),
            (0, _) => PlaybackSpeed::new(1, 18 - fine),
            (7, 0xF) => None,
            (7, _) => PlaybackSpeed::new((16 + fine) * 2, 1),
            _ => PlaybackSpeed::new(16 + fine, 1 << (6 - coarse)),
        }
    }

    /// Return the speed field bits for this speed, or `None` if the speed is not in the table.
    pub fn to_bits(&self) -> Option<u8> {
        (0..UNKNOWN_SPEED_BITS).find(|bits| PlaybackSpeed::from_bits(*bits) == Some(*self))
    }

    /// Every speed that can be stored in a pack, in table order.
    pub fn supported() -> impl Iterator<Item = PlaybackSpeed> {
        (0..UNKNOWN_SPEED_BITS).filter_map(PlaybackSpeed::from_bits)
    }
}

impl Display for PlaybackSpeed {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        if self.denominator == 1 {
            write!(f, "{}", self.numerator)
        }
        else {
            write!(f, "{}/{}", self.numerator, self.denominator)
        }
    }
}

impl FromStr for PlaybackSpeed {
    type Err = PackError;

    /// Parse a speed written as an integer (`2`), a fraction (`3/2`) or a decimal (`0.25`).
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        const FRACTION_REX: &str = r"^\s*(\d{1,9})\s*(?:/\s*(\d{1,9})|\.(\d{1,9}))?\s*$";
        let error = || PackError::text_parse("playback speed", text);
        let rex = Regex::new(FRACTION_REX).map_err(|_| error())?;
        let caps = rex.captures(text).ok_or_else(error)?;

        let whole: u32 = caps[1].parse().map_err(|_| error())?;
        if let Some(denominator) = caps.get(2) {
            let denominator: u32 = denominator.as_str().parse().map_err(|_| error())?;
            return PlaybackSpeed::new(whole, denominator).ok_or_else(error);
        }
        if let Some(decimals) = caps.get(3) {
            let scale = 10u64.pow(decimals.as_str().len() as u32);
            let fraction: u64 = decimals.as_str().parse().map_err(|_| error())?;
            let numerator = u64::from(whole) * scale + fraction;
            let divisor = gcd(numerator, scale);
            let numerator = u32::try_from(numerator / divisor).map_err(|_| error())?;
            let denominator = (scale / divisor) as u32;
            return PlaybackSpeed::new(numerator, denominator).ok_or_else(error);
        }
        PlaybackSpeed::new(whole, 1).ok_or_else(error)
    }
}

/// The contents of an AAUX source control pack.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AauxSourceControl {
    pub copy_protection: Option<CopyProtection>,
    pub source_situation: Option<SourceSituation>,
    pub input_source: Option<InputSource>,
    pub compression_count: Option<CompressionCount>,
    pub recording_start_point: Option<bool>,
    pub recording_end_point: Option<bool>,
    pub recording_mode: Option<AauxRecordingMode>,
    pub insert_channel: Option<InsertChannel>,
    /// Genre category, 0x00-0x7F.
    pub genre_category: Option<u8>,
    pub direction: Option<Direction>,
    /// `None` when the speed is unknown, such as a tape dubbed from a deck that was itself
    /// playing at a non-standard speed.
    pub playback_speed: Option<PlaybackSpeed>,
    /// The fixed bit in front of the genre category. Normally 1.
    pub reserved: Option<u8>,
}

fn require<T>(value: Option<T>, message: &str) -> Result<T, PackError> {
    value.ok_or_else(|| PackError::invalid(message))
}

impl PackCodec for AauxSourceControl {
    fn decode(data: &[u8; 4], _system: DvSystem) -> Option<Self> {
        let [b1, b2, b3, b4] = *data;
        Some(AauxSourceControl {
            copy_protection: CopyProtection::from_repr(b1 >> 6),
            source_situation: two_bit_optional(b1, SourceSituation::from_repr),
            input_source: two_bit_optional(b1 >> 4, InputSource::from_repr),
            compression_count: two_bit_optional(b1 >> 2, CompressionCount::from_repr),
            recording_start_point: Some(b2 >> 7 == 0),
            recording_end_point: Some((b2 >> 6) & 0x01 == 0),
            recording_mode: AauxRecordingMode::from_repr((b2 >> 3) & 0x07),
            insert_channel: InsertChannel::from_repr(b2 & 0x07),
            genre_category: Some(b4 & 0x7F),
            direction: Direction::from_repr(b3 >> 7),
            playback_speed: PlaybackSpeed::from_bits(b3 & 0x7F),
            reserved: Some(b4 >> 7),
        })
    }

    fn validate(&self, _system: DvSystem) -> Result<(), PackError> {
        require(self.copy_protection, "Copy protection status is required.")?;
        require(self.recording_start_point, "Recording start point is required.")?;
        require(self.recording_end_point, "Recording end point is required.")?;
        require(self.recording_mode, "Recording mode is required.")?;
        if require(self.genre_category, "Genre category is required.")? > 0x7F {
            return Err(PackError::invalid("Genre category is out of range."));
        }
        require(self.direction, "Direction field is required.")?;
        if let Some(speed) = self.playback_speed {
            if speed.to_bits().is_none() {
                return Err(PackError::invalid(
                    "Unsupported playback speed selected.  Only certain fractional values allowed.",
                ));
            }
        }
        if require(self.reserved, "Reserved field is required.")? > 0x1 {
            return Err(PackError::invalid("Reserved field is out of range."));
        }
        Ok(())
    }

    fn encode(&self, _system: DvSystem) -> [u8; 4] {
        let two_bits = |value: Option<u8>| value.unwrap_or(0x3);
        let speed_bits = self
            .playback_speed
            .map_or(UNKNOWN_SPEED_BITS, |s| s.to_bits().unwrap_or(UNKNOWN_SPEED_BITS));
        [
            two_bits(self.copy_protection.map(|v| v as u8)) << 6
                | two_bits(self.input_source.map(|v| v as u8)) << 4
                | two_bits(self.compression_count.map(|v| v as u8)) << 2
                | two_bits(self.source_situation.map(|v| v as u8)),
            u8::from(self.recording_start_point != Some(true)) << 7
                | u8::from(self.recording_end_point != Some(true)) << 6
                | self.recording_mode.map_or(0x7, |v| v as u8) << 3
                | self.insert_channel.map_or(0x7, |v| v as u8),
            self.direction.map_or(0, |v| v as u8) << 7 | speed_bits,
            (self.reserved.unwrap_or(1) & 0x01) << 7 | self.genre_category.unwrap_or(0x7F),
        ]
    }
}

member_text_fields! {
    AauxSourceControl, AauxSourceControlField, AauxSourceControlValue;
    CopyProtection(copy_protection: CopyProtection) => |t| parse_name("copy protection", t), optional_text;
    SourceSituation(source_situation: SourceSituation) => |t| parse_name("source situation", t), optional_text;
    InputSource(input_source: InputSource) => |t| parse_name("input source", t), optional_text;
    CompressionCount(compression_count: CompressionCount) => |t| parse_name("compression count", t),
        optional_text;
    RecordingStartPoint(recording_start_point: bool) => parse_bool_optional,
        |v: &Option<bool>| optional_bool_text(*v);
    RecordingEndPoint(recording_end_point: bool) => parse_bool_optional,
        |v: &Option<bool>| optional_bool_text(*v);
    RecordingMode(recording_mode: AauxRecordingMode) => |t| parse_name("recording mode", t), optional_text;
    InsertChannel(insert_channel: InsertChannel) => |t| parse_name("insert channel", t), optional_text;
    GenreCategory(genre_category: u8) => |t| parse_u8("genre category", t),
        |v: &Option<u8>| optional_hex(v.map(u32::from), 2);
    Direction(direction: Direction) => |t| parse_name("direction", t), optional_text;
    PlaybackSpeed(playback_speed: PlaybackSpeed) => |t| parse_name("playback speed", t), optional_text;
    Reserved(reserved: u8) => |t| parse_u8("reserved bits", t), |v: &Option<u8>| optional_hex(v.map(u32::from), 1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pack::TextFields;

    // Original recording, forward at normal speed, no insert channel
    const NORMAL_PLAY: [u8; 4] = [0x03, 0xCF, 0xA0, 0xFF];

    #[test]
    fn decode_normal_playback() {
        let asc = AauxSourceControl::decode(&NORMAL_PLAY, DvSystem::Sys525_60).unwrap();
        assert_eq!(asc.copy_protection, Some(CopyProtection::NoRestriction));
        assert_eq!(asc.source_situation, None);
        assert_eq!(asc.recording_start_point, Some(false));
        assert_eq!(asc.recording_end_point, Some(false));
        assert_eq!(asc.recording_mode, Some(AauxRecordingMode::Original));
        assert_eq!(asc.insert_channel, None);
        assert_eq!(asc.direction, Some(Direction::Forward));
        assert_eq!(asc.playback_speed, Some(PlaybackSpeed::NORMAL));
        assert_eq!(asc.genre_category, Some(0x7F));
        assert_eq!(asc.reserved, Some(1));
        assert!(asc.validate(DvSystem::Sys525_60).is_ok());
        assert_eq!(asc.encode(DvSystem::Sys525_60), NORMAL_PLAY);
    }

    #[test]
    fn speed_table() {
        assert_eq!(PlaybackSpeed::from_bits(0x00), PlaybackSpeed::new(0, 1));
        assert_eq!(PlaybackSpeed::from_bits(0x01), PlaybackSpeed::new(1, 32));
        assert_eq!(PlaybackSpeed::from_bits(0x02), PlaybackSpeed::new(1, 16));
        assert_eq!(PlaybackSpeed::from_bits(0x0F), PlaybackSpeed::new(1, 3));
        assert_eq!(PlaybackSpeed::from_bits(0x10), PlaybackSpeed::new(1, 2));
        assert_eq!(PlaybackSpeed::from_bits(0x28), PlaybackSpeed::new(3, 2));
        assert_eq!(PlaybackSpeed::from_bits(0x7E), PlaybackSpeed::new(62, 1));
        assert_eq!(PlaybackSpeed::from_bits(0x7F), None);

        // Every table entry is distinct, so every speed maps back to its bits
        assert_eq!(PlaybackSpeed::supported().count(), 0x7F);
        for bits in 0..0x7F {
            let speed = PlaybackSpeed::from_bits(bits).unwrap();
            assert_eq!(speed.to_bits(), Some(bits));
        }
        assert_eq!(PlaybackSpeed::new(2, 3).unwrap().to_bits(), None);
    }

    #[test]
    fn speed_text() {
        assert_eq!(PlaybackSpeed::from_str("1/2").unwrap().to_bits(), Some(0x10));
        assert_eq!(PlaybackSpeed::from_str("2/4").unwrap().to_string(), "1/2");
        assert_eq!(PlaybackSpeed::from_str("0.5").unwrap(), PlaybackSpeed::new(1, 2).unwrap());
        assert_eq!(PlaybackSpeed::from_str("3").unwrap().to_string(), "3");
        assert_eq!(PlaybackSpeed::from_str("0").unwrap().to_string(), "0");
        assert!(PlaybackSpeed::from_str("1/0").is_err());
        assert!(PlaybackSpeed::from_str("-1").is_err());
        assert!(PlaybackSpeed::from_str("fast").is_err());
    }

    #[test]
    fn every_valid_byte_pattern_round_trips() {
        for value in 0..=255u8 {
            let data = [value, value, value, value];
            let asc = AauxSourceControl::decode(&data, DvSystem::Sys625_50).unwrap();
            if asc.recording_mode.is_none() {
                assert_eq!(
                    asc.validate(DvSystem::Sys625_50).unwrap_err().to_string(),
                    "Recording mode is required."
                );
                continue;
            }
            assert!(asc.validate(DvSystem::Sys625_50).is_ok());
            assert_eq!(asc.encode(DvSystem::Sys625_50), data);
        }
    }

    #[test]
    fn validation_messages() {
        let asc = AauxSourceControl::decode(&NORMAL_PLAY, DvSystem::Sys525_60).unwrap();
        let bad = AauxSourceControl {
            playback_speed: PlaybackSpeed::new(2, 3),
            ..asc
        };
        assert_eq!(
            bad.validate(DvSystem::Sys525_60).unwrap_err().to_string(),
            "Unsupported playback speed selected.  Only certain fractional values allowed."
        );
        let bad = AauxSourceControl {
            reserved: Some(2),
            ..asc
        };
        assert_eq!(
            bad.validate(DvSystem::Sys525_60).unwrap_err().to_string(),
            "Reserved field is out of range."
        );
        let bad = AauxSourceControl {
            direction: None,
            ..asc
        };
        assert_eq!(
            bad.validate(DvSystem::Sys525_60).unwrap_err().to_string(),
            "Direction field is required."
        );
    }

    #[test]
    fn text_fields() {
        let asc = AauxSourceControl::decode(&NORMAL_PLAY, DvSystem::Sys525_60).unwrap();
        let values = asc.to_text_values();
        assert_eq!(values.len(), 12);
        assert_eq!(values[0].1, "NO_RESTRICTION");
        assert_eq!(values[6].1, "ORIGINAL");
        assert_eq!(values[7].1, "");
        assert_eq!(values[10], (AauxSourceControlField::PlaybackSpeed, "1".to_string()));

        let pairs: Vec<_> = values.iter().map(|(f, t)| (*f, t.as_str())).collect();
        assert_eq!(AauxSourceControl::parse_text_values(&pairs).unwrap(), asc);
    }
}
