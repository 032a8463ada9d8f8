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

    src/pack/timecode.rs

    Timecode packs: TITLE TIMECODE, AAUX REC TIME and VAUX REC TIME.

    Byte 1: CF | DF | Frame tens(2) | Frame units(4)
    Byte 2: PC2 | Second tens(3) | Second units(4)
    Byte 3: PC3 | Minute tens(3) | Minute units(4)
    Byte 4: PC4 | BGF1 | Hour tens(2) | Hour units(4)

    The PC2-PC4 bits hold the polarity correction and two of the binary
    group flags, in an order that depends on the video system.
*/
use crate::{
    pack::{PackCodec, PackError, TextField, TextFields},
    types::enums::{BlankFlag, DvSystem},
    util::{decode_optional_bcd, encode_optional_bcd, optional_hex, optional_text, parse_int_max, parse_name},
};
use regex::Regex;
use std::{
    fmt,
    fmt::{Display, Formatter},
};

const TIMECODE_REX: &str = r"^(\d{2}):(\d{2}):(\d{2})(([:;])(\d{2}))?$";

#[repr(u8)]
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, strum::EnumIter, strum::EnumString, strum::Display, strum::FromRepr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ColorFrame {
    Unsynchronized = 0,
    Synchronized = 1,
}

/// Biphase mark polarity correction.
#[repr(u8)]
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, strum::EnumIter, strum::EnumString, strum::Display, strum::FromRepr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PolarityCorrection {
    Even = 0,
    Odd = 1,
}

/// The main time value of a timecode pack. Hours, minutes and seconds are present or absent
/// together; frames may be absent on their own.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClockTime {
    pub hour: Option<u8>,
    pub minute: Option<u8>,
    pub second: Option<u8>,
    pub frame: Option<u8>,
    pub drop_frame: Option<bool>,
}

impl ClockTime {
    pub fn new(hour: u8, minute: u8, second: u8, frame: u8, drop_frame: bool) -> ClockTime {
        ClockTime {
            hour: Some(hour),
            minute: Some(minute),
            second: Some(second),
            frame: Some(frame),
            drop_frame: Some(drop_frame),
        }
    }

    fn time_present(&self) -> bool {
        self.hour.is_some() && self.minute.is_some() && self.second.is_some()
    }

    fn time_absent(&self) -> bool {
        self.hour.is_none() && self.minute.is_none() && self.second.is_none()
    }

    /// Parse `HH:MM:SS`, `HH:MM:SS:FF` or `HH:MM:SS;FF`. A `;` frame separator marks drop frame
    /// timecode. The drop frame flag is also set when the frame number is omitted, since that is
    /// how cameras record it.
    pub fn parse_text(text: &str) -> Result<ClockTime, PackError> {
        if text.is_empty() {
            return Ok(ClockTime {
                drop_frame: Some(true),
                ..ClockTime::default()
            });
        }

        let re = Regex::new(TIMECODE_REX).map_err(|_| PackError::text_parse("timecode", text))?;
        let caps = re.captures(text).ok_or_else(|| PackError::text_parse("timecode", text))?;
        let number = |i: usize| -> Result<Option<u8>, PackError> {
            caps.get(i)
                .map(|m| m.as_str().parse::<u8>())
                .transpose()
                .map_err(|_| PackError::text_parse("timecode", text))
        };

        Ok(ClockTime {
            hour: number(1)?,
            minute: number(2)?,
            second: number(3)?,
            frame: number(6)?,
            drop_frame: Some(caps.get(5).map_or(true, |sep| sep.as_str() == ";")),
        })
    }
}

impl Display for ClockTime {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let (Some(hour), Some(minute), Some(second)) = (self.hour, self.minute, self.second)
        else {
            return Ok(());
        };
        write!(f, "{:02}:{:02}:{:02}", hour, minute, second)?;
        match (self.frame, self.drop_frame) {
            (Some(frame), Some(true)) => write!(f, ";{:02}", frame),
            (Some(frame), _) => write!(f, ":{:02}", frame),
            (None, _) => Ok(()),
        }
    }
}

/// The contents of an AAUX or VAUX recording time pack, and the common part of the title
/// timecode pack.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timecode {
    pub time: ClockTime,
    pub color_frame: Option<ColorFrame>,
    pub polarity_correction: Option<PolarityCorrection>,
    /// Three binary group flag bits, 0-7.
    pub binary_group_flags: Option<u8>,
}

impl Timecode {
    fn check(&self, system: DvSystem, time_required: bool) -> Result<(), PackError> {
        let t = &self.time;
        if !t.time_present() && !t.time_absent() {
            return Err(PackError::invalid(
                "All main time fields must be fully present or fully absent.",
            ));
        }
        if t.frame.is_some() && t.time_absent() {
            return Err(PackError::invalid(
                "Frame numbers cannot be given if the rest of the time is missing.",
            ));
        }
        if time_required && t.time_absent() {
            return Err(PackError::invalid("A time value is required but was not given."));
        }
        if time_required && t.frame.is_none() {
            return Err(PackError::invalid("A frame number must be given with the time value."));
        }
        if t.drop_frame.is_none()
            || self.color_frame.is_none()
            || self.polarity_correction.is_none()
            || self.binary_group_flags.is_none()
        {
            return Err(PackError::invalid(
                "All auxiliary SMPTE timecode fields must be provided.",
            ));
        }

        if let (Some(hour), Some(minute), Some(second)) = (t.hour, t.minute, t.second) {
            if hour >= 24 || minute >= 60 || second >= 60 {
                return Err(PackError::invalid("The time field has an invalid range."));
            }
        }

        if let (Some(frame), Some(minute), Some(second)) = (t.frame, t.minute, t.second) {
            if frame >= system.frames_per_second() {
                return Err(PackError::invalid(match system {
                    DvSystem::Sys525_60 => "The frame number is too high for the given NTSC frame rate.",
                    DvSystem::Sys625_50 => "The frame number is too high for the given PAL/SECAM frame rate.",
                }));
            }
            let drop_frame = t.drop_frame == Some(true);
            if drop_frame && system == DvSystem::Sys625_50 {
                return Err(PackError::invalid(
                    "The drop frame flag was set, but this does not make sense for PAL/SECAM.",
                ));
            }
            if drop_frame && minute % 10 > 0 && second == 0 && frame < 2 {
                return Err(PackError::invalid(
                    "The drop frame flag was set, but a dropped frame number was provided.",
                ));
            }
        }

        if self.binary_group_flags.is_some_and(|flags| flags > 0x7) {
            return Err(PackError::invalid("Binary group flags are out of range."));
        }
        Ok(())
    }

    /// Return a copy with the time advanced by one frame.
    ///
    /// Frames roll over at the system frame rate, and 24:00:00:00 wraps to midnight. With drop
    /// frame timecode, frames 0 and 1 are skipped at the start of every minute that is not a
    /// multiple of ten.
    pub fn increment_frame(&self, system: DvSystem) -> Result<Timecode, PackError> {
        let t = &self.time;
        let (Some(mut h), Some(mut m), Some(mut s), Some(mut f), Some(drop_frame)) =
            (t.hour, t.minute, t.second, t.frame, t.drop_frame)
        else {
            return Err(PackError::invalid("Cannot increment a time pack with no time in it."));
        };
        if drop_frame && system != DvSystem::Sys525_60 {
            return Err(PackError::invalid(
                "Drop frame flag is set on PAL/SECAM video, which probably doesn't make sense.",
            ));
        }
        // The auxiliary fields may be absent here, so only the time itself is range checked.
        if h >= 24 || m >= 60 || s >= 60 || f >= system.frames_per_second() {
            return Err(PackError::invalid("Cannot increment a time value that is out of range."));
        }

        f += 1;
        if f == system.frames_per_second() {
            s += 1;
            f = 0;
        }
        if s == 60 {
            m += 1;
            s = 0;
        }
        if m == 60 {
            h += 1;
            m = 0;
        }
        if h == 24 {
            (h, m, s, f) = (0, 0, 0, 0);
        }

        if drop_frame && f <= 1 && s == 0 && m % 10 > 0 {
            f = 2;
        }

        Ok(Timecode {
            time: ClockTime {
                hour: Some(h),
                minute: Some(m),
                second: Some(s),
                frame: Some(f),
                drop_frame: Some(drop_frame),
            },
            ..*self
        })
    }

    fn decode_bits(data: &[u8; 4], system: DvSystem) -> Option<Timecode> {
        let [b1, b2, b3, b4] = *data;
        let frame = decode_optional_bcd((b1 >> 4) & 0x03, b1 & 0x0F, 0x3, 2)?;
        let second = decode_optional_bcd((b2 >> 4) & 0x07, b2 & 0x0F, 0x7, 5)?;
        let minute = decode_optional_bcd((b3 >> 4) & 0x07, b3 & 0x0F, 0x7, 5)?;
        let hour = decode_optional_bcd((b4 >> 4) & 0x03, b4 & 0x0F, 0x3, 2)?;

        let (pc2, pc3, pc4) = (b2 >> 7, b3 >> 7, b4 >> 7);
        let bgf1 = (b4 >> 6) & 0x01;
        let (pc, bgf0, bgf2) = match system {
            DvSystem::Sys525_60 => (pc2, pc3, pc4),
            DvSystem::Sys625_50 => (pc4, pc2, pc3),
        };

        log::trace!("decode_bits(): timecode {:02X?} pc:{} bgf:{}{}{}", data, pc, bgf2, bgf1, bgf0);
        Some(Timecode {
            time: ClockTime {
                hour,
                minute,
                second,
                frame,
                drop_frame: Some((b1 >> 6) & 0x01 == 1),
            },
            color_frame: ColorFrame::from_repr(b1 >> 7),
            polarity_correction: PolarityCorrection::from_repr(pc),
            binary_group_flags: Some(bgf2 << 2 | bgf1 << 1 | bgf0),
        })
    }

    /// Encode the pack bits. The color frame bit is passed in, since the title timecode pack
    /// shares it with the blank flag.
    fn encode_bits(&self, cf: u8, system: DvSystem) -> [u8; 4] {
        let t = &self.time;
        let df = u8::from(t.drop_frame == Some(true));
        let pc = self.polarity_correction.map_or(0, |p| p as u8);
        let bgf = self.binary_group_flags.unwrap_or(0);
        let (bgf0, bgf1, bgf2) = (bgf & 0x01, (bgf >> 1) & 0x01, (bgf >> 2) & 0x01);
        let (pc2, pc3, pc4) = match system {
            DvSystem::Sys525_60 => (pc, bgf0, bgf2),
            DvSystem::Sys625_50 => (bgf0, bgf2, pc),
        };

        let (ft, fu) = encode_optional_bcd(t.frame, 0x3);
        let (st, su) = encode_optional_bcd(t.second, 0x7);
        let (mt, mu) = encode_optional_bcd(t.minute, 0x7);
        let (ht, hu) = encode_optional_bcd(t.hour, 0x3);
        [
            cf << 7 | df << 6 | ft << 4 | fu,
            pc2 << 7 | st << 4 | su,
            pc3 << 7 | mt << 4 | mu,
            pc4 << 7 | bgf1 << 6 | ht << 4 | hu,
        ]
    }
}

impl PackCodec for Timecode {
    fn decode(data: &[u8; 4], system: DvSystem) -> Option<Self> {
        Timecode::decode_bits(data, system)
    }

    fn validate(&self, system: DvSystem) -> Result<(), PackError> {
        self.check(system, false)
    }

    fn encode(&self, system: DvSystem) -> [u8; 4] {
        self.encode_bits(self.color_frame.map_or(0, |cf| cf as u8), system)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, strum::EnumIter, strum::EnumString, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum TimecodeField {
    #[strum(serialize = "")]
    Main,
    ColorFrame,
    PolarityCorrection,
    BinaryGroupFlags,
}

impl TextField for TimecodeField {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TimecodeValue {
    Main(ClockTime),
    ColorFrame(Option<ColorFrame>),
    PolarityCorrection(Option<PolarityCorrection>),
    BinaryGroupFlags(Option<u8>),
}

impl TextFields for Timecode {
    type Field = TimecodeField;
    type Value = TimecodeValue;

    fn field_value(&self, field: TimecodeField) -> TimecodeValue {
        match field {
            TimecodeField::Main => TimecodeValue::Main(self.time),
            TimecodeField::ColorFrame => TimecodeValue::ColorFrame(self.color_frame),
            TimecodeField::PolarityCorrection => TimecodeValue::PolarityCorrection(self.polarity_correction),
            TimecodeField::BinaryGroupFlags => TimecodeValue::BinaryGroupFlags(self.binary_group_flags),
        }
    }

    fn with_field_value(&self, value: TimecodeValue) -> Self {
        match value {
            TimecodeValue::Main(time) => Timecode { time, ..*self },
            TimecodeValue::ColorFrame(color_frame) => Timecode { color_frame, ..*self },
            TimecodeValue::PolarityCorrection(polarity_correction) => Timecode {
                polarity_correction,
                ..*self
            },
            TimecodeValue::BinaryGroupFlags(binary_group_flags) => Timecode {
                binary_group_flags,
                ..*self
            },
        }
    }

    fn parse_text(field: TimecodeField, text: &str) -> Result<TimecodeValue, PackError> {
        Ok(match field {
            TimecodeField::Main => TimecodeValue::Main(ClockTime::parse_text(text)?),
            TimecodeField::ColorFrame => TimecodeValue::ColorFrame(parse_name("color frame", text)?),
            TimecodeField::PolarityCorrection => {
                TimecodeValue::PolarityCorrection(parse_name("polarity correction", text)?)
            }
            TimecodeField::BinaryGroupFlags => TimecodeValue::BinaryGroupFlags(
                parse_int_max("binary group flags", text, 0xFF)?.map(|v| v as u8),
            ),
        })
    }

    fn to_text(value: &TimecodeValue) -> String {
        match value {
            TimecodeValue::Main(time) => time.to_string(),
            TimecodeValue::ColorFrame(color_frame) => optional_text(color_frame),
            TimecodeValue::PolarityCorrection(pc) => optional_text(pc),
            TimecodeValue::BinaryGroupFlags(flags) => optional_hex(flags.map(u32::from), 1),
        }
    }
}

/// The title timecode pack. When no title binary group pack is recorded, the color frame bit
/// holds the blank flag instead; both are kept and must agree.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TitleTimecode {
    pub timecode: Timecode,
    pub blank_flag: Option<BlankFlag>,
}

impl TitleTimecode {
    pub fn increment_frame(&self, system: DvSystem) -> Result<TitleTimecode, PackError> {
        Ok(TitleTimecode {
            timecode: self.timecode.increment_frame(system)?,
            ..*self
        })
    }
}

impl PackCodec for TitleTimecode {
    fn decode(data: &[u8; 4], system: DvSystem) -> Option<Self> {
        Some(TitleTimecode {
            timecode: Timecode::decode_bits(data, system)?,
            blank_flag: BlankFlag::from_repr(data[0] >> 7),
        })
    }

    fn validate(&self, system: DvSystem) -> Result<(), PackError> {
        self.timecode.check(system, true)?;
        let blank_flag = self
            .blank_flag
            .ok_or_else(|| PackError::invalid("A value for the blank flag must be provided."))?;
        let color_frame = self.timecode.color_frame.map_or(0, |cf| cf as u8);
        if blank_flag as u8 != color_frame {
            return Err(PackError::invalid(format!(
                "Blank flag integer value of {} must be equal to the color frame flag integer value of {}, \
                 because they occupy the same physical bit positions on the tape.  \
                 Change one value to match the other.",
                blank_flag as u8, color_frame
            )));
        }
        Ok(())
    }

    fn encode(&self, system: DvSystem) -> [u8; 4] {
        self.timecode
            .encode_bits(self.blank_flag.map_or(0, |bf| bf as u8), system)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, strum::EnumIter, strum::EnumString, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum TitleTimecodeField {
    #[strum(serialize = "")]
    Main,
    ColorFrame,
    PolarityCorrection,
    BinaryGroupFlags,
    BlankFlag,
}

impl TextField for TitleTimecodeField {}

impl TitleTimecodeField {
    fn timecode_field(self) -> Option<TimecodeField> {
        match self {
            TitleTimecodeField::Main => Some(TimecodeField::Main),
            TitleTimecodeField::ColorFrame => Some(TimecodeField::ColorFrame),
            TitleTimecodeField::PolarityCorrection => Some(TimecodeField::PolarityCorrection),
            TitleTimecodeField::BinaryGroupFlags => Some(TimecodeField::BinaryGroupFlags),
            TitleTimecodeField::BlankFlag => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TitleTimecodeValue {
    Timecode(TimecodeValue),
    BlankFlag(Option<BlankFlag>),
}

impl TextFields for TitleTimecode {
    type Field = TitleTimecodeField;
    type Value = TitleTimecodeValue;

    fn field_value(&self, field: TitleTimecodeField) -> TitleTimecodeValue {
        match field.timecode_field() {
            Some(field) => TitleTimecodeValue::Timecode(self.timecode.field_value(field)),
            None => TitleTimecodeValue::BlankFlag(self.blank_flag),
        }
    }

    fn with_field_value(&self, value: TitleTimecodeValue) -> Self {
        match value {
            TitleTimecodeValue::Timecode(value) => TitleTimecode {
                timecode: self.timecode.with_field_value(value),
                ..*self
            },
            TitleTimecodeValue::BlankFlag(blank_flag) => TitleTimecode { blank_flag, ..*self },
        }
    }

    fn parse_text(field: TitleTimecodeField, text: &str) -> Result<TitleTimecodeValue, PackError> {
        match field.timecode_field() {
            Some(field) => Ok(TitleTimecodeValue::Timecode(Timecode::parse_text(field, text)?)),
            None => Ok(TitleTimecodeValue::BlankFlag(parse_name("blank flag", text)?)),
        }
    }

    fn to_text(value: &TitleTimecodeValue) -> String {
        match value {
            TitleTimecodeValue::Timecode(value) => Timecode::to_text(value),
            TitleTimecodeValue::BlankFlag(blank_flag) => optional_text(blank_flag),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ntsc_title(hour: u8, minute: u8, second: u8, frame: u8, drop_frame: bool) -> TitleTimecode {
        TitleTimecode {
            timecode:   Timecode {
                time: ClockTime::new(hour, minute, second, frame, drop_frame),
                color_frame: Some(ColorFrame::Synchronized),
                polarity_correction: Some(PolarityCorrection::Odd),
                binary_group_flags: Some(0x7),
            },
            blank_flag: Some(BlankFlag::Continuous),
        }
    }

    #[test]
    fn decode_title_timecode_ntsc() {
        let tc = TitleTimecode::decode(&[0xC4, 0x83, 0x82, 0xC1], DvSystem::Sys525_60).unwrap();
        assert_eq!(tc, ntsc_title(1, 2, 3, 4, true));
        assert!(tc.validate(DvSystem::Sys525_60).is_ok());
        assert_eq!(tc.encode(DvSystem::Sys525_60), [0xC4, 0x83, 0x82, 0xC1]);
        assert_eq!(tc.timecode.time.to_string(), "01:02:03;04");
    }

    #[test]
    fn binary_group_flag_bits_depend_on_system() {
        let data = [0x04, 0x03, 0x82, 0xC1];
        let ntsc = Timecode::decode(&data, DvSystem::Sys525_60).unwrap();
        assert_eq!(ntsc.polarity_correction, Some(PolarityCorrection::Even));
        assert_eq!(ntsc.binary_group_flags, Some(0b111));

        let pal = Timecode::decode(&data, DvSystem::Sys625_50).unwrap();
        assert_eq!(pal.polarity_correction, Some(PolarityCorrection::Odd));
        assert_eq!(pal.binary_group_flags, Some(0b110));
        assert!(pal.validate(DvSystem::Sys625_50).is_ok());
        assert_eq!(pal.encode(DvSystem::Sys625_50), data);
    }

    #[test]
    fn absent_time_is_allowed_for_recording_time() {
        let tc = Timecode::decode(&[0xFF; 4], DvSystem::Sys525_60).unwrap();
        assert_eq!(tc.time.hour, None);
        assert_eq!(tc.time.frame, None);
        assert!(tc.validate(DvSystem::Sys525_60).is_ok());
        assert_eq!(tc.encode(DvSystem::Sys525_60), [0xFF; 4]);
        assert_eq!(tc.to_text_values()[0], (TimecodeField::Main, String::new()));

        let title = TitleTimecode::decode(&[0xFF; 4], DvSystem::Sys525_60).unwrap();
        assert_eq!(
            title.validate(DvSystem::Sys525_60).unwrap_err().to_string(),
            "A time value is required but was not given."
        );
    }

    #[test]
    fn out_of_range_digits_are_malformed() {
        assert!(Timecode::decode(&[0xFF, 0xFA, 0xFF, 0xFF], DvSystem::Sys525_60).is_none());
        assert!(Timecode::decode(&[0x0A, 0x00, 0x00, 0x00], DvSystem::Sys525_60).is_none());
        assert!(Timecode::decode(&[0x00, 0x00, 0x00, 0x30], DvSystem::Sys525_60).is_none());
    }

    #[test]
    fn validation_messages() {
        let tc = ntsc_title(1, 2, 3, 4, true);
        let invalid = |tc: TitleTimecode, system| tc.validate(system).unwrap_err().to_string();

        let mut partial = tc;
        partial.timecode.time.minute = None;
        assert_eq!(
            invalid(partial, DvSystem::Sys525_60),
            "All main time fields must be fully present or fully absent."
        );
        assert_eq!(
            invalid(ntsc_title(24, 0, 0, 0, false), DvSystem::Sys525_60),
            "The time field has an invalid range."
        );
        assert_eq!(
            invalid(ntsc_title(1, 0, 0, 29, false), DvSystem::Sys625_50),
            "The frame number is too high for the given PAL/SECAM frame rate."
        );
        assert_eq!(
            invalid(ntsc_title(1, 0, 0, 10, true), DvSystem::Sys625_50),
            "The drop frame flag was set, but this does not make sense for PAL/SECAM."
        );
        assert_eq!(
            invalid(ntsc_title(1, 1, 0, 1, true), DvSystem::Sys525_60),
            "The drop frame flag was set, but a dropped frame number was provided."
        );
        assert!(ntsc_title(1, 10, 0, 1, true).validate(DvSystem::Sys525_60).is_ok());

        let mut mismatch = tc;
        mismatch.blank_flag = Some(BlankFlag::Discontinuous);
        assert!(invalid(mismatch, DvSystem::Sys525_60).starts_with("Blank flag integer value of 0 must be equal"));
    }

    #[test]
    fn increment_wraps_at_midnight() {
        let tc = ntsc_title(23, 59, 59, 29, false)
            .increment_frame(DvSystem::Sys525_60)
            .unwrap();
        assert_eq!(tc.timecode.time, ClockTime::new(0, 0, 0, 0, false));

        let tc = ntsc_title(0, 0, 0, 24, false).timecode;
        let pal = tc.increment_frame(DvSystem::Sys625_50).unwrap();
        assert_eq!(pal.time, ClockTime::new(0, 0, 1, 0, false));
    }

    #[test]
    fn increment_requires_a_time() {
        let err = Timecode::default().increment_frame(DvSystem::Sys525_60).unwrap_err();
        assert_eq!(err.to_string(), "Cannot increment a time pack with no time in it.");
        assert!(ntsc_title(0, 0, 0, 0, true)
            .increment_frame(DvSystem::Sys625_50)
            .is_err());
    }

    #[test]
    fn increment_rejects_out_of_range_time() {
        let system = DvSystem::Sys525_60;
        let time_only = |time: ClockTime| Timecode {
            time,
            ..Timecode::default()
        };

        let tc = time_only(ClockTime::new(1, 2, 3, 4, false)).increment_frame(system).unwrap();
        assert_eq!(tc.time, ClockTime::new(1, 2, 3, 5, false));
        assert_eq!(tc.color_frame, None);

        for time in [
            ClockTime::new(0, 0, 0, 255, false),
            ClockTime::new(0, 0, 0, 30, false),
            ClockTime::new(0, 0, 61, 0, false),
            ClockTime::new(0, 255, 0, 0, false),
            ClockTime::new(24, 0, 0, 0, false),
        ] {
            assert_eq!(
                time_only(time).increment_frame(system).unwrap_err().to_string(),
                "Cannot increment a time value that is out of range."
            );
        }
        assert!(time_only(ClockTime::new(0, 0, 0, 25, false))
            .increment_frame(DvSystem::Sys625_50)
            .is_err());
    }

    #[test]
    fn clock_time_text() {
        let time = ClockTime::parse_text("12:34:56:12").unwrap();
        assert_eq!(time, ClockTime::new(12, 34, 56, 12, false));
        assert_eq!(time.to_string(), "12:34:56:12");

        let time = ClockTime::parse_text("12:34:56").unwrap();
        assert_eq!(time.frame, None);
        assert_eq!(time.drop_frame, Some(true));
        assert_eq!(time.to_string(), "12:34:56");

        assert_eq!(ClockTime::parse_text("").unwrap().hour, None);
        assert_eq!(
            ClockTime::parse_text("1:2:3").unwrap_err().to_string(),
            "Parsing error while reading timecode 1:2:3."
        );
    }

    #[test]
    fn title_text_fields() {
        let tc = ntsc_title(1, 2, 3, 4, true);
        let values = tc.to_text_values();
        let names: Vec<_> = values.iter().map(|(f, _)| f.name()).collect();
        assert_eq!(
            names,
            vec![
                None,
                Some("color_frame"),
                Some("polarity_correction"),
                Some("binary_group_flags"),
                Some("blank_flag")
            ]
        );
        let text: Vec<_> = values.iter().map(|(_, t)| t.as_str()).collect();
        assert_eq!(text, vec!["01:02:03;04", "SYNCHRONIZED", "ODD", "0x7", "CONTINUOUS"]);

        let pairs: Vec<_> = values.iter().map(|(f, t)| (*f, t.as_str())).collect();
        assert_eq!(TitleTimecode::parse_text_values(&pairs).unwrap(), tc);

        let edited = tc.with_field_value(TitleTimecode::parse_text(TitleTimecodeField::Main, "10:00:00;00").unwrap());
        assert_eq!(edited.timecode.time, ClockTime::new(10, 0, 0, 0, true));
        assert_eq!(TitleTimecodeField::from_name(Some("blank_flag")), Some(TitleTimecodeField::BlankFlag));
        assert_eq!(TitleTimecodeField::from_name(None), Some(TitleTimecodeField::Main));
        assert_eq!(TitleTimecodeField::from_name(Some("bogus")), None);
    }
}
