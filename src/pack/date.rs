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

    src/pack/date.rs

    Recording date packs: AAUX REC DATE and VAUX REC DATE.

    Byte 1: DS | TM | TZ tens(2) | TZ units(4)
    Byte 2: Reserved(2) | Day tens(2) | Day units(4)
    Byte 3: Week(3) | Month tens(1) | Month units(4)
    Byte 4: Year tens(4) | Year units(4)

    Two digit years below 75 are in the 2000s.
*/
use crate::{
    pack::{PackCodec, PackError, TextField, TextFields},
    types::enums::DvSystem,
    util::{decode_optional_bcd, encode_optional_bcd, optional_hex, optional_text, parse_int_max, parse_name},
};
use regex::Regex;

const DATE_REX: &str = r"^(\d{4})-(\d{2})-(\d{2})$";
const TIME_ZONE_REX: &str = r"^(\d{2}):(\d{2})$";

const FIRST_YEAR: u16 = 1975;
const LAST_YEAR: u16 = 2074;

/// Day of the week, counted from Monday as recorded by consumer camcorders.
#[repr(u8)]
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, strum::EnumIter, strum::EnumString, strum::Display, strum::FromRepr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Week {
    Monday = 0,
    Tuesday = 1,
    Wednesday = 2,
    Thursday = 3,
    Friday = 4,
    Saturday = 5,
    Sunday = 6,
}

#[repr(u8)]
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, strum::EnumIter, strum::EnumString, strum::Display, strum::FromRepr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DaylightSavingTime {
    Dst = 0,
    Normal = 1,
}

fn is_leap_year(year: u16) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: u16, month: u8) -> u8 {
    match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Return the day of the week of a valid calendar date.
pub fn weekday(year: u16, month: u8, day: u8) -> Week {
    const MONTH_OFFSETS: [u32; 12] = [0, 3, 2, 5, 0, 3, 5, 1, 4, 6, 2, 4];
    let month = month.clamp(1, 12);
    let y = u32::from(if month < 3 { year.saturating_sub(1) } else { year });
    // 0 is Sunday here
    let sunday_based =
        (y + y / 4 - y / 100 + y / 400 + MONTH_OFFSETS[(month - 1) as usize] + u32::from(day)) % 7;
    Week::from_repr(((sunday_based + 6) % 7) as u8).unwrap_or(Week::Sunday)
}

/// The contents of a recording date pack.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RecordingDate {
    pub year: Option<u16>,
    pub month: Option<u8>,
    pub day: Option<u8>,
    pub week: Option<Week>,
    pub time_zone_hours: Option<u8>,
    pub time_zone_30_minutes: Option<bool>,
    pub daylight_saving_time: Option<DaylightSavingTime>,
    /// Normally 0x3.
    pub reserved: Option<u8>,
}

impl PackCodec for RecordingDate {
    fn decode(data: &[u8; 4], _system: DvSystem) -> Option<Self> {
        let [b1, b2, b3, b4] = *data;

        // The DS and TM bits are ignored without a time zone, and written back as ones.
        let time_zone_hours = decode_optional_bcd((b1 >> 4) & 0x03, b1 & 0x0F, 0x3, 2)?;
        let (time_zone_30_minutes, daylight_saving_time) = match time_zone_hours {
            Some(_) => (
                Some((b1 >> 6) & 0x01 == 0),
                DaylightSavingTime::from_repr(b1 >> 7),
            ),
            None => (None, None),
        };

        let day = decode_optional_bcd((b2 >> 4) & 0x03, b2 & 0x0F, 0x3, 3)?;
        let month = decode_optional_bcd((b3 >> 4) & 0x01, b3 & 0x0F, 0x1, 1)?;
        let year = decode_optional_bcd(b4 >> 4, b4 & 0x0F, 0xF, 9)?.map(|short| {
            let short = u16::from(short);
            if short < 75 {
                2000 + short
            }
            else {
                1900 + short
            }
        });

        Some(RecordingDate {
            year,
            month,
            day,
            week: Week::from_repr(b3 >> 5),
            time_zone_hours,
            time_zone_30_minutes,
            daylight_saving_time,
            reserved: Some(b2 >> 6),
        })
    }

    fn validate(&self, _system: DvSystem) -> Result<(), PackError> {
        let present = self.year.is_some() && self.month.is_some() && self.day.is_some();
        let absent = self.year.is_none() && self.month.is_none() && self.day.is_none();
        if !present && !absent {
            return Err(PackError::invalid(
                "All main date fields must be fully present or fully absent.",
            ));
        }
        if absent && self.week.is_some() {
            return Err(PackError::invalid(
                "A weekday must not be provided if the date is otherwise absent.",
            ));
        }

        if let (Some(year), Some(month), Some(day)) = (self.year, self.month, self.day) {
            if year == 0 || !(1..=12).contains(&month) || day == 0 || day > days_in_month(year, month) {
                return Err(PackError::invalid("The date field has an invalid range."));
            }
            if self.week.is_some_and(|week| week != weekday(year, month, day)) {
                return Err(PackError::invalid("The weekday is incorrect for the given date."));
            }
            if !(FIRST_YEAR..=LAST_YEAR).contains(&year) {
                return Err(PackError::invalid(
                    "The year is too far into the future or the past.",
                ));
            }
        }

        let tz_present = self.time_zone_hours.is_some()
            && self.time_zone_30_minutes.is_some()
            && self.daylight_saving_time.is_some();
        let tz_absent = self.time_zone_hours.is_none()
            && self.time_zone_30_minutes.is_none()
            && self.daylight_saving_time.is_none();
        if !tz_present && !tz_absent {
            return Err(PackError::invalid(
                "All main time zone fields must be fully present or fully absent.",
            ));
        }
        if self.time_zone_hours.is_some_and(|hours| hours >= 24) {
            return Err(PackError::invalid("Time zone hours are out of range."));
        }

        match self.reserved {
            None => Err(PackError::invalid(
                "Reserved bits are required.  They should be 0x3 per the standard.",
            )),
            Some(reserved) if reserved > 0x3 => Err(PackError::invalid("Reserved bits are out of range.")),
            Some(_) => Ok(()),
        }
    }

    fn encode(&self, _system: DvSystem) -> [u8; 4] {
        let ds = u8::from(self.daylight_saving_time != Some(DaylightSavingTime::Dst));
        let tm = u8::from(self.time_zone_30_minutes != Some(true));
        let (tzt, tzu) = encode_optional_bcd(self.time_zone_hours, 0x3);
        let (dt, du) = encode_optional_bcd(self.day, 0x3);
        let (mt, mu) = encode_optional_bcd(self.month, 0x1);
        let (yt, yu) = encode_optional_bcd(self.year.map(|year| (year % 100) as u8), 0xF);
        let week = self.week.map_or(0x7, |week| week as u8);
        [
            ds << 7 | tm << 6 | tzt << 4 | tzu,
            self.reserved.unwrap_or(0x3) << 6 | dt << 4 | du,
            week << 5 | mt << 4 | mu,
            yt << 4 | yu,
        ]
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, strum::EnumIter, strum::EnumString, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum DateField {
    #[strum(serialize = "")]
    Main,
    Week,
    #[strum(serialize = "tz")]
    TimeZone,
    #[strum(serialize = "dst")]
    DaylightSavingTime,
    Reserved,
}

impl TextField for DateField {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DateValue {
    Main {
        year: Option<u16>,
        month: Option<u8>,
        day: Option<u8>,
    },
    Week(Option<Week>),
    TimeZone {
        hours: Option<u8>,
        thirty_minutes: Option<bool>,
    },
    DaylightSavingTime(Option<DaylightSavingTime>),
    Reserved(Option<u8>),
}

fn parse_date(text: &str) -> Result<DateValue, PackError> {
    if text.is_empty() {
        return Ok(DateValue::Main {
            year: None,
            month: None,
            day: None,
        });
    }
    let re = Regex::new(DATE_REX).map_err(|_| PackError::text_parse("date", text))?;
    let caps = re.captures(text).ok_or_else(|| PackError::text_parse("date", text))?;
    let bad = |_| PackError::text_parse("date", text);
    Ok(DateValue::Main {
        year: Some(caps[1].parse::<u16>().map_err(bad)?),
        month: Some(caps[2].parse::<u8>().map_err(bad)?),
        day: Some(caps[3].parse::<u8>().map_err(bad)?),
    })
}

fn parse_time_zone(text: &str) -> Result<DateValue, PackError> {
    if text.is_empty() {
        return Ok(DateValue::TimeZone {
            hours: None,
            thirty_minutes: None,
        });
    }
    let re = Regex::new(TIME_ZONE_REX).map_err(|_| PackError::text_parse("time zone", text))?;
    let caps = re.captures(text).ok_or_else(|| PackError::text_parse("time zone", text))?;
    let thirty_minutes = match &caps[2] {
        "00" => false,
        "30" => true,
        _ => return Err(PackError::invalid("Minutes portion of time zone must be 30 or 00.")),
    };
    let hours = caps[1]
        .parse::<u8>()
        .map_err(|_| PackError::text_parse("time zone", text))?;
    Ok(DateValue::TimeZone {
        hours: Some(hours),
        thirty_minutes: Some(thirty_minutes),
    })
}

impl TextFields for RecordingDate {
    type Field = DateField;
    type Value = DateValue;

    fn field_value(&self, field: DateField) -> DateValue {
        match field {
            DateField::Main => DateValue::Main {
                year:  self.year,
                month: self.month,
                day:   self.day,
            },
            DateField::Week => DateValue::Week(self.week),
            DateField::TimeZone => DateValue::TimeZone {
                hours: self.time_zone_hours,
                thirty_minutes: self.time_zone_30_minutes,
            },
            DateField::DaylightSavingTime => DateValue::DaylightSavingTime(self.daylight_saving_time),
            DateField::Reserved => DateValue::Reserved(self.reserved),
        }
    }

    fn with_field_value(&self, value: DateValue) -> Self {
        match value {
            DateValue::Main { year, month, day } => RecordingDate {
                year,
                month,
                day,
                ..*self
            },
            DateValue::Week(week) => RecordingDate { week, ..*self },
            DateValue::TimeZone { hours, thirty_minutes } => RecordingDate {
                time_zone_hours: hours,
                time_zone_30_minutes: thirty_minutes,
                ..*self
            },
            DateValue::DaylightSavingTime(daylight_saving_time) => RecordingDate {
                daylight_saving_time,
                ..*self
            },
            DateValue::Reserved(reserved) => RecordingDate { reserved, ..*self },
        }
    }

    fn parse_text(field: DateField, text: &str) -> Result<DateValue, PackError> {
        Ok(match field {
            DateField::Main => parse_date(text)?,
            DateField::Week => DateValue::Week(parse_name("week", text)?),
            DateField::TimeZone => parse_time_zone(text)?,
            DateField::DaylightSavingTime => DateValue::DaylightSavingTime(parse_name("daylight saving time", text)?),
            DateField::Reserved => DateValue::Reserved(parse_int_max("reserved bits", text, 0xFF)?.map(|v| v as u8)),
        })
    }

    fn to_text(value: &DateValue) -> String {
        match value {
            DateValue::Main {
                year: Some(year),
                month,
                day,
            } => format!(
                "{:04}-{:02}-{:02}",
                year,
                month.unwrap_or_default(),
                day.unwrap_or_default()
            ),
            DateValue::Main { year: None, .. } => String::new(),
            DateValue::Week(week) => optional_text(week),
            DateValue::TimeZone {
                hours: Some(hours),
                thirty_minutes,
            } => format!(
                "{:02}:{}",
                hours,
                if *thirty_minutes == Some(true) { "30" } else { "00" }
            ),
            DateValue::TimeZone { hours: None, .. } => String::new(),
            DateValue::DaylightSavingTime(dst) => optional_text(dst),
            DateValue::Reserved(reserved) => optional_hex(reserved.map(u32::from), 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    fn decode(data: [u8; 4]) -> Option<RecordingDate> {
        RecordingDate::decode(&data, DvSystem::Sys525_60)
    }

    #[test]
    fn weekday_calculation() {
        assert_eq!(weekday(1997, 8, 27), Week::Wednesday);
        assert_eq!(weekday(2063, 5, 17), Week::Thursday);
        assert_eq!(weekday(2000, 2, 29), Week::Tuesday);
        assert_eq!(weekday(1975, 1, 1), Week::Wednesday);
        assert_eq!(weekday(u16::MAX, 12, 31), Week::Tuesday);
        assert_eq!(weekday(60000, 3, 1), Week::Wednesday);
    }

    #[test]
    fn leap_years() {
        assert!(is_leap_year(2000));
        assert!(!is_leap_year(2100));
        assert!(is_leap_year(1996));
        assert_eq!(days_in_month(1997, 2), 28);
        assert_eq!(days_in_month(2004, 2), 29);
    }

    #[test]
    fn decode_full_date() {
        let date = decode([0xD9, 0xE7, 0x48, 0x97]).unwrap();
        assert_eq!(date.year, Some(1997));
        assert_eq!(date.month, Some(8));
        assert_eq!(date.day, Some(27));
        assert_eq!(date.week, Some(Week::Wednesday));
        assert_eq!(date.time_zone_hours, Some(19));
        assert_eq!(date.time_zone_30_minutes, Some(false));
        assert_eq!(date.daylight_saving_time, Some(DaylightSavingTime::Normal));
        assert_eq!(date.reserved, Some(3));
        assert!(date.validate(DvSystem::Sys525_60).is_ok());
        assert_eq!(date.encode(DvSystem::Sys525_60), [0xD9, 0xE7, 0x48, 0x97]);
    }

    #[test]
    fn wrong_weekday_is_invalid() {
        let date = decode([0xD9, 0xE7, 0x68, 0x97]).unwrap();
        assert_eq!(
            date.validate(DvSystem::Sys525_60).unwrap_err().to_string(),
            "The weekday is incorrect for the given date."
        );
    }

    #[test]
    fn time_zone_bits_without_time_zone_are_ignored() {
        let date = decode([0x3F, 0xD5, 0x68, 0x24]).unwrap();
        assert_eq!((date.year, date.month, date.day), (Some(2024), Some(8), Some(15)));
        assert_eq!(date.week, Some(Week::Thursday));
        assert_eq!(date.time_zone_hours, None);
        assert_eq!(date.time_zone_30_minutes, None);
        assert_eq!(date.daylight_saving_time, None);
        assert!(date.validate(DvSystem::Sys525_60).is_ok());
        assert_eq!(date.encode(DvSystem::Sys525_60), [0xFF, 0xD5, 0x68, 0x24]);

        assert_eq!(decode([0x7F, 0xFF, 0xFF, 0xFF]), decode([0xFF, 0xFF, 0xFF, 0xFF]));
    }

    #[test]
    fn date_range_checks() {
        let date = RecordingDate {
            year: Some(2001),
            month: Some(2),
            day: Some(29),
            reserved: Some(3),
            ..RecordingDate::default()
        };
        assert_eq!(
            date.validate(DvSystem::Sys525_60).unwrap_err().to_string(),
            "The date field has an invalid range."
        );

        let date = RecordingDate {
            year: Some(2075),
            day: Some(1),
            ..date
        };
        assert_eq!(
            date.validate(DvSystem::Sys525_60).unwrap_err().to_string(),
            "The year is too far into the future or the past."
        );

        let date = RecordingDate {
            year: Some(2001),
            day: Some(1),
            time_zone_hours: Some(3),
            ..date
        };
        assert_eq!(
            date.validate(DvSystem::Sys525_60).unwrap_err().to_string(),
            "All main time zone fields must be fully present or fully absent."
        );
    }

    #[test]
    fn date_text_fields() {
        let date = decode([0x85, 0x97, 0x65, 0x63]).unwrap();
        let text: Vec<_> = date.to_text_values().into_iter().map(|(_, t)| t).collect();
        assert_eq!(text, vec!["2063-05-17", "THURSDAY", "05:30", "NORMAL", "0x2"]);

        let names: Vec<_> = DateField::iter().map(|f| f.name()).collect();
        assert_eq!(names, vec![None, Some("week"), Some("tz"), Some("dst"), Some("reserved")]);

        let pairs = [
            (DateField::Main, "2063-05-17"),
            (DateField::Week, "THURSDAY"),
            (DateField::TimeZone, "05:30"),
            (DateField::DaylightSavingTime, "NORMAL"),
            (DateField::Reserved, "0x2"),
        ];
        assert_eq!(RecordingDate::parse_text_values(&pairs).unwrap(), date);
    }

    #[test]
    fn time_zone_text() {
        assert_eq!(
            RecordingDate::parse_text(DateField::TimeZone, "21:30").unwrap(),
            DateValue::TimeZone {
                hours: Some(21),
                thirty_minutes: Some(true),
            }
        );
        assert_eq!(
            RecordingDate::parse_text(DateField::TimeZone, "21:15")
                .unwrap_err()
                .to_string(),
            "Minutes portion of time zone must be 30 or 00."
        );
        assert_eq!(
            RecordingDate::parse_text(DateField::Main, "1997/08/27")
                .unwrap_err()
                .to_string(),
            "Parsing error while reading date 1997/08/27."
        );
    }
}
