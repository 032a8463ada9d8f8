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

    src/pack/mod.rs

    Packs: the five byte metadata records carried by subcode, VAUX and audio
    DIF blocks. The first byte of a pack is its type, and the remaining four
    bytes hold the pack data.
*/

/// Implement [`TextFields`] for a pack family where every text field maps to one struct member.
///
/// Each entry lists the field variant and the struct member with its value type, followed by a
/// parser from text to `Option<T>` and a formatter from `&Option<T>` to text. The family struct
/// must be `Copy`.
macro_rules! member_text_fields {
    (
        $pack:ident, $field:ident, $value:ident;
        $( $(#[$attr:meta])* $variant:ident($member:ident: $ty:ty) => $parse:expr, $text:expr; )+
    ) => {
        #[derive(
            Copy, Clone, Debug, PartialEq, Eq, Hash, strum::EnumIter, strum::EnumString, strum::IntoStaticStr,
        )]
        #[strum(serialize_all = "snake_case")]
        pub enum $field {
            $( $(#[$attr])* $variant, )+
        }

        impl $crate::pack::TextField for $field {}

        #[derive(Clone, Debug, PartialEq)]
        pub enum $value {
            $( $variant(Option<$ty>), )+
        }

        impl $crate::pack::TextFields for $pack {
            type Field = $field;
            type Value = $value;

            fn field_value(&self, field: $field) -> $value {
                match field {
                    $( $field::$variant => $value::$variant(self.$member), )+
                }
            }

            fn with_field_value(&self, value: $value) -> Self {
                match value {
                    $( $value::$variant($member) => $pack { $member, ..*self }, )+
                }
            }

            fn parse_text(field: $field, text: &str) -> Result<$value, $crate::pack::PackError> {
                Ok(match field {
                    $( $field::$variant => $value::$variant(($parse)(text)?), )+
                })
            }

            fn to_text(value: &$value) -> String {
                match value {
                    $( $value::$variant(v) => ($text)(v), )+
                }
            }
        }
    };
}

pub mod aaux_source;
pub mod aaux_source_control;
pub mod binary_group;
pub mod camera;
pub mod date;
mod dispatch;
pub mod shutter;
pub mod source_control;
pub mod timecode;
pub mod vaux_source;
pub mod vaux_source_control;

use crate::{
    pack::{
        aaux_source::AauxSource,
        aaux_source_control::AauxSourceControl,
        binary_group::BinaryGroup,
        camera::{CameraConsumer1, CameraConsumer2},
        date::RecordingDate,
        shutter::CameraShutter,
        timecode::{TitleTimecode, Timecode},
        vaux_source::VauxSource,
        vaux_source_control::VauxSourceControl,
    },
    types::enums::DvSystem,
    PACK_SIZE,
};
use std::{fmt::Debug, str::FromStr};
use strum::IntoEnumIterator;
use thiserror::Error;

/// Errors raised while decoding, validating, encoding or converting packs to and from text.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PackError {
    #[error("Pack data must be 5 bytes, but got {0} bytes.")]
    WrongSize(usize),
    #[error("The {0} pack contains malformed data.")]
    Malformed(PackType),
    #[error("{0}")]
    Invalid(String),
    #[error("Parsing error while reading {what} {text}.")]
    TextParse { what: &'static str, text: String },
    #[error("Unknown text field {field} for pack type {pack_type:#04X}.")]
    UnknownField { pack_type: u8, field: String },
    #[error("Pack type {0:#04X} has no text fields.")]
    NoTextFields(u8),
}

impl PackError {
    pub(crate) fn invalid(message: impl Into<String>) -> PackError {
        PackError::Invalid(message.into())
    }

    pub(crate) fn text_parse(what: &'static str, text: &str) -> PackError {
        PackError::TextParse {
            what,
            text: text.to_string(),
        }
    }
}

/// The known pack type header values.
#[repr(u8)]
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, strum::EnumIter, strum::EnumString, strum::Display, strum::FromRepr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PackType {
    TitleTimecode = 0x13,
    TitleBinaryGroup = 0x14,
    AauxSource = 0x50,
    AauxSourceControl = 0x51,
    AauxRecordingDate = 0x52,
    AauxRecordingTime = 0x53,
    AauxBinaryGroup = 0x54,
    VauxSource = 0x60,
    VauxSourceControl = 0x61,
    VauxRecordingDate = 0x62,
    VauxRecordingTime = 0x63,
    VauxBinaryGroup = 0x64,
    #[strum(serialize = "CAMERA_CONSUMER_1")]
    CameraConsumer1 = 0x70,
    #[strum(serialize = "CAMERA_CONSUMER_2")]
    CameraConsumer2 = 0x71,
    CameraShutter = 0x7F,
    NoInfo = 0xFF,
}

/// Binary encoding of a pack family. The pack type byte is handled by [`Pack`], so that one
/// family can be shared by several pack types.
pub(crate) trait PackCodec: Sized {
    /// Decode the four data bytes of a pack. Returns `None` if the bytes break the fixed bit
    /// patterns or digit ranges of the format.
    fn decode(data: &[u8; 4], system: DvSystem) -> Option<Self>;

    /// Check that the pack could be written back to binary.
    fn validate(&self, system: DvSystem) -> Result<(), PackError>;

    /// Encode the four data bytes of a pack. The pack has already been validated.
    fn encode(&self, system: DvSystem) -> [u8; 4];
}

/// The closed set of text field names of a pack family. The `Main` field of every family has
/// the empty name, and is addressed as `None`.
pub trait TextField: Copy + Eq + Debug + IntoEnumIterator + Into<&'static str> + FromStr {
    fn name(self) -> Option<&'static str> {
        let name: &'static str = self.into();
        match name {
            "" => None,
            name => Some(name),
        }
    }

    fn from_name(name: Option<&str>) -> Option<Self> {
        Self::from_str(name.unwrap_or("")).ok()
    }
}

/// Text representation of a pack family, used by external tools to read and edit individual
/// parts of a pack as strings.
///
/// Each field addresses a subset of the pack's values, carried as a `Value`. Values are
/// converted to and from text losslessly; the empty string stands for absent values.
pub trait TextFields: Default + Sized {
    type Field: TextField;
    type Value: Clone + PartialEq + Debug;

    /// Return the subset of values addressed by `field`.
    fn field_value(&self, field: Self::Field) -> Self::Value;

    /// Return a copy of the pack with the values from `value` replaced.
    fn with_field_value(&self, value: Self::Value) -> Self;

    fn parse_text(field: Self::Field, text: &str) -> Result<Self::Value, PackError>;

    fn to_text(value: &Self::Value) -> String;

    /// Convert every text field of the pack to text.
    fn to_text_values(&self) -> Vec<(Self::Field, String)> {
        Self::Field::iter()
            .map(|field| (field, Self::to_text(&self.field_value(field))))
            .collect()
    }

    /// Build a pack from text values. Fields that are not given are parsed from the empty string.
    fn parse_text_values(values: &[(Self::Field, &str)]) -> Result<Self, PackError> {
        let mut pack = Self::default();
        for field in Self::Field::iter() {
            let text = values
                .iter()
                .find(|(f, _)| *f == field)
                .map(|(_, text)| *text)
                .unwrap_or("");
            pack = pack.with_field_value(Self::parse_text(field, text)?);
        }
        Ok(pack)
    }
}

/// A parsed pack.
///
/// Packs are immutable values; edits produce a new `Pack`. Pack types that share a layout share
/// a family struct, and the variant determines the pack type byte.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Pack {
    TitleTimecode(TitleTimecode),
    TitleBinaryGroup(BinaryGroup),
    AauxSource(AauxSource),
    AauxSourceControl(AauxSourceControl),
    AauxRecordingDate(RecordingDate),
    AauxRecordingTime(Timecode),
    AauxBinaryGroup(BinaryGroup),
    VauxSource(VauxSource),
    VauxSourceControl(VauxSourceControl),
    VauxRecordingDate(RecordingDate),
    VauxRecordingTime(Timecode),
    VauxBinaryGroup(BinaryGroup),
    CameraConsumer1(CameraConsumer1),
    CameraConsumer2(CameraConsumer2),
    CameraShutter(CameraShutter),
    /// The "no information" fill pattern. Any data bytes are accepted when parsing.
    NoInfo,
    /// A pack of a type we do not recognize, kept verbatim including its type byte.
    Unknown([u8; PACK_SIZE]),
}
