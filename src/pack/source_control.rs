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

    src/pack/source_control.rs

    Enumerations shared by the AAUX and VAUX source control packs. A two bit
    field value of 0x3 means no information, and is decoded as `None`.
*/

/// Copy generation management system (CGMS).
#[repr(u8)]
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, strum::EnumIter, strum::EnumString, strum::Display, strum::FromRepr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CopyProtection {
    NoRestriction = 0,
    Reserved = 1,
    OneGenerationOnly = 2,
    NotPermitted = 3,
}

#[repr(u8)]
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, strum::EnumIter, strum::EnumString, strum::Display, strum::FromRepr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InputSource {
    Analog = 0,
    Digital = 1,
    Reserved = 2,
}

/// Number of times the material has been compressed.
#[repr(u8)]
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, strum::EnumIter, strum::EnumString, strum::Display, strum::FromRepr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CompressionCount {
    #[strum(serialize = "CMP_1")]
    Cmp1 = 0,
    #[strum(serialize = "CMP_2")]
    Cmp2 = 1,
    #[strum(serialize = "CMP_3_OR_MORE")]
    Cmp3OrMore = 2,
}

#[repr(u8)]
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, strum::EnumIter, strum::EnumString, strum::Display, strum::FromRepr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SourceSituation {
    ScrambledSourceWithAudienceRestrictions = 0,
    ScrambledSourceWithoutAudienceRestrictions = 1,
    SourceWithAudienceRestrictions = 2,
}

/// Decode a two bit field where 0x3 means no information.
pub(crate) fn two_bit_optional<T>(bits: u8, from_repr: impl FnOnce(u8) -> Option<T>) -> Option<T> {
    match bits & 0x03 {
        0x3 => None,
        bits => from_repr(bits),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn compression_count_names() {
        assert_eq!(CompressionCount::Cmp3OrMore.to_string(), "CMP_3_OR_MORE");
        assert_eq!(CompressionCount::from_str("CMP_1").unwrap(), CompressionCount::Cmp1);
    }

    #[test]
    fn no_information_bits() {
        assert_eq!(two_bit_optional(0x3, InputSource::from_repr), None);
        assert_eq!(two_bit_optional(0x1, InputSource::from_repr), Some(InputSource::Digital));
        assert_eq!(
            two_bit_optional(0x2, SourceSituation::from_repr),
            Some(SourceSituation::SourceWithAudienceRestrictions)
        );
    }
}
