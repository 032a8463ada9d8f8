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

    src/pack/binary_group.rs

    Binary group packs: TITLE BINARY GROUP, AAUX BINARY GROUP and
    VAUX BINARY GROUP. The four data bytes are user defined.
*/
use crate::{
    pack::{PackCodec, PackError, TextField, TextFields},
    types::enums::DvSystem,
    util::hex_bytes,
};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BinaryGroup {
    pub value: Option<[u8; 4]>,
}

impl BinaryGroup {
    pub fn new(value: [u8; 4]) -> BinaryGroup {
        BinaryGroup { value: Some(value) }
    }
}

impl PackCodec for BinaryGroup {
    fn decode(data: &[u8; 4], _system: DvSystem) -> Option<Self> {
        Some(BinaryGroup::new(*data))
    }

    fn validate(&self, _system: DvSystem) -> Result<(), PackError> {
        match self.value {
            Some(_) => Ok(()),
            None => Err(PackError::invalid("A binary group value was not provided.")),
        }
    }

    fn encode(&self, _system: DvSystem) -> [u8; 4] {
        self.value.unwrap_or([0xFF; 4])
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, strum::EnumIter, strum::EnumString, strum::IntoStaticStr)]
pub enum BinaryGroupField {
    #[strum(serialize = "")]
    Main,
}

impl TextField for BinaryGroupField {}

impl TextFields for BinaryGroup {
    type Field = BinaryGroupField;
    type Value = Option<[u8; 4]>;

    fn field_value(&self, _field: BinaryGroupField) -> Option<[u8; 4]> {
        self.value
    }

    fn with_field_value(&self, value: Option<[u8; 4]>) -> Self {
        BinaryGroup { value }
    }

    /// Parse eight hexadecimal digits, with an optional `0x` prefix.
    fn parse_text(_field: BinaryGroupField, text: &str) -> Result<Option<[u8; 4]>, PackError> {
        if text.is_empty() {
            return Ok(None);
        }
        let digits = text.strip_prefix("0x").unwrap_or(text);
        if digits.len() != 8 {
            return Err(PackError::text_parse("binary group", text));
        }
        u32::from_str_radix(digits, 16)
            .map(|v| Some(v.to_be_bytes()))
            .map_err(|_| PackError::text_parse("binary group", text))
    }

    fn to_text(value: &Option<[u8; 4]>) -> String {
        value.map(|bytes| hex_bytes(&bytes)).unwrap_or_default()
    }
}
