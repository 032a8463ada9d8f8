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

    src/pack/dispatch.rs

    Dispatch of the pack operations over the closed set of pack families,
    keyed by the pack type byte.
*/
use crate::{
    pack::{Pack, PackCodec, PackError, PackType, TextField, TextFields},
    types::enums::DvSystem,
    PACK_SIZE,
};
use strum::IntoEnumIterator;

const NO_INFO_DATA: [u8; 4] = [0xFF; 4];

/// Evaluate `$body` with `$family` bound to the family struct of any pack that has one, or
/// `$other` for the NO INFO and unknown packs.
macro_rules! with_family {
    ($pack:expr, $family:ident => $body:expr, _ => $other:expr) => {
        match $pack {
            Pack::TitleTimecode($family) => $body,
            Pack::TitleBinaryGroup($family) => $body,
            Pack::AauxSource($family) => $body,
            Pack::AauxSourceControl($family) => $body,
            Pack::AauxRecordingDate($family) => $body,
            Pack::AauxRecordingTime($family) => $body,
            Pack::AauxBinaryGroup($family) => $body,
            Pack::VauxSource($family) => $body,
            Pack::VauxSourceControl($family) => $body,
            Pack::VauxRecordingDate($family) => $body,
            Pack::VauxRecordingTime($family) => $body,
            Pack::VauxBinaryGroup($family) => $body,
            Pack::CameraConsumer1($family) => $body,
            Pack::CameraConsumer2($family) => $body,
            Pack::CameraShutter($family) => $body,
            Pack::NoInfo | Pack::Unknown(_) => $other,
        }
    };
}

/// Like [`with_family`], but wraps the result of `$body` back into the same variant.
macro_rules! map_family {
    ($pack:expr, $family:ident => $body:expr, _ => $other:expr) => {
        match $pack {
            Pack::TitleTimecode($family) => Pack::TitleTimecode($body),
            Pack::TitleBinaryGroup($family) => Pack::TitleBinaryGroup($body),
            Pack::AauxSource($family) => Pack::AauxSource($body),
            Pack::AauxSourceControl($family) => Pack::AauxSourceControl($body),
            Pack::AauxRecordingDate($family) => Pack::AauxRecordingDate($body),
            Pack::AauxRecordingTime($family) => Pack::AauxRecordingTime($body),
            Pack::AauxBinaryGroup($family) => Pack::AauxBinaryGroup($body),
            Pack::VauxSource($family) => Pack::VauxSource($body),
            Pack::VauxSourceControl($family) => Pack::VauxSourceControl($body),
            Pack::VauxRecordingDate($family) => Pack::VauxRecordingDate($body),
            Pack::VauxRecordingTime($family) => Pack::VauxRecordingTime($body),
            Pack::VauxBinaryGroup($family) => Pack::VauxBinaryGroup($body),
            Pack::CameraConsumer1($family) => Pack::CameraConsumer1($body),
            Pack::CameraConsumer2($family) => Pack::CameraConsumer2($body),
            Pack::CameraShutter($family) => Pack::CameraShutter($body),
            Pack::NoInfo | Pack::Unknown(_) => $other,
        }
    };
}

/// Decode and validate the data bytes of a pack as family `T`.
fn decode_as<T: PackCodec>(pack_type: PackType, data: &[u8; 4], system: DvSystem) -> Result<T, PackError> {
    let family = T::decode(data, system).ok_or(PackError::Malformed(pack_type))?;
    family.validate(system)?;
    Ok(family)
}

fn field_by_name<T: TextFields>(type_byte: u8, name: Option<&str>) -> Result<T::Field, PackError> {
    T::Field::from_name(name).ok_or_else(|| PackError::UnknownField {
        pack_type: type_byte,
        field: name.unwrap_or("").to_string(),
    })
}

fn field_names<T: TextFields>(_family: &T) -> Vec<Option<&'static str>> {
    T::Field::iter().map(TextField::name).collect()
}

fn text_value_of<T: TextFields>(family: &T, type_byte: u8, name: Option<&str>) -> Result<String, PackError> {
    let field = field_by_name::<T>(type_byte, name)?;
    Ok(T::to_text(&family.field_value(field)))
}

fn with_text_value_of<T: TextFields>(family: &T, type_byte: u8, name: Option<&str>, text: &str) -> Result<T, PackError> {
    let field = field_by_name::<T>(type_byte, name)?;
    Ok(family.with_field_value(T::parse_text(field, text)?))
}

fn text_values_of<T: TextFields>(family: &T) -> Vec<(Option<&'static str>, String)> {
    family
        .to_text_values()
        .into_iter()
        .map(|(field, text)| (field.name(), text))
        .collect()
}

fn parse_family<T: TextFields>(type_byte: u8, values: &[(Option<&str>, &str)]) -> Result<T, PackError> {
    let fields = values
        .iter()
        .map(|(name, text)| Ok((field_by_name::<T>(type_byte, *name)?, *text)))
        .collect::<Result<Vec<_>, PackError>>()?;
    T::parse_text_values(&fields)
}

impl Pack {
    /// Parse a five byte pack.
    ///
    /// Pack types we do not recognize are returned as [`Pack::Unknown`]. A recognized pack whose
    /// data is malformed or fails validation is an error.
    pub fn parse(bytes: &[u8], system: DvSystem) -> Result<Pack, PackError> {
        let bytes: [u8; PACK_SIZE] = bytes.try_into().map_err(|_| PackError::WrongSize(bytes.len()))?;
        let [type_byte, b1, b2, b3, b4] = bytes;
        let data = [b1, b2, b3, b4];

        let Some(pack_type) = PackType::from_repr(type_byte)
        else {
            log::trace!("Pack::parse(): unknown pack type {:#04X}", type_byte);
            return Ok(Pack::Unknown(bytes));
        };

        log::trace!("Pack::parse(): decoding {} pack {:02X?}", pack_type, data);
        let pack = match pack_type {
            PackType::TitleTimecode => Pack::TitleTimecode(decode_as(pack_type, &data, system)?),
            PackType::TitleBinaryGroup => Pack::TitleBinaryGroup(decode_as(pack_type, &data, system)?),
            PackType::AauxSource => Pack::AauxSource(decode_as(pack_type, &data, system)?),
            PackType::AauxSourceControl => Pack::AauxSourceControl(decode_as(pack_type, &data, system)?),
            PackType::AauxRecordingDate => Pack::AauxRecordingDate(decode_as(pack_type, &data, system)?),
            PackType::AauxRecordingTime => Pack::AauxRecordingTime(decode_as(pack_type, &data, system)?),
            PackType::AauxBinaryGroup => Pack::AauxBinaryGroup(decode_as(pack_type, &data, system)?),
            PackType::VauxSource => Pack::VauxSource(decode_as(pack_type, &data, system)?),
            PackType::VauxSourceControl => Pack::VauxSourceControl(decode_as(pack_type, &data, system)?),
            PackType::VauxRecordingDate => Pack::VauxRecordingDate(decode_as(pack_type, &data, system)?),
            PackType::VauxRecordingTime => Pack::VauxRecordingTime(decode_as(pack_type, &data, system)?),
            PackType::VauxBinaryGroup => Pack::VauxBinaryGroup(decode_as(pack_type, &data, system)?),
            PackType::CameraConsumer1 => Pack::CameraConsumer1(decode_as(pack_type, &data, system)?),
            PackType::CameraConsumer2 => Pack::CameraConsumer2(decode_as(pack_type, &data, system)?),
            PackType::CameraShutter => Pack::CameraShutter(decode_as(pack_type, &data, system)?),
            // The data bytes of a NO INFO pack are not meaningful.
            PackType::NoInfo => Pack::NoInfo,
        };
        Ok(pack)
    }

    /// Check that the pack can be written to binary for the given system.
    pub fn validate(&self, system: DvSystem) -> Result<(), PackError> {
        with_family!(self, family => family.validate(system), _ => match self {
            Pack::Unknown(bytes) if PackType::from_repr(bytes[0]).is_some() => Err(PackError::invalid(format!(
                "Unknown pack uses the type byte {:#04X} of a known pack type.",
                bytes[0]
            ))),
            _ => Ok(()),
        })
    }

    /// Validate the pack and encode it to its five byte binary form.
    pub fn to_binary(&self, system: DvSystem) -> Result<[u8; PACK_SIZE], PackError> {
        self.validate(system)?;
        if let Pack::Unknown(bytes) = self {
            return Ok(*bytes);
        }
        let data = with_family!(self, family => family.encode(system), _ => NO_INFO_DATA);
        let [b1, b2, b3, b4] = data;
        Ok([self.type_byte(), b1, b2, b3, b4])
    }

    /// Return the type of the pack, or `None` for an unknown pack.
    pub fn pack_type(&self) -> Option<PackType> {
        Some(match self {
            Pack::TitleTimecode(_) => PackType::TitleTimecode,
            Pack::TitleBinaryGroup(_) => PackType::TitleBinaryGroup,
            Pack::AauxSource(_) => PackType::AauxSource,
            Pack::AauxSourceControl(_) => PackType::AauxSourceControl,
            Pack::AauxRecordingDate(_) => PackType::AauxRecordingDate,
            Pack::AauxRecordingTime(_) => PackType::AauxRecordingTime,
            Pack::AauxBinaryGroup(_) => PackType::AauxBinaryGroup,
            Pack::VauxSource(_) => PackType::VauxSource,
            Pack::VauxSourceControl(_) => PackType::VauxSourceControl,
            Pack::VauxRecordingDate(_) => PackType::VauxRecordingDate,
            Pack::VauxRecordingTime(_) => PackType::VauxRecordingTime,
            Pack::VauxBinaryGroup(_) => PackType::VauxBinaryGroup,
            Pack::CameraConsumer1(_) => PackType::CameraConsumer1,
            Pack::CameraConsumer2(_) => PackType::CameraConsumer2,
            Pack::CameraShutter(_) => PackType::CameraShutter,
            Pack::NoInfo => PackType::NoInfo,
            Pack::Unknown(_) => return None,
        })
    }

    /// Return the pack type byte, including that of an unknown pack.
    pub fn type_byte(&self) -> u8 {
        match self {
            Pack::Unknown(bytes) => bytes[0],
            pack => pack.pack_type().map_or(PackType::NoInfo as u8, |pack_type| pack_type as u8),
        }
    }

    /// Return a copy of a time pack advanced by one frame.
    pub fn increment_frame(&self, system: DvSystem) -> Result<Pack, PackError> {
        match self {
            Pack::TitleTimecode(tc) => Ok(Pack::TitleTimecode(tc.increment_frame(system)?)),
            Pack::AauxRecordingTime(tc) => Ok(Pack::AauxRecordingTime(tc.increment_frame(system)?)),
            Pack::VauxRecordingTime(tc) => Ok(Pack::VauxRecordingTime(tc.increment_frame(system)?)),
            pack => Err(PackError::invalid(format!(
                "Pack type {:#04X} does not hold a time to increment.",
                pack.type_byte()
            ))),
        }
    }

    /// Return the names of the pack's text fields. The main field is `None`. Packs without a
    /// family have no text fields.
    pub fn text_field_names(&self) -> Vec<Option<&'static str>> {
        with_family!(self, family => field_names(family), _ => Vec::new())
    }

    /// Return the text of a single field.
    pub fn text_value(&self, name: Option<&str>) -> Result<String, PackError> {
        let type_byte = self.type_byte();
        with_family!(self, family => text_value_of(family, type_byte, name),
            _ => Err(PackError::NoTextFields(type_byte)))
    }

    /// Return a copy of the pack with a single field replaced by its parsed text. The result is
    /// not validated.
    pub fn with_text_value(&self, name: Option<&str>, text: &str) -> Result<Pack, PackError> {
        let type_byte = self.type_byte();
        Ok(map_family!(self, family => with_text_value_of(family, type_byte, name, text)?,
            _ => return Err(PackError::NoTextFields(type_byte))))
    }

    /// Return the text of every field of the pack, in field order.
    pub fn to_text_values(&self) -> Vec<(Option<&'static str>, String)> {
        with_family!(self, family => text_values_of(family), _ => Vec::new())
    }

    /// Build a pack of the given type from text values. Fields that are not listed are absent.
    /// The result is not validated.
    pub fn parse_text_values(pack_type: PackType, values: &[(Option<&str>, &str)]) -> Result<Pack, PackError> {
        let b = pack_type as u8;
        Ok(match pack_type {
            PackType::TitleTimecode => Pack::TitleTimecode(parse_family(b, values)?),
            PackType::TitleBinaryGroup => Pack::TitleBinaryGroup(parse_family(b, values)?),
            PackType::AauxSource => Pack::AauxSource(parse_family(b, values)?),
            PackType::AauxSourceControl => Pack::AauxSourceControl(parse_family(b, values)?),
            PackType::AauxRecordingDate => Pack::AauxRecordingDate(parse_family(b, values)?),
            PackType::AauxRecordingTime => Pack::AauxRecordingTime(parse_family(b, values)?),
            PackType::AauxBinaryGroup => Pack::AauxBinaryGroup(parse_family(b, values)?),
            PackType::VauxSource => Pack::VauxSource(parse_family(b, values)?),
            PackType::VauxSourceControl => Pack::VauxSourceControl(parse_family(b, values)?),
            PackType::VauxRecordingDate => Pack::VauxRecordingDate(parse_family(b, values)?),
            PackType::VauxRecordingTime => Pack::VauxRecordingTime(parse_family(b, values)?),
            PackType::VauxBinaryGroup => Pack::VauxBinaryGroup(parse_family(b, values)?),
            PackType::CameraConsumer1 => Pack::CameraConsumer1(parse_family(b, values)?),
            PackType::CameraConsumer2 => Pack::CameraConsumer2(parse_family(b, values)?),
            PackType::CameraShutter => Pack::CameraShutter(parse_family(b, values)?),
            PackType::NoInfo => return Err(PackError::NoTextFields(b)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pack::{binary_group::BinaryGroup, timecode::ClockTime};

    const SYS: DvSystem = DvSystem::Sys525_60;

    #[test]
    fn wrong_size() {
        assert_eq!(Pack::parse(&[0xFF; 4], SYS), Err(PackError::WrongSize(4)));
        assert_eq!(
            Pack::parse(&[0xFF; 6], SYS).unwrap_err().to_string(),
            "Pack data must be 5 bytes, but got 6 bytes."
        );
    }

    #[test]
    fn no_info_accepts_any_data() {
        let pack = Pack::parse(&[0xFF, 0x01, 0x02, 0x03, 0x04], SYS).unwrap();
        assert_eq!(pack, Pack::NoInfo);
        assert_eq!(pack.to_binary(SYS).unwrap(), [0xFF; 5]);
        assert!(pack.text_field_names().is_empty());
        assert_eq!(pack.text_value(None), Err(PackError::NoTextFields(0xFF)));
    }

    #[test]
    fn unknown_pack_is_kept_verbatim() {
        let bytes = [0x0B, 0x01, 0x02, 0x03, 0x04];
        let pack = Pack::parse(&bytes, SYS).unwrap();
        assert_eq!(pack, Pack::Unknown(bytes));
        assert_eq!(pack.pack_type(), None);
        assert_eq!(pack.type_byte(), 0x0B);
        assert_eq!(pack.to_binary(SYS).unwrap(), bytes);
    }

    #[test]
    fn unknown_pack_with_known_type_byte_is_invalid() {
        let pack = Pack::Unknown([0x13, 0x00, 0x00, 0x00, 0x00]);
        assert!(matches!(pack.to_binary(SYS), Err(PackError::Invalid(_))));
    }

    #[test]
    fn malformed_pack_reports_its_type() {
        // Frame tens digit of 3 with units of 0 is neither a frame number nor the absent pattern
        let err = Pack::parse(&[0x13, 0x30, 0x00, 0x00, 0x00], SYS).unwrap_err();
        assert_eq!(err, PackError::Malformed(PackType::TitleTimecode));
        assert_eq!(err.to_string(), "The TITLE_TIMECODE pack contains malformed data.");
    }

    #[test]
    fn binary_group_types_share_a_family() {
        let bytes = [0x54, 0x12, 0x34, 0x56, 0x78];
        let pack = Pack::parse(&bytes, SYS).unwrap();
        assert_eq!(pack, Pack::AauxBinaryGroup(BinaryGroup::new([0x12, 0x34, 0x56, 0x78])));
        assert_eq!(pack.pack_type(), Some(PackType::AauxBinaryGroup));
        assert_eq!(pack.to_binary(SYS).unwrap(), bytes);
        assert_eq!(pack.text_value(None).unwrap(), "0x12345678");
    }

    #[test]
    fn text_field_api() {
        let pack = Pack::parse_text_values(
            PackType::VauxRecordingTime,
            &[(None, "12:34:56:07"), (Some("color_frame"), "SYNCHRONIZED")],
        )
        .unwrap();
        let Pack::VauxRecordingTime(tc) = &pack
        else {
            panic!("unexpected pack {:?}", pack);
        };
        assert_eq!(tc.time, ClockTime::new(12, 34, 56, 7, false));
        assert_eq!(
            pack.text_field_names(),
            vec![
                None,
                Some("color_frame"),
                Some("polarity_correction"),
                Some("binary_group_flags")
            ]
        );
        assert_eq!(pack.text_value(Some("color_frame")).unwrap(), "SYNCHRONIZED");

        let edited = pack.with_text_value(None, "01:00:00;02").unwrap();
        assert_eq!(edited.text_value(None).unwrap(), "01:00:00;02");
        assert_eq!(pack.text_value(None).unwrap(), "12:34:56:07");

        assert_eq!(
            pack.text_value(Some("bogus")),
            Err(PackError::UnknownField {
                pack_type: 0x63,
                field: "bogus".to_string()
            })
        );
        assert!(matches!(
            pack.with_text_value(None, "not a time"),
            Err(PackError::TextParse { .. })
        ));
        assert_eq!(
            Pack::parse_text_values(PackType::NoInfo, &[]),
            Err(PackError::NoTextFields(0xFF))
        );
    }

    #[test]
    fn increment_time_packs_only() {
        let pack = Pack::parse_text_values(PackType::AauxRecordingTime, &[(None, "00:00:59;29")]).unwrap();
        let next = pack.increment_frame(SYS).unwrap();
        assert_eq!(next.text_value(None).unwrap(), "00:01:00;02");
        assert!(Pack::NoInfo.increment_frame(SYS).is_err());
    }
}
