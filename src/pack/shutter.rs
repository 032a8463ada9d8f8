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

    src/pack/shutter.rs

    The camera SHUTTER pack.

    Byte 1: Professional shutter speed, upper line(8)
    Byte 2: Professional shutter speed, lower line(8)
    Byte 3: Consumer shutter speed, low byte(8)
    Byte 4: 1 | Consumer shutter speed, high bits(7)
*/
use crate::{
    pack::{PackCodec, PackError},
    types::enums::DvSystem,
    util::{optional_text, parse_u16, parse_u8},
};

const CONSUMER_NO_INFO: u16 = 0x7FFF;

/// Shutter speeds are the denominator of the exposure time: 250 means 1/250 s.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CameraShutter {
    /// 1-0x7FFE.
    pub shutter_speed_consumer: Option<u16>,
    /// 0-0xFE.
    pub shutter_speed_professional_upper_line: Option<u8>,
    /// 0-0xFE.
    pub shutter_speed_professional_lower_line: Option<u8>,
}

impl PackCodec for CameraShutter {
    fn decode(data: &[u8; 4], _system: DvSystem) -> Option<Self> {
        let [b1, b2, b3, b4] = *data;
        if b4 >> 7 != 0x1 {
            return None;
        }
        let consumer = u16::from(b4 & 0x7F) << 8 | u16::from(b3);
        Some(CameraShutter {
            shutter_speed_consumer: (consumer != CONSUMER_NO_INFO).then_some(consumer),
            shutter_speed_professional_upper_line: (b1 != 0xFF).then_some(b1),
            shutter_speed_professional_lower_line: (b2 != 0xFF).then_some(b2),
        })
    }

    fn validate(&self, _system: DvSystem) -> Result<(), PackError> {
        if self
            .shutter_speed_consumer
            .is_some_and(|speed| speed < 1 || speed >= CONSUMER_NO_INFO)
        {
            return Err(PackError::invalid("Consumer shutter speed is out of range."));
        }
        if self.shutter_speed_professional_upper_line == Some(0xFF) {
            return Err(PackError::invalid(
                "Professional upper line shutter speed is out of range.",
            ));
        }
        if self.shutter_speed_professional_lower_line == Some(0xFF) {
            return Err(PackError::invalid(
                "Professional lower line shutter speed is out of range.",
            ));
        }
        Ok(())
    }

    fn encode(&self, _system: DvSystem) -> [u8; 4] {
        let consumer = self.shutter_speed_consumer.unwrap_or(CONSUMER_NO_INFO);
        [
            self.shutter_speed_professional_upper_line.unwrap_or(0xFF),
            self.shutter_speed_professional_lower_line.unwrap_or(0xFF),
            (consumer & 0xFF) as u8,
            0x80 | (consumer >> 8) as u8,
        ]
    }
}

member_text_fields! {
    CameraShutter, CameraShutterField, CameraShutterValue;
    ShutterSpeedConsumer(shutter_speed_consumer: u16) => |t| parse_u16("consumer shutter speed", t),
        optional_text;
    ShutterSpeedProfessionalUpperLine(shutter_speed_professional_upper_line: u8) =>
        |t| parse_u8("professional upper line shutter speed", t), optional_text;
    ShutterSpeedProfessionalLowerLine(shutter_speed_professional_lower_line: u8) =>
        |t| parse_u8("professional lower line shutter speed", t), optional_text;
}
