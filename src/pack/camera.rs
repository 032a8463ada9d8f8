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

    src/pack/camera.rs

    The consumer camera packs, recorded by camcorders alongside each frame.

    CAMERA CONSUMER 1
    Byte 1: 1 1 | Iris(6)
    Byte 2: AE mode(4) | AGC(4)
    Byte 3: WB mode(3) | White balance(5)
    Byte 4: FCM | Focus(7)

    CAMERA CONSUMER 2
    Byte 1: 1 1 | VPD | Vertical panning speed(5)
    Byte 2: IS | HPD | Horizontal panning speed(6)
    Byte 3: Focal length(8)
    Byte 4: ZEN | Electric zoom(7)

    Several of the lens values are table lookups where more than one bit
    pattern produces the same number. Those values keep their bits so that a
    pack is written back exactly as it was read.
*/
use crate::{
    pack::{PackCodec, PackError},
    types::enums::DvSystem,
    util::{optional_bool_text, optional_text, parse_bool_optional, parse_name, parse_u8},
};
use std::{
    fmt,
    fmt::{Display, Formatter},
    str::FromStr,
};

/// Define an enumeration of named bit values where the remaining values up to `max` are reserved
/// by the format and kept as `Reserved(bits)`.
macro_rules! reserved_bits_enum {
    (
        $(#[$meta:meta])* $name:ident, $max:literal;
        $( $variant:ident = $bits:literal => $text:literal, )+
    ) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub enum $name {
            $( $variant, )+
            Reserved(u8),
        }

        impl $name {
            const MAX_BITS: u8 = $max;

            pub fn from_bits(bits: u8) -> $name {
                match bits {
                    $( $bits => $name::$variant, )+
                    bits => $name::Reserved(bits),
                }
            }

            pub fn to_bits(self) -> u8 {
                match self {
                    $( $name::$variant => $bits, )+
                    $name::Reserved(bits) => bits,
                }
            }

            /// A reserved value must fit in the field and must not shadow a named value.
            pub fn is_valid(self) -> bool {
                $name::from_bits(self.to_bits()) == self && self.to_bits() <= $name::MAX_BITS
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter) -> fmt::Result {
                match self {
                    $( $name::$variant => write!(f, $text), )+
                    $name::Reserved(bits) => write!(f, "RESERVED_{}", bits),
                }
            }
        }

        impl FromStr for $name {
            type Err = ();

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let value = match s {
                    $( $text => $name::$variant, )+
                    other => other
                        .strip_prefix("RESERVED_")
                        .and_then(|n| n.parse::<u8>().ok())
                        .map($name::Reserved)
                        .ok_or(())?,
                };
                match value.is_valid() {
                    true => Ok(value),
                    false => Err(()),
                }
            }
        }
    };
}

reserved_bits_enum! {
    AutoExposureMode, 0xE;
    FullAutomatic = 0x0 => "FULL_AUTOMATIC",
    GainPriority = 0x1 => "GAIN_PRIORITY",
    ShutterPriority = 0x2 => "SHUTTER_PRIORITY",
    IrisPriority = 0x3 => "IRIS_PRIORITY",
    Manual = 0x4 => "MANUAL",
}

reserved_bits_enum! {
    WhiteBalanceMode, 0x6;
    Automatic = 0x0 => "AUTOMATIC",
    Hold = 0x1 => "HOLD",
    OnePush = 0x2 => "ONE_PUSH",
    Preset = 0x3 => "PRESET",
}

reserved_bits_enum! {
    /// The light source the white balance was set for.
    WhiteBalance, 0x1E;
    Candle = 0x00 => "CANDLE",
    IncandescentLamp = 0x01 => "INCANDESCENT_LAMP",
    FluorescentLampLowColorTemperature = 0x02 => "FLUORESCENT_LAMP_LOW_COLOR_TEMPERATURE",
    FluorescentLampHighColorTemperature = 0x03 => "FLUORESCENT_LAMP_HIGH_COLOR_TEMPERATURE",
    Sunlight = 0x04 => "SUNLIGHT",
    Cloudiness = 0x05 => "CLOUDINESS",
    Others = 0x06 => "OTHERS",
}

#[repr(u8)]
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, strum::EnumIter, strum::EnumString, strum::Display, strum::FromRepr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FocusMode {
    Automatic = 0,
    Manual = 1,
}

/// Direction of camera panning, relative to the scanning direction of the image.
#[repr(u8)]
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, strum::EnumIter, strum::EnumString, strum::Display, strum::FromRepr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PanningDirection {
    SameDirectionAsScanning = 0,
    OppositeDirectionOfScanning = 1,
}

/// Format a value in tenths with exactly one decimal place.
fn tenths_text(f: &mut Formatter, tenths: u32) -> fmt::Result {
    write!(f, "{}.{}", tenths / 10, tenths % 10)
}

/// Round a non-negative number to tenths.
fn to_tenths(value: f64) -> Option<u32> {
    if !value.is_finite() || value < 0.0 || value > f64::from(u32::MAX) / 10.0 {
        return None;
    }
    Some((value * 10.0).round() as u32)
}

fn parse_tenths(text: &str) -> Option<u32> {
    text.trim().parse().ok().and_then(to_tenths)
}

/// Lens iris, as an F number rounded to one decimal place.
///
/// Iris bits 0x00-0x3C encode F numbers of 2^(bits/8). 0x3D means an iris wider than F1.0 and
/// is shown as `0.0`; 0x3E means the iris is closed and is shown as `999.9`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Iris(u8);

impl Iris {
    const UNDER_F1: u8 = 0x3D;
    const CLOSED: u8 = 0x3E;

    /// Create an iris from its 6-bit field. Returns `None` for the "no information" value.
    pub fn from_bits(bits: u8) -> Option<Iris> {
        (bits <= Iris::CLOSED).then_some(Iris(bits))
    }

    pub fn to_bits(self) -> u8 {
        self.0
    }

    /// The F number in tenths.
    pub fn tenths(self) -> u32 {
        match self.0 {
            Iris::UNDER_F1 => 0,
            Iris::CLOSED => 9999,
            bits => (2f64.powf(f64::from(bits) / 8.0) * 10.0).round() as u32,
        }
    }

    pub fn f_number(self) -> f64 {
        f64::from(self.tenths()) / 10.0
    }

    /// Find the iris setting for an F number, after rounding it to one decimal place.
    pub fn from_f_number(f_number: f64) -> Option<Iris> {
        to_tenths(f_number).and_then(Iris::from_tenths)
    }

    fn from_tenths(tenths: u32) -> Option<Iris> {
        (0..=Iris::CLOSED).map(Iris).find(|iris| iris.tenths() == tenths)
    }
}

impl Display for Iris {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        tenths_text(f, self.tenths())
    }
}

impl FromStr for Iris {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_tenths(s).and_then(Iris::from_tenths).ok_or(())
    }
}

/// Focus position: the distance to the subject in centimeters.
///
/// The 7-bit field holds a mantissa in its upper five bits and a power of ten in its lower two.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FocusPosition(u8);

impl FocusPosition {
    const MAX_BITS: u8 = 0x7E;

    pub fn from_bits(bits: u8) -> Option<FocusPosition> {
        (bits <= FocusPosition::MAX_BITS).then_some(FocusPosition(bits))
    }

    pub fn to_bits(self) -> u8 {
        self.0
    }

    pub fn centimeters(self) -> u32 {
        u32::from(self.0 >> 2) * 10u32.pow(u32::from(self.0 & 0x03))
    }

    /// Find the shortest bit pattern for a distance.
    pub fn from_centimeters(centimeters: u32) -> Option<FocusPosition> {
        (0..=FocusPosition::MAX_BITS)
            .map(FocusPosition)
            .find(|focus| focus.centimeters() == centimeters)
    }
}

impl Display for FocusPosition {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.centimeters())
    }
}

impl FromStr for FocusPosition {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let centimeters: u32 = s.trim().parse().map_err(|_| ())?;
        FocusPosition::from_centimeters(centimeters).ok_or(())
    }
}

/// Lens focal length in millimeters, as the equivalent for 35 mm film.
///
/// The 8-bit field holds a mantissa in its upper seven bits and a power of ten in the lowest bit.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FocalLength(u8);

impl FocalLength {
    const MAX_BITS: u8 = 0xFE;

    pub fn from_bits(bits: u8) -> Option<FocalLength> {
        (bits <= FocalLength::MAX_BITS).then_some(FocalLength(bits))
    }

    pub fn to_bits(self) -> u8 {
        self.0
    }

    pub fn millimeters(self) -> u32 {
        u32::from(self.0 >> 1) * 10u32.pow(u32::from(self.0 & 0x01))
    }

    /// Find the shortest bit pattern for a focal length.
    pub fn from_millimeters(millimeters: u32) -> Option<FocalLength> {
        (0..=FocalLength::MAX_BITS)
            .map(FocalLength)
            .find(|length| length.millimeters() == millimeters)
    }
}

impl Display for FocalLength {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.millimeters())
    }
}

impl FromStr for FocalLength {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let millimeters: u32 = s.trim().parse().map_err(|_| ())?;
        FocalLength::from_millimeters(millimeters).ok_or(())
    }
}

/// Electric zoom magnification, 0.0 to 7.9 in steps of 0.1. The value 8.0 means 8.0 or more.
///
/// Stored as a units digit in the upper three bits and a tenths digit in the lower four.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElectricZoom(u8);

impl ElectricZoom {
    const EIGHT_OR_MORE: u8 = 0x7E;

    /// Create a magnification from its 7-bit field. Returns `None` for bit patterns that hold no
    /// magnification, including the "no information" value.
    pub fn from_bits(bits: u8) -> Option<ElectricZoom> {
        match bits {
            ElectricZoom::EIGHT_OR_MORE => Some(ElectricZoom(bits)),
            _ if bits < 0x80 && bits & 0x0F <= 9 => Some(ElectricZoom(bits)),
            _ => None,
        }
    }

    pub fn to_bits(self) -> u8 {
        self.0
    }

    /// The magnification in tenths.
    pub fn tenths(self) -> u32 {
        match self.0 {
            ElectricZoom::EIGHT_OR_MORE => 80,
            bits => u32::from(bits >> 4) * 10 + u32::from(bits & 0x0F),
        }
    }

    pub fn magnification(self) -> f64 {
        f64::from(self.tenths()) / 10.0
    }

    fn from_tenths(tenths: u32) -> Option<ElectricZoom> {
        match tenths {
            80 => Some(ElectricZoom(ElectricZoom::EIGHT_OR_MORE)),
            0..=79 => Some(ElectricZoom(((tenths / 10) as u8) << 4 | (tenths % 10) as u8)),
            _ => None,
        }
    }
}

impl Display for ElectricZoom {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        tenths_text(f, self.tenths())
    }
}

impl FromStr for ElectricZoom {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_tenths(s).and_then(ElectricZoom::from_tenths).ok_or(())
    }
}

fn optional_bits<T>(bits: u8, none_bits: u8, from_bits: impl FnOnce(u8) -> T) -> Option<T> {
    (bits != none_bits).then(|| from_bits(bits))
}

/// The contents of a consumer camera 1 pack: exposure, white balance and focus.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CameraConsumer1 {
    pub auto_exposure_mode: Option<AutoExposureMode>,
    pub iris: Option<Iris>,
    /// Auto gain control setting, 0x0-0xE.
    pub auto_gain_control: Option<u8>,
    pub white_balance_mode: Option<WhiteBalanceMode>,
    pub white_balance: Option<WhiteBalance>,
    pub focus_mode: Option<FocusMode>,
    pub focus_position: Option<FocusPosition>,
}

impl PackCodec for CameraConsumer1 {
    fn decode(data: &[u8; 4], _system: DvSystem) -> Option<Self> {
        let [b1, b2, b3, b4] = *data;
        if b1 >> 6 != 0x3 {
            return None;
        }
        Some(CameraConsumer1 {
            auto_exposure_mode: optional_bits(b2 >> 4, 0xF, AutoExposureMode::from_bits),
            iris: Iris::from_bits(b1 & 0x3F),
            auto_gain_control: optional_bits(b2 & 0x0F, 0xF, |bits| bits),
            white_balance_mode: optional_bits(b3 >> 5, 0x7, WhiteBalanceMode::from_bits),
            white_balance: optional_bits(b3 & 0x1F, 0x1F, WhiteBalance::from_bits),
            focus_mode: FocusMode::from_repr(b4 >> 7),
            focus_position: FocusPosition::from_bits(b4 & 0x7F),
        })
    }

    fn validate(&self, _system: DvSystem) -> Result<(), PackError> {
        if self.auto_exposure_mode.is_some_and(|mode| !mode.is_valid()) {
            return Err(PackError::invalid("Auto exposure mode is out of range."));
        }
        if self.auto_gain_control.is_some_and(|agc| agc > 0xE) {
            return Err(PackError::invalid("Auto gain control is out of range."));
        }
        if self.white_balance_mode.is_some_and(|mode| !mode.is_valid()) {
            return Err(PackError::invalid("White balance mode is out of range."));
        }
        if self.white_balance.is_some_and(|wb| !wb.is_valid()) {
            return Err(PackError::invalid("White balance is out of range."));
        }
        if self.focus_mode.is_none() {
            return Err(PackError::invalid("Focus mode is required."));
        }
        Ok(())
    }

    fn encode(&self, _system: DvSystem) -> [u8; 4] {
        [
            0xC0 | self.iris.map_or(0x3F, Iris::to_bits),
            self.auto_exposure_mode.map_or(0xF, AutoExposureMode::to_bits) << 4
                | self.auto_gain_control.unwrap_or(0xF),
            self.white_balance_mode.map_or(0x7, WhiteBalanceMode::to_bits) << 5
                | self.white_balance.map_or(0x1F, WhiteBalance::to_bits),
            self.focus_mode.map_or(0, |v| v as u8) << 7 | self.focus_position.map_or(0x7F, FocusPosition::to_bits),
        ]
    }
}

member_text_fields! {
    CameraConsumer1, CameraConsumer1Field, CameraConsumer1Value;
    AutoExposureMode(auto_exposure_mode: AutoExposureMode) => |t| parse_name("auto exposure mode", t),
        optional_text;
    Iris(iris: Iris) => |t| parse_name("iris", t), optional_text;
    AutoGainControl(auto_gain_control: u8) => |t| parse_u8("auto gain control", t), optional_text;
    WhiteBalanceMode(white_balance_mode: WhiteBalanceMode) => |t| parse_name("white balance mode", t),
        optional_text;
    WhiteBalance(white_balance: WhiteBalance) => |t| parse_name("white balance", t), optional_text;
    FocusMode(focus_mode: FocusMode) => |t| parse_name("focus mode", t), optional_text;
    FocusPosition(focus_position: FocusPosition) => |t| parse_name("focus position", t), optional_text;
}

/// The contents of a consumer camera 2 pack: panning, image stabilizer and zoom.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CameraConsumer2 {
    pub vertical_panning_direction: Option<PanningDirection>,
    /// Lines per field. 30 means 30 or more.
    pub vertical_panning_speed: Option<u8>,
    pub horizontal_panning_direction: Option<PanningDirection>,
    /// Pixels per field, always even. 124 means 124 or more.
    pub horizontal_panning_speed: Option<u8>,
    pub image_stabilizer_on: Option<bool>,
    pub focal_length: Option<FocalLength>,
    pub electric_zoom_on: Option<bool>,
    pub electric_zoom_magnification: Option<ElectricZoom>,
}

const MAX_VERTICAL_PANNING_SPEED: u8 = 0x1E;
const MAX_HORIZONTAL_PANNING_SPEED: u8 = 0x3E * 2;

impl PackCodec for CameraConsumer2 {
    fn decode(data: &[u8; 4], _system: DvSystem) -> Option<Self> {
        let [b1, b2, b3, b4] = *data;
        if b1 >> 6 != 0x3 {
            return None;
        }
        let electric_zoom_magnification = match b4 & 0x7F {
            0x7F => None,
            bits => Some(ElectricZoom::from_bits(bits)?),
        };
        Some(CameraConsumer2 {
            vertical_panning_direction: PanningDirection::from_repr((b1 >> 5) & 0x01),
            vertical_panning_speed: optional_bits(b1 & 0x1F, 0x1F, |bits| bits),
            horizontal_panning_direction: PanningDirection::from_repr((b2 >> 6) & 0x01),
            horizontal_panning_speed: optional_bits(b2 & 0x3F, 0x3F, |bits| bits * 2),
            image_stabilizer_on: Some(b2 >> 7 == 0),
            focal_length: FocalLength::from_bits(b3),
            electric_zoom_on: Some(b4 >> 7 == 0),
            electric_zoom_magnification,
        })
    }

    fn validate(&self, _system: DvSystem) -> Result<(), PackError> {
        if self.vertical_panning_direction.is_none() {
            return Err(PackError::invalid("Vertical panning direction is required."));
        }
        if self
            .vertical_panning_speed
            .is_some_and(|speed| speed > MAX_VERTICAL_PANNING_SPEED)
        {
            return Err(PackError::invalid(format!(
                "Vertical panning speed is out of range.  Maximum value is {}.",
                MAX_VERTICAL_PANNING_SPEED
            )));
        }
        if self.horizontal_panning_direction.is_none() {
            return Err(PackError::invalid("Horizontal panning direction is required."));
        }
        if let Some(speed) = self.horizontal_panning_speed {
            if speed > MAX_HORIZONTAL_PANNING_SPEED {
                return Err(PackError::invalid(format!(
                    "Horizontal panning speed is out of range.  Maximum value is {}.",
                    MAX_HORIZONTAL_PANNING_SPEED
                )));
            }
            if speed % 2 != 0 {
                return Err(PackError::invalid("Horizontal panning speed must be an even number."));
            }
        }
        if self.image_stabilizer_on.is_none() {
            return Err(PackError::invalid("Image stabilizer on value is required."));
        }
        if self.electric_zoom_on.is_none() {
            return Err(PackError::invalid("Electric zoom on value is required."));
        }
        Ok(())
    }

    fn encode(&self, _system: DvSystem) -> [u8; 4] {
        let direction = |value: Option<PanningDirection>| value.map_or(0, |v| v as u8);
        [
            0xC0 | direction(self.vertical_panning_direction) << 5 | self.vertical_panning_speed.unwrap_or(0x1F),
            u8::from(self.image_stabilizer_on != Some(true)) << 7
                | direction(self.horizontal_panning_direction) << 6
                | self.horizontal_panning_speed.map_or(0x3F, |speed| speed / 2),
            self.focal_length.map_or(0xFF, FocalLength::to_bits),
            u8::from(self.electric_zoom_on != Some(true)) << 7
                | self.electric_zoom_magnification.map_or(0x7F, ElectricZoom::to_bits),
        ]
    }
}

member_text_fields! {
    CameraConsumer2, CameraConsumer2Field, CameraConsumer2Value;
    VerticalPanningDirection(vertical_panning_direction: PanningDirection) =>
        |t| parse_name("vertical panning direction", t), optional_text;
    VerticalPanningSpeed(vertical_panning_speed: u8) => |t| parse_u8("vertical panning speed", t), optional_text;
    HorizontalPanningDirection(horizontal_panning_direction: PanningDirection) =>
        |t| parse_name("horizontal panning direction", t), optional_text;
    HorizontalPanningSpeed(horizontal_panning_speed: u8) => |t| parse_u8("horizontal panning speed", t),
        optional_text;
    ImageStabilizerOn(image_stabilizer_on: bool) => parse_bool_optional, |v: &Option<bool>| optional_bool_text(*v);
    FocalLength(focal_length: FocalLength) => |t| parse_name("focal length", t), optional_text;
    ElectricZoomOn(electric_zoom_on: bool) => parse_bool_optional, |v: &Option<bool>| optional_bool_text(*v);
    ElectricZoomMagnification(electric_zoom_magnification: ElectricZoom) =>
        |t| parse_name("electric zoom magnification", t), optional_text;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pack::TextFields;

    // Automatic exposure at F2.0, no gain, focus or white balance information
    const CAMERA_1: [u8; 4] = [0xC8, 0x0F, 0x1F, 0x7F];
    // Stabilizer on, panning right at 20 pixels per field, 50 mm lens, 1.5x electric zoom
    const CAMERA_2: [u8; 4] = [0xC5, 0x4A, 0x0B, 0x15];

    #[test]
    fn decode_consumer_1() {
        let camera = CameraConsumer1::decode(&CAMERA_1, DvSystem::Sys525_60).unwrap();
        assert_eq!(camera.auto_exposure_mode, Some(AutoExposureMode::FullAutomatic));
        assert_eq!(camera.iris.map(Iris::tenths), Some(20));
        assert_eq!(camera.auto_gain_control, None);
        assert_eq!(camera.white_balance_mode, Some(WhiteBalanceMode::Automatic));
        assert_eq!(camera.white_balance, None);
        assert_eq!(camera.focus_mode, Some(FocusMode::Automatic));
        assert_eq!(camera.focus_position, None);
        assert!(camera.validate(DvSystem::Sys525_60).is_ok());
        assert_eq!(camera.encode(DvSystem::Sys525_60), CAMERA_1);

        assert_eq!(CameraConsumer1::decode(&[0x88, 0x0F, 0x1F, 0x7F], DvSystem::Sys525_60), None);
    }

    #[test]
    fn iris_table() {
        assert_eq!(Iris::from_bits(0x04).unwrap().to_string(), "1.4");
        assert_eq!(Iris::from_bits(0x3C).unwrap().to_string(), "181.0");
        assert_eq!(Iris::from_bits(0x3D).unwrap().to_string(), "0.0");
        assert_eq!(Iris::from_bits(0x3E).unwrap().to_string(), "999.9");
        assert_eq!(Iris::from_bits(0x3F), None);
        assert_eq!("2".parse::<Iris>().map(Iris::to_bits), Ok(0x08));
        assert_eq!(Iris::from_f_number(1.41).map(Iris::to_bits), Some(0x04));
        assert_eq!("1.5".parse::<Iris>().map(Iris::to_bits), Ok(0x05));
        assert!("1.6".parse::<Iris>().is_err());

        for bits in 0..=0x3E {
            let iris = Iris::from_bits(bits).unwrap();
            assert_eq!(iris.to_string().parse::<Iris>(), Ok(iris));
        }
    }

    #[test]
    fn duplicate_focus_encodings_are_kept() {
        // 10 cm, once as 1 x 10^1 and once as 10 x 10^0
        let short = FocusPosition::from_bits(0x05).unwrap();
        let long = FocusPosition::from_bits(0x28).unwrap();
        assert_eq!(short.centimeters(), 10);
        assert_eq!(long.centimeters(), 10);
        assert_eq!(FocusPosition::from_centimeters(10), Some(short));

        let data = [0xC8, 0x0F, 0x1F, 0x28];
        let camera = CameraConsumer1::decode(&data, DvSystem::Sys525_60).unwrap();
        assert_eq!(camera.focus_position, Some(long));
        assert_eq!(camera.encode(DvSystem::Sys525_60), data);
        assert_eq!("11".parse::<FocusPosition>().map(FocusPosition::to_bits), Ok(0x2C));
        assert!("33".parse::<FocusPosition>().is_err());
    }

    #[test]
    fn reserved_camera_values() {
        assert_eq!(AutoExposureMode::from_bits(0x5).to_string(), "RESERVED_5");
        assert_eq!("RESERVED_14".parse::<AutoExposureMode>(), Ok(AutoExposureMode::Reserved(14)));
        assert!("RESERVED_15".parse::<AutoExposureMode>().is_err());
        assert!("RESERVED_2".parse::<AutoExposureMode>().is_err());
        assert_eq!("SUNLIGHT".parse::<WhiteBalance>(), Ok(WhiteBalance::Sunlight));

        let camera = CameraConsumer1 {
            white_balance_mode: Some(WhiteBalanceMode::Reserved(0x7)),
            focus_mode: Some(FocusMode::Manual),
            ..Default::default()
        };
        assert_eq!(
            camera.validate(DvSystem::Sys525_60).unwrap_err().to_string(),
            "White balance mode is out of range."
        );
    }

    #[test]
    fn consumer_1_text_fields() {
        let camera = CameraConsumer1::decode(&CAMERA_1, DvSystem::Sys525_60).unwrap();
        let values = camera.to_text_values();
        assert_eq!(
            values.iter().map(|(_, t)| t.as_str()).collect::<Vec<_>>(),
            vec!["FULL_AUTOMATIC", "2.0", "", "AUTOMATIC", "", "AUTOMATIC", ""]
        );
        let pairs: Vec<_> = values.iter().map(|(f, t)| (*f, t.as_str())).collect();
        assert_eq!(CameraConsumer1::parse_text_values(&pairs).unwrap(), camera);
        assert!(CameraConsumer1::parse_text(CameraConsumer1Field::Iris, "1.6").is_err());
    }

    #[test]
    fn decode_consumer_2() {
        let camera = CameraConsumer2::decode(&CAMERA_2, DvSystem::Sys625_50).unwrap();
        assert_eq!(camera.vertical_panning_direction, Some(PanningDirection::SameDirectionAsScanning));
        assert_eq!(camera.vertical_panning_speed, Some(5));
        assert_eq!(
            camera.horizontal_panning_direction,
            Some(PanningDirection::OppositeDirectionOfScanning)
        );
        assert_eq!(camera.horizontal_panning_speed, Some(20));
        assert_eq!(camera.image_stabilizer_on, Some(true));
        assert_eq!(camera.focal_length.map(FocalLength::millimeters), Some(50));
        assert_eq!(camera.electric_zoom_on, Some(true));
        assert_eq!(camera.electric_zoom_magnification.map(ElectricZoom::tenths), Some(15));
        assert!(camera.validate(DvSystem::Sys625_50).is_ok());
        assert_eq!(camera.encode(DvSystem::Sys625_50), CAMERA_2);

        let empty = CameraConsumer2::decode(&[0xDF, 0xBF, 0xFF, 0xFF], DvSystem::Sys625_50).unwrap();
        assert_eq!(empty.vertical_panning_speed, None);
        assert_eq!(empty.horizontal_panning_speed, None);
        assert_eq!(empty.image_stabilizer_on, Some(false));
        assert_eq!(empty.focal_length, None);
        assert_eq!(empty.electric_zoom_magnification, None);
        assert_eq!(empty.encode(DvSystem::Sys625_50), [0xDF, 0xBF, 0xFF, 0xFF]);
    }

    #[test]
    fn malformed_electric_zoom() {
        assert_eq!(CameraConsumer2::decode(&[0xC5, 0x4A, 0x0B, 0x1A], DvSystem::Sys625_50), None);
        assert_eq!(CameraConsumer2::decode(&[0xC5, 0x4A, 0x0B, 0x7A], DvSystem::Sys625_50), None);
        assert_eq!(
            CameraConsumer2::decode(&[0xC5, 0x4A, 0x0B, 0x7E], DvSystem::Sys625_50)
                .and_then(|c| c.electric_zoom_magnification)
                .map(|z| z.to_string()),
            Some("8.0".to_string())
        );
    }

    #[test]
    fn consumer_2_validation() {
        let camera = CameraConsumer2::decode(&CAMERA_2, DvSystem::Sys625_50).unwrap();
        let bad = CameraConsumer2 {
            horizontal_panning_speed: Some(21),
            ..camera
        };
        assert_eq!(
            bad.validate(DvSystem::Sys625_50).unwrap_err().to_string(),
            "Horizontal panning speed must be an even number."
        );
        let bad = CameraConsumer2 {
            vertical_panning_speed: Some(31),
            ..camera
        };
        assert_eq!(
            bad.validate(DvSystem::Sys625_50).unwrap_err().to_string(),
            "Vertical panning speed is out of range.  Maximum value is 30."
        );
    }

    #[test]
    fn consumer_2_text_fields() {
        let camera = CameraConsumer2::decode(&CAMERA_2, DvSystem::Sys625_50).unwrap();
        let values = camera.to_text_values();
        assert_eq!(values[3], (CameraConsumer2Field::HorizontalPanningSpeed, "20".to_string()));
        assert_eq!(values[4].1, "TRUE");
        assert_eq!(values[5].1, "50");
        assert_eq!(values[7].1, "1.5");

        let pairs: Vec<_> = values.iter().map(|(f, t)| (*f, t.as_str())).collect();
        assert_eq!(CameraConsumer2::parse_text_values(&pairs).unwrap(), camera);
    }
}
