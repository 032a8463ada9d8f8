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

    src/pack/aaux_source.rs

    The AAUX SOURCE pack: sampling parameters and channel layout of the
    audio recorded in one audio block channel.

    Byte 1: LF | 1 | AF SIZE(6)
    Byte 2: SM | CHN(2) | PA | Audio mode(4)
    Byte 3: 1 | ML | 50/60 | STYPE(5)
    Byte 4: EF | TC | SMP(3) | QU(3)

    Values only apply to one audio block channel: the first or the second
    half of the audio DIF blocks in a DIF sequence.
*/
use crate::{
    pack::{vaux_source::SourceType, PackCodec, PackError},
    types::enums::DvSystem,
    util::{optional_bool_text, optional_hex, optional_text, parse_bool_optional, parse_name, parse_u16, parse_u32, parse_u8},
};

/// Supported audio sample frequencies in Hz, indexed by their SMP bits.
pub const SAMPLE_FREQUENCIES: [u32; 3] = [48000, 44100, 32000];

/// Locking of the audio sampling frequency to the video signal.
#[repr(u8)]
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, strum::EnumIter, strum::EnumString, strum::Display, strum::FromRepr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LockedMode {
    Locked = 0,
    Unlocked = 1,
}

#[repr(u8)]
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, strum::EnumIter, strum::EnumString, strum::Display, strum::FromRepr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StereoMode {
    MultiStereoAudio = 0,
    LumpedAudio = 1,
}

/// Whether the audio in CH1 (CH3) is related to the audio in CH2 (CH4).
#[repr(u8)]
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, strum::EnumIter, strum::EnumString, strum::Display, strum::FromRepr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AudioBlockPairing {
    Paired = 0,
    Independent = 1,
}

#[repr(u8)]
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, strum::EnumIter, strum::EnumString, strum::Display, strum::FromRepr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EmphasisTimeConstant {
    #[strum(serialize = "RESERVED")]
    Reserved = 0,
    /// 50/15 microseconds
    #[strum(serialize = "E_50_15")]
    E50_15 = 1,
}

#[repr(u8)]
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, strum::EnumIter, strum::EnumString, strum::Display, strum::FromRepr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AudioQuantization {
    #[strum(serialize = "LINEAR_16_BIT")]
    Linear16Bit = 0,
    #[strum(serialize = "NONLINEAR_12_BIT")]
    Nonlinear12Bit = 1,
    #[strum(serialize = "LINEAR_20_BIT")]
    Linear20Bit = 2,
    #[strum(serialize = "RESERVED_3")]
    Reserved3 = 3,
    #[strum(serialize = "RESERVED_4")]
    Reserved4 = 4,
    #[strum(serialize = "RESERVED_5")]
    Reserved5 = 5,
    #[strum(serialize = "RESERVED_6")]
    Reserved6 = 6,
    #[strum(serialize = "RESERVED_7")]
    Reserved7 = 7,
}

/// Return the inclusive range of audio samples per frame allowed for a sample frequency, or
/// `None` if the frequency is not supported.
pub fn samples_per_frame_range(system: DvSystem, sample_frequency: u32) -> Option<(u16, u16)> {
    match (system, sample_frequency) {
        (DvSystem::Sys525_60, 32000) => Some((1053, 1080)),
        (DvSystem::Sys525_60, 44100) => Some((1452, 1489)),
        (DvSystem::Sys525_60, 48000) => Some((1580, 1620)),
        (DvSystem::Sys625_50, 32000) => Some((1264, 1296)),
        (DvSystem::Sys625_50, 44100) => Some((1742, 1786)),
        (DvSystem::Sys625_50, 48000) => Some((1896, 1944)),
        _ => None,
    }
}

/// The contents of an AAUX source pack.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AauxSource {
    pub sample_frequency: Option<u32>,
    pub quantization: Option<AudioQuantization>,
    /// Applies to all audio channels.
    pub audio_samples_per_frame: Option<u16>,
    pub locked_mode: Option<LockedMode>,
    pub stereo_mode: Option<StereoMode>,
    /// Number of audio channels (1 or 2) within the audio block channel.
    pub audio_block_channel_count: Option<u8>,
    /// Layout of the audio signal channels, 0x0-0xF. See IEC 61834-4 8.1.
    pub audio_mode: Option<u8>,
    pub audio_block_pairing: Option<AudioBlockPairing>,
    pub multi_language: Option<bool>,
    pub source_type: Option<SourceType>,
    pub field_count: Option<u8>,
    pub emphasis_on: Option<bool>,
    pub emphasis_time_constant: Option<EmphasisTimeConstant>,
}

impl PackCodec for AauxSource {
    fn decode(data: &[u8; 4], system: DvSystem) -> Option<Self> {
        let [b1, b2, b3, b4] = *data;
        if b1 & 0x40 == 0 || b3 & 0x80 == 0 {
            return None;
        }
        let sample_frequency = *SAMPLE_FREQUENCIES.get(usize::from((b4 >> 3) & 0x07))?;
        let (min_samples, _) = samples_per_frame_range(system, sample_frequency)?;

        Some(AauxSource {
            sample_frequency: Some(sample_frequency),
            quantization: AudioQuantization::from_repr(b4 & 0x07),
            audio_samples_per_frame: Some(min_samples + u16::from(b1 & 0x3F)),
            locked_mode: LockedMode::from_repr(b1 >> 7),
            stereo_mode: StereoMode::from_repr(b2 >> 7),
            audio_block_channel_count: match (b2 >> 5) & 0x03 {
                0 => Some(1),
                1 => Some(2),
                _ => None,
            },
            audio_mode: Some(b2 & 0x0F),
            audio_block_pairing: AudioBlockPairing::from_repr((b2 >> 4) & 0x01),
            multi_language: Some((b3 >> 6) & 0x01 == 0),
            source_type: Some(SourceType::from_bits(b3 & 0x1F)),
            field_count: Some(if (b3 >> 5) & 0x01 == 1 { 50 } else { 60 }),
            emphasis_on: Some(b4 >> 7 == 0),
            emphasis_time_constant: EmphasisTimeConstant::from_repr((b4 >> 6) & 0x01),
        })
    }

    fn validate(&self, system: DvSystem) -> Result<(), PackError> {
        let sample_frequency = self
            .sample_frequency
            .ok_or_else(|| PackError::invalid("Audio sample frequency is required."))?;
        let (min_samples, max_samples) = samples_per_frame_range(system, sample_frequency).ok_or_else(|| {
            PackError::invalid(format!(
                "Audio sample frequency of {} is not supported.",
                sample_frequency
            ))
        })?;
        if self.quantization.is_none() {
            return Err(PackError::invalid("Audio quantization is required."));
        }
        let samples = self
            .audio_samples_per_frame
            .ok_or_else(|| PackError::invalid("Audio samples per frame is required."))?;
        if !(min_samples..=max_samples).contains(&samples) {
            return Err(PackError::invalid("Audio samples per frame is out of range."));
        }
        if self.locked_mode.is_none() {
            return Err(PackError::invalid("Audio locked mode is required."));
        }

        if self.stereo_mode.is_none() {
            return Err(PackError::invalid("Stereo mode enumeration value is required."));
        }
        match self.audio_block_channel_count {
            None => return Err(PackError::invalid("Audio block channel count is required.")),
            Some(1 | 2) => {}
            Some(_) => return Err(PackError::invalid("Audio block channel count must be 1 or 2.")),
        }
        match self.audio_mode {
            None => return Err(PackError::invalid("Audio mode is required.")),
            Some(mode) if mode > 0xF => return Err(PackError::invalid("Audio mode is out of range.")),
            Some(_) => {}
        }
        if self.audio_block_pairing.is_none() {
            return Err(PackError::invalid("Audio block pairing is required."));
        }
        if self.multi_language.is_none() {
            return Err(PackError::invalid("Multi-language flag is required."));
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
        if self.emphasis_on.is_none() {
            return Err(PackError::invalid("Emphasis on is required."));
        }
        if self.emphasis_time_constant.is_none() {
            return Err(PackError::invalid("Emphasis time constant is required."));
        }
        Ok(())
    }

    fn encode(&self, system: DvSystem) -> [u8; 4] {
        let sample_frequency = self.sample_frequency.unwrap_or(SAMPLE_FREQUENCIES[0]);
        let smp = SAMPLE_FREQUENCIES
            .iter()
            .position(|f| *f == sample_frequency)
            .unwrap_or(0) as u8;
        let min_samples = samples_per_frame_range(system, sample_frequency).map_or(0, |(min, _)| min);
        let af_size = self.audio_samples_per_frame.unwrap_or(min_samples).saturating_sub(min_samples) as u8;
        let chn = self.audio_block_channel_count.map_or(0, |count| count.saturating_sub(1));
        [
            self.locked_mode.map_or(0, |v| v as u8) << 7 | 0x40 | (af_size & 0x3F),
            self.stereo_mode.map_or(0, |v| v as u8) << 7
                | (chn & 0x03) << 5
                | self.audio_block_pairing.map_or(0, |v| v as u8) << 4
                | self.audio_mode.unwrap_or(0),
            0x80 | u8::from(self.multi_language != Some(true)) << 6
                | u8::from(self.field_count == Some(50)) << 5
                | self.source_type.map_or(0, |st| st.to_bits()),
            u8::from(self.emphasis_on != Some(true)) << 7
                | self.emphasis_time_constant.map_or(0, |v| v as u8) << 6
                | smp << 3
                | self.quantization.map_or(0, |v| v as u8),
        ]
    }
}

member_text_fields! {
    AauxSource, AauxSourceField, AauxSourceValue;
    SampleFrequency(sample_frequency: u32) => |t| parse_u32("sample frequency", t), optional_text;
    Quantization(quantization: AudioQuantization) => |t| parse_name("quantization", t), optional_text;
    AudioSamplesPerFrame(audio_samples_per_frame: u16) => |t| parse_u16("audio samples per frame", t),
        optional_text;
    LockedMode(locked_mode: LockedMode) => |t| parse_name("locked mode", t), optional_text;
    StereoMode(stereo_mode: StereoMode) => |t| parse_name("stereo mode", t), optional_text;
    AudioBlockChannelCount(audio_block_channel_count: u8) => |t| parse_u8("audio block channel count", t),
        optional_text;
    AudioMode(audio_mode: u8) => |t| parse_u8("audio mode", t), |v: &Option<u8>| optional_hex(v.map(u32::from), 1);
    AudioBlockPairing(audio_block_pairing: AudioBlockPairing) => |t| parse_name("audio block pairing", t),
        optional_text;
    MultiLanguage(multi_language: bool) => parse_bool_optional, |v: &Option<bool>| optional_bool_text(*v);
    FieldCount(field_count: u8) => |t| parse_u8("field count", t), optional_text;
    SourceType(source_type: SourceType) => |t| parse_name("source type", t), optional_text;
    EmphasisOn(emphasis_on: bool) => parse_bool_optional, |v: &Option<bool>| optional_bool_text(*v);
    EmphasisTimeConstant(emphasis_time_constant: EmphasisTimeConstant) =>
        |t| parse_name("emphasis time constant", t), optional_text;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pack::TextFields;

    // 48 kHz, 16 bit, 1600 samples per frame on 525/60
    const NTSC_48K: [u8; 4] = [0xD4, 0x00, 0xC0, 0xC0];
    // 32 kHz, 12 bit, 1280 samples per frame on 625/50
    const PAL_32K: [u8; 4] = [0x50, 0x20, 0xE0, 0xD1];

    #[test]
    fn decode_ntsc_48k() {
        let source = AauxSource::decode(&NTSC_48K, DvSystem::Sys525_60).unwrap();
        assert_eq!(source.sample_frequency, Some(48000));
        assert_eq!(source.quantization, Some(AudioQuantization::Linear16Bit));
        assert_eq!(source.audio_samples_per_frame, Some(1600));
        assert_eq!(source.locked_mode, Some(LockedMode::Unlocked));
        assert_eq!(source.audio_block_channel_count, Some(1));
        assert_eq!(source.multi_language, Some(false));
        assert_eq!(source.field_count, Some(60));
        assert_eq!(source.emphasis_on, Some(false));
        assert_eq!(source.emphasis_time_constant, Some(EmphasisTimeConstant::E50_15));
        assert!(source.validate(DvSystem::Sys525_60).is_ok());
        assert_eq!(source.encode(DvSystem::Sys525_60), NTSC_48K);
    }

    #[test]
    fn decode_pal_32k() {
        let source = AauxSource::decode(&PAL_32K, DvSystem::Sys625_50).unwrap();
        assert_eq!(source.sample_frequency, Some(32000));
        assert_eq!(source.quantization, Some(AudioQuantization::Nonlinear12Bit));
        assert_eq!(source.audio_samples_per_frame, Some(1280));
        assert_eq!(source.locked_mode, Some(LockedMode::Locked));
        assert_eq!(source.audio_block_channel_count, Some(2));
        assert_eq!(source.field_count, Some(50));
        assert!(source.validate(DvSystem::Sys625_50).is_ok());
        assert_eq!(source.encode(DvSystem::Sys625_50), PAL_32K);
    }

    #[test]
    fn fixed_bits_and_frequency_are_checked() {
        assert!(AauxSource::decode(&[0x94, 0x00, 0xC0, 0xC0], DvSystem::Sys525_60).is_none());
        assert!(AauxSource::decode(&[0xD4, 0x00, 0x40, 0xC0], DvSystem::Sys525_60).is_none());
        assert!(AauxSource::decode(&[0xD4, 0x00, 0xC0, 0xD8], DvSystem::Sys525_60).is_none());
    }

    #[test]
    fn samples_per_frame_must_be_in_range() {
        let source = AauxSource::decode(&[0xFF, 0x00, 0xC0, 0xC0], DvSystem::Sys525_60).unwrap();
        assert_eq!(source.audio_samples_per_frame, Some(1643));
        assert_eq!(
            source.validate(DvSystem::Sys525_60).unwrap_err().to_string(),
            "Audio samples per frame is out of range."
        );
    }

    #[test]
    fn text_fields() {
        let source = AauxSource::decode(&NTSC_48K, DvSystem::Sys525_60).unwrap();
        let values = source.to_text_values();
        let text: Vec<_> = values.iter().map(|(_, t)| t.as_str()).collect();
        assert_eq!(
            text,
            vec![
                "48000",
                "LINEAR_16_BIT",
                "1600",
                "UNLOCKED",
                "MULTI_STEREO_AUDIO",
                "1",
                "0x0",
                "PAIRED",
                "FALSE",
                "60",
                "STANDARD_DEFINITION_COMPRESSED_CHROMA",
                "FALSE",
                "E_50_15",
            ]
        );
        let pairs: Vec<_> = values.iter().map(|(f, t)| (*f, t.as_str())).collect();
        assert_eq!(AauxSource::parse_text_values(&pairs).unwrap(), source);
    }
}
