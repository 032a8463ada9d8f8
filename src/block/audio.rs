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

    src/block/audio.rs

    The DIF audio block: one AAUX pack followed by 72 bytes of shuffled PCM
    audio samples.
*/
use crate::{
    block::{
        block_id::{BlockId, BlockType},
        check_count,
        BlockError,
        DifBlock,
        PackSlot,
    },
    pack::aaux_source::AudioQuantization,
    types::{enums::DvSystem, file_info::FileInfo},
    PACK_SIZE,
};
use binrw::{binrw, BinRead, BinWrite};
use std::io::Cursor;

/// Bytes of audio sample data in an audio DIF block.
pub const AUDIO_DATA_SIZE: usize = 72;

#[binrw]
#[brw(big)]
struct AudioPayload {
    pack: [u8; PACK_SIZE],
    data: [u8; AUDIO_DATA_SIZE],
}

/// A DIF audio block.
///
/// Samples are left as raw bytes. Tape decks replace samples they could not read with a special
/// error code, which [`Audio::has_audio_errors`] looks for.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Audio {
    pub block_id: BlockId,
    pub pack: PackSlot,
    pub data: Vec<u8>,
}

impl Audio {
    /// Determine whether any sample in this block is marked as an error by the tape deck.
    /// # Arguments
    /// * `file_info` - The stream parameters; the video system determines the shuffling pattern.
    /// * `frame_sample_count` - The number of audio samples in the frame, from the AAUX source
    ///    pack. Sample positions at or past this count are unused and ignored.
    /// * `quantization` - The sample format, from the AAUX source pack.
    /// # Returns
    /// `true` if an error sample was found. Only 16 bit linear and 12 bit nonlinear samples are
    /// supported; any other quantization returns an error.
    pub fn has_audio_errors(
        &self,
        file_info: &FileInfo,
        frame_sample_count: usize,
        quantization: AudioQuantization,
    ) -> Result<bool, BlockError> {
        check_count(BlockType::Audio, "audio data", AUDIO_DATA_SIZE, self.data.len())?;

        let sample_numbers = block_sample_numbers(
            file_info.system,
            self.block_id.dif_sequence % (file_info.dif_sequence_count() / 2),
            self.block_id.dif_block,
        );
        let in_frame = |i: usize| sample_numbers.get(i).is_some_and(|n| *n < frame_sample_count);

        match quantization {
            AudioQuantization::Linear16Bit => {
                for (i, sample) in self.data.chunks_exact(2).enumerate() {
                    if !in_frame(i) {
                        break;
                    }
                    if sample[0] == 0x80 && sample[1] == 0x00 {
                        return Ok(true);
                    }
                }
            }
            AudioQuantization::Nonlinear12Bit => {
                // Two channels: most significant bytes of Y and Z, then both low nibbles.
                for (i, pair) in self.data.chunks_exact(3).enumerate() {
                    if !in_frame(i) {
                        break;
                    }
                    let (msb_y, msb_z, lsb) = (pair[0], pair[1], pair[2]);
                    if (msb_y == 0x80 && lsb & 0xF0 == 0x00) || (msb_z == 0x80 && lsb & 0x0F == 0x00) {
                        return Ok(true);
                    }
                }
            }
            other => return Err(BlockError::UnsupportedQuantization(other)),
        }
        Ok(false)
    }
}

/// Return the frame-relative numbers of the audio samples stored in an audio DIF block, in the
/// order they are stored.
///
/// Samples are shuffled across the DIF sequences of each half of the frame and across the nine
/// audio blocks of each sequence. The table covers the largest sample count of the system
/// (1620 or 1944); lower sample rates use a prefix of each block.
pub fn block_sample_numbers(system: DvSystem, dif_sequence_offset: u8, dif_block: u8) -> Vec<usize> {
    let half = system.dif_sequence_count() as usize / 2;
    let max_samples = match system {
        DvSystem::Sys525_60 => 1620,
        DvSystem::Sys625_50 => 1944,
    };

    (0..max_samples)
        .filter(|n| {
            let sequence = (n / 3 + 2 * (n % 3)) % half;
            let block = 3 * (n % 3) + (n % (9 * half)) / (3 * half);
            sequence == dif_sequence_offset as usize && block == dif_block as usize
        })
        .collect()
}

impl DifBlock for Audio {
    const BLOCK_TYPE: BlockType = BlockType::Audio;

    fn block_id(&self) -> &BlockId {
        &self.block_id
    }

    fn parse_payload(block_id: BlockId, payload: &[u8], file_info: &FileInfo) -> Result<Self, BlockError> {
        let raw = AudioPayload::read(&mut Cursor::new(payload))?;
        Ok(Audio {
            block_id,
            pack: PackSlot::parse(&raw.pack, file_info.system),
            data: raw.data.to_vec(),
        })
    }

    fn write_payload(&self, payload: &mut [u8], file_info: &FileInfo) -> Result<(), BlockError> {
        let mut data = [0u8; AUDIO_DATA_SIZE];
        data.copy_from_slice(&self.data);
        let raw = AudioPayload {
            pack: self.pack.to_binary(file_info.system)?,
            data,
        };
        raw.write(&mut Cursor::new(payload))?;
        Ok(())
    }

    fn validate(&self, _file_info: &FileInfo) -> Result<(), BlockError> {
        if self.block_id.dif_block > BlockType::Audio.max_dif_block() {
            return Err(BlockError::UnexpectedBlockCount {
                expected: BlockType::Audio.count_per_sequence(),
            });
        }
        check_count(BlockType::Audio, "audio data", AUDIO_DATA_SIZE, self.data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BLOCK_SIZE;

    fn audio_bytes(dif_sequence: u8, dif_block: u8) -> [u8; BLOCK_SIZE] {
        let mut bytes = [0x00; BLOCK_SIZE];
        bytes[..3].copy_from_slice(&[0x70, dif_sequence << 4 | 0x07, dif_block]);
        bytes[3..8].copy_from_slice(&[0xFF; 5]);
        bytes
    }

    #[test]
    fn shuffle_covers_every_sample_once() {
        for system in [DvSystem::Sys525_60, DvSystem::Sys625_50] {
            let half = system.dif_sequence_count() / 2;
            let mut seen = Vec::new();
            for sequence in 0..half {
                for block in 0..9 {
                    let numbers = block_sample_numbers(system, sequence, block);
                    assert!(numbers.len() <= AUDIO_DATA_SIZE / 2);
                    assert!(numbers.windows(2).all(|w| w[0] < w[1]));
                    seen.extend(numbers);
                }
            }
            seen.sort();
            let expected: Vec<usize> = (0..seen.len()).collect();
            assert_eq!(seen, expected);
        }
    }

    #[test]
    fn first_samples_of_first_block() {
        assert_eq!(&block_sample_numbers(DvSystem::Sys525_60, 0, 0)[..3], &[0, 45, 90]);
    }

    #[test]
    fn sixteen_bit_error_samples() {
        let info = FileInfo::new(DvSystem::Sys525_60, 1);
        let mut bytes = audio_bytes(0, 0);
        let audio = Audio::parse(&bytes, &info).unwrap();
        assert_eq!(audio.has_audio_errors(&info, 1600, AudioQuantization::Linear16Bit), Ok(false));
        assert_eq!(audio.to_binary(&info).unwrap(), bytes);

        // Sample at position 2 is frame sample 90.
        bytes[8 + 4] = 0x80;
        let audio = Audio::parse(&bytes, &info).unwrap();
        assert_eq!(audio.has_audio_errors(&info, 1600, AudioQuantization::Linear16Bit), Ok(true));
        assert_eq!(audio.has_audio_errors(&info, 90, AudioQuantization::Linear16Bit), Ok(false));
    }

    #[test]
    fn twelve_bit_error_samples() {
        let info = FileInfo::new(DvSystem::Sys625_50, 1);
        let mut bytes = audio_bytes(7, 3);
        bytes[8] = 0x80;
        bytes[10] = 0x0F;
        let audio = Audio::parse(&bytes, &info).unwrap();
        assert_eq!(audio.has_audio_errors(&info, 1944, AudioQuantization::Nonlinear12Bit), Ok(true));

        bytes[10] = 0x1F;
        let audio = Audio::parse(&bytes, &info).unwrap();
        assert_eq!(audio.has_audio_errors(&info, 1944, AudioQuantization::Nonlinear12Bit), Ok(false));
        assert!(audio.has_audio_errors(&info, 1944, AudioQuantization::Linear20Bit).is_err());
    }
}
