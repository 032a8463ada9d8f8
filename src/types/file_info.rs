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

    src/types/file_info.rs

    Stream-wide parameters that DIF blocks are parsed and validated against.
*/
use crate::{block::position::BLOCKS_PER_DIF_SEQUENCE, types::enums::DvSystem, DvError, BLOCK_SIZE};

/// Top-level information about a DV stream, needed to parse and validate individual DIF blocks.
///
/// The `channel_count` is 1 for 25 Mbps streams, and 2 for 50 Mbps streams which carry two
/// complete sets of DIF sequences per frame.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FileInfo {
    pub system: DvSystem,
    pub channel_count: u8,
}

impl Default for FileInfo {
    fn default() -> Self {
        Self {
            system: DvSystem::Sys525_60,
            channel_count: 1,
        }
    }
}

impl FileInfo {
    pub fn new(system: DvSystem, channel_count: u8) -> Self {
        Self { system, channel_count }
    }

    /// Return the number of DIF sequences in each channel of a video frame.
    pub fn dif_sequence_count(&self) -> u8 {
        self.system.dif_sequence_count()
    }

    /// Return the size of a complete video frame, in bytes.
    pub fn video_frame_size(&self) -> usize {
        self.channel_count as usize * self.dif_sequence_count() as usize * BLOCKS_PER_DIF_SEQUENCE * BLOCK_SIZE
    }

    /// Determine the system and channel count of a raw DV stream from the size of a single frame.
    /// Only 25 Mbps (one channel) and 50 Mbps (two channel) frames are supported.
    pub fn from_frame_size(frame_size: usize) -> Result<FileInfo, DvError> {
        for channel_count in 1..=2u8 {
            for system in [DvSystem::Sys525_60, DvSystem::Sys625_50] {
                let info = FileInfo::new(system, channel_count);
                if info.video_frame_size() == frame_size {
                    log::debug!(
                        "from_frame_size(): {} byte frame is {} with {} channel(s)",
                        frame_size,
                        system,
                        channel_count
                    );
                    return Ok(info);
                }
            }
        }
        Err(DvError::UnsupportedFrameSize(frame_size))
    }

    /// Return whether the specified DIF sequence lies in the first half of its channel. Subcode
    /// sync blocks record this in their first ID byte.
    pub fn is_first_half(&self, dif_sequence: u8) -> bool {
        dif_sequence < self.dif_sequence_count() / 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_sizes_are_detected() {
        assert_eq!(
            FileInfo::from_frame_size(120_000).unwrap(),
            FileInfo::new(DvSystem::Sys525_60, 1)
        );
        assert_eq!(
            FileInfo::from_frame_size(144_000).unwrap(),
            FileInfo::new(DvSystem::Sys625_50, 1)
        );
        assert_eq!(
            FileInfo::from_frame_size(240_000).unwrap(),
            FileInfo::new(DvSystem::Sys525_60, 2)
        );
        assert_eq!(
            FileInfo::from_frame_size(288_000).unwrap(),
            FileInfo::new(DvSystem::Sys625_50, 2)
        );
    }

    #[test]
    fn unsupported_frame_size_is_rejected() {
        match FileInfo::from_frame_size(100_000) {
            Err(DvError::UnsupportedFrameSize(size)) => assert_eq!(size, 100_000),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn first_half_follows_sequence_count() {
        let ntsc = FileInfo::new(DvSystem::Sys525_60, 1);
        assert!(ntsc.is_first_half(4));
        assert!(!ntsc.is_first_half(5));
        let pal = FileInfo::new(DvSystem::Sys625_50, 1);
        assert!(pal.is_first_half(5));
        assert!(!pal.is_first_half(6));
    }
}
