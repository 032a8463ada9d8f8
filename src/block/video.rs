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

    src/block/video.rs

    The DIF video block, holding one 77 byte compressed macro block.
*/
use crate::{
    block::{
        block_id::{BlockId, BlockType},
        check_count,
        BlockError,
        DifBlock,
    },
    types::file_info::FileInfo,
    BLOCK_PAYLOAD_SIZE,
};

/// Bytes of compressed video data in a video DIF block.
pub const VIDEO_DATA_SIZE: usize = BLOCK_PAYLOAD_SIZE;

/// The STA (status) nibble of a compressed macro block. Non-zero values indicate an error.
const STA_MASK: u8 = 0xF0;

/// A DIF video block. The compressed video data is not interpreted beyond its status nibble.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Video {
    pub block_id: BlockId,
    pub data: Vec<u8>,
}

impl Video {
    /// Return whether the tape deck flagged this macro block as containing errors.
    pub fn has_video_errors(&self) -> bool {
        self.data.first().is_some_and(|sta| sta & STA_MASK != 0)
    }
}

impl DifBlock for Video {
    const BLOCK_TYPE: BlockType = BlockType::Video;

    fn block_id(&self) -> &BlockId {
        &self.block_id
    }

    fn parse_payload(block_id: BlockId, payload: &[u8], _file_info: &FileInfo) -> Result<Self, BlockError> {
        Ok(Video {
            block_id,
            data: payload.to_vec(),
        })
    }

    fn write_payload(&self, payload: &mut [u8], _file_info: &FileInfo) -> Result<(), BlockError> {
        payload.copy_from_slice(&self.data);
        Ok(())
    }

    fn validate(&self, _file_info: &FileInfo) -> Result<(), BlockError> {
        check_count(BlockType::Video, "video data", VIDEO_DATA_SIZE, self.data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BLOCK_SIZE;

    #[test]
    fn status_nibble_flags_errors() {
        let info = FileInfo::default();
        let mut bytes = [0x5A; BLOCK_SIZE];
        bytes[..3].copy_from_slice(&[0x92, 0x47, 0x86]);
        bytes[3] = 0x0C;
        let video = Video::parse(&bytes, &info).unwrap();
        assert!(!video.has_video_errors());
        assert_eq!(video.to_binary(&info).unwrap(), bytes);

        bytes[3] = 0x7C;
        assert!(Video::parse(&bytes, &info).unwrap().has_video_errors());
    }

    #[test]
    fn wrong_block_type_is_rejected() {
        let mut bytes = [0xFF; BLOCK_SIZE];
        bytes[..3].copy_from_slice(&[0x70, 0x07, 0x00]);
        assert_eq!(
            Video::parse(&bytes, &FileInfo::default()),
            Err(BlockError::WrongBlockType {
                expected: BlockType::Video,
                found:    BlockType::Audio,
            })
        );
    }

    #[test]
    fn data_length_is_checked() {
        let video = Video {
            block_id: BlockId {
                block_type: BlockType::Video,
                sequence: 0,
                channel: 0,
                dif_sequence: 0,
                dif_block: 0,
            },
            data: vec![0; 10],
        };
        assert!(matches!(
            video.to_binary(&FileInfo::default()),
            Err(BlockError::FieldCount { actual: 10, .. })
        ));
    }
}
