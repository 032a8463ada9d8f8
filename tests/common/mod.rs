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

    tests/common/mod.rs

    Common support routines for tests
*/
#![allow(dead_code)]

use dvfox::{DvSystem, FileInfo, BLOCK_SIZE, PACK_SIZE};

pub fn ntsc() -> FileInfo {
    FileInfo::new(DvSystem::Sys525_60, 1)
}

pub fn pal() -> FileInfo {
    FileInfo::new(DvSystem::Sys625_50, 1)
}

/// Decode a hex string such as `"62 FF E1 E5 01"`. Whitespace is ignored.
pub fn hex_bytes(text: &str) -> Vec<u8> {
    let compact: String = text.split_whitespace().collect();
    hex::decode(compact).unwrap()
}

/// Decode a five byte pack from hex.
pub fn pack_bytes(text: &str) -> [u8; PACK_SIZE] {
    hex_bytes(text).try_into().unwrap()
}

/// Build a DIF block from its three identifier bytes, with every payload byte set to `fill`.
pub fn block_bytes(id: [u8; 3], fill: u8) -> [u8; BLOCK_SIZE] {
    let mut bytes = [fill; BLOCK_SIZE];
    bytes[..3].copy_from_slice(&id);
    bytes
}

/// Build a VAUX block in DIF sequence 0 holding the given packs, padded with NO INFO packs.
pub fn vaux_block(dif_block: u8, packs: &[[u8; PACK_SIZE]]) -> [u8; BLOCK_SIZE] {
    let mut bytes = block_bytes([0x5F, 0x07, dif_block], 0xFF);
    for (i, pack) in packs.iter().enumerate() {
        let offset = 3 + i * PACK_SIZE;
        bytes[offset..offset + PACK_SIZE].copy_from_slice(pack);
    }
    bytes
}

/// Build an audio block in DIF sequence 0 carrying `pack`, with silent samples.
pub fn audio_block(dif_block: u8, pack: [u8; PACK_SIZE]) -> [u8; BLOCK_SIZE] {
    let mut bytes = block_bytes([0x70, 0x07, dif_block], 0x00);
    bytes[3..3 + PACK_SIZE].copy_from_slice(&pack);
    bytes
}
