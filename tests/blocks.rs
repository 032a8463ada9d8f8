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

    tests/blocks.rs

    Round trips and rejections of whole DIF blocks.
*/
mod common;

use common::*;
use dvfox::{
    Block,
    BlockError,
    BlockId,
    BlockPosition,
    BlockType,
    DvSystem,
    FileInfo,
    Header,
    Pack,
    PackSlot,
    PackType,
    TrackPitch,
    BLOCK_SIZE,
};

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn header_round_trip() {
    init();
    let mut bytes = block_bytes([0x1F, 0x07, 0x00], 0xFF);
    bytes[3..8].copy_from_slice(&hex_bytes("3F 68 78 78 78"));

    let block = Block::parse(&bytes, &ntsc()).unwrap();
    let Block::Header(header) = &block
    else {
        panic!("expected a header block, got {:?}", block);
    };
    assert_eq!(header.track_pitch, Some(TrackPitch::StandardPlay));
    assert_eq!(block.to_binary(&ntsc()).unwrap(), bytes);

    // The header's sequence count must agree with the system we are reading as.
    assert_eq!(
        Block::parse(&bytes, &pal()),
        Err(BlockError::HeaderSystemMismatch(DvSystem::Sys625_50))
    );
}

#[test]
fn header_track_pitch_and_pilot_frame_are_joint() {
    init();
    let header = Header {
        block_id: BlockId {
            block_type: BlockType::Header,
            sequence: 0xF,
            channel: 0,
            dif_sequence: 0,
            dif_block: 0,
        },
        dif_sequence_count: 10,
        track_pitch: Some(TrackPitch::StandardPlay),
        pilot_frame: None,
        application_id_track: None,
        application_id_1: None,
        application_id_2: None,
        application_id_3: None,
    };
    let err = Block::Header(header).to_binary(&ntsc()).unwrap_err();
    assert_eq!(err, BlockError::TrackPitchPilotFrame);
    assert_eq!(
        err.to_string(),
        "Track pitch and pilot frame must be both present or absent together."
    );
}

#[test]
fn reserved_bits_cleared() {
    init();
    let bytes = block_bytes([0x00, 0x00, 0x00], 0xFF);
    let err = Block::parse(&bytes, &ntsc()).unwrap_err();
    assert!(err.to_string().contains("reserved bits"), "{}", err);
    assert!(err.to_string().contains("unexpectedly cleared"), "{}", err);
}

#[test]
fn vaux_dif_block_too_high() {
    init();
    let bytes = block_bytes([0x50, 0x07, 0x03], 0xFF);
    let err = Block::parse(&bytes, &ntsc()).unwrap_err();
    assert!(err.to_string().contains("dif_block number 3 too high for VAUX"), "{}", err);
}

#[test]
fn dif_sequence_limits() {
    init();
    let bytes = block_bytes([0x90, 0xA7, 0x00], 0xFF);
    assert!(Block::parse(&bytes, &pal()).is_ok());
    assert!(matches!(
        Block::parse(&bytes, &ntsc()),
        Err(BlockError::DifSequenceTooHigh { dif_sequence: 10, .. })
    ));

    let bytes = block_bytes([0x90, 0xC7, 0x00], 0xFF);
    assert!(Block::parse(&bytes, &pal()).is_err());
    assert!(Block::parse(&bytes, &ntsc()).is_err());
}

#[test]
fn wrong_block_size() {
    init();
    assert_eq!(
        Block::parse(&[0xFF; 79], &ntsc()),
        Err(BlockError::WrongSize {
            expected: BLOCK_SIZE,
            actual:   79,
        })
    );
}

#[test]
fn vaux_round_trip_with_unknown_pack() {
    init();
    let packs = [
        pack_bytes("60 FF FF 00 FF"),
        pack_bytes("61 03 C8 C8 FF"),
        pack_bytes("62 D9 E7 48 97"),
        pack_bytes("63 80 96 A3 E1"),
        pack_bytes("0B 01 02 03 04"),
    ];
    let bytes = vaux_block(0, &packs);
    let block = Block::parse(&bytes, &ntsc()).unwrap();

    let slots = block.pack_slots();
    assert_eq!(slots.len(), 15);
    assert_eq!(slots[0].pack.as_ref().and_then(Pack::pack_type), Some(PackType::VauxSource));
    assert_eq!(slots[3].pack.as_ref().map(|p| p.text_value(None).unwrap()), Some("21:23:16:00".to_string()));
    assert_eq!(slots[4].pack, Some(Pack::Unknown(packs[4])));
    assert_eq!(slots[14].pack, Some(Pack::NoInfo));
    assert_eq!(block.to_binary(&ntsc()).unwrap(), bytes);
}

#[test]
fn invalid_pack_is_dropped_but_type_kept() {
    init();
    // A recording date with an impossible time zone
    let bytes = vaux_block(1, &[pack_bytes("62 30 31 12 74")]);
    let block = Block::parse(&bytes, &ntsc()).unwrap();
    let slot = &block.pack_slots()[0];
    assert_eq!(slot.pack_type, 0x62);
    assert_eq!(slot.pack, None);

    // The dropped pack is written back as NO INFO.
    let written = block.to_binary(&ntsc()).unwrap();
    assert_eq!(&written[3..8], &[0xFF; 5]);
}

#[test]
fn date_without_time_zone_survives_round_trip() {
    init();
    // Time zone digits are absent, but the DS and TM bits are cleared.
    let bytes = vaux_block(1, &[pack_bytes("62 3F D5 68 24")]);
    let block = Block::parse(&bytes, &ntsc()).unwrap();
    let pack = block.pack_slots()[0].pack.as_ref().unwrap();
    assert_eq!(pack.text_value(None).unwrap(), "2024-08-15");
    assert_eq!(pack.text_value(Some("week")).unwrap(), "THURSDAY");
    assert_eq!(pack.text_value(Some("tz")).unwrap(), "");

    let written = block.to_binary(&ntsc()).unwrap();
    assert_eq!(&written[3..8], &hex_bytes("62 FF D5 68 24")[..]);
}

#[test]
fn editing_a_pack_slot() {
    init();
    let bytes = vaux_block(2, &[]);
    let block = Block::parse(&bytes, &pal()).unwrap();

    let date = Pack::parse_text_values(
        PackType::VauxRecordingDate,
        &[(None, "2001-05-21"), (Some("reserved"), "0x3")],
    )
    .unwrap();
    let edited = block.with_pack_slot(1, PackSlot::new(date.clone())).unwrap();
    assert_eq!(edited.pack_slots()[1].pack, Some(date));
    assert!(block.with_pack_slot(15, PackSlot::empty()).is_none());

    let written = edited.to_binary(&pal()).unwrap();
    assert_eq!(&written[8..13], &hex_bytes("62 FF E1 E5 01")[..]);
    // The original block is unchanged.
    assert_eq!(block.to_binary(&pal()).unwrap(), bytes);
}

#[test]
fn audio_round_trip() {
    init();
    let bytes = audio_block(0, pack_bytes("50 D4 00 C0 C0"));
    let block = Block::parse(&bytes, &ntsc()).unwrap();
    let Some(Pack::AauxSource(source)) = &block.pack_slots()[0].pack
    else {
        panic!("expected an AAUX source pack in {:?}", block);
    };
    assert_eq!(source.sample_frequency, Some(48000));
    assert_eq!(source.audio_samples_per_frame, Some(1600));
    assert_eq!(block.to_binary(&ntsc()).unwrap(), bytes);
}

#[test]
fn video_round_trip() {
    init();
    let mut bytes = block_bytes([0x96, 0x17, 0x86], 0x5A);
    bytes[3] = 0x00;
    let block = Block::parse(&bytes, &pal()).unwrap();
    assert_eq!(block.block_id().dif_sequence, 1);
    assert_eq!(block.block_id().dif_block, 0x86);
    assert_eq!(block.to_binary(&pal()).unwrap(), bytes);
}

#[test]
fn misplaced_block_is_not_an_error() {
    init();
    let bytes = vaux_block(0, &[]);
    // Index 0 of a DIF sequence is where the header block belongs.
    let position = BlockPosition::new(0, 0, 0);
    let block = Block::parse_at(&bytes, &position, &ntsc()).unwrap();
    assert_eq!(block.block_id().block_type, BlockType::Vaux);
    assert!(!position.check(block.block_id()).is_empty());
}

#[test]
fn frame_size_selects_system() {
    init();
    let info = FileInfo::from_frame_size(144000).unwrap();
    assert_eq!(info.system, DvSystem::Sys625_50);
    assert_eq!(info.channel_count, 1);
    assert!(FileInfo::from_frame_size(1000).is_err());
}
