//! Merging files into a single load segment.

mod common;

use common::{binary_bytes, init_segment, run_segment, segment_bytes};
use dos2bin::{
    AnalyzeOptions, BinaryFile, MonolithicOptions, ProcessingError, Segment, parse_dos2_binary,
};

fn game() -> BinaryFile {
    BinaryFile::with_segments(vec![
        Segment::new(0x2000, vec![0xA9, 0x00, 0x60]),
        init_segment(0x2000),
        Segment::new(0x2010, vec![0x60]),
        run_segment(0x2010),
    ])
}

#[test]
fn test_merge_without_extra_code() {
    common::init();
    let out = game().monolithic_binary(&MonolithicOptions::default()).unwrap();

    let mut expected = vec![0xFF, 0xFF, 0x00, 0x20, 0x10, 0x20, 0xA9, 0x00, 0x60];
    expected.extend([0x00; 12]);
    expected.push(0x60);
    expected.extend([0xE0, 0x02, 0xE1, 0x02, 0x10, 0x20]);
    assert_eq!(out, expected);

    let merged = parse_dos2_binary(&out, &AnalyzeOptions::default()).unwrap();
    assert!(merged.is_monolithic());
    let info = merged.monolithic_conversion_info().unwrap();
    assert_eq!(info.load_address, 0x2000);
    assert_eq!(info.run_address, 0x2010);
    assert_eq!(info.data.len(), 0x11);
}

#[test]
fn test_merge_with_extra_code() {
    let options = MonolithicOptions {
        extra_code_address: Some(0x2011),
    };
    let out = game().monolithic_binary(&options).unwrap();
    let merged = parse_dos2_binary(&out, &AnalyzeOptions::default()).unwrap();

    let image = &merged.segments()[0];
    assert_eq!(image.first_address, 0x2000);
    assert_eq!(image.last_address(), Some(0x2016));
    assert_eq!(
        &image.data[0x11..],
        &[0x20, 0x00, 0x20, 0x4C, 0x10, 0x20]
    );
    assert_eq!(merged.segments()[1].run_vector(), Some(0x2011));
}

#[test]
fn test_vector_bytes_not_copied() {
    // $02DE-$02E3: two data bytes, then RUN $3000 and INIT $3100
    let bin = BinaryFile::with_segments(vec![Segment::new(
        0x02DE,
        vec![0x01, 0x02, 0x00, 0x30, 0x00, 0x31],
    )]);
    let out = bin.monolithic_binary(&MonolithicOptions::default()).unwrap();
    assert_eq!(
        out,
        vec![
            0xFF, 0xFF, 0xDE, 0x02, 0xDF, 0x02, 0x01, 0x02, 0xE0, 0x02, 0xE1, 0x02, 0x00, 0x30,
        ]
    );
}

#[test]
fn test_only_vectors_is_empty_image() {
    let bin = parse_dos2_binary(
        &[0xFF, 0xFF, 0xE0, 0x02, 0xE1, 0x02, 0x34, 0x12],
        &AnalyzeOptions::default(),
    )
    .unwrap();
    assert_eq!(
        bin.monolithic_binary(&MonolithicOptions::default()),
        Err(ProcessingError::EmptyImage)
    );
}

#[test]
fn test_merge_errors() {
    assert_eq!(
        BinaryFile::new().monolithic_binary(&MonolithicOptions::default()),
        Err(ProcessingError::NoSegments)
    );

    let overlapping = BinaryFile::with_segments(vec![
        Segment::new(0x2000, vec![0; 0x10]),
        Segment::new(0x200F, vec![0; 2]),
    ]);
    assert!(matches!(
        overlapping.monolithic_binary(&MonolithicOptions::default()),
        Err(ProcessingError::SegmentsOverlap { .. })
    ));

    let options = MonolithicOptions {
        extra_code_address: Some(0x1_0000),
    };
    assert_eq!(
        game().monolithic_binary(&options),
        Err(ProcessingError::InvalidExtraCodeAddress(0x1_0000))
    );

    let options = MonolithicOptions {
        extra_code_address: Some(0xFFFC),
    };
    assert_eq!(
        game().monolithic_binary(&options),
        Err(ProcessingError::ExtraCodeOutOfRange {
            address: 0xFFFC,
            length: 6
        })
    );
}

#[test]
fn test_extra_code_longer_than_address_space() {
    let mut input = binary_bytes(&[segment_bytes(0x2000, &[0x60])]);
    for _ in 0..21846 {
        input.extend_from_slice(&segment_bytes(0x02E2, &[0x00, 0x20]));
    }
    let bin = parse_dos2_binary(&input, &AnalyzeOptions::default()).unwrap();
    assert_eq!(bin.extra_code_len(), 65538);

    let options = MonolithicOptions {
        extra_code_address: Some(0x3000),
    };
    assert_eq!(
        bin.monolithic_binary(&options),
        Err(ProcessingError::ExtraCodeOutOfRange {
            address: 0x3000,
            length: 65538
        })
    );
}

#[test]
fn test_write_monolithic_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("MERGED.XEX");
    game()
        .write_monolithic_binary(&path, &MonolithicOptions::default())
        .unwrap();

    let merged = dos2bin::read_dos2_binary_file(&path, &AnalyzeOptions::default()).unwrap();
    assert_eq!(merged.segment_count(), 2);
    assert!(merged.is_monolithic());
}

#[test]
fn test_multi_segment_file_not_convertible() {
    let bin = parse_dos2_binary(
        &binary_bytes(&[
            segment_bytes(0x2000, &[0x60]),
            segment_bytes(0x3000, &[0x60]),
        ]),
        &AnalyzeOptions::default(),
    )
    .unwrap();
    assert_eq!(
        bin.monolithic_conversion_info(),
        Err(ProcessingError::NotMonolithic)
    );
}
