use std::path::Path;

use tracing::debug;

use super::ProcessingError;
use crate::io::{AnalyzeOptions, LoadStream, parse_dos2_binary};
use crate::range::RUN_VECTOR;
use crate::{BinaryFile, Error, Segment};

impl BinaryFile {
    /// Return a file in which no segment is longer than `max_size` bytes.
    ///
    /// Oversized segments are split in place and the result is re-analyzed,
    /// so segment offsets describe the new byte stream. Compressed segments
    /// are kept whole. A file that already fits is returned as is.
    pub fn derive_with_max_segment_size(&self, max_size: usize) -> Result<BinaryFile, Error> {
        if max_size == 0 {
            return Err(ProcessingError::InvalidMaxSegmentSize.into());
        }

        let oversized = self
            .segments()
            .iter()
            .any(|s| !s.is_compressed() && s.len() > max_size);
        if !oversized {
            return Ok(self.clone());
        }

        let mut out = LoadStream::new();
        out.push_header();
        for segment in self.segments() {
            for part in segment.split_using_max_size(max_size) {
                out.push_segment(&part);
            }
        }

        let options = AnalyzeOptions {
            header_required: true,
            compression: self.compression_handling(),
        };
        let mut derived = parse_dos2_binary(&out.into_bytes(), &options)?;
        if let Some(name) = self.filename() {
            derived.set_filename(Path::new(name));
        }

        debug!(
            before = self.segment_count(),
            after = derived.segment_count(),
            max_size,
            "segments split"
        );
        Ok(derived)
    }

    /// Append a RUN vector segment pointing at the first address of the
    /// first segment. Does nothing for a file without segments.
    pub fn create_artificial_run_vector(&mut self) {
        let Some(first) = self.segments().first().map(|s| s.first_address) else {
            return;
        };
        self.segments_mut().push(Segment::new(
            RUN_VECTOR.first(),
            first.to_le_bytes().to_vec(),
        ));
    }

    /// Entry point of the program: the first address of the first segment
    /// that loads data, overridden by any full RUN vector that follows it.
    pub fn normalized_run_address(&self) -> Result<u16, ProcessingError> {
        if self.is_empty() {
            return Err(ProcessingError::NoSegments);
        }

        let mut address = None;
        let mut load_start_seen = false;
        for segment in self.segments() {
            if !load_start_seen && segment.has_non_vector_data() {
                address = Some(segment.first_address);
                load_start_seen = true;
            }
            if let Some(run) = segment.run_vector() {
                address = Some(run);
            }
        }

        address.ok_or(ProcessingError::NoRunAddress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CompressionHandling, CompressionKind};

    #[test]
    fn test_split_oversized_segments() {
        let bin = BinaryFile::with_segments(vec![
            Segment::new(0x2000, (0u8..10).collect()),
            Segment::new(0x3000, vec![0xAA; 2]),
        ]);
        let derived = bin.derive_with_max_segment_size(4).unwrap();
        assert!(derived.is_analyzed());
        let addrs: Vec<u16> = derived.segments().iter().map(|s| s.first_address).collect();
        assert_eq!(addrs, vec![0x2000, 0x2004, 0x2008, 0x3000]);
        assert!(derived.segments().iter().all(|s| s.len() <= 4));
        assert_eq!(derived.file_length(), 2 + 4 * 4 + 10 + 2);
    }

    #[test]
    fn test_fitting_file_unchanged() {
        let bin = BinaryFile::with_segments(vec![Segment::new(0x2000, vec![0; 4])]);
        let derived = bin.derive_with_max_segment_size(4).unwrap();
        assert_eq!(derived, bin);
    }

    #[test]
    fn test_zero_max_size_rejected() {
        let bin = BinaryFile::with_segments(vec![Segment::new(0x2000, vec![0; 4])]);
        assert!(matches!(
            bin.derive_with_max_segment_size(0),
            Err(Error::Processing(ProcessingError::InvalidMaxSegmentSize))
        ));
    }

    #[test]
    fn test_compressed_segments_kept_whole() {
        let input = [
            0xFF, 0xFF, 0x00, 0x20, 0x07, 0x20, 0, 1, 2, 3, 4, 5, 6, 7, // 8-byte segment
            0x00, 0x40, 0x00, 0x00, 0x00, 0x40, 1, 2, 3, 4, 0x00, 0x00, // LZ4
        ];
        let options = AnalyzeOptions {
            header_required: true,
            compression: CompressionHandling::FullSupport,
        };
        let bin = parse_dos2_binary(&input, &options).unwrap();
        let derived = bin.derive_with_max_segment_size(2).unwrap();
        assert_eq!(derived.segment_count(), 5);
        let last = derived.segments().last().unwrap();
        assert_eq!(last.compression, CompressionKind::Lz4);
        assert_eq!(last.data.len(), 7);
    }

    #[test]
    fn test_artificial_run_vector() {
        let mut bin = BinaryFile::with_segments(vec![
            Segment::new(0x2400, vec![0x60]),
            Segment::new(0x2000, vec![0x60]),
        ]);
        bin.create_artificial_run_vector();
        let run = bin.segments().last().unwrap();
        assert!(run.has_full_run_vector());
        assert_eq!(run.run_vector(), Some(0x2400));

        let mut empty = BinaryFile::new();
        empty.create_artificial_run_vector();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_normalized_run_address() {
        let bin = BinaryFile::with_segments(vec![
            Segment::new(0x02E0, vec![0x00, 0x50]),
            Segment::new(0x2000, vec![0x60]),
            Segment::new(0x3000, vec![0x60]),
        ]);
        // RUN vector comes first, the first data segment overrides it
        assert_eq!(bin.normalized_run_address(), Ok(0x2000));

        let bin = BinaryFile::with_segments(vec![
            Segment::new(0x2000, vec![0x60]),
            Segment::new(0x02E0, vec![0x00, 0x50]),
        ]);
        assert_eq!(bin.normalized_run_address(), Ok(0x5000));
    }

    #[test]
    fn test_normalized_run_address_errors() {
        assert_eq!(
            BinaryFile::new().normalized_run_address(),
            Err(ProcessingError::NoSegments)
        );
        let only_init = BinaryFile::with_segments(vec![Segment::new(0x02E2, vec![0x00, 0x20])]);
        assert_eq!(
            only_init.normalized_run_address(),
            Err(ProcessingError::NoRunAddress)
        );
    }
}
