use std::path::Path;

use crate::io::CompressionHandling;
use crate::{Range, Segment};

/// Segment counts of an analyzed file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FileStatistics {
    pub file_length: usize,
    pub segment_count: usize,
    /// Segments that touch neither vector.
    pub data_segment_count: usize,
    /// Segments that touch the RUN or INIT vector.
    pub vector_segment_count: usize,
}

/// A DOS 2 binary load file: segments in the order they are loaded.
///
/// Populated by [`parse_dos2_binary`](crate::parse_dos2_binary); afterwards the
/// segment list only changes through the explicit transforms.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BinaryFile {
    filename: Option<String>,
    segments: Vec<Segment>,
    file_length: usize,
    compression: CompressionHandling,
    analyzed: bool,
}

impl BinaryFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a file from segments directly, without analysis.
    pub fn with_segments(segments: Vec<Segment>) -> Self {
        Self {
            segments,
            ..Self::default()
        }
    }

    pub(crate) fn from_analysis(
        segments: Vec<Segment>,
        file_length: usize,
        compression: CompressionHandling,
    ) -> Self {
        Self {
            filename: None,
            segments,
            file_length,
            compression,
            analyzed: true,
        }
    }

    pub(crate) fn set_filename(&mut self, path: &Path) {
        self.filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());
    }

    pub(crate) fn segments_mut(&mut self) -> &mut Vec<Segment> {
        &mut self.segments
    }

    /// Base name of the file this was read from.
    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn into_segments(self) -> Vec<Segment> {
        self.segments
    }

    /// Length in bytes of the analyzed input.
    pub fn file_length(&self) -> usize {
        self.file_length
    }

    pub fn is_analyzed(&self) -> bool {
        self.analyzed
    }

    /// Compression policy the file was analyzed with.
    pub fn compression_handling(&self) -> CompressionHandling {
        self.compression
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// One line per segment.
    pub fn listing(&self) -> Vec<String> {
        self.segments.iter().map(|s| s.to_string()).collect()
    }

    pub fn segment_without_vector_count(&self) -> usize {
        self.segments.iter().filter(|s| s.has_no_vector()).count()
    }

    pub fn segment_with_vector_count(&self) -> usize {
        self.segments.iter().filter(|s| !s.has_no_vector()).count()
    }

    pub fn statistics(&self) -> FileStatistics {
        FileStatistics {
            file_length: self.file_length,
            segment_count: self.segments.len(),
            data_segment_count: self.segment_without_vector_count(),
            vector_segment_count: self.segment_with_vector_count(),
        }
    }

    /// File offsets just past each segment with a full INIT vector, i.e. the
    /// points at which the loader calls an init routine.
    pub fn init_locations(&self) -> Vec<usize> {
        self.segments
            .iter()
            .filter(|s| s.has_full_init_vector())
            .map(|s| s.source_end)
            .collect()
    }

    /// True if any segment loads data into `range`.
    pub fn covers_memory(&self, range: Range) -> bool {
        self.segments
            .iter()
            .filter_map(Segment::range)
            .any(|r| r.overlaps(&range))
    }

    pub fn has_init_vector(&self) -> bool {
        self.segments.iter().any(Segment::has_init_vector)
    }

    pub fn has_run_vector(&self) -> bool {
        self.segments.iter().any(Segment::has_run_vector)
    }

    pub fn has_compressed_segment(&self) -> bool {
        self.segments.iter().any(Segment::is_compressed)
    }

    /// Bytes of 6502 code needed to replace the INIT and RUN vectors:
    /// a JSR per full INIT vector plus one JMP if there is a full RUN vector.
    pub fn extra_code_len(&self) -> usize {
        let inits = self
            .segments
            .iter()
            .filter(|s| s.has_full_init_vector())
            .count();
        let run = usize::from(self.segments.iter().any(Segment::has_full_run_vector));
        (inits + run) * 3
    }

    /// True for a single data segment, optionally accompanied by one segment
    /// holding just a full RUN vector. Such files load with a minimal loader.
    pub fn is_monolithic(&self) -> bool {
        if self.segments.is_empty() || self.segments.len() > 2 || self.has_init_vector() {
            return false;
        }
        if self.has_compressed_segment() {
            return false;
        }

        match self.segments.as_slice() {
            [only] => !only.has_partial_run_vector(),
            [s1, s2] => {
                // Exactly one of them carries data
                if s1.has_non_vector_data() == s2.has_non_vector_data() {
                    return false;
                }
                if s1.has_run_vector() && s2.has_run_vector() {
                    return false;
                }
                s1.has_full_run_vector() || s2.has_full_run_vector()
            }
            _ => false,
        }
    }

    /// True when there is exactly one segment with data, at most one INIT
    /// vector and at most one RUN vector, both complete if present.
    pub fn is_one_segment_with_init(&self) -> bool {
        let with_data = self
            .segments
            .iter()
            .filter(|s| s.has_non_vector_data())
            .count();
        if with_data != 1 {
            return false;
        }

        let inits = self.segments.iter().filter(|s| s.has_init_vector()).count();
        let full_inits = self
            .segments
            .iter()
            .filter(|s| s.has_full_init_vector())
            .count();
        if inits > 1 || (inits == 1 && full_inits == 0) {
            return false;
        }

        let runs = self.segments.iter().filter(|s| s.has_run_vector()).count();
        let full_runs = self
            .segments
            .iter()
            .filter(|s| s.has_full_run_vector())
            .count();
        !(runs > 1 || (runs == 1 && full_runs == 0))
    }

    /// Group segments so that every group ends with a segment touching the
    /// INIT vector. Trailing segments without INIT form the last group.
    pub fn init_sliced_segment_bunches(&self) -> Vec<&[Segment]> {
        let mut bunches = Vec::new();
        let mut start = 0;

        for (i, segment) in self.segments.iter().enumerate() {
            if segment.has_init_vector() {
                bunches.push(&self.segments[start..=i]);
                start = i + 1;
            }
        }
        if start < self.segments.len() {
            bunches.push(&self.segments[start..]);
        }

        bunches
    }
}
