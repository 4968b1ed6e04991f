use std::path::Path;

use tracing::debug;

use super::ProcessingError;
use crate::io::LoadStream;
use crate::range::RUN_VECTOR;
use crate::{BinaryFile, Error, Segment};

const ADDRESS_SPACE: usize = 0x10000;

const OPCODE_JSR: u8 = 0x20;
const OPCODE_JMP: u8 = 0x4C;

/// Options for merging a file into a single load image.
#[derive(Debug, Clone, Default)]
pub struct MonolithicOptions {
    /// Place JSR/JMP code emulating the INIT and RUN vectors at this address
    /// and start the program there. `None` drops INIT vectors and keeps the
    /// last RUN vector as the entry point.
    pub extra_code_address: Option<u32>,
}

/// Everything needed to load a monolithic file without a segment loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonolithicConversionInfo {
    pub data: Vec<u8>,
    pub load_address: u16,
    pub run_address: u16,
}

/// The 64 KiB address space, with untouched addresses left as `None`.
struct MemoryImage {
    slots: Vec<Option<u8>>,
}

impl MemoryImage {
    fn new() -> Self {
        Self {
            slots: vec![None; ADDRESS_SPACE],
        }
    }

    /// Store bytes that must not land on anything already loaded.
    fn load(&mut self, address: u16, data: &[u8], segment: &Segment) -> Result<(), ProcessingError> {
        for (offset, &byte) in data.iter().enumerate() {
            let slot = self
                .slots
                .get_mut(usize::from(address) + offset)
                .ok_or_else(|| ProcessingError::SegmentOutOfRange {
                    segment: segment.to_string(),
                })?;
            if slot.is_some() {
                return Err(ProcessingError::SegmentsOverlap {
                    segment: segment.to_string(),
                });
            }
            *slot = Some(byte);
        }
        Ok(())
    }

    /// Store a 3-byte instruction. Overwrites loaded data.
    fn store_instruction(&mut self, address: usize, opcode: u8, operand: u16) {
        let [low, high] = operand.to_le_bytes();
        for (slot, byte) in self.slots[address..address + 3]
            .iter_mut()
            .zip([opcode, low, high])
        {
            *slot = Some(byte);
        }
    }

    /// Lowest and highest touched address.
    fn bounds(&self) -> Option<(usize, usize)> {
        let first = self.slots.iter().position(Option::is_some)?;
        let last = self.slots.iter().rposition(Option::is_some)?;
        Some((first, last))
    }
}

impl BinaryFile {
    /// Merge all segments into one contiguous load image followed by a RUN
    /// vector segment.
    ///
    /// Vector bytes are never copied into the image. Gaps between loaded
    /// areas are zero-filled.
    pub fn monolithic_binary(&self, options: &MonolithicOptions) -> Result<Vec<u8>, ProcessingError> {
        let segments = self.segments();
        if segments.is_empty() {
            return Err(ProcessingError::NoSegments);
        }
        if self.has_compressed_segment() {
            return Err(ProcessingError::CompressedSegment);
        }

        if let Some(address) = options.extra_code_address {
            if address > 0xFFFF {
                return Err(ProcessingError::InvalidExtraCodeAddress(address));
            }
            let length = self.extra_code_len();
            if address as usize + length > ADDRESS_SPACE {
                return Err(ProcessingError::ExtraCodeOutOfRange { address, length });
            }
        }

        let mut image = MemoryImage::new();

        for segment in segments {
            if segment.has_no_vector() {
                image.load(segment.first_address, &segment.data, segment)?;
                continue;
            }
            for portion in segment.non_vector_portions() {
                image.load(portion.address, portion.data, segment)?;
            }
        }

        let run_vector = segments.iter().filter_map(Segment::run_vector).last();

        if let Some(address) = options.extra_code_address {
            let mut pos = address as usize;
            for init in segments.iter().filter_map(Segment::init_vector) {
                image.store_instruction(pos, OPCODE_JSR, init);
                pos += 3;
            }
            if let Some(run) = run_vector {
                image.store_instruction(pos, OPCODE_JMP, run);
            }
        }

        let (first, last) = image.bounds().ok_or(ProcessingError::EmptyImage)?;

        let mut out = LoadStream::with_capacity(last - first + 13);
        out.push_header();
        out.push_word(first as u16);
        out.push_word(last as u16);
        out.push_bytes(
            &image.slots[first..=last]
                .iter()
                .map(|slot| slot.unwrap_or(0))
                .collect::<Vec<u8>>(),
        );

        let entry = match options.extra_code_address {
            Some(address) => address as u16,
            None => run_vector.unwrap_or(first as u16),
        };
        out.push_word(RUN_VECTOR.first());
        out.push_word(RUN_VECTOR.last());
        out.push_word(entry);

        debug!(
            segments = segments.len(),
            "monolithic image {first:04X}-{last:04X}, entry {entry:04X}"
        );

        Ok(out.into_bytes())
    }

    /// Write [`BinaryFile::monolithic_binary`] output to `path`.
    pub fn write_monolithic_binary(
        &self,
        path: impl AsRef<Path>,
        options: &MonolithicOptions,
    ) -> Result<(), Error> {
        let bytes = self.monolithic_binary(options)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Data, load address and entry point of a monolithic file.
    pub fn monolithic_conversion_info(&self) -> Result<MonolithicConversionInfo, ProcessingError> {
        if !self.is_monolithic() {
            return Err(ProcessingError::NotMonolithic);
        }

        match self.segments() {
            [only] => Ok(MonolithicConversionInfo {
                data: only.data.clone(),
                load_address: only.first_address,
                run_address: only.run_vector().unwrap_or(only.first_address),
            }),
            [s1, s2] => {
                let (data, run) = if s1.has_non_vector_data() {
                    (s1, s2)
                } else {
                    (s2, s1)
                };
                Ok(MonolithicConversionInfo {
                    data: data.data.clone(),
                    load_address: data.first_address,
                    run_address: run.run_vector().ok_or(ProcessingError::NoRunAddress)?,
                })
            }
            _ => Err(ProcessingError::NotMonolithic),
        }
    }
}
