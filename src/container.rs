//! Compressed-body container: a chain of magic-tagged LZ4 chunks starting at
//! a fixed offset in the save file.
//!
//! Decoding is two-pass.  The size pass walks the chunk chain validating
//! magics and summing uncompressed sizes, so one exactly-sized output buffer
//! can be allocated up front.  The data pass re-walks the same chain and
//! decompresses each payload into its slot, verifying the codec's reported
//! output length against the chunk header.  Any mismatch at any stage is
//! fatal.

use byteorder::{ByteOrder, LittleEndian};

use crate::err::{Error, Result};

/// The compressed body always begins this many bytes into the file,
/// regardless of anything the header declares.
pub const BODY_OFFSET: usize = 1024;

/// Magic constant opening every compressed chunk.
pub const CHUNK_MAGIC: u32 = 0x9E2A_83C1;

/// Chunk header layout: magic(4) + reserved(4) + compressed_size(4) +
/// uncompressed_size(4) + reserved(8).
pub const CHUNK_HEADER_SIZE: usize = 24;

struct ChunkHeader {
    compressed_size: usize,
    uncompressed_size: usize,
}

fn read_chunk_header(data: &[u8], offset: usize) -> Result<ChunkHeader> {
    if offset + CHUNK_HEADER_SIZE > data.len() {
        return Err(Error::BufferOverrun {
            offset,
            wanted: CHUNK_HEADER_SIZE,
            available: data.len().saturating_sub(offset),
        });
    }
    let magic = LittleEndian::read_u32(&data[offset..]);
    if magic != CHUNK_MAGIC {
        return Err(Error::ChunkMagicMismatch {
            offset,
            found: magic,
        });
    }
    Ok(ChunkHeader {
        compressed_size: LittleEndian::read_u32(&data[offset + 8..]) as usize,
        uncompressed_size: LittleEndian::read_u32(&data[offset + 12..]) as usize,
    })
}

/// Size pass: validate every chunk magic and sum the declared uncompressed
/// sizes across the whole chain.
pub fn total_uncompressed_size(data: &[u8]) -> Result<usize> {
    let mut offset = BODY_OFFSET;
    let mut total = 0usize;
    while offset < data.len() {
        let hdr = read_chunk_header(data, offset)?;
        total += hdr.uncompressed_size;
        offset += CHUNK_HEADER_SIZE + hdr.compressed_size;
    }
    Ok(total)
}

/// Data pass: decompress the whole chunk chain into one freshly allocated
/// buffer sized by [`total_uncompressed_size`].
pub fn decompress_body(data: &[u8]) -> Result<Vec<u8>> {
    let total = total_uncompressed_size(data)?;
    let mut out = vec![0u8; total];

    let mut offset = BODY_OFFSET;
    let mut written = 0usize;
    while offset < data.len() {
        let hdr = read_chunk_header(data, offset)?;
        let payload_start = offset + CHUNK_HEADER_SIZE;
        let payload_end = payload_start + hdr.compressed_size;
        if payload_end > data.len() {
            return Err(Error::BufferOverrun {
                offset: payload_start,
                wanted: hdr.compressed_size,
                available: data.len().saturating_sub(payload_start),
            });
        }

        let payload = &data[payload_start..payload_end];
        let dst = &mut out[written..written + hdr.uncompressed_size];
        let n = lz4_flex::block::decompress_into(payload, dst).map_err(|e| {
            Error::Decompression {
                offset,
                detail: e.to_string(),
            }
        })?;
        if n != hdr.uncompressed_size {
            return Err(Error::DecompressedSizeMismatch {
                offset,
                expected: hdr.uncompressed_size,
                actual: n,
            });
        }

        written += n;
        offset = payload_end;
    }

    Ok(out)
}
