//! Top-level save assembly: header over the raw buffer, then the actor
//! table and checkpoint chunks over the decompressed body.

use serde::Serialize;

use crate::container;
use crate::err::{Error, Result};
use crate::header::SaveHeader;
use crate::property::SENTINEL;
use crate::reader::SaveReader;
use crate::tables::{
    read_actor_table, read_actor_template_table, read_checkpoint_table, ActorTable, Checkpoint,
};

/// One repeated record in the decompressed body.  The unknown fields are
/// carried through verbatim; their meaning has not been reverse engineered.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckpointChunk {
    pub unknown_int1: u32,
    pub unknown_str1: String,
    pub unknown_int2: u32,
    pub checkpoint_table: Vec<Checkpoint>,
    pub unknown_str2: String,
    pub actor_table: ActorTable,
    pub unknown_int3: u32,
    pub game_name: String,
    pub map_name: String,
    pub unknown_int4: u32,
}

/// Fully decoded save document.  Owns every buffer it exposes; nothing
/// aliases the input or the intermediate decompressed body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaveGame {
    pub header: SaveHeader,
    pub actor_table: ActorTable,
    pub checkpoint_chunks: Vec<CheckpointChunk>,
}

impl SaveGame {
    /// Decode a complete save from the raw file bytes.
    ///
    /// The header is read from the still-compressed buffer; everything after
    /// it comes from the decompressed body, which replaces the raw buffer as
    /// the read source for the remainder of the decode.
    pub fn decode(data: &[u8]) -> Result<Self> {
        let mut raw = SaveReader::new(data);
        let header = SaveHeader::read(&mut raw)?;

        let body = container::decompress_body(data)?;
        let mut r = SaveReader::new(&body);

        let actor_table = read_actor_table(&mut r)?;
        log::debug!("finished reading actor table at offset {:#x}", r.offset());

        let mut checkpoint_chunks = Vec::new();
        while r.remaining() > 0 {
            checkpoint_chunks.push(read_checkpoint_chunk(&mut r)?);
        }

        Ok(Self {
            header,
            actor_table,
            checkpoint_chunks,
        })
    }

    /// The decompressed intermediate body, for external tooling that wants
    /// to persist it for offline inspection.  Not part of the decode result.
    pub fn decompressed_body(data: &[u8]) -> Result<Vec<u8>> {
        container::decompress_body(data)
    }
}

fn read_checkpoint_chunk(r: &mut SaveReader) -> Result<CheckpointChunk> {
    let unknown_int1 = r.read_u32()?;
    let unknown_str1 = r.read_string()?;

    let sentinel_offset = r.offset();
    let sentinel = r.read_string()?;
    if sentinel != SENTINEL {
        return Err(Error::MissingSentinel {
            offset: sentinel_offset,
            found: sentinel,
        });
    }

    let unknown_int2 = r.read_u32()?;
    let checkpoint_table = read_checkpoint_table(r)?;
    log::debug!(
        "finished reading checkpoint table at offset {:#x}",
        r.offset()
    );

    // Only tactical saves carry an inline name table; on the strategy path
    // this length must be zero or later offsets cannot be trusted.
    let len_offset = r.offset();
    let name_table_len = r.read_u32()?;
    if name_table_len != 0 {
        return Err(Error::UnexpectedNameTable {
            offset: len_offset,
            len: name_table_len,
        });
    }

    let unknown_str2 = r.read_string()?;
    let actor_table = read_actor_table(r)?;
    let unknown_int3 = r.read_u32()?;

    let template_offset = r.offset();
    let templates = read_actor_template_table(r)?;
    if !templates.is_empty() {
        return Err(Error::UnexpectedNonEmptyTable {
            offset: template_offset,
            count: templates.len() as u32,
        });
    }

    Ok(CheckpointChunk {
        unknown_int1,
        unknown_str1,
        unknown_int2,
        checkpoint_table,
        unknown_str2,
        actor_table,
        unknown_int3,
        game_name: r.read_string()?,
        map_name: r.read_string()?,
        unknown_int4: r.read_u32()?,
    })
}
