use serde::Serialize;

use crate::err::{Error, Result};
use crate::reader::SaveReader;

/// The only file version this decoder understands.
pub const SAVE_VERSION: u32 = 0x10;

/// Fixed-shape save header, read from the start of the raw (still
/// compressed) file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaveHeader {
    pub version: u32,
    /// Uncompressed body size as declared by the game.  Informational; the
    /// actual size is recomputed from the chunk chain.
    pub uncompressed_size: u32,
    pub game_number: u32,
    pub save_number: u32,
    pub save_description: String,
    pub time: String,
    pub map_command: String,
    pub tactical_save: bool,
    pub ironman: bool,
    pub autosave: bool,
    pub dlc_string: String,
    pub language: String,
    pub crc: u32,
}

impl SaveHeader {
    pub fn read(r: &mut SaveReader) -> Result<Self> {
        let version = r.read_u32()?;
        if version != SAVE_VERSION {
            return Err(Error::FormatVersionMismatch { found: version });
        }
        Ok(Self {
            version,
            uncompressed_size: r.read_u32()?,
            game_number: r.read_u32()?,
            save_number: r.read_u32()?,
            save_description: r.read_string()?,
            time: r.read_string()?,
            map_command: r.read_string()?,
            tactical_save: r.read_bool()?,
            ironman: r.read_bool()?,
            autosave: r.read_bool()?,
            dlc_string: r.read_string()?,
            language: r.read_string()?,
            crc: r.read_u32()?,
        })
    }
}
