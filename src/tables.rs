//! Count-prefixed record tables read from the decompressed save body.

use serde::{Serialize, Serializer};

use crate::err::{Error, Result};
use crate::property::{read_properties, Property};
use crate::reader::SaveReader;

fn hex_blob<S: Serializer>(bytes: &[u8], s: S) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_str(&hex::encode(bytes))
}

// ── Actor table ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActorTableEntry {
    pub name: String,
    pub instance_number: u32,
}

pub type ActorTable = Vec<ActorTableEntry>;

pub fn read_actor_table(r: &mut SaveReader) -> Result<ActorTable> {
    let count = r.read_u32()?;
    let mut table = Vec::with_capacity(count as usize);
    for _ in 0..count {
        table.push(ActorTableEntry {
            name: r.read_string()?,
            instance_number: r.read_u32()?,
        });
    }
    Ok(table)
}

// ── Checkpoint table ─────────────────────────────────────────────────────────

/// A snapshot of one game-world actor's state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Checkpoint {
    pub name: String,
    pub instance_name: String,
    pub vector: [f32; 3],
    pub rotator: [f32; 3],
    pub class_name: String,
    pub properties: Vec<Property>,
    /// Zero bytes between the end of the property list and the declared
    /// property-block length.  Preserved so the block can be re-encoded at
    /// its original size.
    pub pad_size: u32,
    pub template_index: i32,
}

pub fn read_checkpoint_table(r: &mut SaveReader) -> Result<Vec<Checkpoint>> {
    let count = r.read_u32()?;
    let mut table = Vec::with_capacity(count as usize);
    for _ in 0..count {
        table.push(read_checkpoint(r)?);
    }
    Ok(table)
}

fn read_checkpoint(r: &mut SaveReader) -> Result<Checkpoint> {
    let name = r.read_string()?;
    let instance_name = r.read_string()?;
    let vector = [r.read_f32()?, r.read_f32()?, r.read_f32()?];
    let rotator = [r.read_f32()?, r.read_f32()?, r.read_f32()?];
    let class_name = r.read_string()?;

    let prop_len = r.read_u32()? as usize;
    let prop_start = r.offset();
    let properties = read_properties(r, prop_len)?;

    // Anything left of the declared block is zero padding.
    let consumed = r.offset() - prop_start;
    let mut pad_size = 0u32;
    if consumed < prop_len {
        pad_size = (prop_len - consumed) as u32;
        for _ in 0..pad_size {
            let offset = r.offset();
            if r.read_u8()? != 0 {
                log::warn!("nonzero padding byte at offset {offset:#x}");
            }
        }
    }

    Ok(Checkpoint {
        name,
        instance_name,
        vector,
        rotator,
        class_name,
        properties,
        pad_size,
        template_index: r.read_i32()?,
    })
}

// ── Actor template table ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActorTemplate {
    pub actor_class_path: String,
    /// 64 bytes of load parameters; meaning unknown, kept verbatim.
    #[serde(serialize_with = "hex_blob")]
    pub load_params: Vec<u8>,
    pub archetype_path: String,
}

pub fn read_actor_template_table(r: &mut SaveReader) -> Result<Vec<ActorTemplate>> {
    let count = r.read_u32()?;
    let mut table = Vec::with_capacity(count as usize);
    for _ in 0..count {
        table.push(ActorTemplate {
            actor_class_path: r.read_string()?,
            load_params: r.read_bytes(64)?,
            archetype_path: r.read_string()?,
        });
    }
    Ok(table)
}

// ── Name table ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NameEntry {
    pub name: String,
    #[serde(serialize_with = "hex_blob")]
    pub data: Vec<u8>,
}

/// Only tactical-save variants carry a name table; the strategy decode path
/// never calls this, but the contract is implemented for completeness.
pub fn read_name_table(r: &mut SaveReader) -> Result<Vec<NameEntry>> {
    let count = r.read_u32()?;
    let mut table = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let name = r.read_string()?;
        let guard_offset = r.offset();
        let guard = r.read_bytes(8)?;
        if guard.iter().any(|&b| b != 0) {
            return Err(Error::NonZeroGuard {
                offset: guard_offset,
            });
        }
        let data_len = r.read_u32()? as usize;
        table.push(NameEntry {
            name,
            data: r.read_bytes(data_len)?,
        });
    }
    Ok(table)
}
