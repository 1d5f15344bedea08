//! Hand-written fixture encoders for synthetic save buffers.
#![allow(dead_code)]

use byteorder::{LittleEndian, WriteBytesExt};
use xcomsave::container::{BODY_OFFSET, CHUNK_MAGIC};

pub fn write_u32(buf: &mut Vec<u8>, v: u32) {
    buf.write_u32::<LittleEndian>(v).unwrap();
}

pub fn write_i32(buf: &mut Vec<u8>, v: i32) {
    buf.write_i32::<LittleEndian>(v).unwrap();
}

pub fn write_f32(buf: &mut Vec<u8>, v: f32) {
    buf.write_f32::<LittleEndian>(v).unwrap();
}

/// Length-prefixed NUL-terminated string; the stored length counts the
/// terminator, zero-length strings carry no payload.
pub fn write_string(buf: &mut Vec<u8>, s: &str) {
    if s.is_empty() {
        write_u32(buf, 0);
    } else {
        write_u32(buf, s.len() as u32 + 1);
        buf.extend_from_slice(s.as_bytes());
        buf.push(0);
    }
}

/// Shared property entry prefix: name, reserved, type, reserved, size, index.
pub fn write_prop_header(buf: &mut Vec<u8>, name: &str, type_name: &str, size: u32, index: u32) {
    write_string(buf, name);
    write_u32(buf, 0);
    write_string(buf, type_name);
    write_u32(buf, 0);
    write_u32(buf, size);
    write_u32(buf, index);
}

pub fn write_int_property(buf: &mut Vec<u8>, name: &str, value: i32, index: u32) {
    write_prop_header(buf, name, "IntProperty", 4, index);
    write_i32(buf, value);
}

/// "None" sentinel entry closing a property list.
pub fn write_sentinel(buf: &mut Vec<u8>) {
    write_string(buf, "None");
    write_u32(buf, 0);
}

pub fn write_actor_table(buf: &mut Vec<u8>, actors: &[(&str, u32)]) {
    write_u32(buf, actors.len() as u32);
    for (name, instance) in actors {
        write_string(buf, name);
        write_u32(buf, *instance);
    }
}

/// One checkpoint whose property block is `props` followed by `pad` zero
/// bytes, all counted in the declared block length.
pub fn write_checkpoint(buf: &mut Vec<u8>, name: &str, class_name: &str, props: &[u8], pad: usize) {
    write_string(buf, name);
    write_string(buf, name); // instance name
    for v in [1.0f32, 2.0, 3.0, 0.0, 0.0, 0.0] {
        write_f32(buf, v);
    }
    write_string(buf, class_name);
    write_u32(buf, (props.len() + pad) as u32);
    buf.extend_from_slice(props);
    buf.extend_from_slice(&vec![0u8; pad]);
    write_i32(buf, -1); // template index
}

/// Minimal checkpoint chunk wrapping one checkpoint table.
pub fn write_checkpoint_chunk(buf: &mut Vec<u8>, checkpoint_table: &[u8]) {
    write_u32(buf, 0); // unknown_int1
    write_string(buf, "");
    write_string(buf, "None");
    write_u32(buf, 0); // unknown_int2
    buf.extend_from_slice(checkpoint_table);
    write_u32(buf, 0); // name table length, must be zero
    write_string(buf, "");
    write_actor_table(buf, &[]); // second actor table
    write_u32(buf, 0); // unknown_int3
    write_u32(buf, 0); // actor template table, must be empty
    write_string(buf, "strategy");
    write_string(buf, "Command1");
    write_u32(buf, 0); // unknown_int4
}

pub fn write_header(buf: &mut Vec<u8>, version: u32, uncompressed_size: u32) {
    write_u32(buf, version);
    write_u32(buf, uncompressed_size);
    write_u32(buf, 3); // game number
    write_u32(buf, 7); // save number
    write_string(buf, "Weekly autosave");
    write_string(buf, "2016.03.12-10.30");
    write_string(buf, "servermap");
    write_u32(buf, 0); // tactical
    write_u32(buf, 1); // ironman
    write_u32(buf, 1); // autosave
    write_string(buf, "");
    write_string(buf, "INT");
    write_u32(buf, 0xDEAD_BEEF); // crc
}

/// Assemble a full raw save file: header, zero padding up to the fixed body
/// offset, then one compressed chunk per body slice.
pub fn build_save_file(body_chunks: &[&[u8]]) -> Vec<u8> {
    let total: usize = body_chunks.iter().map(|c| c.len()).sum();
    let mut raw = Vec::new();
    write_header(&mut raw, xcomsave::SAVE_VERSION, total as u32);
    assert!(raw.len() <= BODY_OFFSET);
    raw.resize(BODY_OFFSET, 0);
    for chunk in body_chunks {
        let compressed = lz4_flex::block::compress(chunk);
        write_u32(&mut raw, CHUNK_MAGIC);
        write_u32(&mut raw, 0);
        write_u32(&mut raw, compressed.len() as u32);
        write_u32(&mut raw, chunk.len() as u32);
        raw.extend_from_slice(&[0u8; 8]);
        raw.extend_from_slice(&compressed);
    }
    raw
}
