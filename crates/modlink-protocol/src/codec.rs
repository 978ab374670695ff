//! Payload encoding and decoding for the bus commands.
//!
//! All multi-byte integers are little-endian. Each command's request and
//! reply payloads are encoded/decoded by a dedicated pair of functions so
//! the transport stays byte-agnostic and a firmware simulator can speak
//! the same dialect in tests.
//!
//! Raw register values travel tagged: `0x00` integer (i64), `0x01` float
//! (f64), `0x02` sequence (count + f64 components).

use bytes::{BufMut, Bytes, BytesMut};
use modlink_core::{CapabilityIndex, CatalogEntry, Error, ModuleDescriptor, RawValue, Result};

const TAG_INTEGER: u8 = 0x00;
const TAG_FLOAT: u8 = 0x01;
const TAG_SEQUENCE: u8 = 0x02;

/// Encode a register-read request: the register index.
#[must_use]
pub fn encode_read_request(index: CapabilityIndex) -> Bytes {
    let mut buf = BytesMut::with_capacity(2);
    buf.put_u16_le(index.as_u16());
    buf.freeze()
}

/// Decode a register-read request.
pub fn decode_read_request(payload: &[u8]) -> Result<CapabilityIndex> {
    let mut reader = Reader::new(payload);
    let index = CapabilityIndex::new(reader.u16()?);
    reader.finish()?;
    Ok(index)
}

/// Encode a tagged raw value (register-read reply).
#[must_use]
pub fn encode_raw_value(value: &RawValue) -> Bytes {
    let mut buf = BytesMut::new();
    match value {
        RawValue::Integer(v) => {
            buf.put_u8(TAG_INTEGER);
            buf.put_i64_le(*v);
        }
        RawValue::Float(v) => {
            buf.put_u8(TAG_FLOAT);
            buf.put_f64_le(*v);
        }
        RawValue::Sequence(components) => {
            buf.put_u8(TAG_SEQUENCE);
            buf.put_u8(components.len() as u8);
            for component in components {
                buf.put_f64_le(*component);
            }
        }
    }
    buf.freeze()
}

/// Decode a tagged raw value.
pub fn decode_raw_value(payload: &[u8]) -> Result<RawValue> {
    let mut reader = Reader::new(payload);
    let value = match reader.u8()? {
        TAG_INTEGER => RawValue::Integer(reader.i64()?),
        TAG_FLOAT => RawValue::Float(reader.f64()?),
        TAG_SEQUENCE => {
            let count = reader.u8()? as usize;
            let mut components = Vec::with_capacity(count);
            for _ in 0..count {
                components.push(reader.f64()?);
            }
            RawValue::Sequence(components)
        }
        tag => return Err(Error::UnknownValueTag(tag)),
    };
    reader.finish()?;
    Ok(value)
}

/// Encode a write batch: count plus (index, value) pairs.
#[must_use]
pub fn encode_write_batch(pairs: &[(CapabilityIndex, f32)]) -> Bytes {
    let mut buf = BytesMut::with_capacity(1 + pairs.len() * 6);
    buf.put_u8(pairs.len() as u8);
    for (index, value) in pairs {
        buf.put_u16_le(index.as_u16());
        buf.put_f32_le(*value);
    }
    buf.freeze()
}

/// Decode a write batch.
pub fn decode_write_batch(payload: &[u8]) -> Result<Vec<(CapabilityIndex, f32)>> {
    let mut reader = Reader::new(payload);
    let count = reader.u8()? as usize;
    let mut pairs = Vec::with_capacity(count);
    for _ in 0..count {
        let index = CapabilityIndex::new(reader.u16()?);
        let value = reader.f32()?;
        pairs.push((index, value));
    }
    reader.finish()?;
    Ok(pairs)
}

/// Encode an index-catalog listing (ListIndices reply).
#[must_use]
pub fn encode_index_list(entries: &[CatalogEntry]) -> Bytes {
    let mut buf = BytesMut::new();
    buf.put_u16_le(entries.len() as u16);
    for entry in entries {
        buf.put_u16_le(entry.index.as_u16());
        buf.put_u8(entry.name.len() as u8);
        buf.put_slice(entry.name.as_bytes());
    }
    buf.freeze()
}

/// Decode an index-catalog listing.
pub fn decode_index_list(payload: &[u8]) -> Result<Vec<CatalogEntry>> {
    let mut reader = Reader::new(payload);
    let count = reader.u16()? as usize;
    let mut entries = Vec::with_capacity(count);
    for _ in 0..count {
        let index = CapabilityIndex::new(reader.u16()?);
        let name = reader.string()?;
        entries.push(CatalogEntry::new(name, index));
    }
    reader.finish()?;
    Ok(entries)
}

/// Encode a module-descriptor list (ScanModules reply / SetModules request).
#[must_use]
pub fn encode_module_list(modules: &[ModuleDescriptor]) -> Bytes {
    let mut buf = BytesMut::new();
    buf.put_u8(modules.len() as u8);
    for module in modules {
        let rendered = module.to_string();
        buf.put_u8(rendered.len() as u8);
        buf.put_slice(rendered.as_bytes());
    }
    buf.freeze()
}

/// Decode a module-descriptor list.
pub fn decode_module_list(payload: &[u8]) -> Result<Vec<ModuleDescriptor>> {
    let mut reader = Reader::new(payload);
    let count = reader.u8()? as usize;
    let mut modules = Vec::with_capacity(count);
    for _ in 0..count {
        let rendered = reader.string()?;
        modules.push(rendered.parse()?);
    }
    reader.finish()?;
    Ok(modules)
}

/// Checked cursor over a payload slice. Every read verifies the remaining
/// length first so truncated payloads surface as errors, not panics.
struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        let remaining = self.bytes.len() - self.pos;
        if remaining < len {
            return Err(Error::truncated(format!(
                "need {len} more bytes, have {remaining}"
            )));
        }
        let slice = &self.bytes[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    fn u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    fn u16(&mut self) -> Result<u16> {
        let bytes = self.take(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    fn f32(&mut self) -> Result<f32> {
        let bytes = self.take(4)?;
        Ok(f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn i64(&mut self) -> Result<i64> {
        let b = self.take(8)?;
        Ok(i64::from_le_bytes([
            b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
        ]))
    }

    fn f64(&mut self) -> Result<f64> {
        let b = self.take(8)?;
        Ok(f64::from_le_bytes([
            b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
        ]))
    }

    /// Length-prefixed UTF-8 string.
    fn string(&mut self) -> Result<String> {
        let len = self.u8()? as usize;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec())
            .map_err(|e| Error::invalid_frame(format!("non-UTF-8 name: {e}")))
    }

    /// Assert the payload was fully consumed.
    fn finish(self) -> Result<()> {
        if self.pos != self.bytes.len() {
            return Err(Error::invalid_frame(format!(
                "{} trailing bytes after payload",
                self.bytes.len() - self.pos
            )));
        }
        Ok(())
    }
}
