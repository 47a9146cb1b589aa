//! # Packed Codec: fixed-width binary records
//!
//! The one place where logical values are narrowed into storage fields.
//!
//! ```text
//! Record (full-width logical values)
//!   → PackedRecord::encode → little-endian fixed-width bytes
//!   → PackedRecord::decode → Record (validated)
//! ```
//!
//! # Float precision
//!
//! | Precision | Width | Round-trip |
//! |-----------|-------|------------|
//! | `Full` | 4 bytes (f32) | bit-exact |
//! | `Half` | 2 bytes (f16) | round-to-nearest, relative error ≤ 2⁻¹¹ for \|x\| in [6.1e-5, 65504]; larger magnitudes become ±inf |
//!
//! Integer fields never depend on precision.

mod records;

use half::f16;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Errors
// ============================================================================

/// Errors produced while packing or unpacking records.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    /// Attempted to read beyond the end of the buffer.
    #[error("buffer too short")]
    OutOfBounds,
    /// Collection longer than the count prefix can express.
    #[error("collection of {0} records exceeds the u16 count prefix")]
    LengthTooLarge(usize),
    /// A decoded field lies outside its logical domain.
    #[error("invalid value {value} for field `{field}`")]
    InvalidValue { field: &'static str, value: i64 },
    /// Bytes left over after a complete collection.
    #[error("{0} trailing bytes after collection")]
    TrailingBytes(usize),
}

// ============================================================================
// Precision
// ============================================================================

/// Storage width of floating-point fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Precision {
    /// IEEE binary32.
    #[default]
    Full,
    /// IEEE binary16.
    Half,
}

impl Precision {
    /// Bytes per float field.
    pub const fn float_width(self) -> usize {
        match self {
            Precision::Full => 4,
            Precision::Half => 2,
        }
    }
}

// ============================================================================
// Writer / Reader
// ============================================================================

/// Writer for little-endian fixed-width scalars.
#[derive(Debug, Default)]
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self { buf: Vec::with_capacity(capacity) }
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub fn write_i8(&mut self, value: i8) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_u16_le(&mut self, value: u16) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_i16_le(&mut self, value: i16) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_f32_le(&mut self, value: f32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    /// Write a float field at the given precision.
    pub fn write_real(&mut self, value: f32, precision: Precision) {
        match precision {
            Precision::Full => self.write_f32_le(value),
            Precision::Half => self.write_u16_le(f16::from_f32(value).to_bits()),
        }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<u8> {
        self.buf
    }
}

/// Reader for little-endian fixed-width scalars.
#[derive(Debug)]
pub struct Reader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    #[must_use]
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N], CodecError> {
        let end = self.offset.checked_add(N).ok_or(CodecError::OutOfBounds)?;
        let chunk = self.bytes.get(self.offset..end).ok_or(CodecError::OutOfBounds)?;
        let raw: [u8; N] = chunk.try_into().map_err(|_| CodecError::OutOfBounds)?;
        self.offset = end;
        Ok(raw)
    }

    pub fn read_u8(&mut self) -> Result<u8, CodecError> {
        Ok(self.take::<1>()?[0])
    }

    pub fn read_i8(&mut self) -> Result<i8, CodecError> {
        Ok(i8::from_le_bytes(self.take()?))
    }

    pub fn read_u16_le(&mut self) -> Result<u16, CodecError> {
        Ok(u16::from_le_bytes(self.take()?))
    }

    pub fn read_i16_le(&mut self) -> Result<i16, CodecError> {
        Ok(i16::from_le_bytes(self.take()?))
    }

    pub fn read_f32_le(&mut self) -> Result<f32, CodecError> {
        Ok(f32::from_le_bytes(self.take()?))
    }

    /// Read a float field stored at the given precision.
    pub fn read_real(&mut self, precision: Precision) -> Result<f32, CodecError> {
        match precision {
            Precision::Full => self.read_f32_le(),
            Precision::Half => Ok(f16::from_bits(self.read_u16_le()?).to_f32()),
        }
    }

    /// Bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.offset
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }
}

// ============================================================================
// PackedRecord
// ============================================================================

/// A record with a fixed-width binary layout.
pub trait PackedRecord: Sized {
    /// Encoded size in bytes; constant for a given precision.
    fn packed_size(precision: Precision) -> usize;

    fn encode(&self, writer: &mut Writer, precision: Precision);

    /// Decodes and validates one record. Malformed input is an error, never a panic.
    fn decode(reader: &mut Reader<'_>, precision: Precision) -> Result<Self, CodecError>;
}

/// Encode one record into a fresh buffer.
pub fn encode_to_vec<T: PackedRecord>(record: &T, precision: Precision) -> Vec<u8> {
    let mut writer = Writer::with_capacity(T::packed_size(precision));
    record.encode(&mut writer, precision);
    writer.into_vec()
}

/// Decode exactly one record from `bytes`.
pub fn decode_from_bytes<T: PackedRecord>(bytes: &[u8], precision: Precision) -> Result<T, CodecError> {
    let mut reader = Reader::new(bytes);
    let record = T::decode(&mut reader, precision)?;
    match reader.remaining() {
        0 => Ok(record),
        n => Err(CodecError::TrailingBytes(n)),
    }
}

/// Encode a collection as a `u16` count followed by the records.
pub fn encode_collection<T: PackedRecord>(
    records: &[T],
    precision: Precision,
) -> Result<Vec<u8>, CodecError> {
    let count = u16::try_from(records.len())
        .map_err(|_| CodecError::LengthTooLarge(records.len()))?;
    let mut writer = Writer::with_capacity(2 + records.len() * T::packed_size(precision));
    writer.write_u16_le(count);
    for record in records {
        record.encode(&mut writer, precision);
    }
    tracing::trace!(count, bytes = writer.len(), "encoded record collection");
    Ok(writer.into_vec())
}

/// Decode a collection written by [`encode_collection`].
pub fn decode_collection<T: PackedRecord>(
    bytes: &[u8],
    precision: Precision,
) -> Result<Vec<T>, CodecError> {
    let mut reader = Reader::new(bytes);
    let count = usize::from(reader.read_u16_le()?);
    // Reject short input before allocating for a bogus count.
    if reader.remaining() < count * T::packed_size(precision) {
        return Err(CodecError::OutOfBounds);
    }
    let mut records = Vec::with_capacity(count);
    for _ in 0..count {
        records.push(T::decode(&mut reader, precision)?);
    }
    match reader.remaining() {
        0 => {
            tracing::trace!(count, bytes = bytes.len(), "decoded record collection");
            Ok(records)
        }
        n => Err(CodecError::TrailingBytes(n)),
    }
}
