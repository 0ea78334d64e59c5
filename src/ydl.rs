//! YDL preset container parsing.
//!
//! A YDL file is a 7-byte signature followed by fixed-size patch records:
//!
//! ```text
//! offset 0   "DTAB01d" + 6 bytes
//! offset 13  record 0 (256 bytes) + 5-byte gap
//! offset 274 record 1 (256 bytes) + 5-byte gap
//! ...
//! ```
//!
//! There is no patch count in the file; the number of records is whatever
//! fits into the buffer.

use std::borrow::Cow;
use std::fmt;
use std::fs;
use std::path::Path;

use log::debug;
use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::error::{Error, FormatError, IndexError, ValueError};

/// Container signature
pub const MAGIC: &[u8; 7] = b"DTAB01d";

/// Byte offset of the first patch record
pub const RECORD_OFFSET: usize = 13;

/// Size of one patch record
pub const RECORD_SIZE: usize = 0x100;

/// Distance between the starts of two consecutive records (record + 5-byte gap)
pub const RECORD_STRIDE: usize = RECORD_SIZE + 5;

/// Leading bytes of a record holding the patch name
pub const NAME_SIZE: usize = 96;

/// A validated YDL container. Immutable once loaded.
#[derive(Debug, Clone)]
pub struct Container {
    data: Vec<u8>,
}

impl Container {
    /// Takes ownership of a raw file buffer after checking its signature.
    pub fn load(data: Vec<u8>) -> Result<Self, FormatError> {
        if !data.starts_with(MAGIC) {
            return Err(FormatError::BadMagic);
        }
        debug!("YDL: loaded {} bytes, {} patches", data.len(), record_count(data.len()));
        Ok(Self { data })
    }

    /// Copies out the patch record at `index` (0-based).
    pub fn extract(&self, index: usize) -> Result<PatchRecord, IndexError> {
        let start = record_start(index)
            .filter(|start| {
                start
                    .checked_add(RECORD_SIZE)
                    .is_some_and(|end| end <= self.data.len())
            })
            .ok_or(IndexError::OutOfRange {
                index,
                count: self.patch_count(),
            })?;

        let mut record = [0u8; RECORD_SIZE];
        record.copy_from_slice(&self.data[start..start + RECORD_SIZE]);
        debug!("YDL: extracted patch {} from offset {}", index, start);

        Ok(PatchRecord(record))
    }

    /// Iterates over all complete records with their raw names.
    pub fn entries(&self) -> Entries<'_> {
        Entries {
            data: &self.data,
            pos: RECORD_OFFSET,
            index: 0,
        }
    }

    /// Number of complete records in the container.
    pub fn patch_count(&self) -> usize {
        record_count(self.data.len())
    }

    /// The whole container buffer, signature included.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

/// Reads and validates a YDL file
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<Container, Error> {
    let path = path.as_ref();
    let data = fs::read(path).map_err(|source| Error::OpenInput {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(Container::load(data)?)
}

/// Start offset of record `index`, or `None` if it does not fit in a `usize`.
fn record_start(index: usize) -> Option<usize> {
    index.checked_mul(RECORD_STRIDE)?.checked_add(RECORD_OFFSET)
}

fn record_count(len: usize) -> usize {
    match len.checked_sub(RECORD_OFFSET + RECORD_SIZE) {
        Some(rest) => rest / RECORD_STRIDE + 1,
        None => 0,
    }
}

/// A single 256-byte patch copied out of a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchRecord([u8; RECORD_SIZE]);

impl PatchRecord {
    pub fn new(data: [u8; RECORD_SIZE]) -> Self {
        Self(data)
    }

    pub fn as_bytes(&self) -> &[u8; RECORD_SIZE] {
        &self.0
    }

    /// The name area of the patch, padding included.
    pub fn name_bytes(&self) -> &[u8] {
        &self.0[..NAME_SIZE]
    }
}

impl TryFrom<&[u8]> for PatchRecord {
    type Error = ValueError;

    fn try_from(data: &[u8]) -> Result<Self, Self::Error> {
        let record: [u8; RECORD_SIZE] =
            data.try_into().map_err(|_| ValueError::BadPatchLength {
                actual: data.len(),
                expected: RECORD_SIZE,
            })?;
        Ok(Self(record))
    }
}

/// One line of a container listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry<'a> {
    pub index: usize,
    /// The 96 name bytes exactly as stored
    pub raw_name: &'a [u8],
}

impl Entry<'_> {
    /// The raw name as text. Padding is kept.
    pub fn name(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.raw_name)
    }
}

impl fmt::Display for Entry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.index, self.name())
    }
}

impl Serialize for Entry<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Entry", 2)?;
        s.serialize_field("index", &self.index)?;
        s.serialize_field("name", &self.name())?;
        s.end()
    }
}

/// Lazy iterator over the records of a [`Container`].
#[derive(Debug, Clone)]
pub struct Entries<'a> {
    data: &'a [u8],
    pos: usize,
    index: usize,
}

impl<'a> Iterator for Entries<'a> {
    type Item = Entry<'a>;

    fn next(&mut self) -> Option<Entry<'a>> {
        if self.data.len().saturating_sub(self.pos) < RECORD_SIZE {
            return None;
        }

        let entry = Entry {
            index: self.index,
            raw_name: &self.data[self.pos..self.pos + NAME_SIZE],
        };
        self.index += 1;
        self.pos += RECORD_STRIDE;

        Some(entry)
    }
}
