//! Pack archive: the runtime asset bundle
//!
//! Layout (all little-endian):
//!
//! ```text
//! [u32 version][u32 count][u32 flags]
//! count × [u32 signature][u32 version][u32 offset][u32 size]
//! payload bytes, offsets measured from the start of the file
//! ```
//!
//! Elements are looked up by signature, the [`djb_hash`] of their name.
//! Signatures should be unique; if an archive holds duplicates the first
//! one in directory order wins.

use std::path::Path;

use super::codec::{ByteReader, ByteWriter};
use super::read_file;
use crate::consts::PACK_VERSION;
use crate::djb_hash;
use crate::error::{Error, Result};

const HEADER_SIZE: usize = 12;
const DIR_ENTRY_SIZE: usize = 16;

/// One named blob
#[derive(Debug, Clone, PartialEq)]
pub struct PackElement {
    pub signature: u32,
    pub version: u32,
    pub data: Vec<u8>,
}

impl PackElement {
    pub fn new(name: &str, version: u32, data: Vec<u8>) -> Self {
        Self {
            signature: djb_hash(name),
            version,
            data,
        }
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// Offset and size of each payload when `count` directory entries precede
/// payloads of the given sizes
fn payload_layout(count: usize, sizes: impl IntoIterator<Item = usize>) -> Result<Vec<(u32, u32)>> {
    let too_large = || Error::format("pack does not fit 32-bit offsets");
    let directory_end = count
        .checked_mul(DIR_ENTRY_SIZE)
        .and_then(|n| n.checked_add(HEADER_SIZE))
        .ok_or_else(too_large)?;
    let mut offset = u32::try_from(directory_end).map_err(|_| too_large())?;
    sizes
        .into_iter()
        .map(|size| {
            let size = u32::try_from(size).map_err(|_| too_large())?;
            let start = offset;
            offset = offset.checked_add(size).ok_or_else(too_large)?;
            Ok::<_, Error>((start, size))
        })
        .collect()
}

/// In-memory archive
#[derive(Debug, Clone, Default)]
pub struct PackArchive {
    elements: Vec<PackElement>,
}

impl PackArchive {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn elements(&self) -> &[PackElement] {
        &self.elements
    }

    pub fn push(&mut self, element: PackElement) {
        if self.contains(element.signature) {
            log::warn!(
                "pack already holds signature {:#010x}; the new element will be unreachable",
                element.signature
            );
        }
        self.elements.push(element);
    }

    /// Add an element under `name` with version 1
    pub fn insert(&mut self, name: &str, data: Vec<u8>) {
        self.push(PackElement::new(name, 1, data));
    }

    pub fn contains(&self, signature: u32) -> bool {
        self.elements.iter().any(|e| e.signature == signature)
    }

    /// First element with `signature`
    pub fn element(&self, signature: u32) -> Result<&PackElement> {
        self.elements
            .iter()
            .find(|e| e.signature == signature)
            .ok_or_else(|| Error::not_found(format!("pack element {signature:#010x}")))
    }

    pub fn element_by_name(&self, name: &str) -> Result<&PackElement> {
        self.element(djb_hash(name))
            .map_err(|_| Error::not_found(format!("pack element '{name}'")))
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        if self.elements.is_empty() {
            return Err(Error::format("cannot export an empty pack"));
        }

        let count = u32::try_from(self.elements.len())
            .map_err(|_| Error::format("too many pack elements"))?;
        let layout = payload_layout(self.elements.len(), self.elements.iter().map(PackElement::size))?;

        let mut w = ByteWriter::new();
        w.write(PACK_VERSION);
        w.write(count);
        w.write(0u32); // flags

        for (element, (offset, size)) in self.elements.iter().zip(layout) {
            w.write(element.signature);
            w.write(element.version);
            w.write(offset);
            w.write(size);
        }
        for element in &self.elements {
            w.write_bytes(&element.data);
        }
        Ok(w.into_inner())
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut r = ByteReader::new(bytes);
        if r.remaining() < HEADER_SIZE {
            return Err(Error::format("truncated pack header"));
        }
        let _version = r.read::<u32>()?;
        let count = r.read::<u32>()? as usize;
        let flags = r.read::<u32>()?;
        if flags != 0 {
            return Err(Error::UnsupportedFlags(flags));
        }
        if count.saturating_mul(DIR_ENTRY_SIZE) > r.remaining() {
            return Err(Error::format(format!("pack directory of {count} entries is truncated")));
        }

        let mut elements = Vec::with_capacity(count);
        for _ in 0..count {
            let signature = r.read::<u32>()?;
            let version = r.read::<u32>()?;
            let offset = r.read::<u32>()? as usize;
            let size = r.read::<u32>()? as usize;
            let data = offset
                .checked_add(size)
                .and_then(|end| bytes.get(offset..end))
                .ok_or_else(|| {
                    Error::format(format!(
                        "element {signature:#010x} at {offset}+{size} is outside the file"
                    ))
                })?;
            elements.push(PackElement {
                signature,
                version,
                data: data.to_vec(),
            });
        }
        Ok(Self { elements })
    }

    pub fn export(&self, path: impl AsRef<Path>) -> Result<()> {
        let bytes = self.to_bytes()?;
        std::fs::write(path.as_ref(), bytes)?;
        log::info!(
            "Exported {} pack elements to {}",
            self.elements.len(),
            path.as_ref().display()
        );
        Ok(())
    }

    pub fn import(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = read_file(path.as_ref())?;
        let pack = Self::from_bytes(&bytes)?;
        log::info!(
            "Imported {} pack elements from {}",
            pack.len(),
            path.as_ref().display()
        );
        Ok(pack)
    }
}
