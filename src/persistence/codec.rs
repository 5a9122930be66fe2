//! Binary framing primitives
//!
//! Every file format in this crate is built from three pieces: fixed-width
//! little-endian scalars, strings prefixed with a `u32` byte length (no
//! terminator), and the common [`FileHeader`].

use crate::error::{Error, Result};

/// Fixed-width value with a little-endian wire form
pub trait Scalar: Sized + Copy {
    const SIZE: usize;
    fn put(self, out: &mut Vec<u8>);
    fn take(bytes: &[u8]) -> Self;
}

macro_rules! impl_scalar {
    ($($t:ty),*) => {
        $(
            impl Scalar for $t {
                const SIZE: usize = std::mem::size_of::<$t>();

                #[inline]
                fn put(self, out: &mut Vec<u8>) {
                    out.extend_from_slice(&self.to_le_bytes());
                }

                #[inline]
                fn take(bytes: &[u8]) -> Self {
                    let mut raw = [0u8; std::mem::size_of::<$t>()];
                    raw.copy_from_slice(&bytes[..Self::SIZE]);
                    <$t>::from_le_bytes(raw)
                }
            }
        )*
    };
}

impl_scalar!(u8, u16, u32, u64, i32, f32);

/// Growable output buffer
#[derive(Debug, Default)]
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write<T: Scalar>(&mut self, v: T) {
        v.put(&mut self.buf);
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// `u32` length followed by the raw bytes
    pub fn write_string(&mut self, s: &str) {
        self.write(s.len() as u32);
        self.write_bytes(s.as_bytes());
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }
}

/// Cursor over a borrowed byte slice
#[derive(Debug)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        if n > self.remaining() {
            return Err(Error::format(format!(
                "need {} bytes at offset {}, only {} left",
                n,
                self.pos,
                self.remaining()
            )));
        }
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    pub fn read<T: Scalar>(&mut self) -> Result<T> {
        let bytes = self.read_bytes(T::SIZE)?;
        Ok(T::take(bytes))
    }

    pub fn read_string(&mut self) -> Result<String> {
        let len = self.read::<u32>()? as usize;
        let bytes = self.read_bytes(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|e| Error::format(e.to_string()))
    }

    /// Read a length-prefixed string keeping at most `capacity` bytes.
    ///
    /// The cursor always moves past the whole declared string so the next
    /// field is read from the right place.
    pub fn read_string_bounded(&mut self, capacity: usize) -> Result<String> {
        let len = self.read::<u32>()? as usize;
        let bytes = self.read_bytes(len)?;
        let kept = &bytes[..len.min(capacity)];
        // Keep the longest valid prefix so a split character never grows
        // the result past `capacity`
        let valid = match std::str::from_utf8(kept) {
            Ok(text) => text,
            Err(e) => std::str::from_utf8(&kept[..e.valid_up_to()]).unwrap_or_default(),
        };
        Ok(valid.to_owned())
    }
}

/// `{f32 version, u32 flags, u32 reserved[2]}` prefix shared by the
/// entity description, entity set, level and save formats
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FileHeader {
    pub version: f32,
    pub flags: u32,
}

impl FileHeader {
    pub const SIZE: usize = 16;

    pub fn new(version: f32, flags: u32) -> Self {
        Self { version, flags }
    }

    pub fn write(&self, w: &mut ByteWriter) {
        w.write(self.version);
        w.write(self.flags);
        w.write(0u32);
        w.write(0u32);
    }

    pub fn read(r: &mut ByteReader<'_>) -> Result<Self> {
        if r.remaining() < Self::SIZE {
            return Err(Error::format("truncated file header"));
        }
        let version = r.read::<f32>()?;
        let flags = r.read::<u32>()?;
        let _reserved = (r.read::<u32>()?, r.read::<u32>()?);
        if !version.is_finite() || version <= 0.0 {
            return Err(Error::format(format!("bad header version {version}")));
        }
        Ok(Self { version, flags })
    }
}
