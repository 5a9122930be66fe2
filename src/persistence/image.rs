//! Image payloads stored inside the pack archive
//!
//! `[header][u32 width][u32 height][width × height RGBA8 pixels, row-major]`

use super::codec::{ByteReader, ByteWriter, FileHeader};
use crate::consts::FILE_VERSION;
use crate::error::{Error, Result};
use crate::renderer::Rgba;

fn pixel_count(width: u32, height: u32) -> usize {
    width as usize * height as usize
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageFile {
    pub width: u32,
    pub height: u32,
    pixels: Vec<Rgba>,
}

impl ImageFile {
    /// Solid-color image
    pub fn filled(width: u32, height: u32, color: Rgba) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; pixel_count(width, height)],
        }
    }

    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Rgba>) -> Result<Self> {
        if pixels.len() != pixel_count(width, height) {
            return Err(Error::format(format!(
                "{} pixels for a {}x{} image",
                pixels.len(),
                width,
                height
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut w = ByteWriter::new();
        FileHeader::new(FILE_VERSION, 0).write(&mut w);
        w.write(self.width);
        w.write(self.height);
        w.write_bytes(bytemuck::cast_slice(&self.pixels));
        w.into_inner()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut r = ByteReader::new(bytes);
        FileHeader::read(&mut r)?;
        let width = r.read::<u32>()?;
        let height = r.read::<u32>()?;
        let len = pixel_count(width, height)
            .checked_mul(std::mem::size_of::<Rgba>())
            .ok_or_else(|| Error::format("image dimensions overflow"))?;
        let raw = r.read_bytes(len)?;
        let pixels = bytemuck::pod_collect_to_vec::<u8, Rgba>(raw);
        Self::from_pixels(width, height, pixels)
    }
}
