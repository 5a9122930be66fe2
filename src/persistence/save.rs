//! Player progress
//!
//! `[header][u32 completedLevels]`. Readers ignore anything after the
//! first field so older or larger save blobs still load.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::codec::{ByteReader, ByteWriter, FileHeader};
use super::read_file;
use crate::consts::FILE_VERSION;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSave {
    pub completed_levels: u32,
}

impl GameSave {
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut w = ByteWriter::new();
        FileHeader::new(FILE_VERSION, 0).write(&mut w);
        w.write(self.completed_levels);
        w.into_inner()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut r = ByteReader::new(bytes);
        FileHeader::read(&mut r)?;
        Ok(Self {
            completed_levels: r.read::<u32>()?,
        })
    }

    /// Record a finished level; replaying an earlier one changes nothing
    pub fn complete_level(&mut self, level_index: u32) {
        self.completed_levels = self.completed_levels.max(level_index.saturating_add(1));
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path.as_ref(), self.to_bytes())?;
        log::info!("Progress saved ({} levels)", self.completed_levels);
        Ok(())
    }

    /// Load progress; a missing file is a fresh game
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        match read_file(path.as_ref()) {
            Ok(bytes) => Self::from_bytes(&bytes),
            Err(Error::NotFound { .. }) => {
                log::info!("No save found, starting fresh");
                Ok(Self::default())
            }
            Err(e) => Err(e),
        }
    }
}
