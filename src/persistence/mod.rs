//! Save/load of every on-disk format
//!
//! Formats:
//! - Pack archive (asset bundle, DJB-hashed element names)
//! - Entity descriptions (binary and authoring text)
//! - Entity sets (per-level spawn lists with a name string table)
//! - Level info (binary and text)
//! - Images (RGBA8)
//! - Game save (player progress)
//!
//! All binary formats are little-endian regardless of host.

pub mod codec;
pub mod entity_desc;
pub mod entity_set;
pub mod image;
pub mod level;
pub mod pack;
pub mod resources;
pub mod save;

pub use codec::{ByteReader, ByteWriter, FileHeader};
pub use entity_desc::EntityDescMap;
pub use entity_set::{EntitySet, EntitySetEntry};
pub use image::ImageFile;
pub use level::LevelInfo;
pub use pack::{PackArchive, PackElement};
pub use resources::{PackResources, ResourceCache, resolve_all, resolve_resources};
pub use save::GameSave;

use std::path::Path;

use crate::error::{Error, Result};

/// Read a whole file, reporting a missing file as `NotFound`
pub(crate) fn read_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => Error::not_found(path.display().to_string()),
        _ => Error::Io(e),
    })
}

/// `#Begin <name>` / `#End` line of the authoring text formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BlockMarker<'a> {
    Begin(&'a str),
    End,
}

/// Markers must be whole words: `#Beginner` is not a `#Begin`
pub(crate) fn block_marker(line: &str) -> Option<BlockMarker<'_>> {
    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    match word {
        "#Begin" => Some(BlockMarker::Begin(rest.trim())),
        "#End" => Some(BlockMarker::End),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_markers_are_whole_words() {
        assert_eq!(block_marker("#Begin Red Arrow"), Some(BlockMarker::Begin("Red Arrow")));
        assert_eq!(block_marker("#Begin"), Some(BlockMarker::Begin("")));
        assert_eq!(block_marker("#End"), Some(BlockMarker::End));
        assert_eq!(block_marker("#End trailing"), Some(BlockMarker::End));
        assert_eq!(block_marker("#Beginner"), None);
        assert_eq!(block_marker("#Ending"), None);
        assert_eq!(block_marker("Position = 1 2"), None);
    }
}
