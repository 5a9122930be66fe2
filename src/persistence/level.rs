//! Per-level metadata
//!
//! Binary: `[header][name][background][music][entity set][f32 duration]`.
//! Text:
//! ```text
//! #Begin Level1
//! Background images/sky
//! Music music/level1
//! ArrowSet sets/level1
//! TimeLength 60
//! #End
//! ```
//! Only the first block of a text file is read.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::codec::{ByteReader, ByteWriter, FileHeader};
use super::{BlockMarker, block_marker, read_file};
use crate::consts::FILE_VERSION;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelInfo {
    pub name: String,
    /// Background image name
    pub background: String,
    /// Music track name
    pub music: String,
    /// Pack element name of the level's entity set
    pub entity_set: String,
    /// Seconds the player must survive
    pub duration: f32,
}

impl LevelInfo {
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut w = ByteWriter::new();
        FileHeader::new(FILE_VERSION, 0).write(&mut w);
        w.write_string(&self.name);
        w.write_string(&self.background);
        w.write_string(&self.music);
        w.write_string(&self.entity_set);
        w.write(self.duration);
        w.into_inner()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut r = ByteReader::new(bytes);
        FileHeader::read(&mut r)?;
        Ok(Self {
            name: r.read_string()?,
            background: r.read_string()?,
            music: r.read_string()?,
            entity_set: r.read_string()?,
            duration: r.read::<f32>()?,
        })
    }

    pub fn parse_text(text: &str) -> Result<Self> {
        let mut level: Option<LevelInfo> = None;

        for line in text.lines() {
            let line = line.trim();
            let marker = block_marker(line);
            if let Some(BlockMarker::Begin(name)) = marker {
                level = Some(LevelInfo {
                    name: name.to_string(),
                    ..Default::default()
                });
                continue;
            }
            if marker == Some(BlockMarker::End) {
                if let Some(level) = level.take() {
                    return Ok(level);
                }
                continue;
            }

            let Some(level) = level.as_mut() else { continue };
            let (token, value) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
            let value = value.trim();
            match token {
                "Background" => level.background = value.to_string(),
                "Music" => level.music = value.to_string(),
                "ArrowSet" => level.entity_set = value.to_string(),
                "TimeLength" => match value.parse() {
                    Ok(secs) => level.duration = secs,
                    Err(_) => log::warn!("level '{}': bad TimeLength '{}'", level.name, value),
                },
                _ => {}
            }
        }
        Err(Error::format("level text has no complete #Begin/#End block"))
    }

    pub fn to_text(&self) -> String {
        format!(
            "#Begin {}\nBackground {}\nMusic {}\nArrowSet {}\nTimeLength {}\n#End\n",
            self.name, self.background, self.music, self.entity_set, self.duration
        )
    }

    pub fn export(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_bytes())?;
        Ok(())
    }

    pub fn import(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_bytes(&read_file(path.as_ref())?)
    }

    pub fn import_text(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = read_file(path.as_ref())?;
        let text = String::from_utf8(bytes).map_err(|e| Error::format(e.to_string()))?;
        Self::parse_text(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> LevelInfo {
        LevelInfo {
            name: "Level1".into(),
            background: "images/sky".into(),
            music: "music/calm".into(),
            entity_set: "sets/level1".into(),
            duration: 60.0,
        }
    }

    #[test]
    fn test_json_field_names() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["entity_set"], "sets/level1");
        assert_eq!(json["duration"], 60.0);
        let back: LevelInfo = serde_json::from_value(json).unwrap();
        assert_eq!(back, sample());
    }

    #[test]
    fn test_binary_roundtrip() {
        let bytes = sample().to_bytes();
        assert_eq!(&bytes[bytes.len() - 4..], &60.0f32.to_le_bytes());
        assert_eq!(LevelInfo::from_bytes(&bytes).unwrap(), sample());
    }

    #[test]
    fn test_text_first_block_wins() {
        let text = format!("{}#Begin Level2\nTimeLength 5\n#End\n", sample().to_text());
        assert_eq!(LevelInfo::parse_text(&text).unwrap(), sample());
    }

    #[test]
    fn test_text_paths_with_spaces_and_junk() {
        let text = "junk\n#Begin L\nBackground my sky.img\nFoo bar\nTimeLength abc\n#End";
        let level = LevelInfo::parse_text(text).unwrap();
        assert_eq!(level.background, "my sky.img");
        assert_eq!(level.duration, 0.0);
    }

    #[test]
    fn test_marker_prefixes_are_not_markers() {
        let text = "#Beginner\n#Begin L\nMusic m\n#Ending\nTimeLength 9\n#End\n";
        let level = LevelInfo::parse_text(text).unwrap();
        assert_eq!(level.name, "L");
        assert_eq!(level.music, "m");
        assert_eq!(level.duration, 9.0);
    }

    #[test]
    fn test_text_without_end() {
        assert!(LevelInfo::parse_text("#Begin L\nMusic m\n").is_err());
    }
}
