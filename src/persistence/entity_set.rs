//! Entity sets: the placed/timed entities of one level
//!
//! ```text
//! [header (flags & STRING_TABLE)]
//! [u8 tableSize] tableSize × [name]
//! [u32 entCount] entCount × [u8 nameIdx][f32 time][f32 rotation][i32 x][i32 y]
//! ```
//!
//! Names are deduplicated into the table, so one set can reference at most
//! 255 distinct entity types.

use std::path::Path;

use super::codec::{ByteReader, ByteWriter, FileHeader};
use super::read_file;
use crate::consts::FILE_VERSION;
use crate::error::{Error, Result};
use crate::sim::Entity;

/// Header flag: a name string table precedes the entries
pub const FLAG_STRING_TABLE: u32 = 0x1;

/// Largest string table the one-byte count can describe
pub const MAX_NAMES: usize = u8::MAX as usize;

/// One placed entity
#[derive(Debug, Default)]
pub struct EntitySetEntry {
    /// Key into the entity description map
    pub entity_name: String,
    /// Spawn time in seconds from level start
    pub entity_time: f32,
    /// Degrees applied to the entity's velocity
    pub entity_rotation: f32,
    pub start_x: i32,
    pub start_y: i32,
    /// Live preview while editing; never persisted
    pub entity: Option<Entity>,
}

impl EntitySetEntry {
    pub fn new(name: impl Into<String>, time: f32, rotation: f32, x: i32, y: i32) -> Self {
        Self {
            entity_name: name.into(),
            entity_time: time,
            entity_rotation: rotation,
            start_x: x,
            start_y: y,
            entity: None,
        }
    }

    fn same_record(&self, other: &Self) -> bool {
        self.entity_name == other.entity_name
            && self.entity_time == other.entity_time
            && self.entity_rotation == other.entity_rotation
            && self.start_x == other.start_x
            && self.start_y == other.start_y
    }
}

/// Ordered list of entries
#[derive(Debug, Default)]
pub struct EntitySet {
    pub entries: Vec<EntitySetEntry>,
}

impl PartialEq for EntitySet {
    /// Compares persisted fields only
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len()
            && self
                .entries
                .iter()
                .zip(&other.entries)
                .all(|(a, b)| a.same_record(b))
    }
}

impl EntitySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: EntitySetEntry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stable sort by spawn time
    pub fn sort_by_time(&mut self) {
        self.entries
            .sort_by(|a, b| a.entity_time.total_cmp(&b.entity_time));
    }

    pub fn is_sorted_by_time(&self) -> bool {
        self.entries
            .windows(2)
            .all(|w| w[0].entity_time <= w[1].entity_time)
    }

    /// Distinct names in first-use order
    fn name_table(&self) -> Vec<&str> {
        let mut table: Vec<&str> = Vec::new();
        for entry in &self.entries {
            if !table.contains(&entry.entity_name.as_str()) {
                table.push(&entry.entity_name);
            }
        }
        table
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let table = self.name_table();
        if table.len() > MAX_NAMES {
            return Err(Error::TooManyNames(table.len()));
        }

        let mut w = ByteWriter::new();
        FileHeader::new(FILE_VERSION, FLAG_STRING_TABLE).write(&mut w);
        w.write(table.len() as u8);
        for name in &table {
            w.write_string(name);
        }

        w.write(self.entries.len() as u32);
        for entry in &self.entries {
            let index = table
                .iter()
                .position(|n| *n == entry.entity_name)
                .unwrap_or_default();
            w.write(index as u8);
            w.write(entry.entity_time);
            w.write(entry.entity_rotation);
            w.write(entry.start_x);
            w.write(entry.start_y);
        }
        Ok(w.into_inner())
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut r = ByteReader::new(bytes);
        let header = FileHeader::read(&mut r)?;
        if header.flags & FLAG_STRING_TABLE == 0 {
            return Err(Error::format("entity set without a string table"));
        }

        let table_size = r.read::<u8>()?;
        let table = (0..table_size)
            .map(|_| r.read_string())
            .collect::<Result<Vec<_>>>()?;

        let count = r.read::<u32>()?;
        let mut set = Self::new();
        for _ in 0..count {
            let index = r.read::<u8>()? as usize;
            let name = table.get(index).ok_or_else(|| {
                Error::format(format!("name index {index} outside table of {}", table.len()))
            })?;
            let time = r.read::<f32>()?;
            let rotation = r.read::<f32>()?;
            let x = r.read::<i32>()?;
            let y = r.read::<i32>()?;
            set.push(EntitySetEntry::new(name.clone(), time, rotation, x, y));
        }
        Ok(set)
    }

    pub fn export(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_bytes()?)?;
        Ok(())
    }

    pub fn import(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_bytes(&read_file(path.as_ref())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_string_table_dedup() {
        let mut set = EntitySet::new();
        set.push(EntitySetEntry::new("Arrow", 0.0, 0.0, 1, 2));
        set.push(EntitySetEntry::new("Ball", 0.5, 90.0, 3, 4));
        set.push(EntitySetEntry::new("Arrow", 1.0, 0.0, 5, 6));
        let bytes = set.to_bytes().unwrap();

        // header, table size, two names, count, three 17-byte entries
        let expected = 16 + 1 + (4 + 5) + (4 + 4) + 4 + 3 * 17;
        assert_eq!(bytes.len(), expected);
        assert_eq!(bytes[16], 2);

        let back = EntitySet::from_bytes(&bytes).unwrap();
        assert_eq!(back, set);
        assert_eq!(back.entries[2].entity_name, "Arrow");
        assert_eq!(back.entries[1].entity_rotation, 90.0);
    }

    #[test]
    fn test_name_ceiling() {
        let mut set = EntitySet::new();
        for i in 0..MAX_NAMES {
            set.push(EntitySetEntry::new(format!("e{i}"), i as f32, 0.0, 0, 0));
        }
        assert!(set.to_bytes().is_ok());

        set.push(EntitySetEntry::new("one too many", 999.0, 0.0, 0, 0));
        assert!(matches!(set.to_bytes(), Err(Error::TooManyNames(256))));
    }

    #[test]
    fn test_sort_by_time_is_stable() {
        let mut set = EntitySet::new();
        set.push(EntitySetEntry::new("c", 2.0, 0.0, 0, 0));
        set.push(EntitySetEntry::new("a", 1.0, 0.0, 0, 0));
        set.push(EntitySetEntry::new("b", 1.0, 0.0, 0, 0));
        assert!(!set.is_sorted_by_time());
        set.sort_by_time();
        assert!(set.is_sorted_by_time());
        let names: Vec<_> = set.entries.iter().map(|e| e.entity_name.as_str()).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn test_missing_table_flag_rejected() {
        let mut set = EntitySet::new();
        set.push(EntitySetEntry::new("a", 0.0, 0.0, 0, 0));
        let mut bytes = set.to_bytes().unwrap();
        bytes[4] = 0;
        assert!(EntitySet::from_bytes(&bytes).is_err());
    }

    #[test]
    fn test_bad_name_index() {
        let mut set = EntitySet::new();
        set.push(EntitySetEntry::new("a", 0.0, 0.0, 0, 0));
        let mut bytes = set.to_bytes().unwrap();
        let idx_pos = 16 + 1 + 4 + 1 + 4;
        bytes[idx_pos] = 3;
        assert!(matches!(EntitySet::from_bytes(&bytes), Err(Error::Format(_))));
    }

    proptest! {
        #[test]
        fn entries_survive_export(
            rows in prop::collection::vec(
                ("[a-z]{1,6}", -1000.0f32..1000.0, -360.0f32..360.0, any::<i32>(), any::<i32>()),
                0..40,
            )
        ) {
            let mut set = EntitySet::new();
            for (name, time, rot, x, y) in rows {
                set.push(EntitySetEntry::new(name, time, rot, x, y));
            }
            let back = EntitySet::from_bytes(&set.to_bytes().unwrap()).unwrap();
            prop_assert_eq!(back, set);
        }
    }
}
