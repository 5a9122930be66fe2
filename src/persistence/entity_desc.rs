//! Entity description catalog
//!
//! Maps entity type names to their [`EntityDesc`]. Two on-disk forms:
//!
//! Binary:
//! ```text
//! [header][u32 count]
//! count × [name][u32 propCount] propCount × [u32 flag][u32 size][size bytes]
//! ```
//!
//! Text (authoring):
//! ```text
//! #Begin RedArrow
//! BaseEntity = Arrow
//! Velocity = 120 0
//! Lifetime = 4.5
//! #End
//! ```
//! Each property line is `<Token> <ignored word> <values...>`; lines with
//! unknown tokens or unparsable values are skipped.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;

use super::codec::{ByteReader, ByteWriter, FileHeader};
use super::{BlockMarker, block_marker, read_file};
use crate::consts::FILE_VERSION;
use crate::error::{Error, Result};
use crate::sim::property::{EntityDesc, EntityProperty, PropertyFlag, PropertyValue};

/// How a text token's values are encoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValueKind {
    Int2,
    Float,
    Text,
}

/// Recognized text tokens
const TOKENS: &[(&str, PropertyFlag, ValueKind)] = &[
    ("Position", PropertyFlag::POSITION, ValueKind::Int2),
    ("Velocity", PropertyFlag::VELOCITY, ValueKind::Int2),
    ("Size", PropertyFlag::SIZE, ValueKind::Int2),
    ("Alpha", PropertyFlag::ALPHA, ValueKind::Float),
    ("Lifetime", PropertyFlag::LIFETIME, ValueKind::Float),
    ("RotationSpeed", PropertyFlag::ROTATION_SPEED, ValueKind::Float),
    ("Rotation", PropertyFlag::ROTATION, ValueKind::Float),
    ("FireFrequency", PropertyFlag::FIRE_FREQUENCY, ValueKind::Float),
    ("FireDuration", PropertyFlag::FIRE_DURATION, ValueKind::Float),
    ("BaseEntity", PropertyFlag::BASE_ENTITY, ValueKind::Text),
    ("GenerationSound", PropertyFlag::GENERATION_SOUND, ValueKind::Text),
    ("Image", PropertyFlag::IMAGE_NAME, ValueKind::Text),
];

/// Name → description catalog, iterated in name order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityDescMap {
    descs: BTreeMap<String, EntityDesc>,
}

impl EntityDescMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.descs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descs.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&EntityDesc> {
        self.descs.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut EntityDesc> {
        self.descs.get_mut(name)
    }

    /// Insert, replacing any description already stored under `name`
    pub fn insert(&mut self, name: impl Into<String>, desc: EntityDesc) {
        self.descs.insert(name.into(), desc);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &EntityDesc)> {
        self.descs.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut EntityDesc)> {
        self.descs.iter_mut().map(|(k, v)| (k.as_str(), v))
    }

    /// Binary form. Borrowed handles are runtime-only and are not written.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut w = ByteWriter::new();
        FileHeader::new(FILE_VERSION, 0).write(&mut w);
        w.write(self.descs.len() as u32);

        for (name, desc) in &self.descs {
            w.write_string(name);
            let owned: Vec<(PropertyFlag, &[u8])> = desc
                .iter()
                .filter_map(|p| p.value.bytes().map(|b| (p.flag, b)))
                .collect();
            if owned.len() != desc.len() {
                log::debug!("'{}': {} handle properties not exported", name, desc.len() - owned.len());
            }
            w.write(owned.len() as u32);
            for (flag, bytes) in owned {
                w.write(flag.0);
                w.write(bytes.len() as u32);
                w.write_bytes(bytes);
            }
        }
        w.into_inner()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut r = ByteReader::new(bytes);
        FileHeader::read(&mut r)?;
        let count = r.read::<u32>()?;

        let mut map = Self::new();
        for _ in 0..count {
            let name = r.read_string()?;
            let prop_count = r.read::<u32>()?;
            let mut desc = EntityDesc::new();
            for _ in 0..prop_count {
                let flag = PropertyFlag(r.read::<u32>()?);
                let size = r.read::<u32>()? as usize;
                let data = r.read_bytes(size)?;
                desc.add(EntityProperty::owned(flag, data));
            }
            map.insert(name, desc);
        }
        Ok(map)
    }

    pub fn export(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_bytes())?;
        Ok(())
    }

    pub fn import(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_bytes(&read_file(path.as_ref())?)
    }

    /// Parse the authoring text format
    pub fn parse_text(text: &str) -> Self {
        let mut map = Self::new();
        let mut open: Option<(String, EntityDesc)> = None;

        for (line_no, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let marker = block_marker(line);
            if let Some(BlockMarker::Begin(name)) = marker {
                if let Some((name, _)) = open.take() {
                    log::warn!("line {}: '{}' has no #End, discarded", line_no + 1, name);
                }
                open = Some((name.to_string(), EntityDesc::new()));
                continue;
            }

            if marker == Some(BlockMarker::End) {
                match open.take() {
                    Some((name, desc)) => map.insert(name, desc),
                    None => log::warn!("line {}: #End without #Begin", line_no + 1),
                }
                continue;
            }

            let Some((_, desc)) = open.as_mut() else {
                continue;
            };
            parse_property_line(line, desc);
        }

        if let Some((name, _)) = open {
            log::warn!("'{}' has no #End, discarded", name);
        }
        map
    }

    pub fn import_text(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = read_file(path.as_ref())?;
        let text = String::from_utf8(bytes).map_err(|e| Error::format(e.to_string()))?;
        Ok(Self::parse_text(&text))
    }

    /// Write the authoring text format. Only properties with a text token
    /// are emitted.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for (name, desc) in &self.descs {
            let _ = writeln!(out, "#Begin {name}");
            for prop in desc.iter() {
                if let Some(line) = format_property_line(prop) {
                    let _ = writeln!(out, "{line}");
                }
            }
            let _ = writeln!(out, "#End");
            out.push('\n');
        }
        out
    }
}

fn parse_property_line(line: &str, desc: &mut EntityDesc) {
    let mut words = line.split_whitespace();
    let Some(token) = words.next() else { return };
    let Some(&(_, flag, kind)) = TOKENS.iter().find(|(t, _, _)| *t == token) else {
        return;
    };
    let _ignored = words.next();

    let stored = match kind {
        ValueKind::Int2 => {
            let a = words.next().and_then(|w| w.parse::<i32>().ok());
            let b = words.next().and_then(|w| w.parse::<i32>().ok());
            match (a, b) {
                (Some(a), Some(b)) => desc.set_i32x2(flag, a, b),
                _ => return,
            }
        }
        ValueKind::Float => match words.next().and_then(|w| w.parse::<f32>().ok()) {
            Some(v) => desc.set_f32(flag, v),
            None => return,
        },
        ValueKind::Text => {
            let value = words.collect::<Vec<_>>().join(" ");
            if value.is_empty() {
                return;
            }
            desc.set_str(flag, &value)
        }
    };
    if let Err(e) = stored {
        log::warn!("{}: {}", token, e);
    }
}

fn format_property_line(prop: &EntityProperty) -> Option<String> {
    let &(token, _, kind) = TOKENS.iter().find(|(_, f, _)| *f == prop.flag)?;
    let PropertyValue::Owned(bytes) = &prop.value else {
        return None;
    };
    let mut desc = EntityDesc::new();
    desc.add(prop.clone());
    let values = match kind {
        ValueKind::Int2 => {
            let (a, b) = desc.get_i32x2(prop.flag)?;
            format!("{a} {b}")
        }
        ValueKind::Float => desc.get_f32(prop.flag)?.to_string(),
        ValueKind::Text => std::str::from_utf8(bytes).ok()?.to_string(),
    };
    Some(format!("{token} = {values}"))
}
