//! Entity descriptions as flag-keyed property bags
//!
//! An [`EntityDesc`] is the full set of construction parameters for one
//! entity type. Each property is either an owned byte buffer (positions,
//! speeds, names) or a borrowed handle to an engine resource (a loaded image
//! or sound). The two kinds never convert into each other.


use crate::audio::SoundHandle;
use crate::error::{Error, Result};
use crate::renderer::ImageHandle;

/// Property tag. Values below 100 are persistable byte properties, values
/// from 100 up hold runtime resource handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PropertyFlag(pub u32);

impl PropertyFlag {
    /// Start position in pixels (2 × i32)
    pub const POSITION: Self = Self(1);
    /// Velocity in pixels/second (2 × i32)
    pub const VELOCITY: Self = Self(2);
    /// Draw opacity 0..1 (f32)
    pub const ALPHA: Self = Self(3);
    /// Seconds after spawn before the entity deactivates (f32)
    pub const LIFETIME: Self = Self(4);
    /// Spin in degrees/second (f32)
    pub const ROTATION_SPEED: Self = Self(5);
    /// Beam period in seconds (f32)
    pub const FIRE_FREQUENCY: Self = Self(6);
    /// Beam on-time per period in seconds (f32)
    pub const FIRE_DURATION: Self = Self(7);
    /// Variant name the factory dispatches on (string)
    pub const BASE_ENTITY: Self = Self(8);
    /// Name of the sound played once on spawn (string)
    pub const GENERATION_SOUND: Self = Self(9);
    /// Name of the entity image (string)
    pub const IMAGE_NAME: Self = Self(10);
    /// Explicit width/height in pixels (2 × i32)
    pub const SIZE: Self = Self(11);
    /// Rotation applied to the velocity vector, degrees (f32)
    pub const ROTATION: Self = Self(12);

    /// Loaded image (handle)
    pub const IMAGE: Self = Self(100);
    /// Loaded spawn sound (handle)
    pub const SOUND: Self = Self(101);
}

/// Opaque engine resource handle stored in a property without ownership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle(pub u32);

impl From<ImageHandle> for Handle {
    fn from(h: ImageHandle) -> Self {
        Handle(h.0)
    }
}

impl From<SoundHandle> for Handle {
    fn from(h: SoundHandle) -> Self {
        Handle(h.0)
    }
}

/// Payload of one property
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// Bytes exclusively owned by the description
    Owned(Vec<u8>),
    /// Alias to a resource owned by the engine
    Borrowed(Handle),
}

impl PropertyValue {
    /// Byte length; borrowed handles report 0
    pub fn size(&self) -> usize {
        match self {
            PropertyValue::Owned(bytes) => bytes.len(),
            PropertyValue::Borrowed(_) => 0,
        }
    }

    pub fn bytes(&self) -> Option<&[u8]> {
        match self {
            PropertyValue::Owned(bytes) => Some(bytes),
            PropertyValue::Borrowed(_) => None,
        }
    }

    pub fn handle(&self) -> Option<Handle> {
        match self {
            PropertyValue::Owned(_) => None,
            PropertyValue::Borrowed(h) => Some(*h),
        }
    }

    pub fn is_owned(&self) -> bool {
        matches!(self, PropertyValue::Owned(_))
    }
}

/// A single tagged property
#[derive(Debug, Clone, PartialEq)]
pub struct EntityProperty {
    pub flag: PropertyFlag,
    pub value: PropertyValue,
}

impl EntityProperty {
    pub fn owned(flag: PropertyFlag, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            flag,
            value: PropertyValue::Owned(bytes.into()),
        }
    }

    pub fn borrowed(flag: PropertyFlag, handle: Handle) -> Self {
        Self {
            flag,
            value: PropertyValue::Borrowed(handle),
        }
    }
}

/// Ordered property bag describing one entity type
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityDesc {
    properties: Vec<EntityProperty>,
}

impl EntityDesc {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Properties in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &EntityProperty> {
        self.properties.iter()
    }

    pub fn contains(&self, flag: PropertyFlag) -> bool {
        self.properties.iter().any(|p| p.flag == flag)
    }

    /// First property carrying `flag`
    pub fn get(&self, flag: PropertyFlag) -> Option<&PropertyValue> {
        self.properties
            .iter()
            .find(|p| p.flag == flag)
            .map(|p| &p.value)
    }

    /// Like [`get`](Self::get) but reports the missing flag as an error
    pub fn require(&self, flag: PropertyFlag) -> Result<&PropertyValue> {
        self.get(flag).ok_or(Error::MissingProperty(flag))
    }

    /// Append without checking for an existing entry with the same flag
    pub fn add(&mut self, property: EntityProperty) {
        self.properties.push(property);
    }

    /// Remove the first property with `flag`. Returns false if absent.
    pub fn remove(&mut self, flag: PropertyFlag) -> bool {
        match self.properties.iter().position(|p| p.flag == flag) {
            Some(i) => {
                self.properties.remove(i);
                true
            }
            None => false,
        }
    }

    /// Insert or update a property.
    ///
    /// An existing owned buffer is overwritten in place: `min(old, new)`
    /// bytes are copied and the stored size never changes. An existing
    /// handle is replaced. Switching between owned and borrowed is refused.
    pub fn set(&mut self, flag: PropertyFlag, value: PropertyValue) -> Result<()> {
        let Some(existing) = self.properties.iter_mut().find(|p| p.flag == flag) else {
            self.properties.push(EntityProperty { flag, value });
            return Ok(());
        };

        match (&mut existing.value, value) {
            (PropertyValue::Owned(dst), PropertyValue::Owned(src)) => {
                if dst.len() != src.len() {
                    log::warn!(
                        "property {:?}: in-place set of {} bytes into a {} byte slot",
                        flag,
                        src.len(),
                        dst.len()
                    );
                }
                let n = dst.len().min(src.len());
                dst[..n].copy_from_slice(&src[..n]);
                Ok(())
            }
            (PropertyValue::Borrowed(dst), PropertyValue::Borrowed(src)) => {
                *dst = src;
                Ok(())
            }
            _ => Err(Error::OwnershipMismatch(flag)),
        }
    }

    pub fn set_bytes(&mut self, flag: PropertyFlag, bytes: &[u8]) -> Result<()> {
        self.set(flag, PropertyValue::Owned(bytes.to_vec()))
    }

    pub fn get_bytes(&self, flag: PropertyFlag) -> Option<&[u8]> {
        self.get(flag).and_then(PropertyValue::bytes)
    }

    pub fn set_i32(&mut self, flag: PropertyFlag, v: i32) -> Result<()> {
        self.set_bytes(flag, &v.to_le_bytes())
    }

    pub fn get_i32(&self, flag: PropertyFlag) -> Option<i32> {
        let b = self.get_bytes(flag)?;
        Some(i32::from_le_bytes(b.get(..4)?.try_into().ok()?))
    }

    pub fn set_i32x2(&mut self, flag: PropertyFlag, a: i32, b: i32) -> Result<()> {
        let mut bytes = [0u8; 8];
        bytes[..4].copy_from_slice(&a.to_le_bytes());
        bytes[4..].copy_from_slice(&b.to_le_bytes());
        self.set_bytes(flag, &bytes)
    }

    pub fn get_i32x2(&self, flag: PropertyFlag) -> Option<(i32, i32)> {
        let b = self.get_bytes(flag)?;
        let a = i32::from_le_bytes(b.get(..4)?.try_into().ok()?);
        let c = i32::from_le_bytes(b.get(4..8)?.try_into().ok()?);
        Some((a, c))
    }

    pub fn set_f32(&mut self, flag: PropertyFlag, v: f32) -> Result<()> {
        self.set_bytes(flag, &v.to_le_bytes())
    }

    pub fn get_f32(&self, flag: PropertyFlag) -> Option<f32> {
        let b = self.get_bytes(flag)?;
        Some(f32::from_le_bytes(b.get(..4)?.try_into().ok()?))
    }

    pub fn set_f32x2(&mut self, flag: PropertyFlag, a: f32, b: f32) -> Result<()> {
        let mut bytes = [0u8; 8];
        bytes[..4].copy_from_slice(&a.to_le_bytes());
        bytes[4..].copy_from_slice(&b.to_le_bytes());
        self.set_bytes(flag, &bytes)
    }

    pub fn get_f32x2(&self, flag: PropertyFlag) -> Option<(f32, f32)> {
        let b = self.get_bytes(flag)?;
        let a = f32::from_le_bytes(b.get(..4)?.try_into().ok()?);
        let c = f32::from_le_bytes(b.get(4..8)?.try_into().ok()?);
        Some((a, c))
    }

    /// Strings are stored as raw UTF-8 without a terminator
    pub fn set_str(&mut self, flag: PropertyFlag, s: &str) -> Result<()> {
        self.set_bytes(flag, s.as_bytes())
    }

    pub fn get_str(&self, flag: PropertyFlag) -> Option<&str> {
        std::str::from_utf8(self.get_bytes(flag)?).ok()
    }

    pub fn set_handle(&mut self, flag: PropertyFlag, handle: Handle) -> Result<()> {
        self.set(flag, PropertyValue::Borrowed(handle))
    }

    pub fn get_handle(&self, flag: PropertyFlag) -> Option<Handle> {
        self.get(flag).and_then(PropertyValue::handle)
    }

    pub fn image(&self) -> Option<ImageHandle> {
        self.get_handle(PropertyFlag::IMAGE).map(|h| ImageHandle(h.0))
    }

    pub fn sound(&self) -> Option<SoundHandle> {
        self.get_handle(PropertyFlag::SOUND).map(|h| SoundHandle(h.0))
    }
}
