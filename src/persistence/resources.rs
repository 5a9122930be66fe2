//! Name → handle resolution for images and sounds
//!
//! Descriptions name their image and spawn sound as strings. Before a level
//! starts those names are looked up in a [`ResourceCache`] and the resulting
//! handles are attached to the description as borrowed properties.

use std::collections::HashMap;

use super::image::ImageFile;
use super::pack::PackArchive;
use crate::audio::SoundHandle;
use crate::djb_hash;
use crate::renderer::ImageHandle;
use crate::sim::property::{EntityDesc, PropertyFlag};

use super::entity_desc::EntityDescMap;

/// Engine resource lookup. Missing assets yield `None`, never an error.
pub trait ResourceCache {
    fn load_image(&mut self, name: &str) -> Option<ImageHandle>;
    fn load_sound(&mut self, name: &str) -> Option<SoundHandle>;
    fn image_size(&self, image: ImageHandle) -> Option<(u32, u32)>;
}

/// Attach `IMAGE`/`SOUND` handles for the names a description carries
pub fn resolve_resources(desc: &mut EntityDesc, cache: &mut dyn ResourceCache) {
    if let Some(name) = desc.get_str(PropertyFlag::IMAGE_NAME).map(str::to_owned) {
        match cache.load_image(&name) {
            Some(image) => {
                if let Err(e) = desc.set_handle(PropertyFlag::IMAGE, image.into()) {
                    log::warn!("image '{}': {}", name, e);
                }
                // Explicit Size wins over the image dimensions
                if !desc.contains(PropertyFlag::SIZE) {
                    if let Some((w, h)) = cache.image_size(image) {
                        if let Err(e) = desc.set_i32x2(PropertyFlag::SIZE, w as i32, h as i32) {
                            log::warn!("image '{}': {}", name, e);
                        }
                    }
                }
            }
            None => log::warn!("image '{}' not found", name),
        }
    }

    if let Some(name) = desc.get_str(PropertyFlag::GENERATION_SOUND).map(str::to_owned) {
        match cache.load_sound(&name) {
            Some(sound) => {
                if let Err(e) = desc.set_handle(PropertyFlag::SOUND, sound.into()) {
                    log::warn!("sound '{}': {}", name, e);
                }
            }
            None => log::warn!("sound '{}' not found", name),
        }
    }
}

/// Resolve every description in a map
pub fn resolve_all(map: &mut EntityDescMap, cache: &mut dyn ResourceCache) {
    for (_, desc) in map.iter_mut() {
        resolve_resources(desc, cache);
    }
}

/// Resource cache backed by a pack archive.
///
/// Images are decoded from [`ImageFile`] elements; sound elements are kept
/// as raw bytes for the audio engine. Each name is loaded once.
#[derive(Debug, Default)]
pub struct PackResources {
    pack: PackArchive,
    images: Vec<ImageFile>,
    sounds: Vec<Vec<u8>>,
    image_names: HashMap<u32, ImageHandle>,
    sound_names: HashMap<u32, SoundHandle>,
}

impl PackResources {
    pub fn new(pack: PackArchive) -> Self {
        Self {
            pack,
            ..Default::default()
        }
    }

    pub fn pack(&self) -> &PackArchive {
        &self.pack
    }

    pub fn image(&self, image: ImageHandle) -> Option<&ImageFile> {
        self.images.get(image.0 as usize)
    }

    pub fn sound_data(&self, sound: SoundHandle) -> Option<&[u8]> {
        self.sounds.get(sound.0 as usize).map(Vec::as_slice)
    }
}

impl ResourceCache for PackResources {
    fn load_image(&mut self, name: &str) -> Option<ImageHandle> {
        let sig = djb_hash(name);
        if let Some(&handle) = self.image_names.get(&sig) {
            return Some(handle);
        }
        let element = self.pack.element(sig).ok()?;
        let image = match ImageFile::from_bytes(&element.data) {
            Ok(image) => image,
            Err(e) => {
                log::warn!("image '{}' is corrupt: {}", name, e);
                return None;
            }
        };
        let handle = ImageHandle(self.images.len() as u32);
        self.images.push(image);
        self.image_names.insert(sig, handle);
        Some(handle)
    }

    fn load_sound(&mut self, name: &str) -> Option<SoundHandle> {
        let sig = djb_hash(name);
        if let Some(&handle) = self.sound_names.get(&sig) {
            return Some(handle);
        }
        let data = self.pack.element(sig).ok()?.data.clone();
        let handle = SoundHandle(self.sounds.len() as u32);
        self.sounds.push(data);
        self.sound_names.insert(sig, handle);
        Some(handle)
    }

    fn image_size(&self, image: ImageHandle) -> Option<(u32, u32)> {
        self.image(image).map(|i| (i.width, i.height))
    }
}
