//! Level assembly
//!
//! A level is three pack elements: its [`LevelInfo`], the [`EntitySet`] it
//! names, and the shared description table. Each set entry picks a
//! description by name and stamps its own position and rotation onto a copy.

use super::entity_gen::EntityCreateEntry;
use super::property::PropertyFlag;
use crate::audio::SoundHandle;
use crate::consts::ENTITY_DESCRIPTIONS;
use crate::error::Result;
use crate::persistence::{
    EntityDescMap, EntitySet, LevelInfo, PackResources, ResourceCache, resolve_all,
};
use crate::renderer::ImageHandle;

/// Everything needed to start a level
#[derive(Debug, Clone)]
pub struct LevelAssets {
    pub info: LevelInfo,
    /// Spawn list in non-decreasing time order
    pub entries: Vec<EntityCreateEntry>,
    pub background: Option<ImageHandle>,
    pub music: Option<SoundHandle>,
}

impl LevelAssets {
    /// Load a level by element name and resolve its images and sounds
    pub fn load(resources: &mut PackResources, level_name: &str) -> Result<Self> {
        let info = LevelInfo::from_bytes(&resources.pack().element_by_name(level_name)?.data)?;
        let set = EntitySet::from_bytes(&resources.pack().element_by_name(&info.entity_set)?.data)?;
        let mut descs =
            EntityDescMap::from_bytes(&resources.pack().element_by_name(ENTITY_DESCRIPTIONS)?.data)?;
        resolve_all(&mut descs, resources);

        let background = match info.background.as_str() {
            "" => None,
            name => resources.load_image(name).or_else(|| {
                log::warn!("level '{}': background '{}' not found", info.name, name);
                None
            }),
        };
        let music = match info.music.as_str() {
            "" => None,
            name => resources.load_sound(name).or_else(|| {
                log::warn!("level '{}': music '{}' not found", info.name, name);
                None
            }),
        };

        let mut assets = Self::assemble(info, &set, &descs);
        assets.background = background;
        assets.music = music;
        log::info!(
            "level '{}': {} spawns over {}s",
            assets.info.name,
            assets.entries.len(),
            assets.info.duration
        );
        Ok(assets)
    }

    /// Merge a set with its descriptions. Entries naming an unknown
    /// description are skipped.
    pub fn assemble(info: LevelInfo, set: &EntitySet, descs: &EntityDescMap) -> Self {
        let mut entries = Vec::with_capacity(set.len());

        for placed in &set.entries {
            let Some(template) = descs.get(&placed.entity_name) else {
                log::warn!(
                    "level '{}': no description '{}', skipping spawn at t={}",
                    info.name,
                    placed.entity_name,
                    placed.entity_time
                );
                continue;
            };

            let mut desc = template.clone();
            if let Err(e) = desc.set_i32x2(PropertyFlag::POSITION, placed.start_x, placed.start_y) {
                log::warn!("'{}': {}", placed.entity_name, e);
            }
            if let Err(e) = desc.set_f32(PropertyFlag::ROTATION, placed.entity_rotation) {
                log::warn!("'{}': {}", placed.entity_name, e);
            }
            let base_type = desc
                .get_str(PropertyFlag::BASE_ENTITY)
                .unwrap_or("Default")
                .to_owned();

            entries.push(EntityCreateEntry {
                gen_time: placed.entity_time,
                base_type,
                desc,
            });
        }

        entries.sort_by(|a, b| a.gen_time.total_cmp(&b.gen_time));
        Self {
            info,
            entries,
            background: None,
            music: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{EntitySetEntry, ImageFile, PackArchive};
    use crate::renderer::Rgba;
    use crate::sim::property::EntityDesc;

    fn descs() -> EntityDescMap {
        let mut map = EntityDescMap::new();
        let mut spike = EntityDesc::new();
        spike.set_str(PropertyFlag::BASE_ENTITY, "Arrow").unwrap();
        spike.set_i32x2(PropertyFlag::POSITION, 0, 0).unwrap();
        spike.set_i32x2(PropertyFlag::VELOCITY, -100, 0).unwrap();
        spike.set_str(PropertyFlag::IMAGE_NAME, "img/spike").unwrap();
        map.insert("Spike", spike);

        let mut orb = EntityDesc::new();
        orb.set_str(PropertyFlag::BASE_ENTITY, "Ball").unwrap();
        orb.set_i32x2(PropertyFlag::VELOCITY, 80, 80).unwrap();
        map.insert("Orb", orb);

        let mut plain = EntityDesc::new();
        plain.set_i32x2(PropertyFlag::VELOCITY, 1, 1).unwrap();
        map.insert("Plain", plain);
        map
    }

    fn set() -> EntitySet {
        let mut set = EntitySet::default();
        set.push(EntitySetEntry::new("Orb", 2.0, 0.0, 50, 60));
        set.push(EntitySetEntry::new("Spike", 1.0, 45.0, 700, 300));
        set.push(EntitySetEntry::new("Ghost", 1.5, 0.0, 0, 0));
        set.push(EntitySetEntry::new("Plain", 2.0, 0.0, 1, 2));
        set
    }

    fn info() -> LevelInfo {
        LevelInfo {
            name: "Level1".into(),
            entity_set: "sets/level1".into(),
            duration: 30.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_assemble_merges_and_sorts() {
        let assets = LevelAssets::assemble(info(), &set(), &descs());
        let times: Vec<f32> = assets.entries.iter().map(|e| e.gen_time).collect();
        assert_eq!(times, vec![1.0, 2.0, 2.0]);

        let spike = &assets.entries[0];
        assert_eq!(spike.base_type, "Arrow");
        assert_eq!(spike.desc.get_i32x2(PropertyFlag::POSITION), Some((700, 300)));
        assert_eq!(spike.desc.get_f32(PropertyFlag::ROTATION), Some(45.0));

        // Equal times keep set order
        assert_eq!(assets.entries[1].base_type, "Ball");
        assert_eq!(assets.entries[1].desc.get_i32x2(PropertyFlag::POSITION), Some((50, 60)));
        assert_eq!(assets.entries[2].base_type, "Default");
    }

    #[test]
    fn test_assemble_leaves_templates_untouched() {
        let map = descs();
        LevelAssets::assemble(info(), &set(), &map);
        assert_eq!(map.get("Spike").unwrap().get_i32x2(PropertyFlag::POSITION), Some((0, 0)));
        assert!(!map.get("Orb").unwrap().contains(PropertyFlag::POSITION));
    }

    #[test]
    fn test_load_from_pack() {
        let mut pack = PackArchive::new();
        pack.insert("Level1", info().to_bytes());
        pack.insert("sets/level1", set().to_bytes().unwrap());
        pack.insert(ENTITY_DESCRIPTIONS, descs().to_bytes());
        pack.insert("img/spike", ImageFile::filled(24, 6, Rgba::new(0, 0, 0, 255)).to_bytes());
        let mut resources = PackResources::new(pack);

        let assets = LevelAssets::load(&mut resources, "Level1").unwrap();
        assert_eq!(assets.info, info());
        assert_eq!(assets.entries.len(), 3);
        let spike = &assets.entries[0].desc;
        assert!(spike.image().is_some());
        assert_eq!(spike.get_i32x2(PropertyFlag::SIZE), Some((24, 6)));
        // The level names no background or music
        assert!(assets.background.is_none());
        assert!(assets.music.is_none());
    }

    #[test]
    fn test_load_resolves_background_and_music() {
        let mut level = info();
        level.background = "img/sky".into();
        level.music = "music/level1".into();

        let mut pack = PackArchive::new();
        pack.insert("Level1", level.to_bytes());
        pack.insert("sets/level1", set().to_bytes().unwrap());
        pack.insert(ENTITY_DESCRIPTIONS, descs().to_bytes());
        pack.insert("img/sky", ImageFile::filled(800, 600, Rgba::new(20, 40, 90, 255)).to_bytes());
        pack.insert("music/level1", vec![9; 32]);
        let mut resources = PackResources::new(pack);

        let assets = LevelAssets::load(&mut resources, "Level1").unwrap();
        let sky = assets.background.unwrap();
        assert_eq!(resources.image_size(sky), Some((800, 600)));
        let music = assets.music.unwrap();
        assert_eq!(resources.sound_data(music).map(<[u8]>::len), Some(32));
    }

    #[test]
    fn test_load_missing_level() {
        let mut pack = PackArchive::new();
        pack.insert(ENTITY_DESCRIPTIONS, descs().to_bytes());
        let mut resources = PackResources::new(pack);
        assert!(matches!(
            LevelAssets::load(&mut resources, "Level9"),
            Err(crate::Error::NotFound { .. })
        ));
    }
}
