//! One playthrough of a level
//!
//! Each frame: read input, drain every due spawn from the scheduler, update
//! entities against the clock, drop dead ones, then test the balloon.

use glam::Vec2;

use super::entity::{Entity, EntityKind};
use super::entity_gen::EntityGen;
use super::factory::EntityFactory;
use super::level::LevelAssets;
use crate::audio::{AudioManager, SoundHandle};
use crate::persistence::LevelInfo;
use crate::platform::{Clock, InputState};
use crate::renderer::{Canvas, DrawParams, ImageHandle, colors};

/// Session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Built but not entered
    Ready,
    Playing,
    Paused,
    /// Balloon was hit
    Popped,
    /// Survived the full duration
    Completed,
    /// Torn down; nothing more happens
    Exited,
}

/// Things the caller reacts to (sounds, state changes, saving)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionEvent {
    Spawned(EntityKind),
    Hit(EntityKind),
    Completed,
}

pub struct LevelSession<C: Clock> {
    info: LevelInfo,
    generator: EntityGen<C>,
    /// Active entities in spawn order
    entities: Vec<Entity>,
    balloon: Vec2,
    balloon_radius: f32,
    bounds: Vec2,
    background: Option<ImageHandle>,
    music: Option<SoundHandle>,
    phase: SessionPhase,
}

impl<C: Clock> LevelSession<C> {
    /// Build every entity up front and schedule it
    pub fn new(assets: &LevelAssets, clock: C, factory: EntityFactory, balloon_radius: f32) -> Self {
        let bounds = factory.bounds();
        let mut generator = EntityGen::new(clock, factory);
        for entry in &assets.entries {
            generator.add_entity(entry);
        }
        Self {
            info: assets.info.clone(),
            generator,
            entities: Vec::new(),
            balloon: bounds * 0.5,
            balloon_radius,
            bounds,
            background: assets.background,
            music: assets.music,
            phase: SessionPhase::Ready,
        }
    }

    pub fn info(&self) -> &LevelInfo {
        &self.info
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn balloon(&self) -> Vec2 {
        self.balloon
    }

    pub fn elapsed(&self) -> f32 {
        self.generator.elapsed()
    }

    pub fn generator(&self) -> &EntityGen<C> {
        &self.generator
    }

    pub fn clock_mut(&mut self) -> &mut C {
        self.generator.clock_mut()
    }

    /// Start the level clock from zero and the level's music
    pub fn enter(&mut self, audio: &mut AudioManager) {
        if let Some(track) = self.music {
            audio.play_music(track);
        }
        self.generator.start_gen();
        self.phase = SessionPhase::Playing;
        log::info!("entering level '{}'", self.info.name);
    }

    pub fn pause(&mut self) {
        if self.phase == SessionPhase::Playing {
            self.generator.pause_gen();
            self.phase = SessionPhase::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.phase == SessionPhase::Paused {
            self.generator.resume_gen();
            self.phase = SessionPhase::Playing;
        }
    }

    /// Advance one frame
    pub fn update(&mut self, input: &InputState, audio: &mut AudioManager) -> Vec<SessionEvent> {
        let mut events = Vec::new();

        if input.quit {
            self.exit(audio);
            return events;
        }
        if input.pause {
            match self.phase {
                SessionPhase::Playing => self.pause(),
                SessionPhase::Paused => self.resume(),
                _ => {}
            }
        }
        if self.phase != SessionPhase::Playing {
            return events;
        }

        self.balloon = input.mouse_pos.clamp(Vec2::ZERO, self.bounds);

        while let Some(entity) = self.generator.gen_entity() {
            entity.play_spawn_sound(audio);
            events.push(SessionEvent::Spawned(entity.kind()));
            self.entities.push(entity);
        }

        let now = self.generator.elapsed();
        for entity in &mut self.entities {
            entity.update(now);
        }
        self.entities.retain(Entity::is_alive);

        if let Some(hit) = self
            .entities
            .iter()
            .find(|e| e.collides_with_circle(self.balloon, self.balloon_radius))
        {
            log::info!("balloon hit by {} at t={:.2}", hit.kind().as_str(), now);
            events.push(SessionEvent::Hit(hit.kind()));
            self.generator.pause_gen();
            self.phase = SessionPhase::Popped;
        } else if self.info.duration > 0.0 && now >= self.info.duration {
            log::info!("level '{}' completed", self.info.name);
            events.push(SessionEvent::Completed);
            self.generator.pause_gen();
            self.phase = SessionPhase::Completed;
        }

        events
    }

    /// Background, entities in spawn order, then the time readout
    pub fn draw(&self, canvas: &mut dyn Canvas) {
        if let Some(background) = self.background {
            canvas.draw_image(background, Vec2::ZERO, DrawParams::default());
        }
        for entity in &self.entities {
            entity.draw(canvas);
        }
        let remaining = (self.info.duration - self.generator.elapsed()).max(0.0);
        canvas.draw_text(&format!("{remaining:.1}"), Vec2::new(8.0, 8.0), colors::HUD_TEXT);
    }

    /// Drop live and pending entities, stop the clock and the music
    pub fn exit(&mut self, audio: &mut AudioManager) {
        if self.phase == SessionPhase::Exited {
            return;
        }
        if self.music.is_some() {
            audio.stop_music();
        }
        self.entities.clear();
        self.generator.clear_gen();
        self.generator.stop_gen();
        self.phase = SessionPhase::Exited;
        log::debug!("left level '{}'", self.info.name);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::audio::{AudioOut, RecordingAudio};
    use crate::platform::ManualClock;
    use crate::renderer::{DrawCommand, RecordingCanvas};
    use crate::sim::entity_gen::EntityCreateEntry;
    use crate::sim::property::{EntityDesc, Handle, PropertyFlag};

    /// Recording backend the test keeps a handle to
    struct SharedAudio(Rc<RefCell<RecordingAudio>>);

    impl AudioOut for SharedAudio {
        fn play_sound(&mut self, sound: SoundHandle, volume: f32) {
            self.0.borrow_mut().play_sound(sound, volume);
        }
        fn play_music(&mut self, track: SoundHandle, volume: f32) {
            self.0.borrow_mut().play_music(track, volume);
        }
        fn stop_music(&mut self) {
            self.0.borrow_mut().stop_music();
        }
    }

    fn recording_audio() -> (AudioManager, Rc<RefCell<RecordingAudio>>) {
        let rec = Rc::new(RefCell::new(RecordingAudio::default()));
        (AudioManager::new(Box::new(SharedAudio(rec.clone()))), rec)
    }

    fn arrow_at(t: f32, x: i32, y: i32, vx: i32) -> EntityCreateEntry {
        let mut desc = EntityDesc::new();
        desc.set_i32x2(PropertyFlag::POSITION, x, y).unwrap();
        desc.set_i32x2(PropertyFlag::VELOCITY, vx, 0).unwrap();
        desc.set_handle(PropertyFlag::SOUND, Handle(3)).unwrap();
        EntityCreateEntry {
            gen_time: t,
            base_type: "Arrow".into(),
            desc,
        }
    }

    fn session(entries: Vec<EntityCreateEntry>, duration: f32) -> LevelSession<ManualClock> {
        let assets = LevelAssets {
            info: LevelInfo {
                name: "Test".into(),
                duration,
                ..Default::default()
            },
            entries,
            background: None,
            music: None,
        };
        let factory = EntityFactory::new(Vec2::new(800.0, 600.0), 0.01, 7);
        LevelSession::new(&assets, ManualClock::new(), factory, 20.0)
    }

    fn hold(x: f32, y: f32) -> InputState {
        InputState {
            mouse_pos: Vec2::new(x, y),
            ..Default::default()
        }
    }

    #[test]
    fn test_spawns_then_hit() {
        let mut s = session(vec![arrow_at(1.0, 700, 300, -100)], 60.0);
        let (mut audio, rec) = recording_audio();
        s.enter(&mut audio);

        assert!(s.update(&hold(400.0, 316.0), &mut audio).is_empty());
        s.clock_mut().advance(1.0);
        assert_eq!(
            s.update(&hold(400.0, 316.0), &mut audio),
            vec![SessionEvent::Spawned(EntityKind::Arrow)]
        );
        assert_eq!(rec.borrow().sounds.len(), 1);
        assert_eq!(rec.borrow().sounds[0].0, SoundHandle(3));
        assert_eq!(s.entities().len(), 1);

        s.clock_mut().advance(1.0);
        assert!(s.update(&hold(400.0, 316.0), &mut audio).is_empty());

        // Arrow's left edge reaches the balloon's right edge at t=3.8
        s.clock_mut().advance(2.0);
        assert_eq!(
            s.update(&hold(400.0, 316.0), &mut audio),
            vec![SessionEvent::Hit(EntityKind::Arrow)]
        );
        assert_eq!(s.phase(), SessionPhase::Popped);
        s.clock_mut().advance(1.0);
        assert!(s.update(&hold(400.0, 316.0), &mut audio).is_empty());
    }

    #[test]
    fn test_drains_backlog_in_one_frame() {
        let entries = (0..4).map(|i| arrow_at(i as f32 * 0.1, 10, 10, 0)).collect();
        let mut s = session(entries, 60.0);
        let mut audio = AudioManager::default();
        s.enter(&mut audio);
        s.clock_mut().advance(1.0);
        let events = s.update(&hold(700.0, 500.0), &mut audio);
        assert_eq!(events.len(), 4);
        assert_eq!(s.entities().len(), 4);
    }

    #[test]
    fn test_completes_after_duration() {
        let mut s = session(Vec::new(), 5.0);
        let mut audio = AudioManager::default();
        s.enter(&mut audio);
        s.clock_mut().advance(4.9);
        assert!(s.update(&hold(0.0, 0.0), &mut audio).is_empty());
        s.clock_mut().advance(0.1);
        assert_eq!(s.update(&hold(0.0, 0.0), &mut audio), vec![SessionEvent::Completed]);
        assert_eq!(s.phase(), SessionPhase::Completed);
    }

    #[test]
    fn test_pause_toggle_freezes_level() {
        let mut s = session(vec![arrow_at(1.0, 10, 10, 0)], 60.0);
        let mut audio = AudioManager::default();
        s.enter(&mut audio);
        let toggle = InputState {
            pause: true,
            ..Default::default()
        };
        s.update(&toggle, &mut audio);
        assert_eq!(s.phase(), SessionPhase::Paused);
        s.clock_mut().advance(5.0);
        assert!(s.update(&hold(700.0, 500.0), &mut audio).is_empty());
        assert_eq!(s.elapsed(), 0.0);

        s.update(&toggle, &mut audio);
        assert_eq!(s.phase(), SessionPhase::Playing);
        s.clock_mut().advance(1.0);
        assert_eq!(s.update(&hold(700.0, 500.0), &mut audio).len(), 1);
    }

    #[test]
    fn test_offscreen_entities_are_dropped() {
        let mut s = session(vec![arrow_at(0.0, 780, 100, 500)], 60.0);
        let mut audio = AudioManager::default();
        s.enter(&mut audio);
        s.update(&hold(100.0, 500.0), &mut audio);
        assert_eq!(s.entities().len(), 1);
        s.clock_mut().advance(1.0);
        s.update(&hold(100.0, 500.0), &mut audio);
        assert!(s.entities().is_empty());
    }

    #[test]
    fn test_quit_tears_down() {
        let mut s = session(vec![arrow_at(0.0, 10, 10, 0), arrow_at(9.0, 10, 10, 0)], 60.0);
        let mut audio = AudioManager::default();
        s.enter(&mut audio);
        s.update(&hold(700.0, 500.0), &mut audio);
        assert_eq!(s.entities().len(), 1);

        let quit = InputState {
            quit: true,
            ..Default::default()
        };
        s.update(&quit, &mut audio);
        assert_eq!(s.phase(), SessionPhase::Exited);
        assert!(s.entities().is_empty());
        assert!(s.generator().is_empty());
    }

    #[test]
    fn test_draw_shows_time_left() {
        let mut s = session(Vec::new(), 10.0);
        s.enter(&mut AudioManager::default());
        s.clock_mut().advance(2.5);
        let mut canvas = RecordingCanvas::new();
        s.draw(&mut canvas);
        assert!(matches!(
            &canvas.commands[..],
            [DrawCommand::Text { text, .. }] if text == "7.5"
        ));
    }

    #[test]
    fn test_music_and_background_follow_the_level() {
        let assets = LevelAssets {
            info: LevelInfo {
                name: "Sky".into(),
                duration: 10.0,
                ..Default::default()
            },
            entries: vec![arrow_at(0.0, 10, 10, 0)],
            background: Some(ImageHandle(6)),
            music: Some(SoundHandle(8)),
        };
        let factory = EntityFactory::new(Vec2::new(800.0, 600.0), 0.01, 7);
        let mut s = LevelSession::new(&assets, ManualClock::new(), factory, 20.0);
        let (mut audio, rec) = recording_audio();

        s.enter(&mut audio);
        assert_eq!(rec.borrow().music, Some(SoundHandle(8)));
        s.update(&hold(700.0, 500.0), &mut audio);

        let mut canvas = RecordingCanvas::new();
        s.draw(&mut canvas);
        match canvas.commands.first() {
            Some(DrawCommand::Image { image, pos, .. }) => {
                assert_eq!(*image, ImageHandle(6));
                assert_eq!(*pos, Vec2::ZERO);
            }
            other => panic!("background not drawn first: {other:?}"),
        }

        s.exit(&mut audio);
        assert_eq!(rec.borrow().music, None);
    }
}
