//! Timed spawn scheduler
//!
//! Entities are built up front when added and handed out one at a time as
//! the level clock passes their spawn time. The scheduler owns the clock; the
//! game loop reads elapsed time through it.
//!
//! Release moves the entity out of its slot, so rewinding with
//! [`EntityGen::reset_gen`] walks past slots that were already consumed
//! instead of handing the same entity out twice.

use super::entity::Entity;
use super::factory::EntityFactory;
use super::property::EntityDesc;
use crate::platform::Clock;

/// One scheduled spawn before it has been built
#[derive(Debug, Clone)]
pub struct EntityCreateEntry {
    /// Level time of the spawn
    pub gen_time: f32,
    /// Factory dispatch name
    pub base_type: String,
    pub desc: EntityDesc,
}

/// Scheduler state as seen through its clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenState {
    Idle,
    Running,
    Paused,
}

#[derive(Debug)]
struct GenSlot {
    gen_time: f32,
    /// `None` once released
    entity: Option<Entity>,
}

pub struct EntityGen<C: Clock> {
    clock: C,
    factory: EntityFactory,
    slots: Vec<GenSlot>,
    cursor: usize,
}

impl<C: Clock> EntityGen<C> {
    pub fn new(clock: C, factory: EntityFactory) -> Self {
        Self {
            clock,
            factory,
            slots: Vec::new(),
            cursor: 0,
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    pub fn elapsed(&self) -> f32 {
        self.clock.elapsed()
    }

    pub fn state(&self) -> GenState {
        if self.clock.is_paused() {
            GenState::Paused
        } else if self.clock.is_started() {
            GenState::Running
        } else {
            GenState::Idle
        }
    }

    /// Scheduled slots, released or not
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Entities still held (not yet released)
    pub fn held(&self) -> usize {
        self.slots.iter().filter(|s| s.entity.is_some()).count()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Build the entity now and schedule it. Rewinds the read cursor.
    ///
    /// Entries are expected in non-decreasing `gen_time`; one that arrives
    /// early is inserted after every slot with an equal or earlier time.
    pub fn add_entity(&mut self, entry: &EntityCreateEntry) {
        let entity = self
            .factory
            .create(&entry.base_type, &entry.desc, entry.gen_time);

        let pos = self
            .slots
            .partition_point(|s| s.gen_time <= entry.gen_time);
        if pos != self.slots.len() {
            log::warn!(
                "spawn at t={} added out of order, inserting at slot {}",
                entry.gen_time,
                pos
            );
        }
        self.slots.insert(
            pos,
            GenSlot {
                gen_time: entry.gen_time,
                entity: Some(entity),
            },
        );
        self.cursor = 0;
    }

    /// Release the next due entity, at most one per call.
    ///
    /// Returns `None` while paused, when nothing is due yet, or when every
    /// slot has been consumed.
    pub fn gen_entity(&mut self) -> Option<Entity> {
        if self.clock.is_paused() {
            return None;
        }
        let now = self.clock.elapsed();

        while let Some(slot) = self.slots.get_mut(self.cursor) {
            if now < slot.gen_time {
                return None;
            }
            self.cursor += 1;
            if let Some(entity) = slot.entity.take() {
                log::debug!("released {} at t={:.2}", entity.kind().as_str(), now);
                return Some(entity);
            }
        }
        None
    }

    /// Restart the clock from zero; the cursor is left alone
    pub fn start_gen(&mut self) {
        self.clock.reset();
        self.clock.start();
    }

    pub fn stop_gen(&mut self) {
        self.clock.stop();
    }

    pub fn pause_gen(&mut self) {
        self.clock.pause();
    }

    pub fn resume_gen(&mut self) {
        self.clock.unpause();
    }

    /// Stop the clock and rewind the cursor. Released entities stay released.
    pub fn reset_gen(&mut self) {
        self.clock.reset();
        self.cursor = 0;
    }

    /// Drop every entity still held and forget all slots
    pub fn clear_gen(&mut self) {
        let dropped = self.held();
        self.slots.clear();
        self.cursor = 0;
        if dropped > 0 {
            log::debug!("cleared {} unreleased entities", dropped);
        }
    }
}
