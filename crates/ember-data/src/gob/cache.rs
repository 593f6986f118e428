// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::collections::BTreeMap;
use std::sync::Arc;

use ember_core::event::EventBus;
use ember_core::math::Vec2;
use ember_core::render::{RenderList, ViewState};
use ember_core::world::GroundQuery;
use ember_core::GobSettings;

use super::{Glob, Gob, GobEvent, GobId};
use crate::attr::kinds::IconPalette;
use crate::error::GobError;

/// Owns the entities of one world, keyed by id.
///
/// Entities are visited in id order, so virtual entities (negative ids) are
/// ticked and drawn before server-backed ones.
pub struct GobCache {
    glob: Arc<Glob>,
    bus: EventBus<GobEvent>,
    gobs: BTreeMap<GobId, Gob>,
    next_virtual: i64,
}

impl GobCache {
    /// Creates an empty cache with an empty icon palette.
    pub fn new(ground: Arc<dyn GroundQuery>, settings: Arc<GobSettings>) -> Self {
        Self::with_palette(ground, settings, IconPalette::default())
    }

    /// Creates an empty cache whose entities use `palette` for custom icons.
    pub fn with_palette(
        ground: Arc<dyn GroundQuery>,
        settings: Arc<GobSettings>,
        palette: IconPalette,
    ) -> Self {
        let bus = EventBus::new();
        let glob = Arc::new(Glob::new(ground, settings, palette, bus.sender()));
        Self {
            glob,
            bus,
            gobs: BTreeMap::new(),
            next_virtual: -1,
        }
    }

    /// The context shared by this cache's entities.
    pub fn glob(&self) -> &Arc<Glob> {
        &self.glob
    }

    /// Creates the server-backed entity `id`, replacing (and disposing) any
    /// entity already known under that id.
    pub fn spawn(&mut self, id: GobId, rc: Vec2, frame: i32) -> &mut Gob {
        let gob = Gob::new(Arc::clone(&self.glob), rc, id, frame);
        self.insert(gob)
    }

    /// Creates a virtual entity under a fresh local id.
    pub fn spawn_virtual(&mut self, rc: Vec2) -> &mut Gob {
        let id = GobId(self.next_virtual);
        self.next_virtual -= 1;
        let gob = Gob::new_virtual(Arc::clone(&self.glob), rc, id);
        self.insert(gob)
    }

    fn insert(&mut self, gob: Gob) -> &mut Gob {
        let id = gob.id();
        if let Some(mut old) = self.gobs.remove(&id) {
            log::warn!("Entity {id} created twice; dropping the old one.");
            old.dispose();
        }
        self.gobs.entry(id).or_insert(gob)
    }

    /// The entity `id`.
    pub fn get(&self, id: GobId) -> Option<&Gob> {
        self.gobs.get(&id)
    }

    /// The entity `id`, mutably.
    pub fn get_mut(&mut self, id: GobId) -> Option<&mut Gob> {
        self.gobs.get_mut(&id)
    }

    /// Disposes and forgets the entity `id`. Returns `false` if unknown.
    pub fn remove(&mut self, id: GobId) -> bool {
        match self.gobs.remove(&id) {
            Some(mut gob) => {
                gob.dispose();
                true
            }
            None => false,
        }
    }

    /// Number of entities.
    pub fn len(&self) -> usize {
        self.gobs.len()
    }

    /// Returns `true` if there are no entities.
    pub fn is_empty(&self) -> bool {
        self.gobs.is_empty()
    }

    /// Iterates the entities in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Gob> {
        self.gobs.values()
    }

    /// Ticks every entity.
    ///
    /// # Errors
    ///
    /// Returns the first entity error once every entity has been ticked.
    pub fn tick_all(&mut self, dt: f32) -> Result<(), GobError> {
        let mut first = None;
        for gob in self.gobs.values_mut() {
            if let Err(err) = gob.tick(dt) {
                first.get_or_insert(err);
            }
        }
        first.map_or(Ok(()), Err)
    }

    /// Contributes every entity to a render pass.
    pub fn render_all(&mut self, view: &ViewState, rl: &mut dyn RenderList) {
        for gob in self.gobs.values_mut() {
            gob.render_setup(view, rl);
        }
    }

    /// Drops the virtual entities that asked to be reclaimed and returns
    /// their ids.
    pub fn reclaim(&mut self) -> Vec<GobId> {
        let mut reclaimed = Vec::new();
        for event in self.bus.drain() {
            let GobEvent::Reclaim(id) = event;
            let Some(gob) = self.gobs.get(&id) else {
                continue;
            };
            if !gob.is_virtual() || !gob.overlays().is_empty() {
                continue;
            }
            self.remove(id);
            log::debug!("Reclaimed virtual entity {id}.");
            reclaimed.push(id);
        }
        reclaimed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_core::world::FlatGround;

    fn cache() -> GobCache {
        GobCache::new(Arc::new(FlatGround(0.0)), Arc::new(GobSettings::new()))
    }

    #[test]
    fn test_virtual_ids_are_negative_and_unique() {
        let mut cache = cache();
        let a = cache.spawn_virtual(Vec2::ZERO).id();
        let b = cache.spawn_virtual(Vec2::ZERO).id();

        assert!(a.is_local() && b.is_local());
        assert_ne!(a, b);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_empty_virtual_entity_is_reclaimed_after_tick() {
        // --- 1. SETUP ---
        let mut cache = cache();
        let id = cache.spawn_virtual(Vec2::new(1.0, 1.0)).id();
        cache.spawn(GobId(5), Vec2::new(2.0, 2.0), 0);

        // --- 2. ACT ---
        cache.tick_all(0.05).unwrap();
        let reclaimed = cache.reclaim();

        // --- 3. ASSERT ---
        assert_eq!(reclaimed, vec![id]);
        assert!(cache.get(id).is_none());
        assert!(cache.get(GobId(5)).is_some(), "Server entities are never reclaimed");
    }

    #[test]
    fn test_respawn_replaces_entity() {
        let mut cache = cache();
        cache.spawn(GobId(1), Vec2::new(1.0, 0.0), 0);
        cache.spawn(GobId(1), Vec2::new(2.0, 0.0), 3);

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(GobId(1)).map(Gob::frame), Some(3));
        assert!(cache.remove(GobId(1)));
        assert!(!cache.remove(GobId(1)));
    }
}
