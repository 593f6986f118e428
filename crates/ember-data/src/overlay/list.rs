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

use std::sync::Arc;

use ember_core::render::StateBuffer;
use ember_core::Resolution;

use super::{Overlay, OverlayId, SpriteFactory, SPRITE_CAPABILITY};
use crate::gob::Owner;

/// An entity's overlays, in insertion order.
#[derive(Debug, Default)]
pub struct OverlayList {
    items: Vec<Overlay>,
}

impl OverlayList {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an overlay. Ids are not checked for uniqueness.
    pub fn add(&mut self, overlay: Overlay) {
        self.items.push(overlay);
    }

    /// The first overlay carrying `id`.
    pub fn find(&self, id: OverlayId) -> Option<&Overlay> {
        self.items.iter().find(|ol| ol.id == Some(id))
    }

    /// The first overlay carrying `id`, mutably.
    pub fn find_mut(&mut self, id: OverlayId) -> Option<&mut Overlay> {
        self.items.iter_mut().find(|ol| ol.id == Some(id))
    }

    /// Removes and disposes the first overlay carrying `id`.
    pub fn remove(&mut self, id: OverlayId) -> bool {
        match self.items.iter().position(|ol| ol.id == Some(id)) {
            Some(pos) => {
                self.items.remove(pos).dispose();
                true
            }
            None => false,
        }
    }

    /// Iterates the overlays in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Overlay> {
        self.items.iter()
    }

    /// Number of overlays, pending ones included.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if there are no overlays.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Builds pending sprites whose resource has loaded and advances the
    /// rest, dropping those that have finished.
    ///
    /// A finished sprite is kept when its overlay opted out of auto-expiry,
    /// unless the sprite is [`Deletable`](super::Deletable).
    pub fn tick_all(&mut self, owner: &Owner, dt: f32) {
        self.items.retain_mut(|ol| {
            let Some(sprite) = ol.sprite.as_deref_mut() else {
                return build_sprite(ol, owner);
            };
            if !sprite.tick(dt) {
                return true;
            }
            let keep = ol.no_auto_expire && sprite.as_deletable().is_none();
            if !keep {
                log::trace!("Overlay {:?} of {} expired.", ol.id, owner.id);
                ol.dispose();
            }
            keep
        });
    }

    /// Lets every sprite contribute to the entity's shared render state.
    pub fn setup_gob(&self, buf: &mut StateBuffer) {
        for ol in &self.items {
            if let Some(m) = ol.sprite().and_then(|s| s.as_setup_mod()) {
                m.setup_gob(buf);
            }
        }
    }

    /// Disposes and drops every overlay.
    pub fn dispose_all(&mut self) {
        for mut ol in self.items.drain(..) {
            ol.dispose();
        }
    }
}

/// Tries to build the sprite of a pending overlay. Returns `false` if the
/// overlay can never be built and should be dropped.
fn build_sprite(ol: &mut Overlay, owner: &Owner) -> bool {
    let Some(res) = ol.res.clone() else {
        return false;
    };
    let outcome = res.get().map(|loaded| {
        loaded
            .require::<Arc<dyn SpriteFactory>>(SPRITE_CAPABILITY)
            .map(|factory| factory.create(owner, &loaded, ol.payload.clone()))
    });
    match outcome {
        Resolution::Pending => true,
        Resolution::Ready(Ok(sprite)) => {
            ol.sprite = Some(sprite);
            true
        }
        Resolution::Ready(Err(err)) | Resolution::Failed(err) => {
            log::warn!("Dropping overlay {:?} of {}: {err}", ol.id, owner.id);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gob::{GobId, RenderCtx};
    use crate::overlay::{Deletable, Sprite};
    use ember_core::math::Vec2;
    use ember_core::render::RenderList;
    use ember_core::resource::ResourcePool;
    use ember_core::{Payload, ResId, Resource};

    /// Finishes after a scripted number of ticks, or, when deletable, only
    /// once deleted.
    struct Timed {
        left: u32,
        deletable: bool,
        deleted: bool,
    }

    impl Timed {
        fn boxed(left: u32, deletable: bool) -> Box<dyn Sprite> {
            Box::new(Self {
                left,
                deletable,
                deleted: false,
            })
        }
    }

    impl Sprite for Timed {
        fn tick(&mut self, _dt: f32) -> bool {
            self.left = self.left.saturating_sub(1);
            if self.deletable {
                self.deleted
            } else {
                self.left == 0
            }
        }
        fn setup(&self, _rl: &mut dyn RenderList, _ctx: &RenderCtx<'_>) {}
        fn as_deletable(&mut self) -> Option<&mut dyn Deletable> {
            if self.deletable {
                Some(self)
            } else {
                None
            }
        }
    }

    impl Deletable for Timed {
        fn delete(&mut self) {
            self.deleted = true;
        }
    }

    struct TimedFactory;

    impl SpriteFactory for TimedFactory {
        fn create(&self, _owner: &Owner, _res: &Resource, payload: Payload) -> Box<dyn Sprite> {
            Timed::boxed(u32::from(payload.as_bytes()[0]), false)
        }
    }

    fn owner() -> Owner {
        Owner {
            id: GobId(1),
            rc: Vec2::ZERO,
            angle: 0.0,
            is_virtual: false,
        }
    }

    #[test]
    fn test_finished_sprite_is_removed() {
        let mut list = OverlayList::new();
        list.add(Overlay::direct(Timed::boxed(2, false)));

        list.tick_all(&owner(), 0.1);
        assert_eq!(list.len(), 1);
        list.tick_all(&owner(), 0.1);
        assert!(list.is_empty());
    }

    #[test]
    fn test_no_auto_expire_without_deletable_never_self_removes() {
        let mut list = OverlayList::new();
        list.add(Overlay::direct(Timed::boxed(1, false)).with_no_auto_expire());

        for _ in 0..50 {
            list.tick_all(&owner(), 0.1);
        }

        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_no_auto_expire_deletable_leaves_once_deleted() {
        // --- 1. SETUP ---
        let mut list = OverlayList::new();
        list.add(Overlay::direct(Timed::boxed(1, true)).with_no_auto_expire());
        for _ in 0..5 {
            list.tick_all(&owner(), 0.1);
        }
        assert_eq!(list.len(), 1, "A deletable sprite runs until deleted");

        // --- 2. ACT ---
        // Deleted through the sprite's own capability, not the overlay.
        let del = list
            .items
            .first_mut()
            .and_then(|ol| ol.sprite_mut())
            .and_then(|s| s.as_deletable())
            .expect("sprite should be deletable");
        del.delete();
        list.tick_all(&owner(), 0.1);

        // --- 3. ASSERT ---
        assert!(list.is_empty());
    }

    #[test]
    fn test_resource_backed_overlay_waits_for_resource() {
        // --- 1. SETUP ---
        let pool = std::sync::Arc::new(ResourcePool::new());
        let mut list = OverlayList::new();
        list.add(Overlay::new(OverlayId(3), pool.indir(ResId(8)), Payload::from(&[2u8][..])));

        // --- 2. ACT & ASSERT ---
        list.tick_all(&owner(), 0.1);
        assert!(list.find(OverlayId(3)).unwrap().is_pending());

        let factory: Arc<dyn SpriteFactory> = Arc::new(TimedFactory);
        pool.insert(ResId(8), Resource::new("gfx/fx/dust", 1).publish(factory));
        list.tick_all(&owner(), 0.1);
        assert!(!list.find(OverlayId(3)).unwrap().is_pending());

        list.tick_all(&owner(), 0.1);
        list.tick_all(&owner(), 0.1);
        assert!(list.find(OverlayId(3)).is_none());
    }

    #[test]
    fn test_overlay_without_factory_is_dropped() {
        let pool = std::sync::Arc::new(ResourcePool::new());
        pool.insert(ResId(8), Resource::new("gfx/fx/plain", 1));
        let mut list = OverlayList::new();
        list.add(Overlay::new(OverlayId(1), pool.indir(ResId(8)), Payload::empty()));

        list.tick_all(&owner(), 0.1);

        assert!(list.is_empty());
    }

    #[test]
    fn test_remove_by_id() {
        let mut list = OverlayList::new();
        let pool = std::sync::Arc::new(ResourcePool::new());
        list.add(Overlay::new(OverlayId(4), pool.indir(ResId(1)), Payload::empty()));

        assert!(!list.remove(OverlayId(5)));
        assert!(list.remove(OverlayId(4)));
        assert!(list.is_empty());
    }

    #[test]
    fn test_update_rebuilds_sprite_that_is_not_updatable() {
        // --- 1. SETUP ---
        let pool = std::sync::Arc::new(ResourcePool::new());
        let factory: Arc<dyn SpriteFactory> = Arc::new(TimedFactory);
        pool.insert(ResId(8), Resource::new("gfx/fx/dust", 1).publish(factory));
        let mut list = OverlayList::new();
        list.add(Overlay::new(OverlayId(2), pool.indir(ResId(8)), Payload::from(&[9u8][..])));
        list.tick_all(&owner(), 0.1);
        assert!(!list.find(OverlayId(2)).unwrap().is_pending());

        // --- 2. ACT ---
        let ol = list.find_mut(OverlayId(2)).unwrap();
        ol.update(Payload::from(&[1u8][..]));
        assert!(!ol.request_delete(), "An overlay without a sprite cannot be asked to finish");

        // --- 3. ASSERT ---
        let ol = list.find(OverlayId(2)).unwrap();
        assert!(ol.is_pending(), "The old sprite is dropped until the next tick");
        assert_eq!(ol.payload(), &Payload::from(&[1u8][..]));

        // Rebuilt from the new payload, the sprite now finishes on its first tick.
        list.tick_all(&owner(), 0.1);
        list.tick_all(&owner(), 0.1);
        assert!(list.is_empty());
    }
}
