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

//! Debug trail showing where moving entities are heading.
//!
//! [`PathTracker`] listens for changes to the movement slot. While
//! `show_gob_paths` is on, installing a movement attribute creates (or
//! extends) a [`GobPath`] overlay; removing it stops the trail, which then
//! expires on the next tick.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use ember_core::math::{Mat4, Vec2};
use ember_core::render::{NodeKind, RenderList, RenderNode};

use super::{Overlay, Sprite};
use crate::attr::{AttrSlot, AttributeEvent, AttributeObserver, ObserverCtx};
use crate::gob::RenderCtx;

#[derive(Debug, Default)]
struct Trail {
    waypoints: Vec<Vec2>,
    stopped: bool,
}

fn lock(trail: &Mutex<Trail>) -> MutexGuard<'_, Trail> {
    trail.lock().unwrap_or_else(PoisonError::into_inner)
}

/// The trail sprite.
#[derive(Debug)]
pub struct GobPath {
    trail: Arc<Mutex<Trail>>,
}

impl GobPath {
    /// Destinations recorded so far.
    pub fn waypoints(&self) -> Vec<Vec2> {
        lock(&self.trail).waypoints.clone()
    }

    /// Whether the movement this trail follows has ended.
    pub fn is_stopped(&self) -> bool {
        lock(&self.trail).stopped
    }
}

impl Sprite for GobPath {
    fn tick(&mut self, _dt: f32) -> bool {
        self.is_stopped()
    }

    fn setup(&self, rl: &mut dyn RenderList, ctx: &RenderCtx<'_>) {
        let Some(target) = ctx.attrs.moving().and_then(|m| m.destination()) else {
            return;
        };
        let from = ctx.binding.translation().truncate();
        rl.add(
            RenderNode::new(format!("path:{}", ctx.owner.id), NodeKind::Effect).with_transform(
                Mat4::from_translation(Vec2::lerp(from, target, 0.5).extend(0.0)),
            ),
        );
    }
}

/// Keeps a [`GobPath`] overlay in step with the entity's movement slot.
#[derive(Debug, Default)]
pub struct PathTracker {
    trail: Option<Arc<Mutex<Trail>>>,
}

impl PathTracker {
    /// Creates a tracker with no trail.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a trail is currently being extended.
    pub fn is_tracking(&self) -> bool {
        self.trail.is_some()
    }
}

impl AttributeObserver for PathTracker {
    fn notify(&mut self, event: &AttributeEvent<'_>, ctx: &mut ObserverCtx<'_>) {
        if event.slot() != AttrSlot::Moving {
            return;
        }
        match event {
            AttributeEvent::Set { attr, .. } => {
                if !ctx.settings.show_gob_paths() {
                    return;
                }
                let trail = self.trail.get_or_insert_with(|| {
                    let trail = Arc::new(Mutex::new(Trail::default()));
                    ctx.overlays.add(Overlay::direct(Box::new(GobPath {
                        trail: Arc::clone(&trail),
                    })));
                    trail
                });
                if let Some(dest) = attr.as_moving().and_then(|m| m.destination()) {
                    lock(trail).waypoints.push(dest);
                }
            }
            AttributeEvent::Removed(_) => {
                if let Some(trail) = self.trail.take() {
                    lock(&trail).stopped = true;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attr::kinds::LinMove;
    use crate::attr::AsAny;
    use crate::overlay::OverlayList;
    use ember_core::GobSettings;

    fn set_event(m: &LinMove) -> AttributeEvent<'_> {
        AttributeEvent::Set {
            slot: AttrSlot::Moving,
            attr: m,
        }
    }

    #[test]
    fn test_disabled_setting_adds_nothing() {
        let settings = GobSettings::new();
        let mut overlays = OverlayList::new();
        let mut tracker = PathTracker::new();
        let m = LinMove::new(Vec2::ZERO, Vec2::new(3.0, 0.0), 1.0);

        tracker.notify(
            &set_event(&m),
            &mut ObserverCtx {
                overlays: &mut overlays,
                settings: &settings,
            },
        );

        assert!(overlays.is_empty());
        assert!(!tracker.is_tracking());
    }

    #[test]
    fn test_trail_is_shared_across_moves_and_stopped_on_remove() {
        // --- 1. SETUP ---
        let settings = GobSettings::new();
        settings.set_show_gob_paths(true);
        let mut overlays = OverlayList::new();
        let mut tracker = PathTracker::new();
        let first = LinMove::new(Vec2::ZERO, Vec2::new(3.0, 0.0), 1.0);
        let second = LinMove::new(Vec2::ZERO, Vec2::new(0.0, 4.0), 1.0);

        // --- 2. ACT ---
        for m in [&first, &second] {
            tracker.notify(
                &set_event(m),
                &mut ObserverCtx {
                    overlays: &mut overlays,
                    settings: &settings,
                },
            );
        }

        // --- 3. ASSERT ---
        assert_eq!(overlays.len(), 1, "One trail per movement history");
        let path = overlays
            .iter()
            .next()
            .and_then(|ol| ol.sprite())
            .and_then(|s| s.as_any().downcast_ref::<GobPath>())
            .expect("trail overlay should hold a GobPath");
        assert_eq!(
            path.waypoints(),
            vec![Vec2::new(3.0, 0.0), Vec2::new(0.0, 4.0)]
        );
        let trail = Arc::clone(&path.trail);

        tracker.notify(
            &AttributeEvent::Removed(AttrSlot::Moving),
            &mut ObserverCtx {
                overlays: &mut overlays,
                settings: &settings,
            },
        );
        assert!(!tracker.is_tracking());
        assert!(lock(&trail).stopped);
    }
}
