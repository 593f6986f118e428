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

//! Transient visuals attached to an entity.
//!
//! An [`Overlay`] either wraps a sprite that already exists, or names a
//! resource whose published [`SpriteFactory`] builds the sprite once the
//! resource has loaded. Sprites advertise optional capabilities through the
//! `as_*` accessors on [`Sprite`].

mod list;
pub mod path;

pub use list::OverlayList;

use std::fmt;

use ember_core::render::{RenderList, StateBuffer};
use ember_core::{Indir, Payload, Resource};

use crate::attr::AsAny;
use crate::gob::{Owner, RenderCtx};

/// Name of the capability resources publish their sprite factory under.
pub const SPRITE_CAPABILITY: &str = "spr";

/// Identifier of an overlay, unique among one entity's overlays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OverlayId(pub i32);

/// A visual instance that ticks on its own.
pub trait Sprite: AsAny + Send {
    /// Advances the sprite by `dt` seconds. Returns `true` once it has
    /// finished.
    fn tick(&mut self, dt: f32) -> bool;

    /// Contributes the sprite to the render list.
    fn setup(&self, rl: &mut dyn RenderList, ctx: &RenderCtx<'_>);

    /// Releases whatever the sprite holds.
    fn dispose(&mut self) {}

    /// Explicit-deletion capability.
    fn as_deletable(&mut self) -> Option<&mut dyn Deletable> {
        None
    }

    /// In-place payload update capability.
    fn as_updatable(&mut self) -> Option<&mut dyn Updatable> {
        None
    }

    /// Shared render state capability.
    fn as_setup_mod(&self) -> Option<&dyn SetupMod> {
        None
    }
}

/// A sprite that finishes only when asked to.
pub trait Deletable {
    /// Asks the sprite to wind down; it reports finished on a later tick.
    fn delete(&mut self);
}

/// A sprite that can take a new payload without being rebuilt.
pub trait Updatable {
    /// Applies `payload`.
    fn update(&mut self, payload: &Payload);
}

/// A sprite that contributes to the entity's shared render state.
pub trait SetupMod {
    /// Adds to the per-entity state applied before anything is drawn.
    fn setup_gob(&self, buf: &mut StateBuffer);
    /// Adds to the main render list after every overlay has been added.
    fn setup_main(&self, rl: &mut dyn RenderList, ctx: &RenderCtx<'_>);
}

/// Factory code published by a resource.
pub trait SpriteFactory: Send + Sync {
    /// Builds a sprite for `owner` from `res` and `payload`.
    fn create(&self, owner: &Owner, res: &Resource, payload: Payload) -> Box<dyn Sprite>;
}

/// A transient visual attached to an entity.
pub struct Overlay {
    id: Option<OverlayId>,
    res: Option<Indir>,
    payload: Payload,
    sprite: Option<Box<dyn Sprite>>,
    no_auto_expire: bool,
}

impl Overlay {
    /// An overlay whose sprite is built from `res` once it loads.
    pub fn new(id: OverlayId, res: Indir, payload: Payload) -> Self {
        Self {
            id: Some(id),
            res: Some(res),
            payload,
            sprite: None,
            no_auto_expire: false,
        }
    }

    /// An overlay around an existing sprite. It has no id.
    pub fn direct(sprite: Box<dyn Sprite>) -> Self {
        Self {
            id: None,
            res: None,
            payload: Payload::empty(),
            sprite: Some(sprite),
            no_auto_expire: false,
        }
    }

    /// Ignores natural completion: the overlay stays until its sprite is
    /// [`Deletable`] and reports finished, which such a sprite does once
    /// deleted.
    pub fn with_no_auto_expire(mut self) -> Self {
        self.no_auto_expire = true;
        self
    }

    /// The overlay id, `None` for direct overlays.
    pub fn id(&self) -> Option<OverlayId> {
        self.id
    }

    /// The resource the sprite is built from.
    pub fn res(&self) -> Option<&Indir> {
        self.res.as_ref()
    }

    /// The payload the sprite is built from.
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Returns `true` while the sprite has not been built yet.
    pub fn is_pending(&self) -> bool {
        self.sprite.is_none()
    }

    /// Whether natural completion is ignored.
    pub fn no_auto_expire(&self) -> bool {
        self.no_auto_expire
    }

    /// The sprite, once built.
    pub fn sprite(&self) -> Option<&dyn Sprite> {
        self.sprite.as_deref()
    }

    /// The sprite, mutably.
    pub fn sprite_mut(&mut self) -> Option<&mut dyn Sprite> {
        let sprite: &mut dyn Sprite = self.sprite.as_deref_mut()?;
        Some(sprite)
    }

    /// Applies a new payload: in place if the sprite is [`Updatable`],
    /// otherwise by rebuilding the sprite on the next tick.
    pub fn update(&mut self, payload: Payload) {
        if let Some(up) = self.sprite.as_deref_mut().and_then(|s| s.as_updatable()) {
            up.update(&payload);
            self.payload = payload;
            return;
        }
        self.payload = payload;
        if self.res.is_some() {
            if let Some(mut old) = self.sprite.take() {
                old.dispose();
            }
        }
    }

    /// Asks a [`Deletable`] sprite to finish. Returns `false` if the sprite
    /// does not support explicit deletion or is not built yet.
    pub fn request_delete(&mut self) -> bool {
        match self.sprite.as_deref_mut().and_then(|s| s.as_deletable()) {
            Some(del) => {
                del.delete();
                true
            }
            None => false,
        }
    }

    /// Contributes the sprite, if built.
    pub fn setup(&self, rl: &mut dyn RenderList, ctx: &RenderCtx<'_>) {
        if let Some(sprite) = &self.sprite {
            sprite.setup(rl, ctx);
        }
    }

    pub(crate) fn dispose(&mut self) {
        if let Some(mut sprite) = self.sprite.take() {
            sprite.dispose();
        }
    }
}

impl fmt::Debug for Overlay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Overlay")
            .field("id", &self.id)
            .field("res", &self.res)
            .field("pending", &self.sprite.is_none())
            .field("no_auto_expire", &self.no_auto_expire)
            .finish()
    }
}
