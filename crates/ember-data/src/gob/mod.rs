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

//! The game object and the state it shares with the rest of the client.

mod binding;
mod cache;
mod glob;
mod owner;

pub use binding::{RenderBinding, RenderCtx};
pub use cache::GobCache;
pub use glob::{Glob, GobEvent};
pub use owner::{GobId, Owner};

use std::sync::Arc;

use ember_core::math::{Vec2, Vec3};
use ember_core::render::{RenderList, StateBuffer, ViewState};
use ember_core::{Indir, Payload, Resolution};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::attr::kinds::{
    CustomGobIcon, CustomGobInfo, DrawOffset, GobHealth, GobIcon, GobInfo, IconView, KinInfo,
    Speaking,
};
use crate::attr::{
    AttrKind, AttrSlot, Attribute, AttributeEvent, AttributeObserver, AttributeStore, ObserverCtx,
};
use crate::error::GobError;
use crate::overlay::path::PathTracker;
use crate::overlay::{Overlay, OverlayId, OverlayList};
use crate::rattr::{ResAttrKind, ResAttrRegistry};

/// Resource name of the player character's body.
pub const PLAYER_RES: &str = "gfx/borka/body";

/// A game object: attributes, resource attributes and overlays, plus the
/// identity and placement they hang off.
pub struct Gob {
    id: GobId,
    rc: Vec2,
    angle: f32,
    frame: i32,
    is_virtual: bool,
    glob: Arc<Glob>,
    attrs: AttributeStore,
    rattrs: ResAttrRegistry,
    overlays: OverlayList,
    observers: Vec<Box<dyn AttributeObserver>>,
    binding: RenderBinding,
    reclaim_signalled: bool,
}

impl Gob {
    /// Creates a server-backed entity at `rc`, first seen in `frame`.
    pub fn new(glob: Arc<Glob>, rc: Vec2, id: GobId, frame: i32) -> Self {
        log::debug!("Creating entity {id} at ({}, {}).", rc.x, rc.y);
        let mut gob = Self {
            id,
            rc,
            angle: 0.0,
            frame,
            is_virtual: false,
            glob,
            attrs: AttributeStore::new(),
            rattrs: ResAttrRegistry::new(),
            overlays: OverlayList::new(),
            observers: vec![Box::new(PathTracker::new())],
            binding: RenderBinding::new(),
            reclaim_signalled: false,
        };
        let position = gob.position();
        gob.binding.locate(position, gob.angle);
        gob
    }

    /// Creates a virtual entity: not server-authoritative, reclaimed once it
    /// has no overlays left.
    pub fn new_virtual(glob: Arc<Glob>, rc: Vec2, id: GobId) -> Self {
        let mut gob = Self::new(glob, rc, id, 0);
        gob.is_virtual = true;
        gob
    }

    /// The entity id.
    pub fn id(&self) -> GobId {
        self.id
    }

    /// The raw logical position.
    pub fn rc(&self) -> Vec2 {
        self.rc
    }

    /// The orientation, in radians.
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// The server frame this entity was last updated in.
    pub fn frame(&self) -> i32 {
        self.frame
    }

    /// Records the server frame of the latest update.
    pub fn set_frame(&mut self, frame: i32) {
        self.frame = frame;
    }

    /// Whether the entity is virtual.
    pub fn is_virtual(&self) -> bool {
        self.is_virtual
    }

    /// The shared world context.
    pub fn glob(&self) -> &Arc<Glob> {
        &self.glob
    }

    /// A snapshot of the identity and placement.
    pub fn owner(&self) -> Owner {
        Owner {
            id: self.id,
            rc: self.rc,
            angle: self.angle,
            is_virtual: self.is_virtual,
        }
    }

    /// Subscribes `observer` to attribute changes.
    pub fn add_observer(&mut self, observer: Box<dyn AttributeObserver>) {
        self.observers.push(observer);
    }

    // --- Attributes ---

    /// Installs `attr`, replacing (and disposing) whatever held its slot.
    pub fn set_attr<A: Attribute>(&mut self, attr: A) {
        self.set_attr_boxed(Box::new(attr));
    }

    /// Boxed variant of [`Gob::set_attr`].
    pub fn set_attr_boxed(&mut self, attr: Box<dyn Attribute>) {
        let slot = self.attrs.set(attr);
        let Some(attr) = self.attrs.slot(slot) else {
            return;
        };
        let event = AttributeEvent::Set { slot, attr };
        let mut ctx = ObserverCtx {
            overlays: &mut self.overlays,
            settings: &self.glob.settings,
        };
        for observer in &mut self.observers {
            observer.notify(&event, &mut ctx);
        }
    }

    /// The attribute of type `A`.
    pub fn attr<A: AttrKind>(&self) -> Option<&A> {
        self.attrs.get::<A>()
    }

    /// The attribute of type `A`, mutably.
    pub fn attr_mut<A: AttrKind>(&mut self) -> Option<&mut A> {
        self.attrs.get_mut::<A>()
    }

    /// The attribute store.
    pub fn attrs(&self) -> &AttributeStore {
        &self.attrs
    }

    /// Removes the attribute in `slot` and hands it back undisposed.
    pub fn del_attr(&mut self, slot: AttrSlot) -> Option<Box<dyn Attribute>> {
        let removed = self.attrs.remove(slot)?;
        let event = AttributeEvent::Removed(slot);
        let mut ctx = ObserverCtx {
            overlays: &mut self.overlays,
            settings: &self.glob.settings,
        };
        for observer in &mut self.observers {
            observer.notify(&event, &mut ctx);
        }
        Some(removed)
    }

    // --- Resource attributes ---

    /// Sets the resource attribute defined by `res`.
    ///
    /// # Errors
    ///
    /// See [`ResAttrRegistry::resolve_pending`].
    pub fn set_rattr(&mut self, res: Indir, payload: Payload) -> Result<(), GobError> {
        let owner = self.owner();
        self.rattrs.set(&owner, res, payload)
    }

    /// Removes the resource attribute defined by `res`.
    pub fn del_rattr(&mut self, res: &Indir) {
        self.rattrs.delete(res);
    }

    /// The resolved resource attribute of type `T`.
    pub fn rattr<T: ResAttrKind>(&self) -> Option<&T> {
        self.rattrs.get::<T>()
    }

    /// The resource attribute registry.
    pub fn rattrs(&self) -> &ResAttrRegistry {
        &self.rattrs
    }

    // --- Overlays ---

    /// Attaches an overlay.
    pub fn add_overlay(&mut self, overlay: Overlay) {
        self.overlays.add(overlay);
    }

    /// The first overlay carrying `id`.
    pub fn find_overlay(&self, id: OverlayId) -> Option<&Overlay> {
        self.overlays.find(id)
    }

    /// The overlays.
    pub fn overlays(&self) -> &OverlayList {
        &self.overlays
    }

    /// Hands a new payload to the overlay `id`. Returns `false` if there is
    /// no such overlay.
    pub fn update_overlay(&mut self, id: OverlayId, payload: Payload) -> bool {
        match self.overlays.find_mut(id) {
            Some(ol) => {
                ol.update(payload);
                true
            }
            None => false,
        }
    }

    /// Removes the overlay `id` immediately.
    pub fn remove_overlay(&mut self, id: OverlayId) -> bool {
        self.overlays.remove(id)
    }

    /// Asks the overlay `id` to finish. Only sprites that support explicit
    /// deletion honour the request.
    pub fn delete_overlay(&mut self, id: OverlayId) -> bool {
        self.overlays
            .find_mut(id)
            .is_some_and(|ol| ol.request_delete())
    }

    /// Lets overlays contribute to the state applied before the entity is
    /// drawn.
    pub fn prepare_overlay_state(&self, buf: &mut StateBuffer) {
        self.overlays.setup_gob(buf);
    }

    // --- Simulation ---

    /// Advances the entity by `dt` seconds: attributes, then overlays, then
    /// pending resource attributes.
    ///
    /// A virtual entity left without overlays asks its owner to reclaim it,
    /// once.
    ///
    /// # Errors
    ///
    /// Returns [`GobError::ConflictingResourceIds`] if a resource attribute
    /// resolved into a slot bound to a different resource.
    pub fn tick(&mut self, dt: f32) -> Result<(), GobError> {
        self.attrs.tick_all(dt);

        let owner = self.owner();
        self.overlays.tick_all(&owner, dt);
        if !self.overlays.is_empty() {
            self.reclaim_signalled = false;
        } else if self.is_virtual && !self.reclaim_signalled {
            log::debug!("Virtual entity {} has nothing left to show.", self.id);
            self.glob.notify(GobEvent::Reclaim(self.id));
            self.reclaim_signalled = true;
        }

        self.rattrs.resolve_pending(&owner)
    }

    /// Moves the entity. A movement attribute, if any, is told about the new
    /// position; the raw position and angle are always overwritten.
    pub fn move_to(&mut self, c: Vec2, angle: f32) {
        if let Some(m) = self.attrs.moving_mut() {
            m.move_to(c);
        }
        self.rc = c;
        self.angle = angle;
    }

    /// The position on the ground below the raw position. The origin is
    /// returned as is.
    pub fn ground_position(&self) -> Resolution<Vec3> {
        if self.rc == Vec2::ZERO {
            return Resolution::Ready(Vec3::ZERO);
        }
        let rc = self.rc;
        self.glob.ground.height_at(rc).map(|z| rc.extend(z))
    }

    /// The visual position: the movement attribute's, or the ground
    /// position, plus any draw offset.
    pub fn position(&self) -> Resolution<Vec3> {
        let base = match self.attrs.moving() {
            Some(m) => m.position(self.glob.ground.as_ref()),
            None => self.ground_position(),
        };
        match self.attrs.get::<DrawOffset>() {
            Some(off) => base.map(|c| c + off.offset),
            None => base,
        }
    }

    /// The current speed, zero when not moving.
    pub fn velocity(&self) -> f32 {
        self.attrs.moving().map_or(0.0, |m| m.velocity())
    }

    // --- Rendering ---

    /// The transforms of the last render pass.
    pub fn binding(&self) -> &RenderBinding {
        &self.binding
    }

    fn render_ctx(&self) -> RenderCtx<'_> {
        RenderCtx {
            owner: self.owner(),
            binding: &self.binding,
            attrs: &self.attrs,
            settings: &self.glob.settings,
        }
    }

    /// Contributes the entity to a render pass.
    ///
    /// In order: overlays, overlay main-list setup, the damage tint, the
    /// primary visual (unless hidden or replaced), the speech bubble, the
    /// kin marker and, when enabled, the diagnostic label. Always returns
    /// `false`: the entity never needs the pass to be retried.
    pub fn render_setup(&mut self, view: &ViewState, rl: &mut dyn RenderList) -> bool {
        let position = self.position();
        self.binding.locate(position, self.angle);
        self.binding.prepare(view);

        if self.attrs.get::<CustomGobInfo>().is_none() {
            self.set_attr(CustomGobInfo::new());
        }

        let ctx = self.render_ctx();
        for ol in self.overlays.iter() {
            ol.setup(rl, &ctx);
        }
        for ol in self.overlays.iter() {
            if let Some(m) = ol.sprite().and_then(|s| s.as_setup_mod()) {
                m.setup_main(rl, &ctx);
            }
        }
        if let Some(fx) = self.attrs.get::<GobHealth>().and_then(GobHealth::fx) {
            rl.prepc(fx);
        }

        let info = self.attrs.get::<CustomGobInfo>();
        if !info.is_some_and(CustomGobInfo::is_hidden) {
            match info.and_then(CustomGobInfo::replacement) {
                Some(d) => d.setup(rl, &ctx),
                None => {
                    if let Some(d) = self.attrs.drawable() {
                        d.setup(rl, &ctx);
                    }
                }
            }
        }

        if let Some(sp) = self.attrs.get::<Speaking>() {
            rl.add(sp.fx(&ctx));
        }
        if let Some(kin) = self.attrs.get::<KinInfo>() {
            rl.add(kin.fx(&ctx));
        }

        if self.glob.settings.show_gob_info() {
            if self.attrs.get::<GobInfo>().is_none() {
                if let Some(info) = GobInfo::for_gob(self.id, self.resource_name()) {
                    self.set_attr(info);
                }
            }
            if let Some(info) = self.attrs.get::<GobInfo>() {
                rl.add(info.draw(&self.render_ctx()));
            }
        }
        false
    }

    // --- Queries ---

    /// Name of the resource the primary visual is built from; `None` when
    /// there is no visual.
    pub fn resource_name(&self) -> Option<Resolution<String>> {
        self.attrs.drawable().map(|d| d.resource_name())
    }

    /// Whether this is a player character.
    pub fn is_player(&self) -> bool {
        matches!(self.resource_name(), Some(Resolution::Ready(name)) if name == PLAYER_RES)
    }

    /// Whether the local player should treat this entity as a threat.
    pub fn is_threat(&self) -> bool {
        self.attrs
            .get::<KinInfo>()
            .map_or(true, |kin| kin.group == KinInfo::RED)
    }

    /// Whether the local player has marked this entity as an ally.
    pub fn is_ally(&self) -> bool {
        self.attrs.get::<KinInfo>().is_some_and(|kin| {
            matches!(kin.group, KinInfo::GREEN | KinInfo::CYAN | KinInfo::YELLOW)
        })
    }

    /// The minimap icon. With custom icons enabled the palette icon is used,
    /// tinted by relation; otherwise the server-assigned icon.
    ///
    /// The palette icon is picked again whenever the visual's resource name
    /// differs from the one it was picked for.
    pub fn minimap_icon(&mut self) -> Option<IconView> {
        if !self.glob.settings.show_custom_icons() {
            return self.attrs.get::<GobIcon>().map(GobIcon::view);
        }
        let name = match self.resource_name() {
            Some(Resolution::Pending) => None,
            Some(Resolution::Ready(name)) => Some(Some(name)),
            Some(Resolution::Failed(_)) | None => Some(None),
        };
        if let Some(name) = name {
            let stale = self
                .attrs
                .get::<CustomGobIcon>()
                .map_or(true, |icon| icon.resource() != name.as_deref());
            if stale {
                let icon = CustomGobIcon::new(name.as_deref(), &self.glob.palette);
                self.set_attr(icon);
            }
        }
        let kin = self.attrs.get::<KinInfo>();
        self.attrs.get::<CustomGobIcon>()?.view(kin)
    }

    /// A random generator seeded from the entity id, identical on every
    /// client.
    pub fn rng(&self) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.id.0 as u64)
    }

    /// Tears down every attribute, resource attribute and overlay.
    pub fn dispose(&mut self) {
        log::debug!("Disposing entity {}.", self.id);
        self.attrs.dispose_all();
        self.rattrs.dispose_all();
        self.overlays.dispose_all();
    }
}
