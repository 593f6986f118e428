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

//! Behavioral attributes and the store that keys them by slot.
//!
//! Every attribute declares the [`AttrSlot`] it occupies. Concrete types that
//! share a slot (two movement models, say) replace each other instead of
//! coexisting. Typed lookups go through [`AttrKind`], which ties a concrete
//! type to its slot so a lookup can check the stored instance's actual type.

pub mod kinds;
mod store;

pub use store::AttributeStore;

use std::any::Any;
use std::fmt;

use ember_core::math::{Vec2, Vec3};
use ember_core::render::RenderList;
use ember_core::world::GroundQuery;
use ember_core::{GobSettings, Resolution};

use crate::gob::RenderCtx;
use crate::overlay::OverlayList;

/// Upcasting helper that lets trait objects be downcast to their concrete type.
pub trait AsAny: Any {
    /// Returns `self` as `&dyn Any`.
    fn as_any(&self) -> &dyn Any;
    /// Returns `self` as `&mut dyn Any`.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// The slot an attribute occupies on its entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttrSlot {
    /// Movement models.
    Moving,
    /// The entity's primary visual.
    Drawable,
    /// A fixed offset added to the visual position.
    DrawOffset,
    /// Damage state.
    Health,
    /// Speech bubble.
    Speaking,
    /// Relation (kin) marker.
    KinInfo,
    /// Presentation override: hide or replace the primary visual.
    CustomInfo,
    /// Diagnostic label.
    Info,
    /// Built-in minimap icon.
    Icon,
    /// Relation-coloured minimap icon.
    CustomIcon,
    /// Slots defined outside this crate.
    Custom(&'static str),
}

impl fmt::Display for AttrSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrSlot::Custom(name) => write!(f, "Custom({name})"),
            other => fmt::Debug::fmt(other, f),
        }
    }
}

/// A behavior object attached to an entity.
pub trait Attribute: AsAny + Send {
    /// The slot this instance occupies.
    fn slot(&self) -> AttrSlot;

    /// Advances the attribute by `dt` seconds.
    fn tick(&mut self, _dt: f32) {}

    /// Releases whatever the attribute holds. Called exactly once.
    fn dispose(&mut self) {}

    /// Movement capability.
    fn as_moving(&self) -> Option<&dyn Moving> {
        None
    }

    /// Mutable movement capability.
    fn as_moving_mut(&mut self) -> Option<&mut dyn Moving> {
        None
    }

    /// Primary-visual capability.
    fn as_drawable(&self) -> Option<&dyn Drawable> {
        None
    }
}

/// Ties a concrete attribute type to its slot for typed lookups.
pub trait AttrKind: Attribute + Sized {
    /// The slot every instance of this type occupies.
    const SLOT: AttrSlot;
}

/// An attribute that animates the entity's visual position.
pub trait Moving {
    /// The current animated position.
    fn position(&self, ground: &dyn GroundQuery) -> Resolution<Vec3>;
    /// The current speed, in world units per second.
    fn velocity(&self) -> f32;
    /// Starts moving towards `c`.
    fn move_to(&mut self, c: Vec2);
    /// Where the movement is heading, if anywhere.
    fn destination(&self) -> Option<Vec2>;
}

/// An attribute that renders the entity itself.
pub trait Drawable: Send {
    /// Contributes the visual to the render list.
    fn setup(&self, rl: &mut dyn RenderList, ctx: &RenderCtx<'_>);
    /// Name of the resource the visual is built from.
    fn resource_name(&self) -> Resolution<String>;
}

/// A change to an entity's attribute set.
pub enum AttributeEvent<'a> {
    /// An attribute was installed in `slot`.
    Set {
        /// The slot that changed.
        slot: AttrSlot,
        /// The newly installed attribute.
        attr: &'a dyn Attribute,
    },
    /// The attribute in `slot` was removed.
    Removed(AttrSlot),
}

impl AttributeEvent<'_> {
    /// The slot the event is about.
    pub fn slot(&self) -> AttrSlot {
        match self {
            AttributeEvent::Set { slot, .. } | AttributeEvent::Removed(slot) => *slot,
        }
    }
}

/// What an observer may touch while reacting to an [`AttributeEvent`].
pub struct ObserverCtx<'a> {
    /// The entity's overlays.
    pub overlays: &'a mut OverlayList,
    /// Client-wide toggles.
    pub settings: &'a GobSettings,
}

/// Reacts to attribute changes on one entity.
pub trait AttributeObserver: Send {
    /// Called after the change has been applied to the store.
    fn notify(&mut self, event: &AttributeEvent<'_>, ctx: &mut ObserverCtx<'_>);
}
