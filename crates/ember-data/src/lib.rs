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

//! # Ember Data
//!
//! The game-object container of the ember client. A [`Gob`] aggregates three
//! collections with independent lifecycles:
//!
//! - an [`AttributeStore`] holding at most one behavior per [`AttrSlot`],
//! - a [`ResAttrRegistry`] resolving resource-defined attributes lazily,
//! - an [`OverlayList`] of transient visuals.
//!
//! [`Gob::tick`] and [`Gob::render_setup`] drive all three in a fixed order.
//! Entities are usually owned by a [`GobCache`], which also reclaims virtual
//! entities once they have nothing left to show.

#![warn(missing_docs)]

pub mod attr;
pub mod error;
pub mod gob;
pub mod overlay;
pub mod rattr;

pub use attr::{AttrKind, AttrSlot, Attribute, AttributeStore};
pub use error::GobError;
pub use gob::{Glob, Gob, GobCache, GobEvent, GobId, Owner, RenderBinding, RenderCtx};
pub use overlay::{Overlay, OverlayId, OverlayList, Sprite};
pub use rattr::{ResAttr, ResAttrKind, ResAttrRegistry, RAttrSlot};
