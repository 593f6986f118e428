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

use std::collections::HashMap;

use super::{AttrKind, AttrSlot, Attribute, Drawable, Moving};

/// Per-entity map from [`AttrSlot`] to the one live attribute in that slot.
#[derive(Default)]
pub struct AttributeStore {
    attrs: HashMap<AttrSlot, Box<dyn Attribute>>,
}

impl AttributeStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            attrs: HashMap::new(),
        }
    }

    /// Installs `attr` in its slot and returns that slot.
    ///
    /// An attribute already occupying the slot is disposed and dropped.
    pub fn set(&mut self, attr: Box<dyn Attribute>) -> AttrSlot {
        let slot = attr.slot();
        if let Some(mut old) = self.attrs.insert(slot, attr) {
            log::trace!("Replacing attribute in slot {slot}.");
            old.dispose();
        }
        slot
    }

    /// Returns the attribute of type `A`, or `None` if the slot is empty or
    /// holds a different concrete type.
    pub fn get<A: AttrKind>(&self) -> Option<&A> {
        self.attrs
            .get(&A::SLOT)
            .and_then(|a| (**a).as_any().downcast_ref::<A>())
    }

    /// Mutable variant of [`AttributeStore::get`].
    pub fn get_mut<A: AttrKind>(&mut self) -> Option<&mut A> {
        self.attrs
            .get_mut(&A::SLOT)
            .and_then(|a| (**a).as_any_mut().downcast_mut::<A>())
    }

    /// Returns whatever occupies `slot`.
    pub fn slot(&self, slot: AttrSlot) -> Option<&dyn Attribute> {
        self.attrs.get(&slot).map(|a| &**a)
    }

    /// Returns whatever occupies `slot`, mutably.
    pub fn slot_mut(&mut self, slot: AttrSlot) -> Option<&mut dyn Attribute> {
        let attr: &mut dyn Attribute = &mut **self.attrs.get_mut(&slot)?;
        Some(attr)
    }

    /// Returns `true` if `slot` is occupied.
    pub fn contains(&self, slot: AttrSlot) -> bool {
        self.attrs.contains_key(&slot)
    }

    /// Takes the attribute out of `slot` without disposing it.
    pub fn remove(&mut self, slot: AttrSlot) -> Option<Box<dyn Attribute>> {
        self.attrs.remove(&slot)
    }

    /// The movement capability of the `Moving` slot.
    pub fn moving(&self) -> Option<&dyn Moving> {
        self.slot(AttrSlot::Moving).and_then(|a| a.as_moving())
    }

    /// Mutable movement capability of the `Moving` slot.
    pub fn moving_mut(&mut self) -> Option<&mut dyn Moving> {
        self.slot_mut(AttrSlot::Moving)
            .and_then(|a| a.as_moving_mut())
    }

    /// The primary-visual capability of the `Drawable` slot.
    pub fn drawable(&self) -> Option<&dyn Drawable> {
        self.slot(AttrSlot::Drawable).and_then(|a| a.as_drawable())
    }

    /// Advances every attribute by `dt`.
    pub fn tick_all(&mut self, dt: f32) {
        for attr in self.attrs.values_mut() {
            attr.tick(dt);
        }
    }

    /// Disposes and drops every attribute.
    pub fn dispose_all(&mut self) {
        for (_, mut attr) in self.attrs.drain() {
            attr.dispose();
        }
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    /// Returns `true` if no slot is occupied.
    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }
}
