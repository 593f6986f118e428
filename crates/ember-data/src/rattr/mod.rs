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

//! Resource-defined attributes.
//!
//! A resource attribute's concrete type is decided by code a resource
//! publishes: an [`AttrFactory`] registered under [`FACTORY_CAPABILITY`].
//! The entity hands the factory its payload once the resource has loaded.

mod registry;

pub use registry::ResAttrRegistry;

use std::fmt;

use ember_core::{Indir, Payload};

use crate::attr::AsAny;
use crate::gob::Owner;

/// Name of the capability resources publish their attribute factory under.
pub const FACTORY_CAPABILITY: &str = "gattr";

/// The slot a resource attribute occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RAttrSlot(pub &'static str);

impl fmt::Display for RAttrSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// An attribute produced by a resource's published factory.
pub trait ResAttr: AsAny + Send {
    /// The slot this instance occupies.
    fn slot(&self) -> RAttrSlot;

    /// Applies a new payload in place. Returns `false` if the attribute must
    /// be recreated instead.
    fn update(&mut self, _payload: &Payload) -> bool {
        false
    }

    /// Releases whatever the attribute holds. Called exactly once.
    fn dispose(&mut self) {}
}

/// Ties a concrete resource attribute type to its slot for typed lookups.
pub trait ResAttrKind: ResAttr + Sized {
    /// The slot every instance of this type occupies.
    const SLOT: RAttrSlot;
}

/// Factory code published by a resource.
pub trait AttrFactory: Send + Sync {
    /// Builds the attribute for `owner` from `payload`.
    fn make(&self, owner: &Owner, payload: Payload) -> Box<dyn ResAttr>;
}

/// The resolved state of one resource-attribute slot.
pub struct ResAttrCell {
    slot: RAttrSlot,
    res: Option<Indir>,
    payload: Option<Payload>,
    attr: Option<Box<dyn ResAttr>>,
}

impl ResAttrCell {
    fn new(slot: RAttrSlot) -> Self {
        Self {
            slot,
            res: None,
            payload: None,
            attr: None,
        }
    }

    /// The slot this cell holds.
    pub fn slot(&self) -> RAttrSlot {
        self.slot
    }

    /// The resource the cell is bound to.
    pub fn res(&self) -> Option<&Indir> {
        self.res.as_ref()
    }

    /// The last payload applied to the live attribute.
    pub fn payload(&self) -> Option<&Payload> {
        self.payload.as_ref()
    }

    /// The live attribute.
    pub fn attr(&self) -> Option<&dyn ResAttr> {
        self.attr.as_deref()
    }

    fn install(&mut self, attr: Box<dyn ResAttr>) {
        if let Some(mut old) = self.attr.replace(attr) {
            old.dispose();
        }
    }

    fn dispose(&mut self) {
        if let Some(mut attr) = self.attr.take() {
            attr.dispose();
        }
    }
}

impl fmt::Debug for ResAttrCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResAttrCell")
            .field("slot", &self.slot)
            .field("res", &self.res)
            .field("payload", &self.payload)
            .field("live", &self.attr.is_some())
            .finish()
    }
}
