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

use ember_core::math::Vec3;

use crate::attr::{AttrKind, AttrSlot, Attribute};

/// A fixed offset added to the entity's visual position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawOffset {
    /// The offset, in world units.
    pub offset: Vec3,
}

impl DrawOffset {
    /// Creates an offset attribute.
    pub fn new(offset: Vec3) -> Self {
        Self { offset }
    }
}

impl Attribute for DrawOffset {
    fn slot(&self) -> AttrSlot {
        AttrSlot::DrawOffset
    }
}

impl AttrKind for DrawOffset {
    const SLOT: AttrSlot = AttrSlot::DrawOffset;
}
