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

use std::fmt;

use ember_core::math::Vec2;

/// Identifier of an entity. Server-assigned ids are non-negative; virtual
/// entities get negative ids from their cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GobId(pub i64);

impl GobId {
    /// Returns `true` for ids allocated locally for virtual entities.
    pub fn is_local(self) -> bool {
        self.0 < 0
    }
}

impl fmt::Display for GobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A snapshot of the entity state that factories and sprites may read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Owner {
    /// The entity id.
    pub id: GobId,
    /// Raw logical position.
    pub rc: Vec2,
    /// Orientation, in radians.
    pub angle: f32,
    /// Whether the entity is virtual.
    pub is_virtual: bool,
}
