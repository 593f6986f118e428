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

use ember_core::math::LinearRgba;
use ember_core::render::StateOp;

use crate::attr::{AttrKind, AttrSlot, Attribute};

/// Damage state, in quarters of full health.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GobHealth {
    hp: u8,
}

impl GobHealth {
    /// Full health.
    pub const FULL: u8 = 4;

    /// Creates a health attribute; `hp` is clamped to [`GobHealth::FULL`].
    pub fn new(hp: u8) -> Self {
        Self {
            hp: hp.min(Self::FULL),
        }
    }

    /// Remaining health, `0..=4`.
    pub fn hp(&self) -> u8 {
        self.hp
    }

    /// The damage tint to prepend to the entity's render state, if damaged.
    pub fn fx(&self) -> Option<StateOp> {
        if self.hp >= Self::FULL {
            return None;
        }
        let damage = f32::from(Self::FULL - self.hp) / f32::from(Self::FULL);
        Some(StateOp::tinted(
            "fx.health",
            LinearRgba::RED.with_alpha(damage * 0.5),
        ))
    }
}

impl Attribute for GobHealth {
    fn slot(&self) -> AttrSlot {
        AttrSlot::Health
    }
}

impl AttrKind for GobHealth {
    const SLOT: AttrSlot = AttrSlot::Health;
}
