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

use ember_core::math::{Vec2, Vec3, EPSILON};
use ember_core::world::GroundQuery;
use ember_core::Resolution;

use crate::attr::{AttrKind, AttrSlot, Attribute, Moving};

/// Linear movement towards a target at constant speed.
#[derive(Debug, Clone, PartialEq)]
pub struct LinMove {
    pos: Vec2,
    target: Vec2,
    speed: f32,
}

impl LinMove {
    /// Starts at `from`, heading for `to` at `speed` units per second.
    pub fn new(from: Vec2, to: Vec2, speed: f32) -> Self {
        Self {
            pos: from,
            target: to,
            speed,
        }
    }

    /// The current planar position.
    pub fn current(&self) -> Vec2 {
        self.pos
    }

    fn arrived(&self) -> bool {
        self.pos.distance(self.target) <= EPSILON
    }
}

impl Attribute for LinMove {
    fn slot(&self) -> AttrSlot {
        AttrSlot::Moving
    }

    fn tick(&mut self, dt: f32) {
        let delta = self.target - self.pos;
        let dist = delta.length();
        let step = self.speed * dt;
        if dist <= step || dist <= EPSILON {
            self.pos = self.target;
        } else {
            self.pos = self.pos + delta * (step / dist);
        }
    }

    fn as_moving(&self) -> Option<&dyn Moving> {
        Some(self)
    }

    fn as_moving_mut(&mut self) -> Option<&mut dyn Moving> {
        Some(self)
    }
}

impl AttrKind for LinMove {
    const SLOT: AttrSlot = AttrSlot::Moving;
}

impl Moving for LinMove {
    fn position(&self, ground: &dyn GroundQuery) -> Resolution<Vec3> {
        let pos = self.pos;
        ground.height_at(pos).map(|z| pos.extend(z))
    }

    fn velocity(&self) -> f32 {
        if self.arrived() {
            0.0
        } else {
            self.speed
        }
    }

    fn move_to(&mut self, c: Vec2) {
        self.target = c;
    }

    fn destination(&self) -> Option<Vec2> {
        (!self.arrived()).then_some(self.target)
    }
}
