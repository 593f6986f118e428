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

use ember_core::math::{LinearRgba, Mat4};
use ember_core::render::{NodeKind, RenderNode};

use crate::attr::{AttrKind, AttrSlot, Attribute};
use crate::gob::RenderCtx;

/// Kin group colours, indexed by group number.
pub const GROUP_COLORS: [LinearRgba; 8] = [
    LinearRgba::WHITE,
    LinearRgba::GREEN,
    LinearRgba::RED,
    LinearRgba::BLUE,
    LinearRgba::CYAN,
    LinearRgba::YELLOW,
    LinearRgba::MAGENTA,
    LinearRgba::rgb(1.0, 0.5, 0.0),
];

/// The relation the local player has recorded for this entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KinInfo {
    /// Name the player gave this kin.
    pub name: String,
    /// Kin group.
    pub group: u8,
    /// Server-side kin type flags.
    pub kind: u8,
}

impl KinInfo {
    /// Green group.
    pub const GREEN: u8 = 1;
    /// Red group.
    pub const RED: u8 = 2;
    /// Cyan group.
    pub const CYAN: u8 = 4;
    /// Yellow group.
    pub const YELLOW: u8 = 5;

    /// Creates a kin record.
    pub fn new(name: impl Into<String>, group: u8, kind: u8) -> Self {
        Self {
            name: name.into(),
            group,
            kind,
        }
    }

    /// The group colour. Unknown groups are white.
    pub fn color(&self) -> LinearRgba {
        GROUP_COLORS
            .get(usize::from(self.group))
            .copied()
            .unwrap_or(LinearRgba::WHITE)
    }

    /// The marker node drawn above the entity.
    pub fn fx(&self, ctx: &RenderCtx<'_>) -> RenderNode {
        RenderNode::new(format!("kin:{}", self.name), NodeKind::Marker)
            .with_transform(Mat4::from_translation(ctx.binding.screen()))
    }
}

impl Attribute for KinInfo {
    fn slot(&self) -> AttrSlot {
        AttrSlot::KinInfo
    }
}

impl AttrKind for KinInfo {
    const SLOT: AttrSlot = AttrSlot::KinInfo;
}
