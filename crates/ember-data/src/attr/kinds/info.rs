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

use ember_core::math::{Mat4, Vec3};
use ember_core::render::{NodeKind, RenderNode};
use ember_core::Resolution;

use crate::attr::{AttrKind, AttrSlot, Attribute};
use crate::gob::{GobId, RenderCtx};

/// Diagnostic label naming the entity and its resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GobInfo {
    text: String,
}

impl GobInfo {
    /// Builds the label for an entity, or `None` while its visual is still
    /// loading.
    pub fn for_gob(id: GobId, resource: Option<Resolution<String>>) -> Option<Self> {
        let text = match resource {
            None => format!("{id}"),
            Some(Resolution::Ready(name)) => format!("{name} {id}"),
            Some(Resolution::Failed(_)) => format!("<broken> {id}"),
            Some(Resolution::Pending) => return None,
        };
        Some(Self { text })
    }

    /// The label text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The label node, pinned above the entity's screen position.
    pub fn draw(&self, ctx: &RenderCtx<'_>) -> RenderNode {
        let at = ctx.binding.screen() + ctx.binding.screen_up() * 1.5 - Vec3::new(0.0, 10.0, 0.0);
        RenderNode::new(format!("info:{}", self.text), NodeKind::Label)
            .with_transform(Mat4::from_translation(at))
    }
}

impl Attribute for GobInfo {
    fn slot(&self) -> AttrSlot {
        AttrSlot::Info
    }
}

impl AttrKind for GobInfo {
    const SLOT: AttrSlot = AttrSlot::Info;
}
