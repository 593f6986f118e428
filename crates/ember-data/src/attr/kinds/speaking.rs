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

use crate::attr::{AttrKind, AttrSlot, Attribute};
use crate::gob::RenderCtx;

/// A speech bubble floating above the entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Speaking {
    text: String,
    /// Screen-space lift above the entity origin, in pixels.
    lift: f32,
}

impl Speaking {
    /// Creates a bubble showing `text`.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            lift: 25.0,
        }
    }

    /// Replaces the bubble text.
    pub fn update(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// The bubble text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The bubble node, anchored above the entity's screen position.
    pub fn fx(&self, ctx: &RenderCtx<'_>) -> RenderNode {
        let at = ctx.binding.screen() - Vec3::new(0.0, self.lift, 0.0);
        RenderNode::new(format!("speech:{}", self.text), NodeKind::Bubble)
            .with_transform(Mat4::from_translation(at))
    }
}

impl Attribute for Speaking {
    fn slot(&self) -> AttrSlot {
        AttrSlot::Speaking
    }
}

impl AttrKind for Speaking {
    const SLOT: AttrSlot = AttrSlot::Speaking;
}
