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

use std::sync::Arc;

use ember_core::render::{NodeKind, RenderList, RenderNode};
use ember_core::{Indir, Resolution, Resource};

use crate::attr::{AttrKind, AttrSlot, Attribute, Drawable};
use crate::gob::RenderCtx;

/// A primary visual built from a single resource.
#[derive(Debug, Clone)]
pub struct ResDrawable {
    res: Indir,
}

impl ResDrawable {
    /// Creates a visual for the resource behind `res`.
    pub fn new(res: Indir) -> Self {
        Self { res }
    }

    /// The resource handle.
    pub fn res(&self) -> &Indir {
        &self.res
    }

    fn resource(&self) -> Resolution<Arc<Resource>> {
        self.res.get()
    }
}

impl Attribute for ResDrawable {
    fn slot(&self) -> AttrSlot {
        AttrSlot::Drawable
    }

    fn as_drawable(&self) -> Option<&dyn Drawable> {
        Some(self)
    }
}

impl AttrKind for ResDrawable {
    const SLOT: AttrSlot = AttrSlot::Drawable;
}

impl Drawable for ResDrawable {
    fn setup(&self, rl: &mut dyn RenderList, ctx: &RenderCtx<'_>) {
        match self.resource() {
            Resolution::Ready(res) => rl.add(
                RenderNode::new(res.name(), NodeKind::Model).with_transform(ctx.binding.world()),
            ),
            Resolution::Pending => {
                log::trace!("Visual {:?} of {} is still loading.", self.res, ctx.owner.id)
            }
            Resolution::Failed(e) => {
                log::trace!("Visual of {} cannot be drawn: {e}", ctx.owner.id)
            }
        }
    }

    fn resource_name(&self) -> Resolution<String> {
        self.resource().map(|res| res.name().to_string())
    }
}
