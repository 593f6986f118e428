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
use ember_core::render::ViewState;
use ember_core::{GobSettings, Resolution};

use super::Owner;
use crate::attr::AttributeStore;

/// Transforms and screen projection of an entity, recomputed once per
/// render pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderBinding {
    translation: Option<Vec3>,
    angle: Option<f32>,
    xlate: Mat4,
    rot: Mat4,
    world: Mat4,
    camera: Mat4,
    model_view: Mat4,
    screen: Vec3,
    screen_up: Vec3,
}

impl Default for RenderBinding {
    fn default() -> Self {
        Self {
            translation: None,
            angle: None,
            xlate: Mat4::IDENTITY,
            rot: Mat4::IDENTITY,
            world: Mat4::IDENTITY,
            camera: Mat4::IDENTITY,
            model_view: Mat4::IDENTITY,
            screen: Vec3::ZERO,
            screen_up: Vec3::ZERO,
        }
    }
}

impl RenderBinding {
    /// Creates a binding at the identity transform.
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates the world transform from the entity position and angle.
    ///
    /// The Y axis is mirrored into render space and the rotation is about
    /// +Z by `-angle`. Each part is only rebuilt when its input changed;
    /// while the position is unavailable the previous translation is kept.
    pub fn locate(&mut self, position: Resolution<Vec3>, angle: f32) {
        if let Resolution::Ready(mut c) = position {
            c.y = -c.y;
            if self.translation != Some(c) {
                self.xlate = Mat4::from_translation(c);
                self.translation = Some(c);
            }
        }
        if self.angle != Some(angle) {
            self.rot = Mat4::from_rotation_z(-angle);
            self.angle = Some(angle);
        }
        self.world = self.xlate * self.rot;
    }

    /// Projects the entity origin and its up vector into screen space.
    pub fn prepare(&mut self, view: &ViewState) {
        self.camera = view.camera;
        self.model_view = view.camera * self.world;
        self.screen = view.to_screen(&self.world, Vec3::ZERO);
        self.screen_up = view.to_screen(&self.world, Vec3::Z) - self.screen;
    }

    /// The render-space translation, or the origin before the first
    /// successful [`RenderBinding::locate`].
    pub fn translation(&self) -> Vec3 {
        self.translation.unwrap_or(Vec3::ZERO)
    }

    /// Local-to-world transform.
    pub fn world(&self) -> Mat4 {
        self.world
    }

    /// Camera transform of the last pass.
    pub fn camera(&self) -> Mat4 {
        self.camera
    }

    /// `camera * world`.
    pub fn model_view(&self) -> Mat4 {
        self.model_view
    }

    /// Screen position of the entity origin, in pixels.
    pub fn screen(&self) -> Vec3 {
        self.screen
    }

    /// Screen-space delta of one world unit up from the origin.
    pub fn screen_up(&self) -> Vec3 {
        self.screen_up
    }
}

/// What attributes and sprites see while contributing to a render pass.
pub struct RenderCtx<'a> {
    /// The entity being drawn.
    pub owner: Owner,
    /// Its transforms for this pass.
    pub binding: &'a RenderBinding,
    /// Its attributes.
    pub attrs: &'a AttributeStore,
    /// Display toggles.
    pub settings: &'a GobSettings,
}
