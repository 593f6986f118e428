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

use crate::math::{Mat4, Vec2, Vec3, Vec4, EPSILON};

/// The camera state render setup is performed against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    /// World-to-view transform.
    pub camera: Mat4,
    /// View-to-clip transform.
    pub projection: Mat4,
    /// Size of the viewport in pixels.
    pub viewport: Vec2,
}

impl ViewState {
    /// Creates a view state.
    pub fn new(camera: Mat4, projection: Mat4, viewport: Vec2) -> Self {
        Self {
            camera,
            projection,
            viewport,
        }
    }

    /// Projects a point given in the local space of `model` to screen space.
    ///
    /// The returned `x`/`y` are pixel coordinates with the origin in the
    /// top-left corner; `z` is the normalized depth.
    pub fn to_screen(&self, model: &Mat4, local: Vec3) -> Vec3 {
        let clip: Vec4 = self.projection * self.camera * model.transform_point4(local);
        let w = if clip.w.abs() < EPSILON { EPSILON } else { clip.w };
        let ndc = Vec3::new(clip.x / w, clip.y / w, clip.z / w);
        Vec3::new(
            (ndc.x + 1.0) * 0.5 * self.viewport.x,
            (1.0 - ndc.y) * 0.5 * self.viewport.y,
            ndc.z,
        )
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            camera: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            viewport: Vec2::new(800.0, 600.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_identity_view_maps_origin_to_viewport_center() {
        let view = ViewState::default();
        let p = view.to_screen(&Mat4::IDENTITY, Vec3::ZERO);
        assert_relative_eq!(p.x, 400.0);
        assert_relative_eq!(p.y, 300.0);
    }

    #[test]
    fn test_screen_y_points_down() {
        let view = ViewState::default();
        let up = view.to_screen(&Mat4::IDENTITY, Vec3::new(0.0, 0.5, 0.0));
        assert!(up.y < 300.0, "Positive NDC y should be above the center");
    }
}
