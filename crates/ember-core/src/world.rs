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

//! Queries against the world the entities live in.

use crate::math::Vec2;
use crate::resource::Resolution;

/// Answers terrain height queries. The map around a position may still be
/// streaming in, in which case the answer is [`Resolution::Pending`].
pub trait GroundQuery: Send + Sync {
    /// Returns the ground height at world position `pos`.
    fn height_at(&self, pos: Vec2) -> Resolution<f32>;
}

/// A perfectly flat, fully loaded world.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatGround(pub f32);

impl GroundQuery for FlatGround {
    fn height_at(&self, _pos: Vec2) -> Resolution<f32> {
        Resolution::Ready(self.0)
    }
}
