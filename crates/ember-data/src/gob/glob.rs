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

use ember_core::world::GroundQuery;
use ember_core::GobSettings;

use super::GobId;
use crate::attr::kinds::IconPalette;

/// Signals an entity sends to whoever owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GobEvent {
    /// A virtual entity has nothing left to show and may be dropped.
    Reclaim(GobId),
}

/// The world context shared by every entity.
pub struct Glob {
    /// Ground height source.
    pub ground: Arc<dyn GroundQuery>,
    /// Display toggles.
    pub settings: Arc<GobSettings>,
    /// User icon choices.
    pub palette: IconPalette,
    events: flume::Sender<GobEvent>,
}

impl Glob {
    /// Creates a context whose entities report to `events`.
    pub fn new(
        ground: Arc<dyn GroundQuery>,
        settings: Arc<GobSettings>,
        palette: IconPalette,
        events: flume::Sender<GobEvent>,
    ) -> Self {
        Self {
            ground,
            settings,
            palette,
            events,
        }
    }

    /// Sends `event` to the owner, logging if nobody is listening.
    pub fn notify(&self, event: GobEvent) {
        if let Err(e) = self.events.send(event) {
            log::warn!("Dropped entity event: {e}. Owner likely gone.");
        }
    }
}
