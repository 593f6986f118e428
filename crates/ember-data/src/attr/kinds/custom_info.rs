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

use std::fmt;

use crate::attr::{AttrKind, AttrSlot, Attribute, Drawable};

/// User-configured presentation of an entity: hide it, or draw something
/// else in place of its own visual.
#[derive(Default)]
pub struct CustomGobInfo {
    hidden: bool,
    replacement: Option<Box<dyn Drawable>>,
}

impl CustomGobInfo {
    /// Creates an override that changes nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the primary visual is suppressed.
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Suppresses or restores the primary visual.
    pub fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    /// The visual drawn instead of the entity's own, if any.
    pub fn replacement(&self) -> Option<&dyn Drawable> {
        self.replacement.as_deref()
    }

    /// Sets or clears the replacement visual.
    pub fn set_replacement(&mut self, replacement: Option<Box<dyn Drawable>>) {
        self.replacement = replacement;
    }
}

impl fmt::Debug for CustomGobInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomGobInfo")
            .field("hidden", &self.hidden)
            .field("replaced", &self.replacement.is_some())
            .finish()
    }
}

impl Attribute for CustomGobInfo {
    fn slot(&self) -> AttrSlot {
        AttrSlot::CustomInfo
    }
}

impl AttrKind for CustomGobInfo {
    const SLOT: AttrSlot = AttrSlot::CustomInfo;
}
