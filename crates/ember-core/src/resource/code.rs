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

use std::any::{Any, TypeId};
use std::collections::HashMap;

/// The code a resource publishes, keyed by type.
///
/// Resources ship factories (for attributes, sprites, ...) as trait objects.
/// Each is stored under the exact type it was published as, so consumers
/// look up e.g. `Arc<dyn AttrFactory>` and get either that factory or nothing.
#[derive(Default)]
pub struct PublishedCode {
    entries: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl PublishedCode {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Publishes `code`, replacing anything previously published as `T`.
    pub fn insert<T: Send + Sync + 'static>(&mut self, code: T) {
        self.entries.insert(TypeId::of::<T>(), Box::new(code));
    }

    /// Retrieves code published as `T`.
    #[must_use]
    pub fn get<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.entries
            .get(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast_ref::<T>())
    }

    /// Returns the number of published entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is published.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
