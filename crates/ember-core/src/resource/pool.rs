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

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use super::{Indir, ResId, Resolution, ResolveError, Resource, ResourceSource};

enum PoolEntry {
    Loading,
    Loaded(Arc<Resource>),
    Broken(String),
    Missing,
}

/// An in-memory [`ResourceSource`] fed by whatever actually loads resources.
///
/// Ids the pool has never heard of resolve as [`Resolution::Pending`]: the
/// client routinely learns about a resource id before its data arrives.
#[derive(Default)]
pub struct ResourcePool {
    entries: RwLock<HashMap<ResId, PoolEntry>>,
}

impl ResourcePool {
    /// Creates an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `id` as being loaded.
    pub fn mark_loading(&self, id: ResId) {
        self.write().insert(id, PoolEntry::Loading);
    }

    /// Stores a loaded resource under `id`, replacing any previous state.
    pub fn insert(&self, id: ResId, resource: Resource) {
        log::debug!("Resource {} ('{}') is ready.", id, resource.name());
        self.write().insert(id, PoolEntry::Loaded(Arc::new(resource)));
    }

    /// Records that `id` failed to load.
    pub fn mark_broken(&self, id: ResId, reason: impl Into<String>) {
        self.write().insert(id, PoolEntry::Broken(reason.into()));
    }

    /// Records that the server has no resource under `id`.
    pub fn mark_missing(&self, id: ResId) {
        self.write().insert(id, PoolEntry::Missing);
    }

    /// Returns a handle to `id` resolved through this pool.
    pub fn indir(self: &Arc<Self>, id: ResId) -> Indir {
        Indir::new(id, Arc::clone(self) as Arc<dyn ResourceSource>)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<ResId, PoolEntry>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ResourceSource for ResourcePool {
    fn resolve(&self, id: ResId) -> Resolution<Arc<Resource>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        match entries.get(&id) {
            None | Some(PoolEntry::Loading) => Resolution::Pending,
            Some(PoolEntry::Loaded(res)) => Resolution::Ready(Arc::clone(res)),
            Some(PoolEntry::Broken(reason)) => Resolution::Failed(ResolveError::Broken {
                resource: id.to_string(),
                reason: reason.clone(),
            }),
            Some(PoolEntry::Missing) => Resolution::Failed(ResolveError::NotFound(id)),
        }
    }
}
