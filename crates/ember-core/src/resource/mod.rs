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

//! Resource indirection and the tri-state resolution contract.
//!
//! Entities never hold resources directly. They hold an [`Indir`], a cheap
//! handle naming a resource by id together with the [`ResourceSource`] that
//! can resolve it. Resolution is non-blocking: a poll either yields the
//! resource, reports that it is still loading, or reports a permanent failure.
//! Callers that get [`Resolution::Pending`] are expected to poll again on a
//! later tick.

mod code;
mod pool;

pub use code::PublishedCode;
pub use pool::ResourcePool;

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use thiserror::Error;

/// The wire identifier of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResId(pub u32);

impl fmt::Display for ResId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "res#{}", self.0)
    }
}

/// Why a resolution can never succeed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// The resource loaded but does not publish the code the caller needs.
    #[error("resource '{resource}' publishes no '{capability}' code")]
    MissingCapability {
        /// Name of the resource that was resolved.
        resource: String,
        /// Name of the published capability that was looked up.
        capability: &'static str,
    },
    /// No resource exists under the requested id.
    #[error("no resource with id {0}")]
    NotFound(ResId),
    /// The resource itself failed to load.
    #[error("resource '{resource}' is broken: {reason}")]
    Broken {
        /// Name or id of the resource.
        resource: String,
        /// Loader-provided reason.
        reason: String,
    },
}

/// The outcome of polling something that may still be loading.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution<T> {
    /// The value is available.
    Ready(T),
    /// The value is still loading; poll again later.
    Pending,
    /// The value will never become available.
    Failed(ResolveError),
}

impl<T> Resolution<T> {
    /// Maps a ready value, passing `Pending` and `Failed` through.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Resolution<U> {
        match self {
            Resolution::Ready(v) => Resolution::Ready(f(v)),
            Resolution::Pending => Resolution::Pending,
            Resolution::Failed(e) => Resolution::Failed(e),
        }
    }

    /// Returns the ready value, if any.
    pub fn ready(self) -> Option<T> {
        match self {
            Resolution::Ready(v) => Some(v),
            _ => None,
        }
    }

    /// Returns `true` while the value is still loading.
    pub fn is_pending(&self) -> bool {
        matches!(self, Resolution::Pending)
    }
}

/// A loader able to resolve resource ids without blocking.
pub trait ResourceSource: Send + Sync {
    /// Polls the resource named by `id`.
    fn resolve(&self, id: ResId) -> Resolution<Arc<Resource>>;
}

/// An indirect, possibly-not-yet-resolved reference to a resource.
///
/// Two `Indir`s are equal when they name the same resource id; the source they
/// were obtained from does not take part in comparisons.
#[derive(Clone)]
pub struct Indir {
    id: ResId,
    source: Arc<dyn ResourceSource>,
}

impl Indir {
    /// Creates a handle for `id`, resolved through `source`.
    pub fn new(id: ResId, source: Arc<dyn ResourceSource>) -> Self {
        Self { id, source }
    }

    /// The resource id this handle points at.
    pub fn id(&self) -> ResId {
        self.id
    }

    /// Polls the underlying source.
    pub fn get(&self) -> Resolution<Arc<Resource>> {
        self.source.resolve(self.id)
    }
}

impl PartialEq for Indir {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Indir {}

impl Hash for Indir {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Indir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Indir({})", self.id)
    }
}

/// A loaded resource: a name, a version and the code it publishes.
pub struct Resource {
    name: String,
    version: u16,
    code: PublishedCode,
}

impl Resource {
    /// Creates a resource that publishes nothing yet.
    pub fn new(name: impl Into<String>, version: u16) -> Self {
        Self {
            name: name.into(),
            version,
            code: PublishedCode::new(),
        }
    }

    /// Publishes `code` under its own type, builder style.
    pub fn publish<T: Send + Sync + 'static>(mut self, code: T) -> Self {
        self.code.insert(code);
        self
    }

    /// The resource's name, e.g. `gfx/borka/body`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The resource's version.
    pub fn version(&self) -> u16 {
        self.version
    }

    /// Looks up published code of type `T`.
    pub fn code<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.code.get::<T>()
    }

    /// Looks up published code of type `T`, failing with
    /// [`ResolveError::MissingCapability`] when the resource lacks it.
    pub fn require<T: Send + Sync + 'static>(
        &self,
        capability: &'static str,
    ) -> Result<&T, ResolveError> {
        self.code::<T>().ok_or_else(|| ResolveError::MissingCapability {
            resource: self.name.clone(),
            capability,
        })
    }
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("name", &self.name)
            .field("version", &self.version)
            .field("published", &self.code.len())
            .finish()
    }
}
