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

//! # Ember Core
//!
//! Foundational crate for the ember entity system. It holds the contracts the
//! entity containers are written against (resource indirection, render lists,
//! ground queries, settings) and the small math vocabulary they share, but no
//! entity logic of its own.

#![warn(missing_docs)]

pub mod event;
pub mod math;
pub mod payload;
pub mod render;
pub mod resource;
pub mod settings;
pub mod world;

pub use payload::Payload;
pub use resource::{Indir, ResId, Resolution, ResolveError, Resource};
pub use settings::GobSettings;
