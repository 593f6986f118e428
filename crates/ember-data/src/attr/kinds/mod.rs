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

//! The built-in attribute kinds the entity itself consults.
//!
//! Their internal behavior is deliberately small: they exist so the render
//! pass and the relation queries have something concrete to work with.

mod custom_info;
mod drawable;
mod health;
mod icon;
mod info;
mod kin;
mod linmove;
mod offset;
mod speaking;

pub use custom_info::CustomGobInfo;
pub use drawable::ResDrawable;
pub use health::GobHealth;
pub use icon::{CustomGobIcon, GobIcon, IconPalette, IconView};
pub use info::GobInfo;
pub use kin::KinInfo;
pub use linmove::LinMove;
pub use offset::DrawOffset;
pub use speaking::Speaking;
