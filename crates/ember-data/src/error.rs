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

//! Error types for entity operations.

use ember_core::ResId;
use thiserror::Error;

use crate::rattr::RAttrSlot;

/// Errors raised by entity operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GobError {
    /// Two different resources produced an attribute for the same slot.
    ///
    /// This can only happen with malformed content or a registry bug and is
    /// not recoverable by the entity.
    #[error("conflicting resource attribute ids on {slot}: {bound} -> {incoming}")]
    ConflictingResourceIds {
        /// The slot both resources claim.
        slot: RAttrSlot,
        /// The resource the slot is already bound to.
        bound: ResId,
        /// The resource that tried to take it over.
        incoming: ResId,
    },
}
