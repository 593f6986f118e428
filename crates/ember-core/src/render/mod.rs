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

//! The contract between entities and the renderer.
//!
//! Entities do not draw. During render setup they push [`RenderNode`]s and
//! [`StateOp`]s into a [`RenderList`], which the renderer consumes afterwards.

mod view;

pub use view::ViewState;

use crate::math::{LinearRgba, Mat4};

/// What a render node stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// A resource-backed 3D model.
    Model,
    /// A sprite attached to an entity, usually from an overlay.
    Sprite,
    /// A transient visual effect such as a damage tint or speech bubble.
    Effect,
    /// A 2D text label projected to screen space.
    Label,
    /// A speech bubble.
    Bubble,
    /// A map or minimap marker.
    Marker,
}

/// A single item added to a render list.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderNode {
    /// Free-form identifier, used for debugging and tests.
    pub name: String,
    /// What the node stands for.
    pub kind: NodeKind,
    /// Local-to-world transform of the node.
    pub transform: Mat4,
}

impl RenderNode {
    /// Creates a node at the identity transform.
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            transform: Mat4::IDENTITY,
        }
    }

    /// Sets the node's transform, builder style.
    pub fn with_transform(mut self, transform: Mat4) -> Self {
        self.transform = transform;
        self
    }
}

/// A render-state modifier applied to everything the entity draws afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct StateOp {
    /// Identifier of the state change.
    pub name: String,
    /// Optional color multiplier.
    pub tint: Option<LinearRgba>,
}

impl StateOp {
    /// Creates a named state change without a tint.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tint: None,
        }
    }

    /// Creates a named tint.
    pub fn tinted(name: impl Into<String>, tint: LinearRgba) -> Self {
        Self {
            name: name.into(),
            tint: Some(tint),
        }
    }
}

/// Sink for the output of entity render setup.
pub trait RenderList {
    /// Adds a renderable node.
    fn add(&mut self, node: RenderNode);
    /// Prepends a state change to the entity's render state.
    fn prepc(&mut self, state: StateOp);
}

/// What a [`DrawList`] recorded, in call order.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    /// A node was added.
    Node(RenderNode),
    /// A state change was prepended.
    State(StateOp),
}

/// A [`RenderList`] that simply records what it is given.
#[derive(Debug, Default)]
pub struct DrawList {
    calls: Vec<DrawCall>,
}

impl DrawList {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every recorded call, in order.
    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    /// The recorded nodes, in order.
    pub fn nodes(&self) -> impl Iterator<Item = &RenderNode> {
        self.calls.iter().filter_map(|c| match c {
            DrawCall::Node(n) => Some(n),
            DrawCall::State(_) => None,
        })
    }

    /// The recorded state changes, in order.
    pub fn states(&self) -> impl Iterator<Item = &StateOp> {
        self.calls.iter().filter_map(|c| match c {
            DrawCall::State(s) => Some(s),
            DrawCall::Node(_) => None,
        })
    }

    /// Names of every recorded call, in order. State changes are reported
    /// as their name as well.
    pub fn names(&self) -> Vec<&str> {
        self.calls
            .iter()
            .map(|c| match c {
                DrawCall::Node(n) => n.name.as_str(),
                DrawCall::State(s) => s.name.as_str(),
            })
            .collect()
    }

    /// Forgets everything recorded so far.
    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl RenderList for DrawList {
    fn add(&mut self, node: RenderNode) {
        self.calls.push(DrawCall::Node(node));
    }

    fn prepc(&mut self, state: StateOp) {
        self.calls.push(DrawCall::State(state));
    }
}

/// The per-entity render state that overlays may contribute to before the
/// entity itself is set up.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateBuffer {
    ops: Vec<StateOp>,
}

impl StateBuffer {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a state change.
    pub fn push(&mut self, op: StateOp) {
        self.ops.push(op);
    }

    /// Iterates the buffered changes in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, StateOp> {
        self.ops.iter()
    }

    /// Number of buffered changes.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Returns `true` if nothing is buffered.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Drops every buffered change.
    pub fn clear(&mut self) {
        self.ops.clear();
    }
}
