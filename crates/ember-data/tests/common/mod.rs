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

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use ember_core::resource::ResourceSource;
use ember_core::world::{FlatGround, GroundQuery};
use ember_core::{GobSettings, Indir, Payload, ResId, Resolution, Resource};
use ember_data::attr::kinds::IconPalette;
use ember_data::rattr::{AttrFactory, RAttrSlot, ResAttr, ResAttrKind};
use ember_data::{Glob, GobEvent, Owner};

// --- WORLD ---

/// A world on flat ground whose reclamation events land in the returned
/// receiver.
pub fn world(settings: GobSettings) -> (Arc<Glob>, flume::Receiver<GobEvent>) {
    world_on(Arc::new(FlatGround(0.0)), settings)
}

pub fn world_on(
    ground: Arc<dyn GroundQuery>,
    settings: GobSettings,
) -> (Arc<Glob>, flume::Receiver<GobEvent>) {
    let (tx, rx) = flume::unbounded();
    let glob = Glob::new(ground, Arc::new(settings), IconPalette::new(), tx);
    (Arc::new(glob), rx)
}

// --- RESOURCES ---

/// Resolves a single resource, reporting it as loading for the first
/// `loading_polls` polls.
pub struct ScriptedSource {
    resource: Arc<Resource>,
    loading_polls: usize,
    polls: AtomicUsize,
}

impl ScriptedSource {
    pub fn new(resource: Resource, loading_polls: usize) -> Arc<Self> {
        Arc::new(Self {
            resource: Arc::new(resource),
            loading_polls,
            polls: AtomicUsize::new(0),
        })
    }

    pub fn indir(self: &Arc<Self>, id: u32) -> Indir {
        Indir::new(ResId(id), Arc::clone(self) as Arc<dyn ResourceSource>)
    }

    pub fn polls(&self) -> usize {
        self.polls.load(Ordering::SeqCst)
    }
}

impl ResourceSource for ScriptedSource {
    fn resolve(&self, _id: ResId) -> Resolution<Arc<Resource>> {
        let n = self.polls.fetch_add(1, Ordering::SeqCst);
        if n < self.loading_polls {
            Resolution::Pending
        } else {
            Resolution::Ready(Arc::clone(&self.resource))
        }
    }
}

// --- RESOURCE ATTRIBUTES ---

/// A resource attribute that remembers its payload.
pub struct Tag {
    pub payload: Payload,
}

impl ResAttr for Tag {
    fn slot(&self) -> RAttrSlot {
        Tag::SLOT
    }
}

impl ResAttrKind for Tag {
    const SLOT: RAttrSlot = RAttrSlot("tag");
}

/// Builds [`Tag`]s and counts how many it built.
#[derive(Default)]
pub struct CountingFactory {
    made: AtomicUsize,
}

impl CountingFactory {
    pub fn made(&self) -> usize {
        self.made.load(Ordering::SeqCst)
    }
}

impl AttrFactory for CountingFactory {
    fn make(&self, _owner: &Owner, payload: Payload) -> Box<dyn ResAttr> {
        self.made.fetch_add(1, Ordering::SeqCst);
        Box::new(Tag { payload })
    }
}

/// A resource publishing `factory` as its attribute factory.
pub fn tag_resource(name: &str, factory: &Arc<CountingFactory>) -> Resource {
    let factory: Arc<dyn AttrFactory> = factory.clone();
    Resource::new(name, 1).publish(factory)
}
