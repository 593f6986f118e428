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

mod common;

use std::sync::{Arc, Mutex};

use common::{tag_resource, world, CountingFactory, ScriptedSource, Tag};
use ember_core::math::{Vec2, Vec3};
use ember_core::render::{RenderList, ViewState};
use ember_core::resource::ResourceSource;
use ember_core::world::FlatGround;
use ember_core::{GobSettings, Indir, Payload, ResId, Resolution, Resource};
use ember_data::attr::kinds::{DrawOffset, LinMove};
use ember_data::overlay::Sprite;
use ember_data::rattr::RAttrSlot;
use ember_data::{
    AttrSlot, Attribute, Gob, GobCache, GobError, GobEvent, GobId, Overlay, RenderCtx,
    ResAttrKind,
};

// --- DUMMY SPRITES FOR THIS TEST ---

/// Reports itself finished on every tick.
struct AlwaysDone;

impl Sprite for AlwaysDone {
    fn tick(&mut self, _dt: f32) -> bool {
        true
    }
    fn setup(&self, _rl: &mut dyn RenderList, _ctx: &RenderCtx<'_>) {}
}

type CallLog = Arc<Mutex<Vec<&'static str>>>;

fn record(log: &CallLog, what: &'static str) {
    log.lock().unwrap().push(what);
}

/// Records each tick.
struct LoggedAttr(CallLog);

impl Attribute for LoggedAttr {
    fn slot(&self) -> AttrSlot {
        AttrSlot::Custom("logged")
    }
    fn tick(&mut self, _dt: f32) {
        record(&self.0, "attribute");
    }
}

/// Records each tick and never finishes.
struct LoggedSprite(CallLog);

impl Sprite for LoggedSprite {
    fn tick(&mut self, _dt: f32) -> bool {
        record(&self.0, "overlay");
        false
    }
    fn setup(&self, _rl: &mut dyn RenderList, _ctx: &RenderCtx<'_>) {}
}

/// Records each resolution attempt and never finishes loading.
struct LoggedSource(CallLog);

impl ResourceSource for LoggedSource {
    fn resolve(&self, _id: ResId) -> Resolution<Arc<Resource>> {
        record(&self.0, "resource attribute");
        Resolution::Pending
    }
}

#[test]
fn test_setting_same_slot_replaces_attribute() {
    let (glob, _events) = world(GobSettings::new());
    let mut gob = Gob::new(glob, Vec2::new(1.0, 1.0), GobId(1), 0);

    gob.set_attr(DrawOffset::new(Vec3::new(0.0, 0.0, 1.0)));
    assert_eq!(
        gob.attr::<DrawOffset>().map(|d| d.offset),
        Some(Vec3::new(0.0, 0.0, 1.0))
    );

    gob.set_attr(DrawOffset::new(Vec3::new(0.0, 0.0, 2.0)));
    assert_eq!(
        gob.attr::<DrawOffset>().map(|d| d.offset),
        Some(Vec3::new(0.0, 0.0, 2.0)),
        "Second attribute must replace the first"
    );
    assert_eq!(gob.attrs().len(), 1);
}

#[test]
fn test_rattr_resolves_on_the_tick_the_resource_becomes_ready() {
    // --- 1. ARRANGE ---
    // The handle is polled once by set_rattr itself, then once per tick.
    let factory = Arc::new(CountingFactory::default());
    let source = ScriptedSource::new(tag_resource("gfx/tag", &factory), 4);
    let (glob, _events) = world(GobSettings::new());
    let mut gob = Gob::new(glob, Vec2::new(10.0, 10.0), GobId(7), 0);

    gob.set_rattr(source.indir(1), Payload::from("v1")).unwrap();

    // --- 2. ACT & 3. ASSERT ---
    for tick in 1..=3 {
        gob.tick(0.05).unwrap();
        assert!(
            gob.rattr::<Tag>().is_none(),
            "Attribute must be absent while loading (tick {tick})"
        );
    }

    gob.tick(0.05).unwrap();
    let tag = gob.rattr::<Tag>().expect("Attribute should exist after tick 4");
    assert_eq!(tag.payload, Payload::from("v1"));
    assert_eq!(factory.made(), 1);
}

#[test]
fn test_repeated_rattr_before_resolution_constructs_once() {
    let factory = Arc::new(CountingFactory::default());
    let source = ScriptedSource::new(tag_resource("gfx/tag", &factory), 3);
    let (glob, _events) = world(GobSettings::new());
    let mut gob = Gob::new(glob, Vec2::ZERO, GobId(7), 0);
    let h1 = source.indir(1);

    gob.set_rattr(h1.clone(), Payload::from("v1")).unwrap();
    gob.set_rattr(h1.clone(), Payload::from("v1")).unwrap();
    assert_eq!(gob.rattrs().pending_len(), 1, "Second request supersedes the first");

    for _ in 0..5 {
        gob.tick(0.05).unwrap();
    }
    gob.set_rattr(h1, Payload::from("v1")).unwrap();

    assert_eq!(factory.made(), 1, "Identical payload must not rebuild");
    assert_eq!(gob.rattrs().pending_len(), 0);
}

#[test]
fn test_conflicting_resource_ids_are_rejected() {
    // --- 1. ARRANGE ---
    let factory = Arc::new(CountingFactory::default());
    let first = ScriptedSource::new(tag_resource("gfx/tag-a", &factory), 0);
    let second = ScriptedSource::new(tag_resource("gfx/tag-b", &factory), 0);
    let (glob, _events) = world(GobSettings::new());
    let mut gob = Gob::new(glob, Vec2::ZERO, GobId(7), 0);
    gob.set_rattr(first.indir(1), Payload::from("a")).unwrap();

    // --- 2. ACT ---
    let result = gob.set_rattr(second.indir(2), Payload::from("b"));

    // --- 3. ASSERT ---
    assert_eq!(
        result,
        Err(GobError::ConflictingResourceIds {
            slot: RAttrSlot("tag"),
            bound: ResId(1),
            incoming: ResId(2),
        })
    );
    let cell = gob.rattrs().cell(Tag::SLOT).expect("Cell should survive");
    assert_eq!(cell.res().map(|r| r.id()), Some(ResId(1)));
    assert_eq!(gob.rattr::<Tag>().map(|t| t.payload.clone()), Some(Payload::from("a")));
    assert!(gob.tick(0.05).is_err(), "Conflicting load stays queued");
}

#[test]
fn test_no_auto_expire_overlay_survives_completion() {
    let (glob, _events) = world(GobSettings::new());
    let mut gob = Gob::new(glob, Vec2::ZERO, GobId(3), 0);
    gob.add_overlay(Overlay::direct(Box::new(AlwaysDone)).with_no_auto_expire());

    for _ in 0..100 {
        gob.tick(0.05).unwrap();
    }

    assert_eq!(gob.overlays().len(), 1);
}

#[test]
fn test_virtual_entity_signals_reclamation_once() {
    // --- 1. ARRANGE ---
    let (glob, events) = world(GobSettings::new());
    let mut gob = Gob::new_virtual(glob, Vec2::new(4.0, 4.0), GobId(-1));
    gob.add_overlay(Overlay::direct(Box::new(AlwaysDone)));

    // --- 2. ACT ---
    for _ in 0..5 {
        gob.tick(0.05).unwrap();
    }

    // --- 3. ASSERT ---
    assert!(gob.overlays().is_empty());
    let signals: Vec<_> = events.try_iter().collect();
    assert_eq!(signals, vec![GobEvent::Reclaim(GobId(-1))]);
}

#[test]
fn test_server_entity_never_signals_reclamation() {
    let (glob, events) = world(GobSettings::new());
    let mut gob = Gob::new(glob, Vec2::new(4.0, 4.0), GobId(9), 0);

    gob.tick(0.05).unwrap();

    assert!(events.try_recv().is_err());
}

#[test]
fn test_move_without_movement_attribute() {
    let (glob, _events) = world(GobSettings::new());
    let mut gob = Gob::new(glob, Vec2::new(10.0, 10.0), GobId(7), 0);

    gob.move_to(Vec2::new(5.0, 5.0), 0.0);
    gob.move_to(Vec2::new(5.0, 5.0), 1.57);

    assert_eq!(gob.rc(), Vec2::new(5.0, 5.0));
    assert_eq!(gob.angle(), 1.57);
    assert_eq!(gob.velocity(), 0.0);
}

#[test]
fn test_move_is_forwarded_to_movement_attribute() {
    let (glob, _events) = world(GobSettings::new());
    let mut gob = Gob::new(glob, Vec2::ZERO, GobId(7), 0);
    gob.set_attr(LinMove::new(Vec2::ZERO, Vec2::ZERO, 2.0));

    gob.move_to(Vec2::new(6.0, 0.0), 0.5);
    gob.tick(1.0).unwrap();

    assert_eq!(gob.rc(), Vec2::new(6.0, 0.0));
    assert_eq!(gob.attr::<LinMove>().map(LinMove::current), Some(Vec2::new(2.0, 0.0)));
    assert_eq!(gob.position().ready(), Some(Vec3::new(2.0, 0.0, 0.0)));
    assert_eq!(gob.velocity(), 2.0);
}

#[test]
fn test_path_overlay_follows_movement_slot() {
    // --- 1. ARRANGE ---
    let settings = GobSettings::new();
    settings.set_show_gob_paths(true);
    let (glob, _events) = world(settings);
    let mut gob = Gob::new(glob, Vec2::ZERO, GobId(7), 0);

    // --- 2. ACT ---
    gob.set_attr(LinMove::new(Vec2::ZERO, Vec2::new(8.0, 0.0), 1.0));
    gob.set_attr(LinMove::new(Vec2::ZERO, Vec2::new(0.0, 8.0), 1.0));

    // --- 3. ASSERT ---
    assert_eq!(gob.overlays().len(), 1, "Replacing the movement keeps one trail");

    let removed = gob.del_attr(AttrSlot::Moving);
    assert!(removed.is_some());
    gob.tick(0.05).unwrap();
    assert!(gob.overlays().is_empty(), "Trail expires once movement stops");
}

#[test]
fn test_render_setup_never_asks_for_retry() {
    let (glob, _events) = world(GobSettings::new());
    let mut gob = Gob::new(glob, Vec2::new(3.0, 4.0), GobId(7), 0);
    let mut list = ember_core::render::DrawList::new();

    assert!(!gob.render_setup(&ViewState::default(), &mut list));
    assert_eq!(gob.binding().translation(), Vec3::new(3.0, -4.0, 0.0));
}

#[test]
fn test_tick_runs_attributes_then_overlays_then_resource_attributes() {
    // --- 1. ARRANGE ---
    let calls: CallLog = Arc::default();
    let (glob, _events) = world(GobSettings::new());
    let mut gob = Gob::new(glob, Vec2::ZERO, GobId(7), 0);
    gob.set_attr(LoggedAttr(Arc::clone(&calls)));
    gob.add_overlay(Overlay::direct(Box::new(LoggedSprite(Arc::clone(&calls)))));
    let source: Arc<dyn ResourceSource> = Arc::new(LoggedSource(Arc::clone(&calls)));
    gob.set_rattr(Indir::new(ResId(1), source), Payload::from("v1"))
        .unwrap();
    calls.lock().unwrap().clear();

    // --- 2. ACT ---
    gob.tick(0.05).unwrap();
    gob.tick(0.05).unwrap();

    // --- 3. ASSERT ---
    assert_eq!(
        *calls.lock().unwrap(),
        vec![
            "attribute",
            "overlay",
            "resource attribute",
            "attribute",
            "overlay",
            "resource attribute",
        ]
    );
}

#[test]
fn test_movement_removed_before_tick_expires_trail_in_that_tick() {
    let settings = GobSettings::new();
    settings.set_show_gob_paths(true);
    let (glob, events) = world(settings);
    let mut gob = Gob::new_virtual(glob, Vec2::new(1.0, 1.0), GobId(-4));
    gob.set_attr(LinMove::new(Vec2::ZERO, Vec2::new(8.0, 0.0), 1.0));
    gob.tick(0.05).unwrap();
    assert_eq!(gob.overlays().len(), 1);

    gob.del_attr(AttrSlot::Moving);
    gob.tick(0.05).unwrap();

    assert!(gob.overlays().is_empty());
    let signals: Vec<_> = events.try_iter().collect();
    assert_eq!(
        signals,
        vec![GobEvent::Reclaim(GobId(-4))],
        "The emptied overlay list is seen by the same tick"
    );
}

#[test]
fn test_conflict_on_one_entity_does_not_stall_the_cache() {
    // --- 1. ARRANGE ---
    let factory = Arc::new(CountingFactory::default());
    let first = ScriptedSource::new(tag_resource("gfx/tag-a", &factory), 0);
    let second = ScriptedSource::new(tag_resource("gfx/tag-b", &factory), 0);
    let third = ScriptedSource::new(tag_resource("gfx/tag-c", &factory), 2);
    let mut cache = GobCache::new(Arc::new(FlatGround(0.0)), Arc::new(GobSettings::new()));

    let one = cache.spawn(GobId(1), Vec2::ZERO, 0);
    one.set_rattr(first.indir(1), Payload::from("a")).unwrap();
    assert!(one.set_rattr(second.indir(2), Payload::from("b")).is_err());
    cache
        .spawn(GobId(2), Vec2::ZERO, 0)
        .set_rattr(third.indir(3), Payload::from("c"))
        .unwrap();

    // --- 2. ACT ---
    let results: Vec<_> = (0..3).map(|_| cache.tick_all(0.05)).collect();

    // --- 3. ASSERT ---
    assert!(
        results.iter().all(Result::is_err),
        "The conflict is reported on every tick"
    );
    let two = cache.get(GobId(2)).expect("Entity 2 should exist");
    assert_eq!(
        two.rattr::<Tag>().map(|t| t.payload.clone()),
        Some(Payload::from("c")),
        "Entities after the conflicting one keep ticking"
    );
}
