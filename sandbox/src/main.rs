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

// Ember Sandbox
// Spawns a handful of entities and runs them through ticks and render passes.

use std::sync::Arc;

use anyhow::{Context, Result};
use ember_core::math::{Mat4, Vec2, Vec3};
use ember_core::render::{DrawList, NodeKind, RenderList, RenderNode, ViewState};
use ember_core::resource::ResourcePool;
use ember_core::world::FlatGround;
use ember_core::{GobSettings, Payload, ResId, Resource};
use ember_data::attr::kinds::{GobHealth, IconPalette, KinInfo, LinMove, ResDrawable, Speaking};
use ember_data::attr::AsAny;
use ember_data::gob::PLAYER_RES;
use ember_data::overlay::{Overlay, OverlayId, Sprite, SpriteFactory};
use ember_data::rattr::{AttrFactory, RAttrSlot, ResAttr};
use ember_data::{GobCache, GobId, Owner, RenderCtx};

const TICK: f32 = 0.05;

/// A puff of smoke that lasts as many ticks as its payload's first byte.
struct Puff {
    left: u8,
}

impl Sprite for Puff {
    fn tick(&mut self, _dt: f32) -> bool {
        self.left = self.left.saturating_sub(1);
        self.left == 0
    }

    fn setup(&self, rl: &mut dyn RenderList, ctx: &RenderCtx<'_>) {
        rl.add(RenderNode::new("puff", NodeKind::Sprite).with_transform(ctx.binding.world()));
    }
}

struct PuffFactory;

impl SpriteFactory for PuffFactory {
    fn create(&self, _owner: &Owner, _res: &Resource, payload: Payload) -> Box<dyn Sprite> {
        let left = payload.reader().uint8().unwrap_or(1);
        Box::new(Puff { left })
    }
}

/// A resource attribute recording the tool an entity holds.
struct Equipment {
    tool: String,
}

impl ResAttr for Equipment {
    fn slot(&self) -> RAttrSlot {
        RAttrSlot("equipment")
    }

    fn update(&mut self, payload: &Payload) -> bool {
        match payload.reader().string() {
            Ok(tool) => {
                self.tool = tool.to_string();
                true
            }
            Err(_) => false,
        }
    }
}

struct EquipmentFactory;

impl AttrFactory for EquipmentFactory {
    fn make(&self, owner: &Owner, payload: Payload) -> Box<dyn ResAttr> {
        let tool = payload
            .reader()
            .string()
            .map(str::to_string)
            .unwrap_or_default();
        log::info!("{} equips '{tool}'.", owner.id);
        Box::new(Equipment { tool })
    }
}

fn load_settings() -> Result<GobSettings> {
    match std::env::args().nth(1) {
        Some(path) => {
            GobSettings::load(&path).with_context(|| format!("loading settings from {path}"))
        }
        None => {
            let settings = GobSettings::new();
            settings.set_show_gob_paths(true);
            settings.set_show_gob_info(true);
            Ok(settings)
        }
    }
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    let settings = Arc::new(load_settings()?);
    let pool = Arc::new(ResourcePool::new());
    let palette = IconPalette::new().with(PLAYER_RES, "gfx/hud/mmap/player");
    let mut cache = GobCache::with_palette(
        Arc::new(FlatGround(0.0)),
        Arc::clone(&settings),
        palette,
    );

    // Resources 1 and 3 arrive later, as they would from the network.
    pool.mark_loading(ResId(1));
    pool.insert(
        ResId(2),
        Resource::new("gfx/fx/puff", 1).publish::<Arc<dyn SpriteFactory>>(Arc::new(PuffFactory)),
    );
    pool.mark_loading(ResId(3));

    let player = GobId(100);
    {
        let gob = cache.spawn(player, Vec2::new(10.0, 10.0), 0);
        gob.set_attr(ResDrawable::new(pool.indir(ResId(1))));
        gob.set_attr(LinMove::new(Vec2::new(10.0, 10.0), Vec2::new(20.0, 10.0), 5.0));
        gob.set_attr(GobHealth::new(3));
        gob.set_attr(Speaking::new("Hail!"));
        gob.set_rattr(pool.indir(ResId(3)), Payload::from(&b"axe\0"[..]))?;
    }
    {
        let gob = cache.spawn(GobId(101), Vec2::new(14.0, 12.0), 0);
        gob.set_attr(ResDrawable::new(pool.indir(ResId(1))));
        gob.set_attr(KinInfo::new("Ada", KinInfo::GREEN, 0));
    }
    let puff = cache.spawn_virtual(Vec2::new(12.0, 12.0)).id();
    if let Some(gob) = cache.get_mut(puff) {
        gob.add_overlay(Overlay::new(OverlayId(1), pool.indir(ResId(2)), Payload::from(&[6u8][..])));
    }

    let view = ViewState::new(
        Mat4::look_at_rh(Vec3::new(15.0, -30.0, 25.0), Vec3::new(15.0, -10.0, 0.0), Vec3::Z)
            .context("camera looks straight down its up axis")?,
        Mat4::perspective_rh_zo(0.8, 4.0 / 3.0, 0.1, 200.0),
        Vec2::new(800.0, 600.0),
    );
    let mut list = DrawList::new();

    for frame in 0..40u32 {
        if frame == 10 {
            pool.insert(ResId(1), Resource::new(PLAYER_RES, 4));
            pool.insert(
                ResId(3),
                Resource::new("gfx/invobjs/tools", 1)
                    .publish::<Arc<dyn AttrFactory>>(Arc::new(EquipmentFactory)),
            );
        }
        if frame == 20 {
            if let Some(gob) = cache.get_mut(player) {
                gob.move_to(Vec2::new(20.0, 20.0), 1.2);
                gob.set_rattr(pool.indir(ResId(3)), Payload::from(&b"sword\0"[..]))?;
            }
        }

        cache.tick_all(TICK)?;
        for id in cache.reclaim() {
            log::info!("Frame {frame}: reclaimed {id}.");
        }

        if frame % 10 == 9 {
            list.clear();
            cache.render_all(&view, &mut list);
            log::info!(
                "Frame {frame}: {} entities, {} draw calls: {:?}",
                cache.len(),
                list.calls().len(),
                list.names()
            );
        }
    }

    if let Some(gob) = cache.get(player) {
        let tool = gob
            .rattrs()
            .cell(RAttrSlot("equipment"))
            .and_then(|c| c.attr())
            .and_then(|a| a.as_any().downcast_ref::<Equipment>())
            .map(|e| e.tool.clone());
        log::info!(
            "Player: is_player={}, velocity={:.2}, tool={tool:?}, screen={:?}",
            gob.is_player(),
            gob.velocity(),
            gob.binding().screen()
        );
    }
    Ok(())
}
