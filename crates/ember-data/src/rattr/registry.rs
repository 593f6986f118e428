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

use std::sync::Arc;

use ember_core::{Indir, Payload, Resolution, ResolveError};

use super::{AttrFactory, RAttrSlot, ResAttrCell, ResAttrKind, FACTORY_CAPABILITY};
use crate::error::GobError;
use crate::gob::Owner;

/// A resource attribute request waiting for its resource.
#[derive(Debug, Clone)]
struct PendingLoad {
    res: Indir,
    payload: Payload,
}

/// Per-entity resource attributes: resolved cells plus the loads still
/// waiting for their resource.
///
/// A handle is bound to at most one cell, and a slot to at most one handle.
#[derive(Debug, Default)]
pub struct ResAttrRegistry {
    cells: Vec<ResAttrCell>,
    pending: Vec<PendingLoad>,
    failures: Vec<(Indir, ResolveError)>,
}

impl ResAttrRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the resource attribute defined by `res` to `payload`.
    ///
    /// Re-sending the payload a cell already carries is a no-op. A changed
    /// payload is first offered to the live attribute's
    /// [`ResAttr::update`]; if it declines, the attribute is rebuilt. The
    /// rebuild is attempted immediately and retried on later ticks while the
    /// resource is loading.
    pub fn set(&mut self, owner: &Owner, res: Indir, payload: Payload) -> Result<(), GobError> {
        if let Some(cell) = self.cells.iter_mut().find(|c| c.res.as_ref() == Some(&res)) {
            if cell.payload.as_ref() == Some(&payload) {
                return Ok(());
            }
            if let Some(attr) = cell.attr.as_mut() {
                if attr.update(&payload) {
                    log::trace!("Resource attribute {} updated in place.", cell.slot);
                    cell.payload = Some(payload);
                    return Ok(());
                }
            }
        }

        self.pending.retain(|load| load.res != res);
        self.failures.retain(|(failed, _)| *failed != res);
        self.pending.push(PendingLoad { res, payload });
        self.resolve_pending(owner)
    }

    /// Removes the resource attribute defined by `res`: its resolved cell,
    /// and any load for `res` still waiting to rebuild it. Unknown handles
    /// are ignored.
    pub fn delete(&mut self, res: &Indir) {
        self.failures.retain(|(failed, _)| failed != res);
        if let Some(pos) = self.cells.iter().position(|c| c.res.as_ref() == Some(res)) {
            let mut cell = self.cells.remove(pos);
            log::debug!("Removing resource attribute {} ({:?}).", cell.slot, res);
            cell.dispose();
        }
        self.pending.retain(|load| load.res != *res);
    }

    /// Tries to resolve every pending load.
    ///
    /// Loads whose resource is still loading stay queued. Loads whose
    /// resource failed, or does not publish an attribute factory, are moved
    /// to [`ResAttrRegistry::failures`].
    ///
    /// # Errors
    ///
    /// Returns [`GobError::ConflictingResourceIds`] when a resolved attribute
    /// lands in a slot already bound to a different resource. The offending
    /// load stays queued and no cell is modified; the remaining loads are
    /// still attempted and the first conflict is returned.
    pub fn resolve_pending(&mut self, owner: &Owner) -> Result<(), GobError> {
        let mut conflict = None;
        let mut i = 0;
        while i < self.pending.len() {
            let outcome = self.pending[i].res.get().map(|res| {
                res.require::<Arc<dyn AttrFactory>>(FACTORY_CAPABILITY)
                    .cloned()
            });
            let factory = match outcome {
                Resolution::Pending => {
                    i += 1;
                    continue;
                }
                Resolution::Ready(Ok(factory)) => factory,
                Resolution::Ready(Err(err)) | Resolution::Failed(err) => {
                    let load = self.pending.remove(i);
                    log::warn!(
                        "Dropping resource attribute {:?} of {}: {err}",
                        load.res,
                        owner.id
                    );
                    self.failures.push((load.res, err));
                    continue;
                }
            };

            let load = &self.pending[i];
            let mut attr = factory.make(owner, load.payload.clone());
            let slot = attr.slot();
            let bound = self
                .cells
                .iter()
                .find(|c| c.slot == slot)
                .and_then(|c| c.res.as_ref());
            if let Some(bound) = bound {
                if *bound != load.res {
                    let err = GobError::ConflictingResourceIds {
                        slot,
                        bound: bound.id(),
                        incoming: load.res.id(),
                    };
                    attr.dispose();
                    log::error!("{err} on {}", owner.id);
                    conflict.get_or_insert(err);
                    i += 1;
                    continue;
                }
            }

            let load = self.pending.remove(i);
            let cell = self.cell_mut_or_insert(slot);
            if cell.res.is_none() {
                cell.res = Some(load.res);
            }
            cell.payload = Some(load.payload);
            cell.install(attr);
            log::debug!("Resolved resource attribute {slot} on {}.", owner.id);
        }
        conflict.map_or(Ok(()), Err)
    }

    fn cell_mut_or_insert(&mut self, slot: RAttrSlot) -> &mut ResAttrCell {
        let pos = match self.cells.iter().position(|c| c.slot == slot) {
            Some(pos) => pos,
            None => {
                self.cells.push(ResAttrCell::new(slot));
                self.cells.len() - 1
            }
        };
        &mut self.cells[pos]
    }

    /// The live attribute of type `T`, if resolved.
    pub fn get<T: ResAttrKind>(&self) -> Option<&T> {
        self.cell(T::SLOT)
            .and_then(|c| c.attr.as_deref())
            .and_then(|a| a.as_any().downcast_ref::<T>())
    }

    /// Mutable variant of [`ResAttrRegistry::get`].
    pub fn get_mut<T: ResAttrKind>(&mut self) -> Option<&mut T> {
        self.cells
            .iter_mut()
            .find(|c| c.slot == T::SLOT)
            .and_then(|c| c.attr.as_deref_mut())
            .and_then(|a| a.as_any_mut().downcast_mut::<T>())
    }

    /// The resolved cell for `slot`.
    pub fn cell(&self, slot: RAttrSlot) -> Option<&ResAttrCell> {
        self.cells.iter().find(|c| c.slot == slot)
    }

    /// The resolved cells.
    pub fn cells(&self) -> &[ResAttrCell] {
        &self.cells
    }

    /// Number of loads still waiting for their resource.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Returns `true` if a load for `res` is waiting.
    pub fn is_pending(&self, res: &Indir) -> bool {
        self.pending.iter().any(|load| load.res == *res)
    }

    /// Requests that can never resolve, with the reason.
    pub fn failures(&self) -> &[(Indir, ResolveError)] {
        &self.failures
    }

    /// Disposes every live attribute and forgets all pending work.
    pub fn dispose_all(&mut self) {
        for mut cell in self.cells.drain(..) {
            cell.dispose();
        }
        self.pending.clear();
        self.failures.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gob::GobId;
    use crate::rattr::ResAttr;
    use ember_core::math::Vec2;
    use ember_core::resource::ResourcePool;
    use ember_core::{ResId, Resource};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Tag {
        payload: Payload,
        disposed: Arc<AtomicUsize>,
        accepts_updates: bool,
    }

    impl ResAttr for Tag {
        fn slot(&self) -> RAttrSlot {
            RAttrSlot("tag")
        }
        fn update(&mut self, payload: &Payload) -> bool {
            if self.accepts_updates {
                self.payload = payload.clone();
            }
            self.accepts_updates
        }
        fn dispose(&mut self) {
            self.disposed.fetch_add(1, Ordering::SeqCst);
        }
    }

    impl ResAttrKind for Tag {
        const SLOT: RAttrSlot = RAttrSlot("tag");
    }

    #[derive(Default)]
    struct TagFactory {
        made: AtomicUsize,
        disposed: Arc<AtomicUsize>,
        accepts_updates: bool,
    }

    impl AttrFactory for TagFactory {
        fn make(&self, _owner: &Owner, payload: Payload) -> Box<dyn ResAttr> {
            self.made.fetch_add(1, Ordering::SeqCst);
            Box::new(Tag {
                payload,
                disposed: Arc::clone(&self.disposed),
                accepts_updates: self.accepts_updates,
            })
        }
    }

    fn owner() -> Owner {
        Owner {
            id: GobId(7),
            rc: Vec2::new(10.0, 10.0),
            angle: 0.0,
            is_virtual: false,
        }
    }

    fn publish(pool: &ResourcePool, id: u32, factory: &Arc<TagFactory>) {
        let factory: Arc<dyn AttrFactory> = factory.clone();
        pool.insert(ResId(id), Resource::new(format!("gfx/tag{id}"), 1).publish(factory));
    }

    #[test]
    fn test_ready_resource_resolves_immediately() {
        let pool = Arc::new(ResourcePool::new());
        let factory = Arc::new(TagFactory::default());
        publish(&pool, 1, &factory);
        let mut reg = ResAttrRegistry::new();

        reg.set(&owner(), pool.indir(ResId(1)), Payload::from("v1"))
            .unwrap();

        assert_eq!(reg.pending_len(), 0);
        let tag = reg.get::<Tag>().expect("attribute should be resolved");
        assert_eq!(tag.payload, Payload::from("v1"));
    }

    #[test]
    fn test_changed_payload_prefers_in_place_update() {
        let pool = Arc::new(ResourcePool::new());
        let factory = Arc::new(TagFactory {
            accepts_updates: true,
            ..Default::default()
        });
        publish(&pool, 1, &factory);
        let mut reg = ResAttrRegistry::new();
        let h1 = pool.indir(ResId(1));

        reg.set(&owner(), h1.clone(), Payload::from("v1")).unwrap();
        reg.set(&owner(), h1.clone(), Payload::from("v2")).unwrap();

        assert_eq!(factory.made.load(Ordering::SeqCst), 1);
        assert_eq!(reg.get::<Tag>().map(|t| t.payload.clone()), Some(Payload::from("v2")));
        assert_eq!(
            reg.cell(Tag::SLOT).and_then(|c| c.payload().cloned()),
            Some(Payload::from("v2"))
        );
    }

    #[test]
    fn test_declined_update_rebuilds_and_disposes_old() {
        let pool = Arc::new(ResourcePool::new());
        let factory = Arc::new(TagFactory::default());
        publish(&pool, 1, &factory);
        let mut reg = ResAttrRegistry::new();
        let h1 = pool.indir(ResId(1));

        reg.set(&owner(), h1.clone(), Payload::from("v1")).unwrap();
        reg.set(&owner(), h1, Payload::from("v2")).unwrap();

        assert_eq!(factory.made.load(Ordering::SeqCst), 2);
        assert_eq!(factory.disposed.load(Ordering::SeqCst), 1);
        assert_eq!(reg.get::<Tag>().map(|t| t.payload.clone()), Some(Payload::from("v2")));
    }

    #[test]
    fn test_delete_removes_resolved_cell() {
        let pool = Arc::new(ResourcePool::new());
        let factory = Arc::new(TagFactory::default());
        publish(&pool, 1, &factory);
        let mut reg = ResAttrRegistry::new();
        let h1 = pool.indir(ResId(1));
        reg.set(&owner(), h1.clone(), Payload::from("v1")).unwrap();

        reg.delete(&h1);

        assert!(reg.get::<Tag>().is_none());
        assert!(reg.cells().is_empty());
        assert_eq!(factory.disposed.load(Ordering::SeqCst), 1);

        // Deleting again is a no-op.
        reg.delete(&h1);
    }

    #[test]
    fn test_delete_drops_pending_load() {
        let pool = Arc::new(ResourcePool::new());
        let mut reg = ResAttrRegistry::new();
        let h1 = pool.indir(ResId(1));
        reg.set(&owner(), h1.clone(), Payload::from("v1")).unwrap();
        assert!(reg.is_pending(&h1));

        reg.delete(&h1);

        assert_eq!(reg.pending_len(), 0);
    }

    #[test]
    fn test_delete_during_rebuild_does_not_resurrect() {
        // --- 1. SETUP ---
        let pool = Arc::new(ResourcePool::new());
        let factory = Arc::new(TagFactory::default());
        publish(&pool, 1, &factory);
        let mut reg = ResAttrRegistry::new();
        let h1 = pool.indir(ResId(1));
        reg.set(&owner(), h1.clone(), Payload::from("v1")).unwrap();

        // The resource reloads, so the declined update has to wait.
        pool.mark_loading(ResId(1));
        reg.set(&owner(), h1.clone(), Payload::from("v2")).unwrap();
        assert!(reg.is_pending(&h1));

        // --- 2. ACT ---
        reg.delete(&h1);
        publish(&pool, 1, &factory);
        reg.resolve_pending(&owner()).unwrap();

        // --- 3. ASSERT ---
        assert!(reg.get::<Tag>().is_none(), "Deleted attribute must stay deleted");
        assert_eq!(reg.pending_len(), 0);
        assert!(reg.cells().is_empty());
        assert_eq!(factory.made.load(Ordering::SeqCst), 1);
    }

    struct Other;

    impl ResAttr for Other {
        fn slot(&self) -> RAttrSlot {
            RAttrSlot("other")
        }
    }

    impl ResAttrKind for Other {
        const SLOT: RAttrSlot = RAttrSlot("other");
    }

    struct OtherFactory;

    impl AttrFactory for OtherFactory {
        fn make(&self, _owner: &Owner, _payload: Payload) -> Box<dyn ResAttr> {
            Box::new(Other)
        }
    }

    #[test]
    fn test_conflict_does_not_block_later_loads() {
        // --- 1. SETUP ---
        let pool = Arc::new(ResourcePool::new());
        let factory = Arc::new(TagFactory::default());
        publish(&pool, 1, &factory);
        let mut reg = ResAttrRegistry::new();
        reg.set(&owner(), pool.indir(ResId(1)), Payload::from("a")).unwrap();

        pool.mark_loading(ResId(2));
        pool.mark_loading(ResId(3));
        reg.set(&owner(), pool.indir(ResId(2)), Payload::from("b")).unwrap();
        reg.set(&owner(), pool.indir(ResId(3)), Payload::from("c")).unwrap();

        // --- 2. ACT ---
        publish(&pool, 2, &factory);
        let other: Arc<dyn AttrFactory> = Arc::new(OtherFactory);
        pool.insert(ResId(3), Resource::new("gfx/other", 1).publish(other));
        let result = reg.resolve_pending(&owner());

        // --- 3. ASSERT ---
        assert_eq!(
            result,
            Err(GobError::ConflictingResourceIds {
                slot: RAttrSlot("tag"),
                bound: ResId(1),
                incoming: ResId(2),
            })
        );
        assert!(reg.get::<Other>().is_some(), "Loads behind a conflict still resolve");
        assert_eq!(reg.pending_len(), 1, "Only the conflicting load stays queued");
    }

    #[test]
    fn test_missing_factory_is_a_recorded_failure() {
        // --- 1. SETUP ---
        let pool = Arc::new(ResourcePool::new());
        pool.insert(ResId(5), Resource::new("gfx/plain", 1));
        let mut reg = ResAttrRegistry::new();
        let h5 = pool.indir(ResId(5));

        // --- 2. ACT ---
        reg.set(&owner(), h5.clone(), Payload::from("x")).unwrap();

        // --- 3. ASSERT ---
        assert_eq!(reg.pending_len(), 0, "Permanent failures must not be retried");
        assert_eq!(
            reg.failures(),
            &[(
                h5.clone(),
                ResolveError::MissingCapability {
                    resource: "gfx/plain".to_string(),
                    capability: FACTORY_CAPABILITY,
                }
            )]
        );

        // A new request for the same handle clears the record and retries.
        let factory = Arc::new(TagFactory::default());
        publish(&pool, 5, &factory);
        reg.set(&owner(), h5, Payload::from("x")).unwrap();
        assert!(reg.failures().is_empty());
        assert!(reg.get::<Tag>().is_some());
    }

    #[test]
    fn test_dispose_all_disposes_live_attributes() {
        let pool = Arc::new(ResourcePool::new());
        let factory = Arc::new(TagFactory::default());
        publish(&pool, 1, &factory);
        let mut reg = ResAttrRegistry::new();
        reg.set(&owner(), pool.indir(ResId(1)), Payload::from("v1")).unwrap();
        reg.set(&owner(), pool.indir(ResId(2)), Payload::from("v1")).unwrap();

        reg.dispose_all();

        assert_eq!(factory.disposed.load(Ordering::SeqCst), 1);
        assert_eq!(reg.pending_len(), 0);
        assert!(reg.cells().is_empty());
    }
}
