//! FocusManager - cross-scene keyboard focus arbiter
//!
//! Per scene, every registered entity sits in exactly one of two ordered
//! lists:
//!
//! - `entities`: eligible, not focused
//! - `with_focus`: focused
//!
//! At most one `Single` entity is in `with_focus` per scene; any number of
//! `Multi` entities may be.
//!
//! # Rotation
//!
//! [`FocusManager::update_focus_for_scene`] first promotes every eligible
//! `Multi` entity, then releases the current `Single` holder to the *back* of
//! `entities`, then grants focus to the first eligible entity that can take
//! it. Repeated calls therefore rotate `Single` focus in FIFO order while
//! `Multi` holders accumulate.
//!
//! The manager stores ids only. Live focus state is read and written through
//! a [`FocusStore`], normally the scene that owns the entities.

use std::collections::HashMap;

use crate::error::FocusError;
use crate::traits::Focusable;
use crate::types::{EntityId, FocusType};

/// Lookup of focusable entities by id.
pub trait FocusStore {
    fn focusable(&self, id: EntityId) -> Option<&dyn Focusable>;

    fn focusable_mut(&mut self, id: EntityId) -> Option<&mut dyn Focusable>;
}

#[derive(Debug, Default, Clone)]
struct SceneFocus {
    entities: Vec<EntityId>,
    with_focus: Vec<EntityId>,
}

impl SceneFocus {
    fn contains(&self, id: EntityId) -> bool {
        self.entities.contains(&id) || self.with_focus.contains(&id)
    }
}

#[derive(Debug, Default)]
pub struct FocusManager {
    scenes: HashMap<String, SceneFocus>,
    locked: bool,
}

impl FocusManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// While locked, acquire, release and update succeed without doing
    /// anything. Registration still works.
    pub fn lock(&mut self) {
        self.locked = true;
    }

    pub fn unlock(&mut self) {
        self.locked = false;
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn has_scene(&self, scene: &str) -> bool {
        self.scenes.contains_key(scene)
    }

    /// Register `entity` as eligible in `scene`. Registering twice is a no-op.
    pub fn add_entity(&mut self, scene: &str, entity: &dyn Focusable) -> Result<(), FocusError> {
        let id = entity.entity_id();
        if !entity.focus_enabled() {
            return Err(FocusError::FocusDisabled(id));
        }
        let sf = self.scenes.entry(scene.to_string()).or_default();
        if !sf.contains(id) {
            sf.entities.push(id);
            tracing::debug!(scene, entity = %id, "focus registered");
        }
        Ok(())
    }

    /// Unregister an entity, then pick a replacement holder.
    pub fn remove_entity(
        &mut self,
        scene: &str,
        id: EntityId,
        store: &mut dyn FocusStore,
    ) -> Result<(), FocusError> {
        let enabled = store
            .focusable(id)
            .map(|f| f.focus_enabled())
            .ok_or(FocusError::EntityNotFound(id))?;
        if !enabled {
            return Err(FocusError::FocusDisabled(id));
        }
        if !self.forget_entity(scene, id, store) {
            return Err(FocusError::EntityNotFound(id));
        }
        self.update_focus_for_scene(scene, store)
    }

    /// Drop `id` from `scene` without checks or replacement. Clears the
    /// entity's held flag when it is in `store`. Returns whether it was
    /// registered.
    pub fn forget_entity(&mut self, scene: &str, id: EntityId, store: &mut dyn FocusStore) -> bool {
        let Some(sf) = self.scenes.get_mut(scene) else {
            return false;
        };
        let before = sf.entities.len() + sf.with_focus.len();
        sf.entities.retain(|e| *e != id);
        sf.with_focus.retain(|e| *e != id);
        let removed = sf.entities.len() + sf.with_focus.len() != before;
        if removed {
            set_held(store, id, false);
            tracing::debug!(scene, entity = %id, "focus unregistered");
        }
        removed
    }

    /// Forget every registration of `scene`.
    pub fn remove_scene(&mut self, scene: &str) -> bool {
        self.scenes.remove(scene).is_some()
    }

    /// One rotation step; see the module docs.
    pub fn update_focus_for_scene(
        &mut self,
        scene: &str,
        store: &mut dyn FocusStore,
    ) -> Result<(), FocusError> {
        if self.locked {
            return Ok(());
        }
        let sf = self
            .scenes
            .get_mut(scene)
            .ok_or_else(|| FocusError::SceneNotFound(scene.to_string()))?;

        let mut i = 0;
        while i < sf.entities.len() {
            let id = sf.entities[i];
            let promote = store
                .focusable(id)
                .is_some_and(|f| f.focus_type() == FocusType::Multi && f.can_have_focus());
            if promote {
                sf.entities.remove(i);
                grant(sf, store, id);
            } else {
                i += 1;
            }
        }

        release_single(sf, store);

        let next = sf
            .entities
            .iter()
            .position(|id| store.focusable(*id).is_some_and(|f| f.can_have_focus()));
        if let Some(pos) = next {
            let id = sf.entities.remove(pos);
            grant(sf, store, id);
        }

        tracing::debug!(scene, holders = ?sf.with_focus, "focus updated");
        Ok(())
    }

    /// Give focus to `id` out of queue order, releasing the current `Single`
    /// holder first. No-op when `id` already holds focus.
    pub fn acquire_focus_to_entity(
        &mut self,
        scene: &str,
        id: EntityId,
        store: &mut dyn FocusStore,
    ) -> Result<(), FocusError> {
        if self.locked {
            return Ok(());
        }
        // A scene with no registrations has no key here; the entity is the
        // thing that is missing.
        let sf = self
            .scenes
            .get_mut(scene)
            .ok_or(FocusError::EntityNotFound(id))?;
        if sf.with_focus.contains(&id) {
            return Ok(());
        }
        if !sf.entities.contains(&id) {
            return Err(FocusError::EntityNotFound(id));
        }

        release_single(sf, store);
        sf.entities.retain(|e| *e != id);
        grant(sf, store, id);
        Ok(())
    }

    /// Move `id` from focused back to the end of the eligible queue. No-op
    /// when it is registered but not focused.
    pub fn release_focus_from_entity(
        &mut self,
        scene: &str,
        id: EntityId,
        store: &mut dyn FocusStore,
    ) -> Result<(), FocusError> {
        if self.locked {
            return Ok(());
        }
        let sf = self
            .scenes
            .get_mut(scene)
            .ok_or(FocusError::EntityNotFound(id))?;
        match sf.with_focus.iter().position(|e| *e == id) {
            Some(pos) => {
                release_at(sf, store, pos);
                Ok(())
            }
            None if sf.entities.contains(&id) => Ok(()),
            None => Err(FocusError::EntityNotFound(id)),
        }
    }

    pub fn is_registered(&self, scene: &str, id: EntityId) -> bool {
        self.scenes.get(scene).is_some_and(|sf| sf.contains(id))
    }

    pub fn has_focus(&self, scene: &str, id: EntityId) -> bool {
        self.scenes
            .get(scene)
            .is_some_and(|sf| sf.with_focus.contains(&id))
    }

    /// Eligible, unfocused entities in queue order.
    pub fn eligible(&self, scene: &str) -> &[EntityId] {
        self.scenes.get(scene).map_or(&[], |sf| sf.entities.as_slice())
    }

    /// Focused entities in the order they gained focus.
    pub fn with_focus(&self, scene: &str) -> &[EntityId] {
        self.scenes.get(scene).map_or(&[], |sf| sf.with_focus.as_slice())
    }
}

fn set_held(store: &mut dyn FocusStore, id: EntityId, held: bool) {
    if let Some(f) = store.focusable_mut(id) {
        f.set_focus(held);
    }
}

fn grant(sf: &mut SceneFocus, store: &mut dyn FocusStore, id: EntityId) {
    sf.with_focus.push(id);
    set_held(store, id, true);
}

fn release_at(sf: &mut SceneFocus, store: &mut dyn FocusStore, pos: usize) {
    let id = sf.with_focus.remove(pos);
    sf.entities.push(id);
    set_held(store, id, false);
}

/// Release the first `Single` holder, if any, to the back of the queue.
fn release_single(sf: &mut SceneFocus, store: &mut dyn FocusStore) -> Option<EntityId> {
    let pos = sf.with_focus.iter().position(|id| {
        store
            .focusable(*id)
            .is_some_and(|f| f.focus_type() == FocusType::Single)
    })?;
    let id = sf.with_focus[pos];
    release_at(sf, store, pos);
    Some(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Identified;

    #[derive(Debug)]
    struct Stub {
        id: EntityId,
        enabled: bool,
        kind: FocusType,
        held: bool,
    }

    impl Identified for Stub {
        fn entity_id(&self) -> EntityId {
            self.id
        }
    }

    impl Focusable for Stub {
        fn focus_enabled(&self) -> bool {
            self.enabled
        }

        fn focus_type(&self) -> FocusType {
            self.kind
        }

        fn has_focus(&self) -> bool {
            self.held
        }

        fn set_focus(&mut self, held: bool) {
            self.held = held;
        }
    }

    #[derive(Default)]
    struct Store(Vec<Stub>);

    impl Store {
        fn add(&mut self, raw: u64, kind: FocusType) -> EntityId {
            let id = EntityId::from_raw(raw);
            self.0.push(Stub {
                id,
                enabled: true,
                kind,
                held: false,
            });
            id
        }

        fn held(&self, id: EntityId) -> bool {
            self.focusable(id).is_some_and(|f| f.has_focus())
        }
    }

    impl FocusStore for Store {
        fn focusable(&self, id: EntityId) -> Option<&dyn Focusable> {
            self.0.iter().find(|p| p.id == id).map(|p| p as &dyn Focusable)
        }

        fn focusable_mut(&mut self, id: EntityId) -> Option<&mut dyn Focusable> {
            self.0
                .iter_mut()
                .find(|p| p.id == id)
                .map(|p| p as &mut dyn Focusable)
        }
    }

    fn register(fm: &mut FocusManager, store: &Store) {
        for p in &store.0 {
            fm.add_entity("s", p).unwrap();
        }
    }

    fn assert_partition(fm: &FocusManager, store: &Store) {
        let eligible = fm.eligible("s");
        let focused = fm.with_focus("s");
        for p in &store.0 {
            let in_e = eligible.contains(&p.id);
            let in_f = focused.contains(&p.id);
            assert!(in_e ^ in_f, "{:?} must be in exactly one list", p.id);
            assert_eq!(in_f, p.held);
        }
        let singles = focused
            .iter()
            .filter(|id| store.focusable(**id).unwrap().focus_type() == FocusType::Single)
            .count();
        assert!(singles <= 1);
    }

    #[test]
    fn single_focus_rotates_round_robin() {
        let mut store = Store::default();
        let e1 = store.add(1, FocusType::Single);
        let e2 = store.add(2, FocusType::Single);
        let e3 = store.add(3, FocusType::Single);
        let mut fm = FocusManager::new();
        register(&mut fm, &store);

        for expected in [e1, e2, e3, e1] {
            fm.update_focus_for_scene("s", &mut store).unwrap();
            assert_eq!(fm.with_focus("s"), [expected]);
            assert!(store.held(expected));
            assert_partition(&fm, &store);
        }
    }

    #[test]
    fn multi_focus_accumulates() {
        let mut store = Store::default();
        let m1 = store.add(1, FocusType::Multi);
        let s1 = store.add(2, FocusType::Single);
        let m2 = store.add(3, FocusType::Multi);
        let s2 = store.add(4, FocusType::Single);
        let mut fm = FocusManager::new();
        register(&mut fm, &store);

        fm.update_focus_for_scene("s", &mut store).unwrap();
        assert_eq!(fm.with_focus("s"), [m1, m2, s1]);

        fm.update_focus_for_scene("s", &mut store).unwrap();
        assert_eq!(fm.with_focus("s"), [m1, m2, s2]);
        assert_eq!(fm.eligible("s"), [s1]);
        assert_partition(&fm, &store);
    }

    #[test]
    fn update_unknown_scene_errors() {
        let mut store = Store::default();
        let mut fm = FocusManager::new();
        assert_eq!(
            fm.update_focus_for_scene("nope", &mut store),
            Err(FocusError::SceneNotFound("nope".into()))
        );
    }

    #[test]
    fn add_disabled_entity_errors() {
        let mut store = Store::default();
        let id = store.add(1, FocusType::Single);
        store.0[0].enabled = false;
        let mut fm = FocusManager::new();
        assert_eq!(
            fm.add_entity("s", &store.0[0]),
            Err(FocusError::FocusDisabled(id))
        );
        assert!(!fm.is_registered("s", id));
    }

    #[test]
    fn acquire_out_of_order() {
        let mut store = Store::default();
        let e1 = store.add(1, FocusType::Single);
        let e2 = store.add(2, FocusType::Single);
        let e3 = store.add(3, FocusType::Single);
        let mut fm = FocusManager::new();
        register(&mut fm, &store);
        fm.update_focus_for_scene("s", &mut store).unwrap();

        fm.acquire_focus_to_entity("s", e3, &mut store).unwrap();
        assert_eq!(fm.with_focus("s"), [e3]);
        assert_eq!(fm.eligible("s"), [e2, e1]);
        assert!(!store.held(e1));

        // Already focused: no-op.
        fm.acquire_focus_to_entity("s", e3, &mut store).unwrap();
        assert_eq!(fm.with_focus("s"), [e3]);
        assert_partition(&fm, &store);

        assert_eq!(
            fm.acquire_focus_to_entity("s", EntityId::from_raw(99), &mut store),
            Err(FocusError::EntityNotFound(EntityId::from_raw(99)))
        );
    }

    #[test]
    fn acquire_in_scene_without_registrations_is_entity_not_found() {
        let mut store = Store::default();
        let id = store.add(1, FocusType::Single);
        let mut fm = FocusManager::new();

        assert_eq!(
            fm.acquire_focus_to_entity("empty", id, &mut store),
            Err(FocusError::EntityNotFound(id))
        );
        assert_eq!(
            fm.release_focus_from_entity("empty", id, &mut store),
            Err(FocusError::EntityNotFound(id))
        );
        assert!(!store.held(id));
    }

    #[test]
    fn release_requeues_at_end() {
        let mut store = Store::default();
        let e1 = store.add(1, FocusType::Single);
        let e2 = store.add(2, FocusType::Single);
        let mut fm = FocusManager::new();
        register(&mut fm, &store);
        fm.update_focus_for_scene("s", &mut store).unwrap();

        fm.release_focus_from_entity("s", e1, &mut store).unwrap();
        assert!(fm.with_focus("s").is_empty());
        assert_eq!(fm.eligible("s"), [e2, e1]);
        assert!(!store.held(e1));

        // Releasing an unfocused entity is a no-op.
        fm.release_focus_from_entity("s", e1, &mut store).unwrap();
        assert_eq!(fm.eligible("s"), [e2, e1]);
    }

    #[test]
    fn remove_focused_entity_picks_replacement() {
        let mut store = Store::default();
        let e1 = store.add(1, FocusType::Single);
        let e2 = store.add(2, FocusType::Single);
        let mut fm = FocusManager::new();
        register(&mut fm, &store);
        fm.update_focus_for_scene("s", &mut store).unwrap();

        fm.remove_entity("s", e1, &mut store).unwrap();
        assert!(!fm.is_registered("s", e1));
        assert!(!store.held(e1));
        assert_eq!(fm.with_focus("s"), [e2]);
    }

    #[test]
    fn remove_disabled_entity_errors() {
        let mut store = Store::default();
        let e1 = store.add(1, FocusType::Single);
        let mut fm = FocusManager::new();
        register(&mut fm, &store);
        store.0[0].enabled = false;

        assert_eq!(
            fm.remove_entity("s", e1, &mut store),
            Err(FocusError::FocusDisabled(e1))
        );
        assert!(fm.forget_entity("s", e1, &mut store));
        assert!(!fm.is_registered("s", e1));
    }

    #[test]
    fn lock_freezes_transitions() {
        let mut store = Store::default();
        let e1 = store.add(1, FocusType::Single);
        let e2 = store.add(2, FocusType::Single);
        let mut fm = FocusManager::new();
        register(&mut fm, &store);
        fm.update_focus_for_scene("s", &mut store).unwrap();

        fm.lock();
        fm.update_focus_for_scene("s", &mut store).unwrap();
        fm.acquire_focus_to_entity("s", e2, &mut store).unwrap();
        fm.release_focus_from_entity("s", e1, &mut store).unwrap();
        // Unknown scenes are not even checked while locked.
        fm.update_focus_for_scene("nope", &mut store).unwrap();
        assert_eq!(fm.with_focus("s"), [e1]);

        fm.unlock();
        fm.update_focus_for_scene("s", &mut store).unwrap();
        assert_eq!(fm.with_focus("s"), [e2]);
    }
}
