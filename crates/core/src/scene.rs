//! Scene - an entity collection with derived draw and update orders.
//!
//! Both orders are recomputed from scratch after every add and remove (and
//! on [`Scene::reorder`]), never patched:
//!
//! - draw order: stable sort by z-level ascending (back to front)
//! - update order: stable sort by p-level descending (highest first)
//!
//! Ties keep insertion order.

use std::cmp::Reverse;

use crate::behavior::SceneCtx;
use crate::bus::Mailbox;
use crate::collision::{scan_collisions, Collision};
use crate::entity::Entity;
use crate::error::SceneError;
use crate::focus::{FocusManager, FocusStore};
use crate::term::RenderTarget;
use crate::traits::{Drawable, Focusable, Updatable};
use crate::types::{EntityId, Event};

#[derive(Debug)]
pub struct Scene {
    name: String,
    entities: Vec<Entity>,
    /// Indices into `entities`, z ascending.
    draw_order: Vec<usize>,
    /// Indices into `entities`, p descending.
    update_order: Vec<usize>,
}

impl Scene {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entities: Vec::new(),
            draw_order: Vec::new(),
            update_order: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.index_of(id).map(|i| &self.entities[i])
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.index_of(id).map(|i| &mut self.entities[i])
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.name() == name)
    }

    /// Entities in insertion order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn entities_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut()
    }

    /// Entity ids in draw order.
    pub fn draw_order(&self) -> Vec<EntityId> {
        self.draw_order.iter().map(|&i| self.entities[i].id()).collect()
    }

    /// Entity ids in update order.
    pub fn update_order(&self) -> Vec<EntityId> {
        self.update_order.iter().map(|&i| self.entities[i].id()).collect()
    }

    fn index_of(&self, id: EntityId) -> Option<usize> {
        self.entities.iter().position(|e| e.id() == id)
    }

    /// Recompute both orders from the current entity set.
    pub fn reorder(&mut self) {
        let entities = &self.entities;

        let mut draw: Vec<usize> = (0..entities.len()).collect();
        draw.sort_by_key(|&i| entities[i].z_level());

        let mut update: Vec<usize> = (0..entities.len()).collect();
        update.sort_by_key(|&i| Reverse(entities[i].p_level()));

        self.draw_order = draw;
        self.update_order = update;
    }

    /// Add an entity, run its `init` hook, reorder, and register it with
    /// `focus` when its focus is enabled.
    pub fn add_entity(&mut self, mut entity: Entity, focus: &mut FocusManager) -> EntityId {
        let id = entity.id();
        entity.init();
        if entity.focus_enabled() {
            if let Err(err) = focus.add_entity(&self.name, &entity) {
                tracing::warn!(scene = %self.name, entity = %id, %err, "focus registration failed");
            }
        }
        tracing::debug!(scene = %self.name, entity = %id, name = entity.name(), "entity added");
        self.entities.push(entity);
        self.reorder();
        id
    }

    /// Remove an entity, unregister it from `focus` and reorder.
    ///
    /// An entity whose focus was disabled after registration is dropped from
    /// the focus manager without picking a replacement holder.
    pub fn remove_entity(&mut self, id: EntityId, focus: &mut FocusManager) -> Result<Entity, SceneError> {
        let Some(idx) = self.index_of(id) else {
            return Err(SceneError::EntityNotFound {
                scene: self.name.clone(),
                id,
            });
        };

        if focus.is_registered(&self.name, id) {
            let name = self.name.clone();
            if self.entities[idx].focus_enabled() {
                focus.remove_entity(&name, id, self)?;
            } else {
                focus.forget_entity(&name, id, self);
            }
        }

        let entity = self.entities.remove(idx);
        self.reorder();
        tracing::debug!(scene = %self.name, entity = %id, "entity removed");
        Ok(entity)
    }

    /// Set an entity's z-level and reorder. Returns `false` if unknown.
    pub fn set_z_level(&mut self, id: EntityId, z: i32) -> bool {
        let Some(e) = self.entity_mut(id) else {
            return false;
        };
        e.set_z_level(z);
        self.reorder();
        true
    }

    /// Set an entity's p-level and reorder. Returns `false` if unknown.
    pub fn set_p_level(&mut self, id: EntityId, p: i32) -> bool {
        let Some(e) = self.entity_mut(id) else {
            return false;
        };
        e.set_p_level(p);
        self.reorder();
        true
    }

    pub fn start(&mut self) {
        for e in &mut self.entities {
            e.start();
        }
    }

    pub fn stop(&mut self) {
        for e in &mut self.entities {
            e.stop();
        }
    }

    /// Update every entity in update order.
    pub fn update(&mut self, event: &Event, mailbox: &mut Mailbox) {
        let mut ctx = SceneCtx::new(&self.name, mailbox);
        for &i in &self.update_order {
            self.entities[i].update(event, &mut ctx);
        }
    }

    /// Run every entity's consume hook in update order.
    pub fn consume(&mut self, mailbox: &mut Mailbox) {
        let mut ctx = SceneCtx::new(&self.name, mailbox);
        for &i in &self.update_order {
            self.entities[i].consume(&mut ctx);
        }
    }

    /// Draw every entity in draw order. Returns the cells rendered.
    pub fn draw(&mut self, target: &mut dyn RenderTarget, mailbox: &mut Mailbox) -> usize {
        let mut ctx = SceneCtx::new(&self.name, mailbox);
        let mut cells = 0;
        for &i in &self.draw_order {
            cells += self.entities[i].draw(target, &mut ctx);
        }
        cells
    }

    /// Detect collisions without dispatching them.
    pub fn detect_collisions(&self, max_workers: usize) -> Vec<Collision> {
        scan_collisions(&self.entities, max_workers)
    }

    /// Detect collisions and call the `collide` hook on both participants of
    /// each pair, on the calling thread.
    pub fn step_collisions(&mut self, max_workers: usize, mailbox: &mut Mailbox) -> Vec<Collision> {
        let found = self.detect_collisions(max_workers);
        if found.is_empty() {
            return found;
        }

        let mut ctx = SceneCtx::new(&self.name, mailbox);
        for c in &found {
            for (me, other) in [(c.a, c.b), (c.b, c.a)] {
                if let Some(i) = self.entities.iter().position(|e| e.id() == me) {
                    self.entities[i].collide(other, &mut ctx);
                }
            }
        }
        found
    }

    /// Call one entity's `notify` hook. Returns `false` if unknown.
    pub fn notify_entity(&mut self, id: EntityId, subject: &str, message: &str) -> bool {
        match self.entity_mut(id) {
            Some(e) => {
                e.notify(subject, message);
                true
            }
            None => false,
        }
    }
}

impl FocusStore for Scene {
    fn focusable(&self, id: EntityId) -> Option<&dyn Focusable> {
        self.entity(id).map(|e| e as &dyn Focusable)
    }

    fn focusable_mut(&mut self, id: EntityId) -> Option<&mut dyn Focusable> {
        self.entity_mut(id).map(|e| e as &mut dyn Focusable)
    }
}
