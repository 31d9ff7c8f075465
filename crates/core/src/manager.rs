//! SceneManager - owns every scene and the focus manager.
//!
//! Scenes are kept in insertion order. The active and visible subsets are
//! name lists into the same scenes: active scenes receive updates, collision
//! steps and focus cycling; visible scenes are drawn. A scene may be either,
//! both or neither.

use crate::bus::Mailbox;
use crate::collision::Collision;
use crate::entity::Entity;
use crate::error::SceneError;
use crate::focus::FocusManager;
use crate::scene::Scene;
use crate::term::RenderTarget;
use crate::traits::Focusable;
use crate::types::{EntityId, Event, DEFAULT_MAX_COLLISION_WORKERS};

#[derive(Debug)]
pub struct SceneManager {
    scenes: Vec<Scene>,
    active: Vec<String>,
    visible: Vec<String>,
    focus: FocusManager,
    max_collision_workers: usize,
}

impl Default for SceneManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneManager {
    pub fn new() -> Self {
        Self {
            scenes: Vec::new(),
            active: Vec::new(),
            visible: Vec::new(),
            focus: FocusManager::new(),
            max_collision_workers: DEFAULT_MAX_COLLISION_WORKERS,
        }
    }

    pub fn with_max_collision_workers(mut self, max: usize) -> Self {
        self.max_collision_workers = max.max(1);
        self
    }

    pub fn max_collision_workers(&self) -> usize {
        self.max_collision_workers
    }

    /// Adopt `scene`. Entities it already holds are registered with this
    /// manager's focus, in insertion order and unfocused; focus state built
    /// against any other manager is dropped.
    pub fn add_scene(&mut self, mut scene: Scene) -> Result<(), SceneError> {
        if self.scene(scene.name()).is_some() {
            return Err(SceneError::DuplicateScene(scene.name().to_string()));
        }
        let name = scene.name().to_string();
        self.focus.remove_scene(&name);
        for e in scene.entities_mut() {
            e.set_focus(false);
            if e.focus_enabled() {
                self.focus.add_entity(&name, &*e)?;
            }
        }
        tracing::debug!(scene = %name, entities = scene.len(), "scene added");
        self.scenes.push(scene);
        Ok(())
    }

    /// Remove a scene. An active scene is stopped first, and its focus
    /// registrations are dropped.
    pub fn remove_scene(&mut self, name: &str) -> Result<Scene, SceneError> {
        let idx = self.index_of(name)?;
        if self.is_active(name) {
            self.scenes[idx].stop();
        }
        self.active.retain(|n| n != name);
        self.visible.retain(|n| n != name);
        self.focus.remove_scene(name);

        let mut scene = self.scenes.remove(idx);
        for e in scene.entities_mut() {
            e.set_focus(false);
        }
        tracing::debug!(scene = name, "scene removed");
        Ok(scene)
    }

    pub fn scene(&self, name: &str) -> Option<&Scene> {
        self.scenes.iter().find(|s| s.name() == name)
    }

    pub fn scene_mut(&mut self, name: &str) -> Option<&mut Scene> {
        self.scenes.iter_mut().find(|s| s.name() == name)
    }

    pub fn scenes(&self) -> impl Iterator<Item = &Scene> {
        self.scenes.iter()
    }

    fn index_of(&self, name: &str) -> Result<usize, SceneError> {
        self.scenes
            .iter()
            .position(|s| s.name() == name)
            .ok_or_else(|| SceneError::SceneNotFound(name.to_string()))
    }

    /// Activate or deactivate a scene, firing its entities' `start` or `stop`
    /// hooks on a change. Activation hands out initial focus when nobody in
    /// the scene holds it.
    pub fn set_active(&mut self, name: &str, active: bool) -> Result<(), SceneError> {
        let idx = self.index_of(name)?;
        if active == self.is_active(name) {
            return Ok(());
        }

        let scene = &mut self.scenes[idx];
        if active {
            self.active.push(name.to_string());
            scene.start();
            if self.focus.has_scene(name) && self.focus.with_focus(name).is_empty() {
                self.focus.update_focus_for_scene(name, scene)?;
            }
        } else {
            self.active.retain(|n| n != name);
            scene.stop();
        }
        tracing::debug!(scene = name, active, "scene activation changed");
        Ok(())
    }

    pub fn set_visible(&mut self, name: &str, visible: bool) -> Result<(), SceneError> {
        self.index_of(name)?;
        if visible == self.is_visible(name) {
            return Ok(());
        }
        if visible {
            self.visible.push(name.to_string());
        } else {
            self.visible.retain(|n| n != name);
        }
        Ok(())
    }

    pub fn is_active(&self, name: &str) -> bool {
        self.active.iter().any(|n| n == name)
    }

    pub fn is_visible(&self, name: &str) -> bool {
        self.visible.iter().any(|n| n == name)
    }

    /// Active scene names in activation order.
    pub fn active_scenes(&self) -> &[String] {
        &self.active
    }

    /// Visible scene names in the order they were shown.
    pub fn visible_scenes(&self) -> &[String] {
        &self.visible
    }

    /// Add `entity` to `scene`. In an active scene the entity is started
    /// right away and gets focus if nobody holds it.
    pub fn add_entity(&mut self, scene: &str, entity: Entity) -> Result<EntityId, SceneError> {
        let idx = self.index_of(scene)?;
        let active = self.is_active(scene);
        let target = &mut self.scenes[idx];

        let id = target.add_entity(entity, &mut self.focus);
        if active {
            if let Some(e) = target.entity_mut(id) {
                e.start();
            }
            if self.focus.is_registered(scene, id) && self.focus.with_focus(scene).is_empty() {
                self.focus.update_focus_for_scene(scene, target)?;
            }
        }
        Ok(id)
    }

    /// Remove an entity from `scene`. The entity is stopped when the scene is
    /// active.
    pub fn remove_entity(&mut self, scene: &str, id: EntityId) -> Result<Entity, SceneError> {
        let idx = self.index_of(scene)?;
        let mut entity = self.scenes[idx].remove_entity(id, &mut self.focus)?;
        if self.is_active(scene) {
            entity.stop();
        }
        Ok(entity)
    }

    pub fn entity(&self, scene: &str, id: EntityId) -> Option<&Entity> {
        self.scene(scene)?.entity(id)
    }

    pub fn entity_mut(&mut self, scene: &str, id: EntityId) -> Option<&mut Entity> {
        self.scene_mut(scene)?.entity_mut(id)
    }

    /// Find an entity in any scene. Returns the owning scene's name too.
    pub fn find_entity(&self, id: EntityId) -> Option<(&str, &Entity)> {
        self.scenes
            .iter()
            .find_map(|s| s.entity(id).map(|e| (s.name(), e)))
    }

    pub fn focus(&self) -> &FocusManager {
        &self.focus
    }

    pub fn focus_mut(&mut self) -> &mut FocusManager {
        &mut self.focus
    }

    pub fn update_focus(&mut self, scene: &str) -> Result<(), SceneError> {
        let idx = self.index_of(scene)?;
        self.focus
            .update_focus_for_scene(scene, &mut self.scenes[idx])?;
        Ok(())
    }

    pub fn acquire_focus(&mut self, scene: &str, id: EntityId) -> Result<(), SceneError> {
        let idx = self.index_of(scene)?;
        self.focus
            .acquire_focus_to_entity(scene, id, &mut self.scenes[idx])?;
        Ok(())
    }

    pub fn release_focus(&mut self, scene: &str, id: EntityId) -> Result<(), SceneError> {
        let idx = self.index_of(scene)?;
        self.focus
            .release_focus_from_entity(scene, id, &mut self.scenes[idx])?;
        Ok(())
    }

    /// One focus rotation step in every active scene with focus
    /// registrations.
    pub fn cycle_focus(&mut self) {
        for name in &self.active {
            if !self.focus.has_scene(name) {
                continue;
            }
            let Some(scene) = self.scenes.iter_mut().find(|s| s.name() == name) else {
                continue;
            };
            if let Err(err) = self.focus.update_focus_for_scene(name, scene) {
                tracing::warn!(scene = %name, %err, "focus cycle failed");
            }
        }
    }

    /// Update every active scene, in activation order.
    pub fn update(&mut self, event: &Event, mailbox: &mut Mailbox) {
        for name in &self.active {
            if let Some(scene) = self.scenes.iter_mut().find(|s| s.name() == name) {
                scene.update(event, mailbox);
            }
        }
    }

    pub fn consume(&mut self, mailbox: &mut Mailbox) {
        for name in &self.active {
            if let Some(scene) = self.scenes.iter_mut().find(|s| s.name() == name) {
                scene.consume(mailbox);
            }
        }
    }

    /// Run the collision step in every active scene. Returns every pair
    /// found, scene by scene.
    pub fn collide(&mut self, mailbox: &mut Mailbox) -> Vec<Collision> {
        let mut found = Vec::new();
        for name in &self.active {
            if let Some(scene) = self.scenes.iter_mut().find(|s| s.name() == name) {
                found.extend(scene.step_collisions(self.max_collision_workers, mailbox));
            }
        }
        found
    }

    /// Draw every visible scene, in the order they were shown. Returns the
    /// cells rendered.
    pub fn draw(&mut self, target: &mut dyn RenderTarget, mailbox: &mut Mailbox) -> usize {
        let mut cells = 0;
        for name in &self.visible {
            if let Some(scene) = self.scenes.iter_mut().find(|s| s.name() == name) {
                cells += scene.draw(target, mailbox);
            }
        }
        cells
    }

    /// Call the `notify` hook of entity `id`, wherever it lives.
    pub fn notify_entity(&mut self, id: EntityId, subject: &str, message: &str) -> bool {
        self.scenes
            .iter_mut()
            .any(|s| s.notify_entity(id, subject, message))
    }
}
