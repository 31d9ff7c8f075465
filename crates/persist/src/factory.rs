use std::collections::HashMap;
use std::fmt;

use tui_scene_core::EntityBuilder;

type Constructor = Box<dyn Fn(EntityBuilder) -> EntityBuilder>;

/// Registry of entity classes.
///
/// A constructor receives a builder already carrying the class and name, and
/// adds whatever the class needs (behavior, focus policy, levels, flags).
/// Geometry, style and canvas come from the persisted record afterwards.
#[derive(Default)]
pub struct EntityFactory {
    classes: HashMap<String, Constructor>,
}

impl EntityFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `class`. A later registration replaces an earlier one.
    pub fn register(
        &mut self,
        class: impl Into<String>,
        ctor: impl Fn(EntityBuilder) -> EntityBuilder + 'static,
    ) -> &mut Self {
        self.classes.insert(class.into(), Box::new(ctor));
        self
    }

    pub fn contains(&self, class: &str) -> bool {
        self.classes.contains_key(class)
    }

    /// Start a builder for `class`, or `None` when the class is unknown.
    pub fn create(&self, class: &str, name: &str) -> Option<EntityBuilder> {
        let ctor = self.classes.get(class)?;
        Some(ctor(EntityBuilder::new(class, name)))
    }
}

impl fmt::Debug for EntityFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut classes: Vec<&str> = self.classes.keys().map(String::as_str).collect();
        classes.sort_unstable();
        f.debug_struct("EntityFactory").field("classes", &classes).finish()
    }
}
