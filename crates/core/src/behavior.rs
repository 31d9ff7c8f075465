//! Behavior hooks - where domain logic plugs into entities.
//!
//! The kernel calls a fixed set of hooks at fixed points of the tick. Every
//! hook has a no-op default, so a behavior implements only what it needs.
//! [`Hooks`] is a closure-backed behavior for when a full type is overkill.

use crate::bus::Mailbox;
use crate::entity::Entity;
use crate::types::{EntityId, Event};

/// Per-call context handed to hooks.
pub struct SceneCtx<'a> {
    scene: &'a str,
    mailbox: &'a mut Mailbox,
}

impl<'a> SceneCtx<'a> {
    pub fn new(scene: &'a str, mailbox: &'a mut Mailbox) -> Self {
        Self { scene, mailbox }
    }

    /// Name of the scene being processed.
    pub fn scene(&self) -> &str {
        self.scene
    }

    pub fn mailbox(&mut self) -> &mut Mailbox {
        self.mailbox
    }
}

pub trait Behavior {
    /// Called once when the entity is added to a scene.
    fn init(&mut self, _entity: &mut Entity) {}

    /// Called when the entity's scene becomes active.
    fn start(&mut self, _entity: &mut Entity) {}

    /// Called when the entity's scene stops being active, or the entity
    /// leaves an active scene.
    fn stop(&mut self, _entity: &mut Entity) {}

    /// Called once per tick with the tick's event. Not filtered by focus.
    fn update(&mut self, _entity: &mut Entity, _event: &Event, _ctx: &mut SceneCtx<'_>) {}

    /// Called before the entity's canvas is rendered.
    fn draw(&mut self, _entity: &mut Entity, _ctx: &mut SceneCtx<'_>) {}

    /// Called once per tick so the entity can drain its mailbox queues.
    fn consume(&mut self, _entity: &mut Entity, _ctx: &mut SceneCtx<'_>) {}

    fn notify(&mut self, _entity: &mut Entity, _subject: &str, _message: &str) {}

    /// Called once per detected collision with `other`.
    fn collide(&mut self, _entity: &mut Entity, _other: EntityId, _ctx: &mut SceneCtx<'_>) {}
}

type LifecycleFn = Box<dyn FnMut(&mut Entity)>;
type UpdateFn = Box<dyn FnMut(&mut Entity, &Event, &mut SceneCtx<'_>)>;
type CtxFn = Box<dyn FnMut(&mut Entity, &mut SceneCtx<'_>)>;
type NotifyFn = Box<dyn FnMut(&mut Entity, &str, &str)>;
type CollideFn = Box<dyn FnMut(&mut Entity, EntityId, &mut SceneCtx<'_>)>;

/// Closure registry implementing [`Behavior`]. Unset hooks are no-ops.
#[derive(Default)]
pub struct Hooks {
    init: Option<LifecycleFn>,
    start: Option<LifecycleFn>,
    stop: Option<LifecycleFn>,
    update: Option<UpdateFn>,
    draw: Option<CtxFn>,
    consume: Option<CtxFn>,
    notify: Option<NotifyFn>,
    collide: Option<CollideFn>,
}

impl Hooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_init(mut self, f: impl FnMut(&mut Entity) + 'static) -> Self {
        self.init = Some(Box::new(f));
        self
    }

    pub fn on_start(mut self, f: impl FnMut(&mut Entity) + 'static) -> Self {
        self.start = Some(Box::new(f));
        self
    }

    pub fn on_stop(mut self, f: impl FnMut(&mut Entity) + 'static) -> Self {
        self.stop = Some(Box::new(f));
        self
    }

    pub fn on_update(
        mut self,
        f: impl FnMut(&mut Entity, &Event, &mut SceneCtx<'_>) + 'static,
    ) -> Self {
        self.update = Some(Box::new(f));
        self
    }

    pub fn on_draw(mut self, f: impl FnMut(&mut Entity, &mut SceneCtx<'_>) + 'static) -> Self {
        self.draw = Some(Box::new(f));
        self
    }

    pub fn on_consume(mut self, f: impl FnMut(&mut Entity, &mut SceneCtx<'_>) + 'static) -> Self {
        self.consume = Some(Box::new(f));
        self
    }

    pub fn on_notify(mut self, f: impl FnMut(&mut Entity, &str, &str) + 'static) -> Self {
        self.notify = Some(Box::new(f));
        self
    }

    pub fn on_collide(
        mut self,
        f: impl FnMut(&mut Entity, EntityId, &mut SceneCtx<'_>) + 'static,
    ) -> Self {
        self.collide = Some(Box::new(f));
        self
    }
}

impl Behavior for Hooks {
    fn init(&mut self, entity: &mut Entity) {
        if let Some(f) = self.init.as_mut() {
            f(entity);
        }
    }

    fn start(&mut self, entity: &mut Entity) {
        if let Some(f) = self.start.as_mut() {
            f(entity);
        }
    }

    fn stop(&mut self, entity: &mut Entity) {
        if let Some(f) = self.stop.as_mut() {
            f(entity);
        }
    }

    fn update(&mut self, entity: &mut Entity, event: &Event, ctx: &mut SceneCtx<'_>) {
        if let Some(f) = self.update.as_mut() {
            f(entity, event, ctx);
        }
    }

    fn draw(&mut self, entity: &mut Entity, ctx: &mut SceneCtx<'_>) {
        if let Some(f) = self.draw.as_mut() {
            f(entity, ctx);
        }
    }

    fn consume(&mut self, entity: &mut Entity, ctx: &mut SceneCtx<'_>) {
        if let Some(f) = self.consume.as_mut() {
            f(entity, ctx);
        }
    }

    fn notify(&mut self, entity: &mut Entity, subject: &str, message: &str) {
        if let Some(f) = self.notify.as_mut() {
            f(entity, subject, message);
        }
    }

    fn collide(&mut self, entity: &mut Entity, other: EntityId, ctx: &mut SceneCtx<'_>) {
        if let Some(f) = self.collide.as_mut() {
            f(entity, other, ctx);
        }
    }
}
