//! Entity - the positioned, drawable, focusable, collidable unit.
//!
//! An entity owns its canvas and (optionally) a [`Behavior`]. Its collider is
//! derived from its rectangle on demand, so moving the entity moves the
//! collider with it.

use std::fmt;

use crate::behavior::{Behavior, SceneCtx};
use crate::collider::{Collider, ColliderShape};
use crate::term::{Canvas, Cell, RenderTarget};
use crate::traits::{Collidable, Drawable, Focusable, Identified, Updatable};
use crate::types::{EntityId, Event, FocusType, Point, Rect, Size, Style};

/// Focus sub-state of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FocusState {
    pub enabled: bool,
    pub held: bool,
    pub kind: FocusType,
}

pub struct Entity {
    id: EntityId,
    class: String,
    name: String,
    position: Point,
    size: Size,
    style: Style,
    visible: bool,
    solid: bool,
    dynamic: bool,
    z_level: i32,
    p_level: i32,
    canvas: Option<Canvas>,
    focus: FocusState,
    shape: ColliderShape,
    behavior: Option<Box<dyn Behavior>>,
}

impl Entity {
    pub fn builder(class: impl Into<String>, name: impl Into<String>) -> EntityBuilder {
        EntityBuilder::new(class, name)
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Factory class name, used to rebuild the entity from persisted data.
    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    pub fn move_by(&mut self, dx: i32, dy: i32) {
        self.position = self.position.offset(dx, dy);
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Changes the collision bounds only; the canvas is left as is.
    pub fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.position, self.size)
    }

    pub fn style(&self) -> Style {
        self.style
    }

    pub fn set_style(&mut self, style: Style) {
        self.style = style;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn set_solid(&mut self, solid: bool) {
        self.solid = solid;
    }

    pub fn set_dynamic(&mut self, dynamic: bool) {
        self.dynamic = dynamic;
    }

    /// Draw priority; lower draws first.
    pub fn z_level(&self) -> i32 {
        self.z_level
    }

    /// Levels change through [`Scene::set_z_level`](crate::Scene::set_z_level)
    /// so the scene's views are re-sorted with them:
    ///
    /// ```compile_fail
    /// let mut e = tui_scene_core::Entity::builder("box", "e").build();
    /// e.set_z_level(3);
    /// ```
    pub(crate) fn set_z_level(&mut self, z: i32) {
        self.z_level = z;
    }

    /// Update priority; higher updates first.
    pub fn p_level(&self) -> i32 {
        self.p_level
    }

    /// See [`Entity::set_z_level`].
    ///
    /// ```compile_fail
    /// let mut e = tui_scene_core::Entity::builder("box", "e").build();
    /// e.set_p_level(3);
    /// ```
    pub(crate) fn set_p_level(&mut self, p: i32) {
        self.p_level = p;
    }

    pub fn canvas(&self) -> Option<&Canvas> {
        self.canvas.as_ref()
    }

    pub fn canvas_mut(&mut self) -> Option<&mut Canvas> {
        self.canvas.as_mut()
    }

    pub fn set_canvas(&mut self, canvas: Canvas) {
        self.canvas = Some(canvas);
    }

    pub fn take_canvas(&mut self) -> Option<Canvas> {
        self.canvas.take()
    }

    pub fn focus_state(&self) -> FocusState {
        self.focus
    }

    /// Registration with a focus manager is decided when the entity is added
    /// to a scene; toggling afterwards only affects `can_have_focus`.
    pub fn set_focus_enabled(&mut self, enabled: bool) {
        self.focus.enabled = enabled;
    }

    pub fn set_focus_type(&mut self, kind: FocusType) {
        self.focus.kind = kind;
    }

    pub fn collider_shape(&self) -> &ColliderShape {
        &self.shape
    }

    pub fn set_collider_shape(&mut self, shape: ColliderShape) {
        self.shape = shape;
    }

    pub fn has_behavior(&self) -> bool {
        self.behavior.is_some()
    }

    pub fn set_behavior(&mut self, behavior: impl Behavior + 'static) {
        self.behavior = Some(Box::new(behavior));
    }

    /// Run `f` with the behavior temporarily detached, so it can borrow the
    /// entity mutably. A behavior installed by `f` itself wins.
    fn with_behavior(&mut self, f: impl FnOnce(&mut dyn Behavior, &mut Entity)) {
        let Some(mut behavior) = self.behavior.take() else {
            return;
        };
        f(behavior.as_mut(), self);
        if self.behavior.is_none() {
            self.behavior = Some(behavior);
        }
    }

    pub fn init(&mut self) {
        self.with_behavior(|b, e| b.init(e));
    }

    pub fn start(&mut self) {
        self.with_behavior(|b, e| b.start(e));
    }

    pub fn stop(&mut self) {
        self.with_behavior(|b, e| b.stop(e));
    }

    pub fn consume(&mut self, ctx: &mut SceneCtx<'_>) {
        self.with_behavior(|b, e| b.consume(e, ctx));
    }

    pub fn notify(&mut self, subject: &str, message: &str) {
        self.with_behavior(|b, e| b.notify(e, subject, message));
    }

    pub fn collide(&mut self, other: EntityId, ctx: &mut SceneCtx<'_>) {
        self.with_behavior(|b, e| b.collide(e, other, ctx));
    }

    /// Collision test against another entity. An entity never collides with
    /// itself.
    pub fn collides_with(&self, other: &Entity) -> bool {
        self.id != other.id && self.collider().collide_with(&other.collider())
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("id", &self.id)
            .field("class", &self.class)
            .field("name", &self.name)
            .field("position", &self.position)
            .field("size", &self.size)
            .field("z_level", &self.z_level)
            .field("p_level", &self.p_level)
            .field("focus", &self.focus)
            .field("solid", &self.solid)
            .field("dynamic", &self.dynamic)
            .finish_non_exhaustive()
    }
}

impl Identified for Entity {
    fn entity_id(&self) -> EntityId {
        self.id
    }
}

impl Drawable for Entity {
    /// Skipped when invisible. The draw hook runs first and may replace the
    /// canvas; an entity without a canvas renders nothing.
    fn draw(&mut self, target: &mut dyn RenderTarget, ctx: &mut SceneCtx<'_>) -> usize {
        if !self.visible {
            return 0;
        }
        self.with_behavior(|b, e| b.draw(e, ctx));
        match &self.canvas {
            Some(canvas) => canvas.render_at(self.position, target),
            None => 0,
        }
    }
}

impl Updatable for Entity {
    fn update(&mut self, event: &Event, ctx: &mut SceneCtx<'_>) {
        self.with_behavior(|b, e| b.update(e, event, ctx));
    }
}

impl Focusable for Entity {
    fn focus_enabled(&self) -> bool {
        self.focus.enabled
    }

    fn focus_type(&self) -> FocusType {
        self.focus.kind
    }

    fn has_focus(&self) -> bool {
        self.focus.held
    }

    fn set_focus(&mut self, held: bool) {
        self.focus.held = held;
    }
}

impl Collidable for Entity {
    fn collider(&self) -> Collider {
        self.shape.resolve(self.rect())
    }

    fn is_solid(&self) -> bool {
        self.solid
    }

    fn is_dynamic(&self) -> bool {
        self.dynamic
    }
}

enum CanvasInit {
    None,
    Fill(char),
    Text(String),
    Canvas(Canvas),
}

/// Factory for [`Entity`]. Every entity gets a fresh [`EntityId`].
pub struct EntityBuilder {
    class: String,
    name: String,
    position: Point,
    size: Size,
    style: Style,
    visible: bool,
    solid: bool,
    dynamic: bool,
    z_level: i32,
    p_level: i32,
    canvas: CanvasInit,
    focus: FocusState,
    shape: ColliderShape,
    behavior: Option<Box<dyn Behavior>>,
}

impl EntityBuilder {
    pub fn new(class: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            name: name.into(),
            position: Point::default(),
            size: Size::default(),
            style: Style::default(),
            visible: true,
            solid: false,
            dynamic: false,
            z_level: 0,
            p_level: 0,
            canvas: CanvasInit::None,
            focus: FocusState::default(),
            shape: ColliderShape::Bounds,
            behavior: None,
        }
    }

    pub fn position(mut self, position: Point) -> Self {
        self.position = position;
        self
    }

    pub fn size(mut self, size: Size) -> Self {
        self.size = size;
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn solid(mut self, solid: bool) -> Self {
        self.solid = solid;
        self
    }

    /// Dynamic entities are also solid.
    pub fn dynamic(mut self, dynamic: bool) -> Self {
        self.dynamic = dynamic;
        if dynamic {
            self.solid = true;
        }
        self
    }

    pub fn z_level(mut self, z: i32) -> Self {
        self.z_level = z;
        self
    }

    pub fn p_level(mut self, p: i32) -> Self {
        self.p_level = p;
        self
    }

    /// Set the focus policy. Anything but `None` also enables focus.
    pub fn focus(mut self, kind: FocusType) -> Self {
        self.focus.kind = kind;
        self.focus.enabled = kind != FocusType::None;
        self
    }

    pub fn focus_enabled(mut self, enabled: bool) -> Self {
        self.focus.enabled = enabled;
        self
    }

    /// Canvas of `size` filled with `ch` in the entity style.
    pub fn fill(mut self, ch: char) -> Self {
        self.canvas = CanvasInit::Fill(ch);
        self
    }

    /// Canvas holding literal text, one row per line. Without an explicit
    /// size the entity takes the text's size.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.canvas = CanvasInit::Text(text.into());
        self
    }

    pub fn canvas(mut self, canvas: Canvas) -> Self {
        self.canvas = CanvasInit::Canvas(canvas);
        self
    }

    /// Collide on these points (relative to the position) instead of the
    /// entity rectangle.
    pub fn collider_points(mut self, points: Vec<Point>) -> Self {
        self.shape = ColliderShape::Points(points);
        self
    }

    pub fn behavior(mut self, behavior: impl Behavior + 'static) -> Self {
        self.behavior = Some(Box::new(behavior));
        self
    }

    pub fn build(self) -> Entity {
        let mut size = self.size;
        let canvas = match self.canvas {
            CanvasInit::None => None,
            CanvasInit::Fill(ch) => Some(Canvas::filled(size, Cell::new(ch, self.style))),
            CanvasInit::Text(text) if size.is_empty() => {
                let canvas = Canvas::from_text(&text, self.style);
                size = canvas.size();
                Some(canvas)
            }
            CanvasInit::Text(text) => {
                let mut canvas = Canvas::new(size);
                for (y, line) in text.lines().enumerate() {
                    canvas.write_str(Point::new(0, y as i32), line, self.style);
                }
                Some(canvas)
            }
            CanvasInit::Canvas(canvas) => {
                if size.is_empty() {
                    size = canvas.size();
                }
                Some(canvas)
            }
        };

        Entity {
            id: EntityId::next(),
            class: self.class,
            name: self.name,
            position: self.position,
            size,
            style: self.style,
            visible: self.visible,
            solid: self.solid,
            dynamic: self.dynamic,
            z_level: self.z_level,
            p_level: self.p_level,
            canvas,
            focus: self.focus,
            shape: self.shape,
            behavior: self.behavior,
        }
    }
}
