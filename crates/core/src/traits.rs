//! Entity capabilities.
//!
//! Each kernel algorithm depends on exactly one of these: scenes draw through
//! [`Drawable`] and update through [`Updatable`], the focus manager only sees
//! [`Focusable`], and the collision scan only sees [`Collidable`].

use crate::behavior::SceneCtx;
use crate::collider::Collider;
use crate::term::RenderTarget;
use crate::types::{EntityId, Event, FocusType};

pub trait Identified {
    fn entity_id(&self) -> EntityId;
}

pub trait Drawable {
    /// Render into `target`. Returns the number of cells the target accepted.
    fn draw(&mut self, target: &mut dyn RenderTarget, ctx: &mut SceneCtx<'_>) -> usize;
}

pub trait Updatable {
    fn update(&mut self, event: &Event, ctx: &mut SceneCtx<'_>);
}

pub trait Focusable: Identified {
    fn focus_enabled(&self) -> bool;

    fn focus_type(&self) -> FocusType;

    /// Whether the entity currently holds focus.
    fn has_focus(&self) -> bool;

    fn set_focus(&mut self, held: bool);

    fn can_have_focus(&self) -> bool {
        self.focus_enabled() && self.focus_type() != FocusType::None
    }
}

pub trait Collidable: Identified {
    fn collider(&self) -> Collider;

    /// Participates in collisions at all.
    fn is_solid(&self) -> bool;

    /// Moves, and so must be tested against every solid entity.
    fn is_dynamic(&self) -> bool;
}
