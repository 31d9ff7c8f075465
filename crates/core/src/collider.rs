//! Colliders - geometric overlap tests.
//!
//! Rules:
//! - rect / rect: interval overlap on both axes
//! - rect / points: any point inside the rect
//! - points / points: any exact coordinate match
//!
//! Every rule is symmetric.

use crate::types::{Point, Rect};

/// An absolute collision volume.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Collider {
    Rect(Rect),
    Points(Vec<Point>),
}

impl Collider {
    pub fn collide_with(&self, other: &Collider) -> bool {
        match (self, other) {
            (Collider::Rect(a), Collider::Rect(b)) => a.overlaps(b),
            (Collider::Rect(r), Collider::Points(pts)) | (Collider::Points(pts), Collider::Rect(r)) => {
                pts.iter().any(|p| r.contains(*p))
            }
            (Collider::Points(a), Collider::Points(b)) => a.iter().any(|p| b.contains(p)),
        }
    }

    pub fn translate(&self, dx: i32, dy: i32) -> Collider {
        match self {
            Collider::Rect(r) => Collider::Rect(r.translate(dx, dy)),
            Collider::Points(pts) => Collider::Points(pts.iter().map(|p| p.offset(dx, dy)).collect()),
        }
    }
}

/// How an entity derives its collider from its own geometry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ColliderShape {
    /// The entity's rectangle.
    #[default]
    Bounds,
    /// Points relative to the entity's position.
    Points(Vec<Point>),
}

impl ColliderShape {
    /// Resolve against an entity rectangle.
    pub fn resolve(&self, bounds: Rect) -> Collider {
        match self {
            ColliderShape::Bounds => Collider::Rect(bounds),
            ColliderShape::Points(pts) => {
                Collider::Points(pts.iter().map(|p| *p + bounds.origin).collect())
            }
        }
    }
}
