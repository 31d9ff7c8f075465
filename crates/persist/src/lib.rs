//! JSON persistence for entities.
//!
//! A persisted file is an array of records:
//!
//! ```json
//! [{"class": "wall", "name": "w1", "position": [2, 3], "size": [4, 1],
//!   "style": ["green", "reset", 1], "ch": "#"}]
//! ```
//!
//! `class` is resolved through an [`EntityFactory`]. A one-glyph `ch` fills
//! the whole canvas; anything longer is written as literal text, one row per
//! line. Positions are stored relative to the origin passed to [`import`] and
//! [`export`].

mod error;
mod factory;
mod record;

pub use error::PersistError;
pub use factory::EntityFactory;
pub use record::{export, export_records, import, import_records, load_file, save_file, EntityRecord};
