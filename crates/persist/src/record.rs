use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tui_scene_core::term::Canvas;
use tui_scene_core::types::{Attrs, Color, Point, Size, Style};
use tui_scene_core::Entity;

use crate::error::PersistError;
use crate::factory::EntityFactory;

/// One persisted entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub class: String,
    pub name: String,
    /// Relative to the import/export origin.
    pub position: [i32; 2],
    pub size: [u16; 2],
    /// `[fg name, bg name, attribute bits]`.
    pub style: (String, String, u16),
    #[serde(default)]
    pub ch: String,
}

impl EntityRecord {
    /// Describe `entity` relative to `origin`.
    pub fn from_entity(entity: &Entity, origin: Point) -> Self {
        let pos = entity.position() - origin;
        let size = entity.size();
        let style = entity.style();
        Self {
            class: entity.class().to_string(),
            name: entity.name().to_string(),
            position: [pos.x, pos.y],
            size: [size.width, size.height],
            style: (style.fg.name(), style.bg.name(), style.attrs.bits()),
            ch: entity.canvas().map(canvas_text).unwrap_or_default(),
        }
    }

    pub fn resolve_style(&self) -> Result<Style, PersistError> {
        let color = |name: &str| {
            Color::from_name(name).ok_or_else(|| PersistError::UnknownColor {
                entity: self.name.clone(),
                color: name.to_string(),
            })
        };
        let (fg, bg, bits) = &self.style;
        Ok(Style::new(color(fg)?, color(bg)?, Attrs::from_bits_truncate(*bits)))
    }

    /// Build the entity through `factory`, placed at `origin` plus the stored
    /// position.
    pub fn build(&self, factory: &EntityFactory, origin: Point) -> Result<Entity, PersistError> {
        let builder = factory
            .create(&self.class, &self.name)
            .ok_or_else(|| PersistError::UnknownClass(self.class.clone()))?;

        let style = self.resolve_style()?;
        let builder = builder
            .position(origin.offset(self.position[0], self.position[1]))
            .size(Size::new(self.size[0], self.size[1]))
            .style(style);

        let mut glyphs = self.ch.chars();
        let builder = match (glyphs.next(), glyphs.next()) {
            (None, _) => builder,
            (Some(ch), None) => builder.fill(ch),
            _ => builder.text(self.ch.as_str()),
        };
        Ok(builder.build())
    }
}

/// A fully set uniform canvas exports as its single glyph; anything else as
/// its rows, right-trimmed and joined by newlines.
fn canvas_text(canvas: &Canvas) -> String {
    if let Some(cell) = canvas.uniform_cell() {
        return cell.ch.to_string();
    }
    let rows: Vec<String> = (0..canvas.height())
        .filter_map(|y| canvas.row_text(y))
        .map(|row| row.trim_end().to_string())
        .collect();
    let text = rows.join("\n").trim_end_matches('\n').to_string();
    // A lone glyph would read back as a fill.
    if text.chars().count() == 1 {
        format!("{text}\n")
    } else {
        text
    }
}

pub fn import_records(
    records: &[EntityRecord],
    origin: Point,
    factory: &EntityFactory,
) -> Result<Vec<Entity>, PersistError> {
    records
        .iter()
        .map(|r| {
            r.build(factory, origin).inspect_err(|err| {
                tracing::warn!(class = %r.class, name = %r.name, %err, "entity import failed");
            })
        })
        .collect()
}

/// Decode a JSON array of records and build their entities at `origin`.
///
/// Fails on the first malformed record; nothing is partially returned.
pub fn import(json: &str, origin: Point, factory: &EntityFactory) -> Result<Vec<Entity>, PersistError> {
    let records: Vec<EntityRecord> = serde_json::from_str(json)?;
    let entities = import_records(&records, origin, factory)?;
    tracing::debug!(count = entities.len(), "entities imported");
    Ok(entities)
}

pub fn export_records<'a>(
    entities: impl IntoIterator<Item = &'a Entity>,
    origin: Point,
) -> Vec<EntityRecord> {
    entities
        .into_iter()
        .map(|e| EntityRecord::from_entity(e, origin))
        .collect()
}

/// Encode `entities` as pretty-printed JSON, positions relative to `origin`.
pub fn export<'a>(
    entities: impl IntoIterator<Item = &'a Entity>,
    origin: Point,
) -> Result<String, PersistError> {
    let records = export_records(entities, origin);
    Ok(serde_json::to_string_pretty(&records)?)
}

pub fn load_file(
    path: impl AsRef<Path>,
    origin: Point,
    factory: &EntityFactory,
) -> Result<Vec<Entity>, PersistError> {
    let json = fs::read_to_string(path)?;
    import(&json, origin, factory)
}

pub fn save_file<'a>(
    path: impl AsRef<Path>,
    entities: impl IntoIterator<Item = &'a Entity>,
    origin: Point,
) -> Result<(), PersistError> {
    let json = export(entities, origin)?;
    fs::write(path, json)?;
    Ok(())
}
