//! Terminal demo runner (default binary).
//!
//! Two walkers in a walled arena. Tab moves focus between them, arrow keys
//! move the focused one, walls push back, and a status line reports bumps
//! through the mailbox. Ctrl-C quits.

use anyhow::Result;

use tui_scene::bus::Message;
use tui_scene::core::{Behavior, Entity, Focusable, Scene, SceneCtx};
use tui_scene::engine::{Engine, EngineConfig};
use tui_scene::input::CrosstermEvents;
use tui_scene::term::{Canvas, CrosstermDriver};
use tui_scene::types::{Attrs, Color, EntityId, Event, FocusType, Key, Point, Size, Style};

const ARENA: &str = "arena";
const HUD: &str = "hud";
const BUMPS: &str = "bumps";

#[derive(Default)]
struct Walker {
    last: (i32, i32),
}

impl Behavior for Walker {
    fn update(&mut self, entity: &mut Entity, event: &Event, _ctx: &mut SceneCtx<'_>) {
        self.last = (0, 0);
        if !entity.has_focus() {
            return;
        }
        let Some(press) = event.as_key() else {
            return;
        };
        self.last = match press.key {
            Key::Left => (-1, 0),
            Key::Right => (1, 0),
            Key::Up => (0, -1),
            Key::Down => (0, 1),
            _ => return,
        };
        entity.move_by(self.last.0, self.last.1);
    }

    fn collide(&mut self, entity: &mut Entity, other: EntityId, ctx: &mut SceneCtx<'_>) {
        if self.last == (0, 0) {
            return;
        }
        entity.move_by(-self.last.0, -self.last.1);
        self.last = (0, 0);

        let msg = Message::new(BUMPS, entity.name(), "status", format!("{} bumped {other}", entity.name()));
        if let Err(err) = ctx.mailbox().publish(BUMPS, msg) {
            tracing::warn!(entity = entity.name(), %err, "bump not published");
        }
    }
}

struct Status;

impl Behavior for Status {
    fn consume(&mut self, entity: &mut Entity, ctx: &mut SceneCtx<'_>) {
        let Ok(Some(msg)) = ctx.mailbox().consume(BUMPS, "status") else {
            return;
        };
        let style = entity.style();
        let mut canvas = Canvas::new(entity.size());
        canvas.write_str(Point::new(0, 0), &msg.content, style);
        entity.set_canvas(canvas);
    }
}

fn walls(size: Size) -> Vec<Entity> {
    let style = Style::fg(Color::DarkGrey);
    let (w, h) = (size.width, size.height.saturating_sub(1));
    let wall = |name: &str, at: Point, size: Size| {
        Entity::builder("wall", name)
            .position(at)
            .size(size)
            .style(style)
            .solid(true)
            .fill('#')
            .build()
    };
    vec![
        wall("top", Point::new(0, 0), Size::new(w, 1)),
        wall("bottom", Point::new(0, h as i32 - 1), Size::new(w, 1)),
        wall("left", Point::new(0, 1), Size::new(1, h.saturating_sub(2))),
        wall("right", Point::new(w as i32 - 1, 1), Size::new(1, h.saturating_sub(2))),
    ]
}

fn walker(name: &str, at: Point, glyph: char, color: Color) -> Entity {
    Entity::builder("walker", name)
        .position(at)
        .size(Size::new(1, 1))
        .style(Style::fg(color).with_attrs(Attrs::BOLD))
        .dynamic(true)
        .focus(FocusType::Single)
        .z_level(1)
        .fill(glyph)
        .behavior(Walker::default())
        .build()
}

fn build(engine: &mut Engine<CrosstermDriver>, size: Size) -> Result<()> {
    let mailbox = engine.mailbox_mut();
    mailbox.create_topic(BUMPS);
    mailbox.subscribe(BUMPS, "status")?;

    let scenes = engine.scenes_mut();
    scenes.add_scene(Scene::new(ARENA))?;
    scenes.add_scene(Scene::new(HUD))?;

    for wall in walls(size) {
        scenes.add_entity(ARENA, wall)?;
    }
    scenes.add_entity(ARENA, walker("amber", Point::new(3, 3), '@', Color::Yellow))?;
    scenes.add_entity(ARENA, walker("cyan", Point::new(6, 3), '&', Color::Cyan))?;

    scenes.add_entity(
        HUD,
        Entity::builder("label", "status")
            .position(Point::new(0, size.height as i32 - 1))
            .size(Size::new(size.width, 1))
            .text("Tab: switch  arrows: move  Ctrl-C: quit")
            .behavior(Status)
            .build(),
    )?;

    for name in [ARENA, HUD] {
        scenes.set_active(name, true)?;
        scenes.set_visible(name, true)?;
    }
    Ok(())
}

fn main() -> Result<()> {
    let size = CrosstermDriver::terminal_size();
    let mut driver = CrosstermDriver::new();
    driver.enter()?;

    let mut engine = Engine::new(driver, size, EngineConfig::from_env());
    let result = build(&mut engine, size).and_then(|_| engine.run(&mut CrosstermEvents::new()));

    // Always try to restore terminal state.
    let _ = engine.display_mut().driver_mut().exit();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use tui_scene::bus::Mailbox;

    fn bump(mailbox: &mut Mailbox) -> Point {
        let mut hero = walker("hero", Point::new(5, 5), '@', Color::Yellow);
        let wall = Entity::builder("wall", "w").build();
        let mut behavior = Walker { last: (1, 0) };
        behavior.collide(&mut hero, wall.id(), &mut SceneCtx::new(ARENA, mailbox));
        hero.position()
    }

    #[test]
    fn bump_is_reported_to_status() {
        let mut mailbox = Mailbox::new();
        mailbox.create_topic(BUMPS);
        mailbox.subscribe(BUMPS, "status").unwrap();

        assert_eq!(bump(&mut mailbox), Point::new(4, 5));
        let msg = mailbox.consume(BUMPS, "status").unwrap().unwrap();
        assert!(msg.content.starts_with("hero bumped"));
    }

    #[test]
    fn bump_without_topic_still_pushes_back() {
        let mut mailbox = Mailbox::new();
        assert_eq!(bump(&mut mailbox), Point::new(4, 5));
        assert!(!mailbox.has_topic(BUMPS));
    }
}
