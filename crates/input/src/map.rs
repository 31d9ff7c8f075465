//! Mapping from crossterm events to engine events.

use crossterm::event::{Event as CtEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::types::{Event, Key, KeyPress, Modifiers, Size};

/// Map a crossterm event. Releases, mouse and focus events map to `None`.
pub fn map_event(event: CtEvent) -> Option<Event> {
    match event {
        CtEvent::Key(key) => map_key_event(key).map(Event::Key),
        CtEvent::Resize(w, h) => Some(Event::Resize(Size::new(w, h))),
        _ => None,
    }
}

/// Map a key press. Key releases are dropped; terminals without the
/// keyboard enhancement protocol never report them anyway.
pub fn map_key_event(key: KeyEvent) -> Option<KeyPress> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    let mapped = match key.code {
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Esc,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Tab => Key::Tab,
        KeyCode::BackTab => Key::BackTab,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::Insert => Key::Insert,
        KeyCode::Delete => Key::Delete,
        KeyCode::F(n) => Key::F(n),
        _ => return None,
    };

    Some(KeyPress::new(mapped, map_modifiers(key.modifiers)))
}

fn map_modifiers(mods: KeyModifiers) -> Modifiers {
    let mut out = Modifiers::empty();
    if mods.contains(KeyModifiers::SHIFT) {
        out |= Modifiers::SHIFT;
    }
    if mods.contains(KeyModifiers::CONTROL) {
        out |= Modifiers::CTRL;
    }
    if mods.contains(KeyModifiers::ALT) {
        out |= Modifiers::ALT;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    #[test]
    fn test_plain_keys() {
        assert_eq!(
            map_key_event(KeyEvent::from(KeyCode::Left)),
            Some(KeyPress::plain(Key::Left))
        );
        assert_eq!(
            map_key_event(KeyEvent::from(KeyCode::Char('x'))),
            Some(KeyPress::plain(Key::Char('x')))
        );
        assert_eq!(
            map_key_event(KeyEvent::from(KeyCode::F(5))),
            Some(KeyPress::plain(Key::F(5)))
        );
    }

    #[test]
    fn test_modifiers() {
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL | KeyModifiers::ALT);
        let mapped = map_key_event(key).unwrap();
        assert_eq!(mapped.key, Key::Char('c'));
        assert_eq!(mapped.mods, Modifiers::CTRL | Modifiers::ALT);
        assert!(Event::Key(mapped).is_interrupt());
    }

    #[test]
    fn test_release_is_dropped() {
        let key = KeyEvent {
            code: KeyCode::Up,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(map_key_event(key), None);
    }

    #[test]
    fn test_resize_and_unmapped_events() {
        assert_eq!(
            map_event(CtEvent::Resize(80, 24)),
            Some(Event::Resize(Size::new(80, 24)))
        );
        assert_eq!(map_event(CtEvent::FocusGained), None);
        assert_eq!(map_event(CtEvent::Key(KeyEvent::from(KeyCode::Null))), None);
    }
}
