//! Event sources.

use std::collections::VecDeque;
use std::time::Duration;

use anyhow::Result;
use crossterm::event;

use crate::map::map_event;
use crate::types::Event;

/// A blocking stream of input events.
pub trait EventSource {
    /// Wait up to `timeout` for the next event. `Ok(None)` means nothing
    /// arrived in time.
    fn poll_event(&mut self, timeout: Duration) -> Result<Option<Event>>;

    /// Block until an event arrives. `Ok(None)` means the source is exhausted.
    fn read_event(&mut self) -> Result<Option<Event>>;
}

/// Events from the controlling terminal.
#[derive(Debug, Default)]
pub struct CrosstermEvents;

impl CrosstermEvents {
    pub fn new() -> Self {
        Self
    }
}

impl EventSource for CrosstermEvents {
    fn poll_event(&mut self, timeout: Duration) -> Result<Option<Event>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        Ok(map_event(event::read()?))
    }

    fn read_event(&mut self) -> Result<Option<Event>> {
        loop {
            if let Some(ev) = map_event(event::read()?) {
                return Ok(Some(ev));
            }
        }
    }
}

/// A fixed queue of events, replayed in order without waiting.
#[derive(Debug, Default, Clone)]
pub struct ScriptedEvents {
    queue: VecDeque<Event>,
}

impl ScriptedEvents {
    pub fn new(events: impl IntoIterator<Item = Event>) -> Self {
        Self {
            queue: events.into_iter().collect(),
        }
    }

    pub fn push(&mut self, event: Event) {
        self.queue.push_back(event);
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl EventSource for ScriptedEvents {
    fn poll_event(&mut self, _timeout: Duration) -> Result<Option<Event>> {
        Ok(self.queue.pop_front())
    }

    fn read_event(&mut self) -> Result<Option<Event>> {
        Ok(self.queue.pop_front())
    }
}
