use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use tui_scene_core::bus::{Mailbox, ObserverManager};
use tui_scene_core::term::{Display, FlushStats, TerminalDriver};
use tui_scene_core::types::{EntityId, Event, Key, KeyPress, Size};
use tui_scene_core::{Collision, Entity, SceneManager};
use tui_scene_input::EventSource;

use crate::config::EngineConfig;

/// Cloneable flag that ends [`Engine::run`] at the next loop iteration.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    fn reset(&self) {
        self.0.store(false, Ordering::Relaxed);
    }
}

/// What one [`Engine::tick`] did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    pub focus_cycled: bool,
    pub collisions: Vec<Collision>,
    pub cells_drawn: usize,
    pub flush: FlushStats,
}

/// Owns the scenes, the message bus, the observer registry and the display.
pub struct Engine<D: TerminalDriver> {
    config: EngineConfig,
    scenes: SceneManager,
    mailbox: Mailbox,
    observers: ObserverManager<EntityId>,
    display: Display<D>,
    stop: StopHandle,
    ticks: u64,
}

impl<D: TerminalDriver> Engine<D> {
    pub fn new(driver: D, size: Size, config: EngineConfig) -> Self {
        let scenes = SceneManager::new().with_max_collision_workers(config.max_collision_workers);
        tracing::debug!(
            width = size.width,
            height = size.height,
            ?config,
            "engine created"
        );
        Self {
            config,
            scenes,
            mailbox: Mailbox::new(),
            observers: ObserverManager::new(),
            display: Display::new(driver, size),
            stop: StopHandle::default(),
            ticks: 0,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn scenes(&self) -> &SceneManager {
        &self.scenes
    }

    pub fn scenes_mut(&mut self) -> &mut SceneManager {
        &mut self.scenes
    }

    pub fn mailbox(&self) -> &Mailbox {
        &self.mailbox
    }

    pub fn mailbox_mut(&mut self) -> &mut Mailbox {
        &mut self.mailbox
    }

    pub fn display(&self) -> &Display<D> {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut Display<D> {
        &mut self.display
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn stop(&self) {
        self.stop.stop();
    }

    /// Remove an entity and drop every registration it holds: focus, observer
    /// subjects, and mailbox subscriptions under its name.
    pub fn remove_entity(&mut self, scene: &str, id: EntityId) -> Result<Entity> {
        let entity = self.scenes.remove_entity(scene, id)?;
        self.observers.unregister_everywhere(&id);

        let topics = self.mailbox.consumer_topics(entity.name()).to_vec();
        for topic in topics {
            self.mailbox.unsubscribe(&topic, entity.name())?;
        }
        Ok(entity)
    }

    /// Register entity `id` as an observer of `subject`.
    pub fn observe(&mut self, subject: &str, id: EntityId) -> bool {
        self.observers.register_observer(subject, id)
    }

    pub fn unobserve(&mut self, subject: &str, id: EntityId) -> bool {
        self.observers.unregister_observer(subject, &id)
    }

    /// Call the `notify` hook of every entity observing `subject`, in
    /// registration order. Returns how many were reached.
    pub fn notify(&mut self, subject: &str, message: &str) -> usize {
        let ids = self.observers.observers(subject).to_vec();
        let reached = ids
            .into_iter()
            .filter(|id| self.scenes.notify_entity(*id, subject, message))
            .count();
        tracing::trace!(subject, reached, "observers notified");
        reached
    }

    /// Run one full tick: input (or focus cycling), mailbox consumption,
    /// collisions, then draw and flush.
    pub fn tick(&mut self, event: &Event) -> Result<TickReport> {
        self.ticks += 1;
        let mut report = TickReport::default();

        if self.config.focus_cycle && event.as_key() == Some(&KeyPress::plain(Key::Tab)) {
            self.scenes.cycle_focus();
            report.focus_cycled = true;
        } else {
            self.scenes.update(event, &mut self.mailbox);
        }

        self.scenes.consume(&mut self.mailbox);
        report.collisions = self.scenes.collide(&mut self.mailbox);

        self.display.begin_frame();
        report.cells_drawn = self.scenes.draw(&mut self.display, &mut self.mailbox);
        report.flush = self.display.flush(self.config.force_flush)?;

        Ok(report)
    }

    /// Resize the display; the next flush redraws everything.
    pub fn resize(&mut self, size: Size) {
        self.display.resize(size);
    }

    /// Drive the loop from `source` until Ctrl-C or [`Engine::stop`].
    ///
    /// Input events are processed as they arrive; a `Tick` event is
    /// synthesized whenever the tick interval elapses.
    pub fn run(&mut self, source: &mut dyn EventSource) -> Result<()> {
        self.stop.reset();
        let tick = self.config.tick_duration();
        let mut last_tick = Instant::now();
        tracing::debug!(tick_ms = self.config.tick_ms, "engine loop started");

        while !self.stop.is_stopped() {
            let timeout = tick.saturating_sub(last_tick.elapsed());

            match source.poll_event(timeout)? {
                Some(ev) if ev.is_interrupt() => {
                    tracing::debug!("interrupt received");
                    break;
                }
                Some(ev) => {
                    if let Event::Resize(size) = ev {
                        self.resize(size);
                    }
                    self.tick(&ev)?;
                }
                None => {}
            }

            if last_tick.elapsed() >= tick {
                last_tick = Instant::now();
                self.tick(&Event::Tick)?;
            }
        }

        tracing::debug!(ticks = self.ticks, "engine loop stopped");
        Ok(())
    }

    pub fn into_driver(self) -> D {
        self.display.into_driver()
    }
}
