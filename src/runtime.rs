use std::collections::VecDeque;
use std::io;

use crossterm::event::{self, Event as CtEvent, KeyEvent};

/// Events the main loop reacts to. Everything else the terminal emits
/// (mouse, focus, paste) is ignored at the source.
#[derive(Clone, Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize,
}

/// Blocking source of terminal events. The loop draws one frame, then
/// blocks here for exactly one event; this is the only scheduling point.
pub trait EventSource {
    fn next_event(&mut self) -> io::Result<AppEvent>;
}

/// Production source reading crossterm events from the real terminal.
#[derive(Debug, Default)]
pub struct CrosstermEvents;

impl EventSource for CrosstermEvents {
    fn next_event(&mut self) -> io::Result<AppEvent> {
        loop {
            match event::read()? {
                CtEvent::Key(key) => return Ok(AppEvent::Key(key)),
                CtEvent::Resize(_, _) => return Ok(AppEvent::Resize),
                _ => {}
            }
        }
    }
}

/// Scripted source for headless tests; yields queued events in order and
/// reports end-of-input once drained.
#[derive(Debug, Default)]
pub struct QueuedEvents {
    queue: VecDeque<AppEvent>,
}

impl QueuedEvents {
    pub fn new(events: impl IntoIterator<Item = AppEvent>) -> Self {
        Self {
            queue: events.into_iter().collect(),
        }
    }

    pub fn push(&mut self, event: AppEvent) {
        self.queue.push_back(event);
    }
}

impl EventSource for QueuedEvents {
    fn next_event(&mut self) -> io::Result<AppEvent> {
        self.queue
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "event queue drained"))
    }
}
