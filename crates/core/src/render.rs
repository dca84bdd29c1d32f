//! The observer side of a session. The core only pushes state and text out;
//! renderers never mutate the map.

use std::mem;

use crate::entity::Entity;
use crate::state::GameMap;

pub trait Renderer {
    fn init_for_map(&mut self, _map: &GameMap) {}

    fn render_all(&mut self, _map: &GameMap, _player: &Entity) {}

    fn update_status(&mut self, _player: &Entity) {}

    fn display_message(&mut self, text: &str);
}

/// Discards everything. Used by replay and headless harnesses.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn display_message(&mut self, _text: &str) {}
}

/// Keeps every message in order, plus how many full redraws were requested.
#[derive(Clone, Debug, Default)]
pub struct MessageLog {
    messages: Vec<String>,
    redraws: usize,
}

impl MessageLog {
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn last(&self) -> Option<&str> {
        self.messages.last().map(String::as_str)
    }

    pub fn contains(&self, fragment: &str) -> bool {
        self.messages.iter().any(|message| message.contains(fragment))
    }

    pub fn redraws(&self) -> usize {
        self.redraws
    }

    pub fn drain(&mut self) -> Vec<String> {
        mem::take(&mut self.messages)
    }
}

impl Renderer for MessageLog {
    fn render_all(&mut self, _map: &GameMap, _player: &Entity) {
        self.redraws += 1;
    }

    fn display_message(&mut self, text: &str) {
        self.messages.push(text.to_string());
    }
}
