//! Plain-text renderer for terminals and pipes.

use delve_core::entity::EntityKind;
use delve_core::{CoreError, Entity, Game, GameMap, Pos, Renderer};

/// Draws the map as glyph rows: entities over items over terrain.
pub fn draw_map(map: &GameMap) -> String {
    let mut out = String::with_capacity((map.width() + 1) * map.height());
    for y in 0..map.height() as i32 {
        for x in 0..map.width() as i32 {
            out.push(glyph_at(map, Pos { y, x }));
        }
        out.push('\n');
    }
    out
}

fn glyph_at(map: &GameMap, pos: Pos) -> char {
    if let Some(id) = map.living_entity_at(pos) {
        return match map.entities[id].kind {
            EntityKind::Player => '@',
            EntityKind::Enemy(kind) => kind.tag().chars().next().unwrap_or('?'),
        };
    }
    if let Some(item) = map.items.get(&pos) {
        return item.kind.glyph();
    }
    if let Some(trap) = map.traps.get(&pos)
        && !trap.revealed
    {
        return '.';
    }
    map.tile_at(pos).glyph()
}

pub fn status_line(player: &Entity) -> String {
    format!(
        "Lvl {}  HP {}/{}  Atk {}  AC {}  Gold {}  XP {}  Items {}",
        player.level,
        player.life,
        player.max_life,
        player.attack_value(),
        player.armor_value(),
        player.gold,
        player.experience,
        player.inventory.len()
    )
}

/// Prints messages as they arrive and redraws only when asked to.
#[derive(Debug, Default)]
pub struct AsciiRenderer {
    pub show_map: bool,
}

impl AsciiRenderer {
    /// Full redraw outside of a turn, e.g. right after the run starts.
    pub fn show_game(&mut self, game: &Game) -> Result<(), CoreError> {
        let player = game.player()?;
        self.init_for_map(game.map());
        self.update_status(player);
        self.render_all(game.map(), player);
        Ok(())
    }
}

impl Renderer for AsciiRenderer {
    fn init_for_map(&mut self, map: &GameMap) {
        println!("-- new level: {} rooms --", map.rooms.len());
    }

    fn render_all(&mut self, map: &GameMap, _player: &Entity) {
        if self.show_map {
            print!("{}", draw_map(map));
        }
    }

    fn update_status(&mut self, player: &Entity) {
        if self.show_map {
            println!("{}", status_line(player));
        }
    }

    fn display_message(&mut self, text: &str) {
        println!("{text}");
    }
}
