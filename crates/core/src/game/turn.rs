//! One discrete turn: player step or melee, trap and item checks on the new
//! tile, then the enemy phase.

use super::*;
use crate::content::ItemKind;

impl Game {
    pub fn execute_turn(
        &mut self,
        direction: Direction,
        renderer: &mut impl Renderer,
    ) -> Result<TurnReport, CoreError> {
        if self.outcome.is_some() {
            return Err(CoreError::RunFinished);
        }
        let player_id = self.level.map.player_id()?;
        let mut rng = self.turn_rng();
        let mut report = TurnReport { turn: self.turn, ..TurnReport::default() };

        match move_entity(&mut self.level.map, player_id, direction)? {
            MoveResult::Moved(to) => {
                report.moved = true;
                self.log.push(LogEvent::PlayerMoved { to });
                self.check_trap(player_id, to, &mut report, renderer);
                self.pick_up(player_id, to, &mut report, renderer);
                if self.level.map.tile_at(to) == TileKind::StairsUp {
                    report.reached_stairs = true;
                    self.log.push(LogEvent::StairsReached { pos: to });
                    renderer.display_message("There is a staircase here.");
                }
            }
            MoveResult::Occupied(occupant) => {
                if !self.level.map.entities[occupant].is_player() {
                    self.resolve_attack(player_id, occupant, &mut report, renderer)?;
                }
            }
            MoveResult::Blocked | MoveResult::Stayed => {}
        }

        if self.outcome.is_none() && !self.level.map.entities[player_id].alive {
            self.finish(RunOutcome::Defeat, renderer);
        }
        if self.outcome.is_none() {
            self.run_enemy_phase(&mut rng, &mut report, renderer)?;
        }

        self.turn += 1;
        report.outcome = self.outcome;
        let player = &self.level.map.entities[player_id];
        renderer.update_status(player);
        renderer.render_all(&self.level.map, player);
        Ok(report)
    }

    fn check_trap(
        &mut self,
        player_id: EntityId,
        pos: Pos,
        report: &mut TurnReport,
        renderer: &mut impl Renderer,
    ) {
        let Some(trap) = self.level.map.traps.get_mut(&pos) else {
            return;
        };
        trap.revealed = true;
        let kind = trap.kind;
        report.trap = Some((pos, kind));
        self.log.push(LogEvent::TrapTriggered { pos });
        renderer.display_message(&format!("You step on a {}!", kind.name()));
        if let Some(hook) = self.trap_hook.as_mut() {
            hook.on_trap(&mut self.level.map, player_id, pos, kind);
        }
    }

    fn pick_up(
        &mut self,
        player_id: EntityId,
        pos: Pos,
        report: &mut TurnReport,
        renderer: &mut impl Renderer,
    ) {
        let Some(item) = self.level.map.take_item(pos) else {
            return;
        };
        let player = &mut self.level.map.entities[player_id];
        match item.kind {
            ItemKind::Gold => {
                player.gold += item.value;
                self.log.push(LogEvent::GoldCollected { amount: item.value });
                renderer.display_message(&format!("You pick up {}.", item.name));
            }
            _ => {
                player.inventory.push(item.clone());
                self.log.push(LogEvent::ItemPickedUp { name: item.name.clone() });
                renderer.display_message(&format!("You pick up the {}.", item.name));
            }
        }
        let won = item.is_win_item();
        report.picked_up = Some(item);
        if won {
            self.finish(RunOutcome::Victory, renderer);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::content::{EnemyKind, Trap};
    use crate::game::test_support::*;
    use crate::render::{MessageLog, NullRenderer};

    struct CountingHook {
        calls: Rc<Cell<u32>>,
    }

    impl TrapHook for CountingHook {
        fn on_trap(&mut self, _map: &mut GameMap, _player: EntityId, _pos: Pos, _kind: TrapKind) {
            self.calls.set(self.calls.get() + 1);
        }
    }

    #[test]
    fn walking_into_a_wall_leaves_the_player_in_place() {
        let mut game = game_on(corridor_map());
        let start = game.player().expect("player").pos;
        let report = game.execute_turn(Direction::Up, &mut NullRenderer).expect("turn runs");
        assert!(!report.moved);
        assert_eq!(game.player().expect("player").pos, start);
        assert_eq!(game.current_turn(), 1);
    }

    #[test]
    fn stepping_onto_a_trap_reveals_and_reports_it() {
        let mut game = game_on(corridor_map());
        let trap_pos = Pos { y: 2, x: 3 };
        game.map_mut().place_trap(trap_pos, Trap { kind: TrapKind::Spike, revealed: false });
        let mut renderer = MessageLog::default();

        let report = game.execute_turn(Direction::Right, &mut renderer).expect("turn runs");
        assert_eq!(report.trap, Some((trap_pos, TrapKind::Spike)));
        assert!(game.map().traps[&trap_pos].revealed);
        assert!(renderer.contains("spike trap"));
        assert_eq!(game.player().expect("player").life, 30);
    }

    #[test]
    fn trap_hook_runs_once_per_trigger() {
        let mut game = game_on(corridor_map());
        game.map_mut()
            .place_trap(Pos { y: 2, x: 3 }, Trap { kind: TrapKind::Teleport, revealed: false });
        let calls = Rc::new(Cell::new(0));
        game.set_trap_hook(Box::new(CountingHook { calls: calls.clone() }));

        game.execute_turn(Direction::Right, &mut NullRenderer).expect("turn runs");
        game.execute_turn(Direction::Right, &mut NullRenderer).expect("turn runs");
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn gold_goes_to_the_purse_and_gear_to_the_inventory() {
        let mut game = game_on(corridor_map());
        game.map_mut().place_item(Pos { y: 2, x: 3 }, Item::gold(12));
        let potion = Item { kind: ItemKind::Potion, name: "healing potion".into(), value: 12 };
        game.map_mut().place_item(Pos { y: 2, x: 4 }, potion.clone());

        let report = game.execute_turn(Direction::Right, &mut NullRenderer).expect("turn runs");
        assert_eq!(report.picked_up, Some(Item::gold(12)));
        game.execute_turn(Direction::Right, &mut NullRenderer).expect("turn runs");

        let player = game.player().expect("player");
        assert_eq!(player.gold, 12);
        assert_eq!(player.inventory, vec![potion]);
        assert!(game.map().items.is_empty());
    }

    #[test]
    fn picking_up_the_amulet_wins_and_ends_the_run() {
        let mut game = game_on(corridor_map());
        game.map_mut().place_item(Pos { y: 2, x: 3 }, Item::amulet());

        let report = game.execute_turn(Direction::Right, &mut NullRenderer).expect("turn runs");
        assert_eq!(report.outcome, Some(RunOutcome::Victory));
        assert!(game.log().contains(&LogEvent::Finished(RunOutcome::Victory)));
        assert_eq!(
            game.execute_turn(Direction::Left, &mut NullRenderer),
            Err(CoreError::RunFinished)
        );
    }

    #[test]
    fn bumping_an_enemy_attacks_it() {
        let mut game = game_on(corridor_map());
        let rat = add_enemy(&mut game, EnemyKind::Rat, Pos { y: 2, x: 3 });

        let report = game.execute_turn(Direction::Right, &mut NullRenderer).expect("turn runs");
        assert!(!report.moved);
        assert_eq!(report.attacks[0].target, rat);
        assert!(report.attacks[0].killed);
        assert!(!game.map().entities[rat].alive);
        assert_eq!(game.player().expect("player").pos, Pos { y: 2, x: 2 });
    }

    #[test]
    fn lethal_enemy_phase_is_a_defeat() {
        let mut game = game_on(corridor_map());
        let player = player_id(&game);
        game.map_mut().entities[player].life = 1;
        add_enemy(&mut game, EnemyKind::Goblin, Pos { y: 2, x: 3 });
        add_enemy(&mut game, EnemyKind::Goblin, Pos { y: 2, x: 1 });

        let report = game.execute_turn(Direction::Idle, &mut NullRenderer).expect("turn runs");
        assert_eq!(report.outcome, Some(RunOutcome::Defeat));
        assert_eq!(report.attacks.len(), 1);
        assert_eq!(game.player().expect("player").life, 0);
    }

    #[test]
    fn stairs_are_reported_but_not_taken() {
        let mut game = game_on(corridor_map());
        let stairs = Pos { y: 2, x: 3 };
        game.map_mut().set_tile_at(stairs, TileKind::StairsUp);
        game.map_mut().stairs = Some(stairs);

        let report = game.execute_turn(Direction::Right, &mut NullRenderer).expect("turn runs");
        assert!(report.reached_stairs);
        assert_eq!(game.level_number(), STARTING_LEVEL);
    }
}
