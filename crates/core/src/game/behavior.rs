//! Enemy step selection and the enemy phase of a turn.

use super::*;
use crate::content::MovementStrategy;

/// Sleeping enemies wake when the player comes this close (Chebyshev).
pub const WAKE_RADIUS: u32 = 3;

/// Picks one step toward `target` (pursue), a random step (wander), or a
/// per-turn mix of the two.
pub fn next_step(
    strategy: MovementStrategy,
    from: Pos,
    target: Pos,
    rng: &mut RandomSource,
) -> Direction {
    match strategy {
        MovementStrategy::Pursue => Direction::from_delta(target.x - from.x, target.y - from.y),
        MovementStrategy::Wander => Direction::ALL[rng.range_usize(0, Direction::ALL.len() - 1)],
        MovementStrategy::Mixed { pursue_percent } => {
            if rng.chance(f64::from(pursue_percent) / 100.0) {
                next_step(MovementStrategy::Pursue, from, target, rng)
            } else {
                next_step(MovementStrategy::Wander, from, target, rng)
            }
        }
    }
}

impl Game {
    /// Wakes nearby sleepers, then lets every awake living enemy step or
    /// attack in a stable order. Stops as soon as the player dies.
    pub(super) fn run_enemy_phase(
        &mut self,
        rng: &mut RandomSource,
        report: &mut TurnReport,
        renderer: &mut impl Renderer,
    ) -> Result<(), CoreError> {
        let player_id = self.level.map.player_id()?;
        let enemies = self.level.map.living_enemy_ids();

        let player_pos = self.level.map.entities[player_id].pos;
        for &id in &enemies {
            let enemy = &mut self.level.map.entities[id];
            if enemy.asleep && chebyshev(enemy.pos, player_pos) <= WAKE_RADIUS {
                enemy.asleep = false;
                report.enemies_woken += 1;
                renderer.display_message(&format!("The {} wakes up!", enemy.name));
                self.log.push(LogEvent::EnemyWoke { enemy: id });
            }
        }

        for id in enemies {
            let map = &self.level.map;
            let enemy = &map.entities[id];
            if !enemy.alive || enemy.asleep {
                continue;
            }
            let player_pos = map.entities[player_id].pos;
            let direction = next_step(enemy.movement, enemy.pos, player_pos, rng);

            match move_entity(&mut self.level.map, id, direction)? {
                MoveResult::Occupied(occupant) if occupant == player_id => {
                    self.resolve_attack(id, player_id, report, renderer)?;
                    if !self.level.map.entities[player_id].alive {
                        break;
                    }
                }
                MoveResult::Moved(to) => log::trace!("enemy {id:?} moved to {to:?}"),
                MoveResult::Occupied(_) | MoveResult::Blocked | MoveResult::Stayed => {}
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::EnemyKind;
    use crate::game::test_support::*;
    use crate::render::MessageLog;

    #[test]
    fn pursuit_steps_straight_at_the_target() {
        let mut rng = RandomSource::from_seed(1);
        let from = Pos { y: 5, x: 5 };
        assert_eq!(
            next_step(MovementStrategy::Pursue, from, Pos { y: 2, x: 9 }, &mut rng),
            Direction::UpRight
        );
        assert_eq!(
            next_step(MovementStrategy::Pursue, from, Pos { y: 5, x: 1 }, &mut rng),
            Direction::Left
        );
        assert_eq!(next_step(MovementStrategy::Pursue, from, from, &mut rng), Direction::Idle);
    }

    #[test]
    fn wandering_covers_every_direction() {
        let mut rng = RandomSource::from_seed(77);
        let from = Pos::default();
        let mut seen = Vec::new();
        for _ in 0..500 {
            let step = next_step(MovementStrategy::Wander, from, from, &mut rng);
            if !seen.contains(&step) {
                seen.push(step);
            }
        }
        assert_eq!(seen.len(), Direction::ALL.len());
    }

    #[test]
    fn certain_mix_always_pursues() {
        let mut rng = RandomSource::from_seed(3);
        let mixed = MovementStrategy::Mixed { pursue_percent: 100 };
        for _ in 0..50 {
            assert_eq!(
                next_step(mixed, Pos { y: 0, x: 0 }, Pos { y: 0, x: 4 }, &mut rng),
                Direction::Right
            );
        }
    }

    #[test]
    fn sleepers_wake_only_inside_the_radius() {
        let mut game = game_on(open_room_map());
        let near = add_enemy(&mut game, EnemyKind::Goblin, Pos { y: 4, x: 4 });
        let far = add_enemy(&mut game, EnemyKind::Goblin, Pos { y: 8, x: 8 });
        game.map_mut().entities[near].asleep = true;
        game.map_mut().entities[far].asleep = true;

        let mut rng = RandomSource::from_seed(9);
        let mut report = TurnReport::default();
        game.run_enemy_phase(&mut rng, &mut report, &mut MessageLog::default())
            .expect("enemy phase runs");

        assert!(!game.map().entities[near].asleep);
        assert!(game.map().entities[far].asleep);
        assert_eq!(game.map().entities[far].pos, Pos { y: 8, x: 8 });
        assert_eq!(report.enemies_woken, 1);
    }

    #[test]
    fn adjacent_pursuer_attacks_instead_of_moving() {
        let mut game = game_on(open_room_map());
        let player = player_id(&game);
        let goblin_pos = Pos { y: 2, x: 3 };
        let goblin = add_enemy(&mut game, EnemyKind::Goblin, goblin_pos);

        let mut rng = RandomSource::from_seed(5);
        let mut report = TurnReport::default();
        game.run_enemy_phase(&mut rng, &mut report, &mut MessageLog::default())
            .expect("enemy phase runs");

        assert_eq!(game.map().entities[goblin].pos, goblin_pos);
        assert_eq!(report.attacks.len(), 1);
        assert_eq!(report.attacks[0].target, player);
        assert_eq!(game.player().expect("player").life, 30 - 4);
    }
}
