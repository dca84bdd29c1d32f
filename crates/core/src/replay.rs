//! Rebuilds a session from its journal and reapplies every input.

use thiserror::Error;

use crate::error::CoreError;
use crate::game::Game;
use crate::journal::{InputJournal, InputPayload};
use crate::render::NullRenderer;
use crate::types::RunOutcome;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ReplayError {
    #[error("journal skips input {expected} (found {found})")]
    MissingInput { expected: u64, found: u64 },

    #[error(transparent)]
    Core(#[from] CoreError),
}

#[derive(Debug, PartialEq, Eq)]
pub struct ReplayResult {
    pub final_outcome: Option<RunOutcome>,
    pub final_snapshot_hash: u64,
    pub final_turn: u64,
    pub final_level: u32,
}

pub fn replay_to_end(journal: &InputJournal) -> Result<ReplayResult, ReplayError> {
    let mut game = Game::start(journal.generation.clone(), journal.spawn.clone())?;
    let mut renderer = NullRenderer;

    for (expected, record) in (0_u64..).zip(&journal.inputs) {
        if record.seq != expected {
            return Err(ReplayError::MissingInput { expected, found: record.seq });
        }
        match record.payload {
            InputPayload::Move { direction } => {
                game.execute_turn(direction, &mut renderer)?;
            }
            InputPayload::ChangeLevel { level_number } => {
                game.change_level(level_number, &mut renderer)?;
            }
        }
    }

    Ok(ReplayResult {
        final_outcome: game.outcome(),
        final_snapshot_hash: game.snapshot_hash(),
        final_turn: game.current_turn(),
        final_level: game.level_number(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GenerationConfig, SpawnConfig};
    use crate::journal::InputRecord;
    use crate::types::Direction;

    #[test]
    fn empty_journal_replays_to_the_starting_state() {
        let journal = InputJournal::new(GenerationConfig::default(), SpawnConfig::default());
        let game = Game::start(GenerationConfig::default(), SpawnConfig::default())
            .expect("default game starts");
        let result = replay_to_end(&journal).expect("replay succeeds");
        assert_eq!(result.final_snapshot_hash, game.snapshot_hash());
        assert_eq!(result.final_turn, 0);
        assert_eq!(result.final_outcome, None);
    }

    #[test]
    fn gaps_in_the_sequence_are_reported() {
        let mut journal = InputJournal::new(GenerationConfig::default(), SpawnConfig::default());
        journal.append_move(Direction::Idle);
        journal.inputs.push(InputRecord {
            seq: 5,
            payload: InputPayload::Move { direction: Direction::Idle },
        });
        assert_eq!(
            replay_to_end(&journal),
            Err(ReplayError::MissingInput { expected: 1, found: 5 })
        );
    }

    #[test]
    fn invalid_level_change_surfaces_the_core_error() {
        let mut journal = InputJournal::new(GenerationConfig::default(), SpawnConfig::default());
        journal.append_level_change(0);
        assert!(matches!(
            replay_to_end(&journal),
            Err(ReplayError::Core(CoreError::InvalidLevel { level: 0, .. }))
        ));
    }
}
