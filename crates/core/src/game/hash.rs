//! Stable snapshot hashing for deterministic verification.
//! Covers the session counters, the player's carried state and the whole map.

use std::hash::Hasher;

use xxhash_rust::xxh3::Xxh3;

use super::*;

impl Game {
    pub fn snapshot_hash(&self) -> u64 {
        let mut hasher = Xxh3::new();
        hasher.write_u64(self.seed);
        hasher.write_u32(self.level.level_number);
        hasher.write_u64(self.turn);
        hasher.write_u8(match self.outcome {
            None => 0,
            Some(RunOutcome::Victory) => 1,
            Some(RunOutcome::Defeat) => 2,
        });
        if let Ok(player) = self.level.map.player() {
            hasher.write_i32(player.pos.x);
            hasher.write_i32(player.pos.y);
            hasher.write_u32(player.level);
            hasher.write_u32(player.experience);
            hasher.write_i32(player.gold);
            hasher.write_i32(player.max_life);
            for item in &player.inventory {
                hasher.write(item.kind.tag().as_bytes());
                hasher.write_i32(item.value);
            }
        }
        hasher.write(&self.level.map.canonical_bytes());
        hasher.finish()
    }
}
