//! Melee resolution. One attack, no rolls: damage is the attack value minus
//! the defender's armor, floored at zero.

use super::*;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttackOutcome {
    pub damage: i32,
    pub killed: bool,
    /// The defender's drop, already moved onto the attacker.
    pub drop: Option<Item>,
    pub experience: u32,
    pub levels_gained: u32,
}

impl AttackOutcome {
    pub fn missed(&self) -> bool {
        self.damage == 0
    }
}

pub fn attack_damage(attack_value: i32, armor_class: i32) -> i32 {
    (attack_value - armor_class).max(0)
}

/// Resolves one melee attack. Both participants must be alive. On a kill the
/// defender's drop and experience go to the attacker.
pub fn attack(
    map: &mut GameMap,
    attacker: EntityId,
    target: EntityId,
) -> Result<AttackOutcome, CoreError> {
    let striker = map.entity(attacker)?;
    if !striker.alive {
        return Err(CoreError::DeadEntity(attacker));
    }
    let defender = map.entity(target)?;
    if !defender.alive {
        return Err(CoreError::DeadEntity(target));
    }

    let damage = attack_damage(striker.attack_value(), defender.armor_value());
    map.entities[target].take_damage(damage)?;

    let mut outcome =
        AttackOutcome { damage, killed: false, drop: None, experience: 0, levels_gained: 0 };
    if map.entities[target].alive {
        return Ok(outcome);
    }

    outcome.killed = true;
    if let Some([striker, defender]) = map.entities.get_disjoint_mut([attacker, target]) {
        outcome.drop = defender.transfer_drop_to(striker);
        outcome.experience = defender.experience_value;
        outcome.levels_gained = striker.gain_experience(defender.experience_value);
    }
    Ok(outcome)
}

impl Game {
    /// Runs [`attack`] and narrates it. Records the attack and any death,
    /// level-up or finish on the session log and `report`.
    pub(super) fn resolve_attack(
        &mut self,
        attacker: EntityId,
        target: EntityId,
        report: &mut TurnReport,
        renderer: &mut impl Renderer,
    ) -> Result<AttackOutcome, CoreError> {
        let outcome = attack(&mut self.level.map, attacker, target)?;
        let map = &self.level.map;
        let striker = &map.entities[attacker];
        let defender = &map.entities[target];

        self.log.push(LogEvent::Attacked { attacker, target, damage: outcome.damage });
        report.attacks.push(AttackRecord {
            attacker,
            target,
            damage: outcome.damage,
            killed: outcome.killed,
        });
        renderer.display_message(&describe_attack(striker, defender, &outcome));

        if outcome.killed {
            self.log.push(LogEvent::EntityDied { entity: target });
            let mut message = format!("{} dies.", capitalize(&describe(defender)));
            if let Some(item) = &outcome.drop {
                message = format!("{} is dead and dropped {}.", capitalize(&describe(defender)), item.name);
            }
            renderer.display_message(&message);
        }
        if outcome.levels_gained > 0 {
            let level = striker.level;
            self.log.push(LogEvent::LevelUp { entity: attacker, level });
            if striker.is_player() {
                renderer.display_message(&format!("You feel stronger! You are now level {level}."));
            }
        }
        if defender.is_player() && outcome.killed {
            self.finish(RunOutcome::Defeat, renderer);
        }
        Ok(outcome)
    }
}

fn describe(entity: &Entity) -> String {
    if entity.is_player() { "you".to_string() } else { format!("the {}", entity.name) }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn describe_attack(striker: &Entity, defender: &Entity, outcome: &AttackOutcome) -> String {
    let subject = capitalize(&describe(striker));
    let object = describe(defender);
    if outcome.missed() {
        return format!("{subject} missed {object}.");
    }
    let verb = if striker.is_player() { "hit" } else { "hits" };
    format!("{subject} {verb} {object} for {} damage.", outcome.damage)
}
