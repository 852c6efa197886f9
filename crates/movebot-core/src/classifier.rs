//! Move classification: raw move attributes -> `MoveType`.
//!
//! Rules are ordered and the first match wins:
//! 1. curated unique-move names (one-hit KOs, fixed damage)
//! 2. curated stat-altering names, or a `status` damage class
//! 3. no base power
//! 4. base power buckets

use crate::domain::{DamageClass, MoveType};

/// One-hit KO moves and fixed-damage moves.
const UNIQUE_MOVES: &[&str] = &[
    "dragon rage",
    "sonic boom",
    "guillotine",
    "fissure",
    "horn drill",
    "sheer cold",
];

/// Moves that alter stats, regardless of what the data source says.
const STAT_ALTERING_MOVES: &[&str] = &[
    "growl",
    "swords dance",
    "agility",
    "leer",
    "tail whip",
    "sand attack",
    "iron defense",
    "amnesia",
    "calm mind",
    "harden",
    "ancient power",
    "work up",
];

/// Classify a move. Total and side-effect free.
pub fn classify(
    damage_class: Option<DamageClass>,
    base_power: Option<u32>,
    move_name: &str,
) -> MoveType {
    let name = match_key(move_name);

    if UNIQUE_MOVES.contains(&name.as_str()) {
        return MoveType::Unique;
    }

    if STAT_ALTERING_MOVES.contains(&name.as_str()) || damage_class == Some(DamageClass::Status) {
        return MoveType::Status;
    }

    let Some(power) = base_power else {
        return MoveType::Unique;
    };

    match power {
        1..=60 => MoveType::Light,
        61..=99 => MoveType::Medium,
        100..=500 => MoveType::Heavy,
        // 0 and anything above 500.
        _ => MoveType::Medium,
    }
}

/// Curated names are compared case-insensitively and nothing else:
/// `Swords Dance` matches, `swords-dance` does not.
fn match_key(move_name: &str) -> String {
    move_name.trim().to_lowercase()
}
