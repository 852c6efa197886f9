use std::{fmt, str::FromStr};

use crate::errors::Error;

/// Chat-platform user id of whoever registered a move (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OwnerId(pub i64);

/// Chat id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChatId(pub i64);

/// Message id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageId(pub i32);

/// A stable reference to a sent message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MessageRef {
    pub chat_id: ChatId,
    pub message_id: MessageId,
}

/// The sole classification output for a move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MoveType {
    Light,
    Medium,
    Heavy,
    Status,
    Unique,
}

impl MoveType {
    pub const ALL: [MoveType; 5] = [
        MoveType::Light,
        MoveType::Medium,
        MoveType::Heavy,
        MoveType::Status,
        MoveType::Unique,
    ];

    /// Canonical (capitalized) tag, as persisted and displayed.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "Light",
            Self::Medium => "Medium",
            Self::Heavy => "Heavy",
            Self::Status => "Status",
            Self::Unique => "Unique",
        }
    }
}

impl fmt::Display for MoveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MoveType {
    type Err = Error;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                Error::Validation(format!(
                    "invalid move type '{wanted}'. Choose from: Light, Medium, Heavy, Status, Unique."
                ))
            })
    }
}

/// The persisted unit: one move of one character, owned by one user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveRecord {
    pub owner_id: OwnerId,
    pub character_name: String,
    pub move_name: String,
    pub move_type: MoveType,
}

impl MoveRecord {
    /// Build a record in its stored shape: character trimmed (case kept),
    /// move name trimmed and lower-cased.
    pub fn new(
        owner_id: OwnerId,
        character_name: &str,
        move_name: &str,
        move_type: MoveType,
    ) -> Self {
        Self {
            owner_id,
            character_name: normalize_character(character_name),
            move_name: normalize_move_name(move_name),
            move_type,
        }
    }
}

pub fn normalize_character(name: &str) -> String {
    name.trim().to_string()
}

pub fn normalize_move_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Damage class reported by the move-data source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DamageClass {
    Physical,
    Special,
    Status,
}

impl FromStr for DamageClass {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "physical" => Ok(Self::Physical),
            "special" => Ok(Self::Special),
            "status" => Ok(Self::Status),
            other => Err(Error::InvalidArgument(format!(
                "unknown damage class '{other}'"
            ))),
        }
    }
}

/// Attributes of a move as resolved by the external lookup.
///
/// Either attribute may legitimately be absent (e.g. fixed-damage moves have
/// no base power).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveData {
    pub canonical_name: String,
    pub damage_class: Option<DamageClass>,
    pub base_power: Option<u32>,
}
