//! Chat commands: argument parsing and reply rendering.
//!
//! Platform adapters hand over the command name (without prefix/bot mention)
//! and the raw argument string; everything else happens here.

use crate::{
    domain::OwnerId,
    errors::Error,
    formatting::{title_case, Reply},
    ports::PutOutcome,
    service::{MoveService, Registered},
};

/// A fully parsed bot command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BotCommand {
    Learn {
        character: String,
        move_name: String,
    },
    CustomMove {
        character: String,
        move_name: String,
        move_type: String,
    },
    Moves {
        character: String,
    },
    Forget {
        character: String,
        move_name: String,
    },
    Help,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseError {
    /// Not one of ours.
    Unknown(String),
    /// Right command, wrong arguments; carries the usage line.
    Usage(&'static str),
}

const LEARN_USAGE: &str = "/learn <character> <move>";
const CUSTOM_MOVE_USAGE: &str = "/custom_move <character> <move> <move_type>";
const MOVES_USAGE: &str = "/moves <character>";
const FORGET_USAGE: &str = "/forget <character> <move>";

impl BotCommand {
    pub fn parse(name: &str, args: &str) -> Result<Self, ParseError> {
        let name = name.trim().to_lowercase();
        let args = split_args(args);

        let exact = |n: usize, usage: &'static str| -> Result<Vec<String>, ParseError> {
            if args.len() == n && args.iter().all(|a| !a.trim().is_empty()) {
                Ok(args.clone())
            } else {
                Err(ParseError::Usage(usage))
            }
        };

        match name.as_str() {
            "learn" => {
                let [character, move_name] = take::<2>(exact(2, LEARN_USAGE)?);
                Ok(Self::Learn {
                    character,
                    move_name,
                })
            }
            "custom_move" | "custommove" => {
                let [character, move_name, move_type] =
                    take::<3>(exact(3, CUSTOM_MOVE_USAGE)?);
                Ok(Self::CustomMove {
                    character,
                    move_name,
                    move_type,
                })
            }
            "moves" => {
                let [character] = take::<1>(exact(1, MOVES_USAGE)?);
                Ok(Self::Moves { character })
            }
            "forget" => {
                let [character, move_name] = take::<2>(exact(2, FORGET_USAGE)?);
                Ok(Self::Forget {
                    character,
                    move_name,
                })
            }
            "help" | "start" => Ok(Self::Help),
            _ => Err(ParseError::Unknown(name)),
        }
    }
}

fn take<const N: usize>(v: Vec<String>) -> [String; N] {
    let mut it = v.into_iter();
    std::array::from_fn(|_| it.next().unwrap_or_default())
}

/// Split on whitespace; double quotes group words (`"Mr Mime" psychic`).
/// An unterminated quote runs to the end of the input.
pub fn split_args(input: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut cur = String::new();
    let mut in_quotes = false;
    let mut has_token = false;

    for c in input.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                has_token = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if has_token {
                    out.push(std::mem::take(&mut cur));
                    has_token = false;
                }
            }
            c => {
                cur.push(c);
                has_token = true;
            }
        }
    }
    if has_token {
        out.push(cur);
    }
    out
}

/// Run a command for `owner` and render the outcome. Never fails: errors
/// become error replies.
pub async fn execute(service: &MoveService, owner: OwnerId, cmd: BotCommand) -> Reply {
    match cmd {
        BotCommand::Learn {
            character,
            move_name,
        } => match service.learn(owner, &character, &move_name).await {
            Ok(reg) => registered_reply("Move Registered Successfully!", "Move", &reg),
            Err(e) => error_reply(&e),
        },

        BotCommand::CustomMove {
            character,
            move_name,
            move_type,
        } => match service
            .custom_move(owner, &character, &move_name, &move_type)
            .await
        {
            Ok(reg) => registered_reply("Custom Move Registered!", "Custom move", &reg),
            Err(Error::Validation(_)) => Reply::error(
                "Invalid Move Type",
                "Invalid move type. Choose from: Light, Medium, Heavy, Status, Unique.",
            ),
            Err(e) => error_reply(&e),
        },

        BotCommand::Moves { character } => match service.moves(owner, &character).await {
            Ok(moves) if moves.is_empty() => Reply::error(
                "No Moves Found",
                format!("No moves found for character '{character}'."),
            ),
            Ok(moves) => {
                let lines = moves
                    .iter()
                    .map(|m| format!("{} ({})", title_case(&m.move_name), m.move_type))
                    .collect::<Vec<_>>()
                    .join("\n");
                Reply::info(format!("Moves for '{}'", character.trim()), lines)
            }
            Err(e) => error_reply(&e),
        },

        BotCommand::Forget {
            character,
            move_name,
        } => match service.forget(owner, &character, &move_name).await {
            Ok(true) => Reply::success(
                "Move Removed",
                format!("Move '{move_name}' removed from character '{character}'."),
            ),
            Ok(false) => Reply::error(
                "Error",
                format!("Move '{move_name}' not found for character '{character}'."),
            ),
            Err(e) => error_reply(&e),
        },

        BotCommand::Help => help_reply(),
    }
}

/// Reply for input that did not parse into a command.
pub fn parse_error_reply(err: &ParseError) -> Reply {
    match err {
        ParseError::Unknown(name) => Reply::error(
            "Unknown Command",
            format!("Unknown command '/{name}'. Send /help for the command menu."),
        ),
        ParseError::Usage(usage) => Reply::error(
            "Invalid Arguments",
            format!("Usage: {usage}\nWrap names containing spaces in double quotes."),
        ),
    }
}

pub fn help_reply() -> Reply {
    Reply::info(
        "Command Menu",
        "Here are all the available commands. When registering moves, use dashes (-) for spaces in move names.",
    )
    .with_field(
        LEARN_USAGE,
        "Register a move for a character. The move's type will be categorized automatically. Example: /learn Pikachu thunderbolt",
    )
    .with_field(
        CUSTOM_MOVE_USAGE,
        "Register a custom move for a character with a specified type (Light, Medium, Heavy, Status, Unique). Example: /custom_move Pikachu thunder-wave status",
    )
    .with_field(
        MOVES_USAGE,
        "List all moves registered for a particular character. Example: /moves Pikachu",
    )
    .with_field(
        FORGET_USAGE,
        "Delete a specific move from a character's list. Example: /forget Pikachu thunderbolt",
    )
}

fn registered_reply(title: &str, noun: &str, reg: &Registered) -> Reply {
    let verb = match reg.outcome {
        PutOutcome::Inserted => "registered",
        PutOutcome::Replaced => "updated",
    };
    Reply::success(
        title,
        format!(
            "{noun} '{}' has been {verb} for character '{}'.",
            reg.move_name, reg.character
        ),
    )
    .with_field("Move Type", reg.move_type.as_str())
}

fn error_reply(err: &Error) -> Reply {
    Reply::error("Error", format!("An error occurred: {err}"))
}
