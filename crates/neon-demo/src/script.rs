//! Interaction scripts.
//!
//! One interaction per line:
//!
//! ```text
//! # user  kind    custom_id            values
//! 1       button  dog
//! 1       select  sample_select_menu   fire,water
//! ```
//!
//! Blank lines and lines starting with `#` are skipped.

use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use neon_menu::UserId;
use thiserror::Error;

use crate::cli::MenuKind;

/// What the scripted user does
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Press a button
    Button {
        /// Button custom id
        custom_id: String,
    },
    /// Choose values in a select menu
    Select {
        /// Select menu custom id
        custom_id: String,
        /// Chosen option values
        values: Vec<String>,
    },
}

impl Action {
    /// Custom id of the target component
    pub fn custom_id(&self) -> &str {
        match self {
            Self::Button { custom_id } | Self::Select { custom_id, .. } => custom_id,
        }
    }
}

/// One scripted interaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptLine {
    /// Acting user
    pub user: UserId,
    /// What they do
    pub action: Action,
}

impl ScriptLine {
    /// A button press
    pub fn button(user: UserId, custom_id: impl Into<String>) -> Self {
        Self {
            user,
            action: Action::Button {
                custom_id: custom_id.into(),
            },
        }
    }

    /// A select menu choice
    pub fn select<I, S>(user: UserId, custom_id: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            user,
            action: Action::Select {
                custom_id: custom_id.into(),
                values: values.into_iter().map(Into::into).collect(),
            },
        }
    }
}

/// Why a script line could not be parsed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineError {
    /// A required column is absent
    #[error("missing {0}")]
    MissingField(&'static str),

    /// The user column is not a number
    #[error("invalid user id '{0}'")]
    InvalidUserId(String),

    /// Neither `button` nor `select`
    #[error("unknown interaction kind '{0}'")]
    UnknownKind(String),

    /// Extra columns after the last expected one
    #[error("unexpected trailing '{0}'")]
    Trailing(String),
}

impl FromStr for ScriptLine {
    type Err = LineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();

        let user = parts.next().ok_or(LineError::MissingField("user id"))?;
        let user = user
            .parse::<u64>()
            .map(UserId)
            .map_err(|_| LineError::InvalidUserId(user.to_string()))?;
        let kind = parts
            .next()
            .ok_or(LineError::MissingField("interaction kind"))?;
        let custom_id = parts.next().ok_or(LineError::MissingField("custom id"))?;

        let line = match kind {
            "button" => Self::button(user, custom_id),
            "select" => {
                let values: Vec<&str> = parts
                    .next()
                    .unwrap_or_default()
                    .split(',')
                    .filter(|v| !v.is_empty())
                    .collect();
                if values.is_empty() {
                    return Err(LineError::MissingField("select values"));
                }
                Self::select(user, custom_id, values)
            }
            other => return Err(LineError::UnknownKind(other.to_string())),
        };

        match parts.next() {
            Some(extra) => Err(LineError::Trailing(extra.to_string())),
            None => Ok(line),
        }
    }
}

/// A script line that could not be parsed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {reason}")]
pub struct ScriptError {
    /// 1-based line number
    pub line: usize,
    /// What is wrong with it
    pub reason: LineError,
}

/// Parse a whole script
pub fn parse(text: &str) -> Result<Vec<ScriptLine>, ScriptError> {
    text.lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(number, line)| {
            line.parse().map_err(|reason| ScriptError {
                line: number,
                reason,
            })
        })
        .collect()
}

/// Read and parse a script file
pub fn load(path: &Path) -> Result<Vec<ScriptLine>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read script {}", path.display()))?;
    parse(&text).with_context(|| format!("Invalid script {}", path.display()))
}

/// Built-in script for a sample menu.
///
/// Ends with a press from a second user, which stops an author-only menu.
pub fn builtin(menu: MenuKind) -> Vec<ScriptLine> {
    let owner = UserId(1);
    let stranger = UserId(2);
    match menu {
        MenuKind::Pets => vec![
            ScriptLine::button(owner, "dog"),
            ScriptLine::button(owner, "cat"),
            ScriptLine::button(stranger, "fish"),
        ],
        MenuKind::Elements => vec![
            ScriptLine::button(owner, "earth_button"),
            ScriptLine::button(owner, "rock"),
            ScriptLine::select(owner, "sample_select_menu", ["fire"]),
            ScriptLine::button(stranger, "wind"),
        ],
    }
}
