use std::{fmt, str::FromStr};

use serde::Deserialize;

use crate::{Direction, Error, Result};

/// What an instruction does with its source cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Expand the selected fields into the row below.
    Down,
    /// Expand the selected fields into the column to the right.
    Right,
    /// Remove the source cell.
    Remove,
    /// Show or hide the nil fields of the source cell.
    ToggleNils,
}

impl Action {
    /// Placement direction for expanding actions, `None` for the others.
    pub fn direction(&self) -> Option<Direction> {
        match self {
            Action::Down => Some(Direction::Down),
            Action::Right => Some(Direction::Right),
            Action::Remove | Action::ToggleNils => None,
        }
    }
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "down" => Ok(Action::Down),
            "right" => Ok(Action::Right),
            "remove" => Ok(Action::Remove),
            "toggleNils" => Ok(Action::ToggleNils),
            other => Err(Error::InvalidAction(other.to_string())),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Down => write!(f, "down"),
            Action::Right => write!(f, "right"),
            Action::Remove => write!(f, "remove"),
            Action::ToggleNils => write!(f, "toggleNils"),
        }
    }
}

/// A request to change the grid, addressed to one cell.
///
/// `selections` names the fields to expand and is ignored by
/// [`Action::Remove`] and [`Action::ToggleNils`].
///
/// On the wire:
///
/// ```json
/// { "row": 0, "column": 0, "selections": ["manager"], "action": "right" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub row: usize,
    pub column: usize,
    pub selections: Vec<String>,
    pub action: Action,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct WireInstruction {
    row: usize,
    column: usize,
    #[serde(default)]
    selections: Vec<String>,
    action: String,
}

impl Instruction {
    pub fn new(row: usize, column: usize, action: Action) -> Self {
        Self {
            row,
            column,
            selections: Vec::new(),
            action,
        }
    }

    pub fn with_selections<I, S>(mut self, selections: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selections = selections.into_iter().map(Into::into).collect();
        self
    }

    /// Decodes an instruction from its JSON form.
    ///
    /// # Errors
    ///
    /// - [`Error::MalformedCommand`] for invalid JSON, missing fields, unknown
    ///   fields and coordinates that aren't non-negative integers
    /// - [`Error::InvalidAction`] for an action other than `down`, `right`,
    ///   `remove` and `toggleNils`
    pub fn from_json(json: &str) -> Result<Self> {
        let wire: WireInstruction = serde_json::from_str(json)?;
        Ok(Self {
            row: wire.row,
            column: wire.column,
            selections: wire.selections,
            action: wire.action.parse()?,
        })
    }
}
