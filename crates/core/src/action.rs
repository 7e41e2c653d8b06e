//! Structured user actions and their compact string tokens.
//!
//! Tokens are what a gateway attaches to a button. They are decoded exactly once,
//! at the boundary, into [`Action`]; nothing past that point looks at strings.
//!
//! | action                | token                         |
//! |-----------------------|-------------------------------|
//! | `StartLearning`       | `learn`                       |
//! | `SelectTier`          | `tier:<t>`                    |
//! | `RequestTask`         | `task:<t>:<i>`                |
//! | `SubmitAnswer`        | `ans:<mode>:<t>:<i>:<choice>` |
//! | `AcknowledgeLesson`   | `done:<mode>:<t>:<i>`         |
//! | `RequestTest`         | `test`                        |
//! | `RequestRandomTest`   | `rand`                        |
//!
//! `<choice>` indexes the task's fixed choice order (answer first, then the
//! distractors), never the shuffled display order, so a token stays a few bytes
//! long whatever the answer text is.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::model::{LessonHandle, QuizMode};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseActionError {
    #[error("empty action token")]
    Empty,

    #[error("unknown action {0:?}")]
    UnknownKind(String),

    #[error("action {kind:?} is missing field {field}")]
    MissingField {
        kind: &'static str,
        field: &'static str,
    },

    #[error("action {kind:?} has invalid field {field}: {raw:?}")]
    InvalidField {
        kind: &'static str,
        field: &'static str,
        raw: String,
    },

    #[error("unknown command {0:?}")]
    UnknownCommand(String),
}

/// Button press decoded into its structured form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    StartLearning,
    SelectTier(usize),
    RequestTask(LessonHandle),
    SubmitAnswer {
        handle: LessonHandle,
        mode: QuizMode,
        choice: usize,
    },
    /// Move past a lesson without a task, then continue in `mode`.
    AcknowledgeLesson {
        handle: LessonHandle,
        mode: QuizMode,
    },
    RequestTest,
    RequestRandomTest,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::StartLearning => f.write_str("learn"),
            Action::SelectTier(tier) => write!(f, "tier:{tier}"),
            Action::RequestTask(handle) => write!(f, "task:{handle}"),
            Action::SubmitAnswer {
                handle,
                mode,
                choice,
            } => write!(f, "ans:{}:{handle}:{choice}", mode.code()),
            Action::AcknowledgeLesson { handle, mode } => {
                write!(f, "done:{}:{handle}", mode.code())
            }
            Action::RequestTest => f.write_str("test"),
            Action::RequestRandomTest => f.write_str("rand"),
        }
    }
}

fn parse_index(
    kind: &'static str,
    field: &'static str,
    raw: Option<&str>,
) -> Result<usize, ParseActionError> {
    let raw = raw.ok_or(ParseActionError::MissingField { kind, field })?;
    raw.parse().map_err(|_| ParseActionError::InvalidField {
        kind,
        field,
        raw: raw.to_owned(),
    })
}

fn parse_mode(kind: &'static str, raw: Option<&str>) -> Result<QuizMode, ParseActionError> {
    let raw = raw.ok_or(ParseActionError::MissingField { kind, field: "mode" })?;
    QuizMode::from_code(raw).ok_or_else(|| ParseActionError::InvalidField {
        kind,
        field: "mode",
        raw: raw.to_owned(),
    })
}

fn parse_handle<'a>(
    kind: &'static str,
    parts: &mut impl Iterator<Item = &'a str>,
) -> Result<LessonHandle, ParseActionError> {
    let tier = parse_index(kind, "tier", parts.next())?;
    let index = parse_index(kind, "lesson", parts.next())?;
    Ok(LessonHandle::new(tier, index))
}

impl FromStr for Action {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ParseActionError::Empty);
        }
        let (kind, rest) = s.split_once(':').unwrap_or((s, ""));
        match kind {
            "learn" => Ok(Action::StartLearning),
            "test" => Ok(Action::RequestTest),
            "rand" => Ok(Action::RequestRandomTest),
            "tier" => parse_index("tier", "tier", Some(rest)).map(Action::SelectTier),
            "task" => parse_handle("task", &mut rest.split(':')).map(Action::RequestTask),
            "done" => {
                let mut parts = rest.split(':');
                let mode = parse_mode("done", parts.next())?;
                let handle = parse_handle("done", &mut parts)?;
                Ok(Action::AcknowledgeLesson { handle, mode })
            }
            "ans" => {
                let mut parts = rest.split(':');
                let mode = parse_mode("ans", parts.next())?;
                let handle = parse_handle("ans", &mut parts)?;
                let choice = parse_index("ans", "choice", parts.next())?;
                Ok(Action::SubmitAnswer {
                    handle,
                    mode,
                    choice,
                })
            }
            other => Err(ParseActionError::UnknownKind(other.to_owned())),
        }
    }
}

/// Slash command typed by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Progress,
    Help,
}

impl FromStr for Command {
    type Err = ParseActionError;

    /// Accepts `/start`, `/start@SomeBot` and trailing arguments.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let word = s.split_whitespace().next().unwrap_or_default();
        let name = word
            .strip_prefix('/')
            .ok_or_else(|| ParseActionError::UnknownCommand(s.to_owned()))?;
        let name = name.split_once('@').map_or(name, |(name, _bot)| name);
        match name {
            "start" => Ok(Command::Start),
            "progress" => Ok(Command::Progress),
            "help" => Ok(Command::Help),
            _ => Err(ParseActionError::UnknownCommand(s.to_owned())),
        }
    }
}
