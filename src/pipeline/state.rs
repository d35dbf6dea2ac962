// src/pipeline/state.rs

//! Import state machine.
//!
//! `Idle → Running(1) → … → Running(4) → Done`, with any running step able
//! to move to the terminal `Failed(step)`.

use std::fmt;

use crate::error::{AppError, Result};
use crate::models::ImportStep;

/// Where an import currently is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImportState {
    #[default]
    Idle,
    Running(ImportStep),
    Done,
    Failed(ImportStep),
}

impl ImportState {
    /// Enter `step`. Only the next step in order may start.
    pub fn begin(&mut self, step: ImportStep) -> Result<()> {
        let expected = match self {
            Self::Idle => Some(ImportStep::Identity),
            _ => None,
        };
        if expected != Some(step) {
            return Err(self.illegal(format!("begin step {}", step.number())));
        }
        *self = Self::Running(step);
        Ok(())
    }

    /// Finish the running step and move on to the next one, or to `Done`.
    ///
    /// Returns the step that should run next, if any.
    pub fn complete(&mut self) -> Result<Option<ImportStep>> {
        let Self::Running(step) = *self else {
            return Err(self.illegal("complete".to_string()));
        };
        let next = ImportStep::from_number(step.number() + 1);
        *self = match next {
            Some(next) => Self::Running(next),
            None => Self::Done,
        };
        Ok(next)
    }

    /// Mark the running step as failed. Terminal.
    pub fn fail(&mut self) -> Result<()> {
        let Self::Running(step) = *self else {
            return Err(self.illegal("fail".to_string()));
        };
        *self = Self::Failed(step);
        Ok(())
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed(_))
    }

    fn illegal(&self, action: String) -> AppError {
        AppError::validation(format!("cannot {action} while {self}"))
    }
}

impl fmt::Display for ImportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Running(step) => write!(f, "running step {}", step.number()),
            Self::Done => write!(f, "done"),
            Self::Failed(step) => write!(f, "failed at step {}", step.number()),
        }
    }
}
