//! Wizard state: the current step, transition direction, and collected answers.

use serde::{Deserialize, Serialize};

use super::validation::FieldErrors;

/// Direction of the last step transition. Only used by the presentation layer
/// (e.g. to pick a slide animation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Forward => write!(f, "forward"),
            Self::Backward => write!(f, "backward"),
        }
    }
}

/// In-memory state of one wizard run. Created fresh on mount, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardState<D> {
    /// 1-indexed, always within `[1, total_steps]`.
    current_step: u8,
    total_steps: u8,
    direction: Direction,
    /// Answers accumulated so far.
    pub fields: D,
    /// Annotations from the last failed validation.
    pub errors: FieldErrors,
}

impl<D> WizardState<D> {
    pub fn with_fields(total_steps: u8, fields: D) -> Self {
        Self {
            current_step: 1,
            total_steps: total_steps.max(1),
            direction: Direction::Forward,
            fields,
            errors: FieldErrors::new(),
        }
    }

    pub fn current_step(&self) -> u8 {
        self.current_step
    }

    pub fn total_steps(&self) -> u8 {
        self.total_steps
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn contains_step(&self, step: u8) -> bool {
        (1..=self.total_steps).contains(&step)
    }

    /// Move one step forward. Returns the new step, or `None` at the last step.
    pub fn step_forward(&mut self) -> Option<u8> {
        if self.current_step >= self.total_steps {
            return None;
        }
        self.current_step += 1;
        self.direction = Direction::Forward;
        Some(self.current_step)
    }

    /// Move one step back. Returns the new step, or `None` at step 1.
    pub fn step_backward(&mut self) -> Option<u8> {
        if self.current_step <= 1 {
            return None;
        }
        self.current_step -= 1;
        self.direction = Direction::Backward;
        Some(self.current_step)
    }
}
