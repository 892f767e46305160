//! Task lifecycle status embedded on an email.

use crate::error::Error;
use std::fmt;
use std::str::FromStr;

/// The three valid task states. Anything else is rejected outright at the
/// parse boundary, before any mutation is attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
  Pending,
  InProgress,
  Completed,
}

impl TaskStatus {
  pub fn as_str(&self) -> &'static str {
    match self {
      TaskStatus::Pending => "pending",
      TaskStatus::InProgress => "in_progress",
      TaskStatus::Completed => "completed",
    }
  }
}

impl FromStr for TaskStatus {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "pending" => Ok(TaskStatus::Pending),
      "in_progress" => Ok(TaskStatus::InProgress),
      "completed" => Ok(TaskStatus::Completed),
      other => Err(Error::InvalidStatus(other.to_string())),
    }
  }
}

impl fmt::Display for TaskStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}
