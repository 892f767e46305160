//! User row, referenced read-only by the task layer.

use serde::Serialize;
use sqlx::FromRow;

/// Role gate for task operations. Stored as TEXT in the `users` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
  Manager,
  Employee,
}

impl Role {
  pub fn as_str(&self) -> &'static str {
    match self {
      Role::Manager => "Manager",
      Role::Employee => "Employee",
    }
  }
}

#[derive(Debug, Serialize, FromRow)]
pub struct UserRow {
  pub id: i64,
  pub email: String,
  pub name: String,
  pub role: String,
}

impl UserRow {
  pub fn is_manager(&self) -> bool {
    self.role == Role::Manager.as_str()
  }
}
