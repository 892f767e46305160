//! Task lifecycle on stored emails.
//!
//! Every mutation is one conditional UPDATE; the guard rides in the same
//! statement and zero rows affected is the failure signal. There is no
//! check-then-write window on the ownership-sensitive paths.

use crate::{
  error::Error,
  models::email::task_status::TaskStatus,
  models::user::user_row::UserRow,
};
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::info;

/// Display name recorded as the assigner when a manager forces a task to
/// in_progress through [`TaskService::admin_set_status`].
const ADMIN_ASSIGNER_NAME: &str = "Admin";

pub struct TaskService {
  db: SqlitePool,
}

impl TaskService {
  pub fn new(db: SqlitePool) -> Self {
    TaskService { db }
  }

  async fn user(&self, user_id: i64) -> Result<UserRow, Error> {
    sqlx::query_as::<_, UserRow>("SELECT id, email, name, role FROM users WHERE id = ?")
      .bind(user_id)
      .fetch_optional(&self.db)
      .await?
      .ok_or(Error::UserNotFound(user_id))
  }

  async fn manager(&self, user_id: i64) -> Result<UserRow, Error> {
    let user = self.user(user_id).await?;
    if !user.is_manager() {
      return Err(Error::NotManager(user_id));
    }
    Ok(user)
  }

  /// Assign an email's task to `assignee_id`. Overwrites any prior
  /// assignment without requiring it to be empty; last assign wins. The
  /// assigner's Manager role is checked again here even though the request
  /// layer gates it too.
  pub async fn assign(
    &self,
    email_id: i64,
    assignee_id: i64,
    assigner_id: i64,
  ) -> Result<(), Error> {
    let assigner = self.manager(assigner_id).await?;
    let assignee = self.user(assignee_id).await?;

    let res = sqlx::query(
      "UPDATE emails SET assigned_to_id = ?, assigned_to_name = ?, assigned_by_id = ?, assigned_by_name = ?, assigned_at = ?, task_status = ? WHERE id = ?",
    )
    .bind(assignee.id)
    .bind(&assignee.name)
    .bind(assigner.id)
    .bind(&assigner.name)
    .bind(Utc::now())
    .bind(TaskStatus::InProgress.as_str())
    .bind(email_id)
    .execute(&self.db)
    .await?;
    if res.rows_affected() == 0 {
      return Err(Error::EmailNotFound(email_id));
    }

    info!(email_id, assignee_id, assigner_id, "task assigned");
    Ok(())
  }

  /// Mark the task completed. Succeeds only when `user_id` is the current
  /// assignee; the assignment fields are kept as they were, so a completed
  /// task still shows who worked it.
  pub async fn complete(&self, email_id: i64, user_id: i64) -> Result<(), Error> {
    let res = sqlx::query(
      "UPDATE emails SET task_status = ? WHERE id = ? AND assigned_to_id = ?",
    )
    .bind(TaskStatus::Completed.as_str())
    .bind(email_id)
    .bind(user_id)
    .execute(&self.db)
    .await?;
    if res.rows_affected() == 0 {
      return Err(Error::NoPermission);
    }

    info!(email_id, user_id, "task completed");
    Ok(())
  }

  /// Clear the assignment and reset the task to pending. Allowed for the
  /// user who made the assignment or for any manager; the role lookup is a
  /// subquery inside the same UPDATE.
  pub async fn unassign(&self, email_id: i64, acting_user_id: i64) -> Result<(), Error> {
    let res = sqlx::query(
      "UPDATE emails SET assigned_to_id = NULL, assigned_to_name = NULL, assigned_by_id = NULL, assigned_by_name = NULL, assigned_at = NULL, task_status = 'pending' WHERE id = ? AND (assigned_by_id = ? OR EXISTS (SELECT 1 FROM users WHERE id = ? AND role = 'Manager'))",
    )
    .bind(email_id)
    .bind(acting_user_id)
    .bind(acting_user_id)
    .execute(&self.db)
    .await?;
    if res.rows_affected() == 0 {
      return Err(Error::NoPermission);
    }

    info!(email_id, acting_user_id, "task unassigned");
    Ok(())
  }

  /// Manager override of the task status.
  ///
  /// - `in_progress` needs an assignee and records the assigner display name
  ///   as the administrative label, not the manager's own name.
  /// - `pending` is the only path that clears every assignment field.
  /// - `completed` touches the status alone.
  ///
  /// Unknown status strings never reach this method; they are rejected by
  /// `TaskStatus::from_str`.
  pub async fn admin_set_status(
    &self,
    email_id: i64,
    status: TaskStatus,
    manager_id: i64,
    assignee_id: Option<i64>,
  ) -> Result<(), Error> {
    let manager = self.manager(manager_id).await?;

    let res = match status {
      TaskStatus::InProgress => {
        let assignee_id = assignee_id.ok_or(Error::MissingAssignee)?;
        let assignee = self.user(assignee_id).await?;
        sqlx::query(
          "UPDATE emails SET task_status = ?, assigned_to_id = ?, assigned_to_name = ?, assigned_by_id = ?, assigned_by_name = ?, assigned_at = ? WHERE id = ?",
        )
        .bind(status.as_str())
        .bind(assignee.id)
        .bind(&assignee.name)
        .bind(manager.id)
        .bind(ADMIN_ASSIGNER_NAME)
        .bind(Utc::now())
        .bind(email_id)
        .execute(&self.db)
        .await?
      }
      TaskStatus::Pending => {
        sqlx::query(
          "UPDATE emails SET task_status = ?, assigned_to_id = NULL, assigned_to_name = NULL, assigned_by_id = NULL, assigned_by_name = NULL, assigned_at = NULL WHERE id = ?",
        )
        .bind(status.as_str())
        .bind(email_id)
        .execute(&self.db)
        .await?
      }
      TaskStatus::Completed => {
        sqlx::query("UPDATE emails SET task_status = ? WHERE id = ?")
          .bind(status.as_str())
          .bind(email_id)
          .execute(&self.db)
          .await?
      }
    };
    if res.rows_affected() == 0 {
      return Err(Error::EmailNotFound(email_id));
    }

    info!(email_id, manager_id, status = %status, "admin set task status");
    Ok(())
  }
}
