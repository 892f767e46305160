//! Mailbox direction of a stored email.

use std::fmt;

/// Whether an email arrived in the inbox or was sent from this account.
///
/// The direction decides which timestamp column carries the message's
/// ordering time and therefore which column the sync watermark is computed
/// over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
  Incoming,
  Outgoing,
}

impl Direction {
  pub fn as_str(&self) -> &'static str {
    match self {
      Direction::Incoming => "incoming",
      Direction::Outgoing => "outgoing",
    }
  }

  /// Column holding the direction timestamp for this kind of email.
  pub fn timestamp_column(&self) -> &'static str {
    match self {
      Direction::Incoming => "received_datetime",
      Direction::Outgoing => "sent_datetime",
    }
  }
}

impl fmt::Display for Direction {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}
