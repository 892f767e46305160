//! Periodic sync scheduler.
//!
//! A fixed-interval timer drives one ingestion pass for both directions,
//! plus one run shortly after startup. A failed pass is logged by the engine
//! and the cadence continues.

use crate::sync::SyncEngine;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, Notify};
use tokio::task::JoinHandle;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
  Stopped,
  Running,
}

pub struct Scheduler {
  engine: Arc<SyncEngine>,
  interval: Duration,
  /// Delay before the first pass, so startup wiring settles first.
  startup_delay: Duration,
  state: Mutex<SchedulerState>,
  shutdown: Arc<Notify>,
  handle: Mutex<Option<JoinHandle<()>>>,
}

impl Scheduler {
  pub fn new(engine: Arc<SyncEngine>, interval: Duration, startup_delay: Duration) -> Self {
    Scheduler {
      engine,
      interval,
      startup_delay,
      state: Mutex::new(SchedulerState::Stopped),
      shutdown: Arc::new(Notify::new()),
      handle: Mutex::new(None),
    }
  }

  pub async fn state(&self) -> SchedulerState {
    *self.state.lock().await
  }

  /// Spawn the timer loop. Calling start on a running scheduler is a no-op.
  pub async fn start(&self) {
    let mut state = self.state.lock().await;
    if *state == SchedulerState::Running {
      debug!("scheduler already running");
      return;
    }
    *state = SchedulerState::Running;

    let engine = self.engine.clone();
    let shutdown = self.shutdown.clone();
    let interval = self.interval;
    let startup_delay = self.startup_delay;

    let handle = tokio::spawn(async move {
      tokio::select! {
        _ = tokio::time::sleep(startup_delay) => {}
        _ = shutdown.notified() => return,
      }
      loop {
        engine.run_pass().await;
        tokio::select! {
          _ = tokio::time::sleep(interval) => {}
          _ = shutdown.notified() => return,
        }
      }
    });
    *self.handle.lock().await = Some(handle);

    info!(interval_secs = interval.as_secs(), "scheduler started");
  }

  /// Signal the loop to exit and wait for it. Safe to call repeatedly and
  /// from shutdown handling.
  pub async fn stop(&self) {
    {
      let mut state = self.state.lock().await;
      if *state == SchedulerState::Stopped {
        debug!("scheduler already stopped");
        return;
      }
      *state = SchedulerState::Stopped;
    }
    // notify_one stores a permit, so the loop wakes even if it is mid-pass
    // rather than parked on the select.
    self.shutdown.notify_one();
    if let Some(handle) = self.handle.lock().await.take() {
      let _ = handle.await;
    }
    info!("scheduler stopped");
  }
}
