//! One async task per seat, all funnelling into the shared [`Controller`].
//!
//! Each task waits on its seat's watch channel, asks its agent for an intent
//! and submits it. Tasks are cancelled together through a parent
//! [`CancellationToken`].

use crate::action::Action;
use crate::agents::PlayerAgent;
use crate::controller::{Controller, SeatHandle};
use crate::engine::GameEngine;
use crate::seat::PlayerPosition;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// What one seat task did before it stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeatReport {
    pub position: PlayerPosition,
    pub submitted: usize,
    pub rejected: usize,
}

pub struct Table {
    controller: Arc<Controller>,
    cancel: CancellationToken,
    tasks: JoinSet<SeatReport>,
    poll: Duration,
}

impl std::fmt::Debug for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Table")
            .field("seats", &self.tasks.len())
            .field("cancelled", &self.cancel.is_cancelled())
            .finish()
    }
}

impl Table {
    pub fn new(controller: Arc<Controller>) -> Self {
        Self {
            controller,
            cancel: CancellationToken::new(),
            tasks: JoinSet::new(),
            poll: Duration::from_millis(25),
        }
    }

    /// How often an idle seat re-asks its agent (bots with thinking delays need this).
    pub fn with_poll_interval(mut self, poll: Duration) -> Self {
        self.poll = poll;
        self
    }

    pub fn controller(&self) -> &Arc<Controller> {
        &self.controller
    }

    /// Spawn a task driving `agent` on the subscribed seat.
    ///
    /// Must be called from within a tokio runtime.
    pub fn seat_agent(&mut self, handle: SeatHandle, agent: Box<dyn PlayerAgent>) {
        let controller = Arc::clone(&self.controller);
        let token = self.cancel.child_token();
        let poll = self.poll;
        info!(seat = %handle.position(), "seat task started");
        self.tasks.spawn(run_seat(controller, handle, agent, token, poll));
    }

    /// Ask every seat task to stop.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    /// Stop all seat tasks and collect their reports.
    pub async fn shutdown(mut self) -> Vec<SeatReport> {
        self.stop();
        let mut reports = Vec::with_capacity(self.tasks.len());
        while let Some(joined) = self.tasks.join_next().await {
            match joined {
                Ok(report) => reports.push(report),
                Err(err) => warn!(error = %err, "seat task failed"),
            }
        }
        reports.sort_by_key(|r| r.position.index());
        reports
    }
}

async fn run_seat(
    controller: Arc<Controller>,
    mut handle: SeatHandle,
    mut agent: Box<dyn PlayerAgent>,
    token: CancellationToken,
    poll: Duration,
) -> SeatReport {
    let position = handle.position();
    let mut report = SeatReport { position, submitted: 0, rejected: 0 };
    loop {
        if token.is_cancelled() {
            break;
        }
        let view = handle.updates().borrow_and_update().clone();
        if let Some(intent) = agent.decide(&view) {
            let code = controller.submit(Action::new(handle.id(), position, intent));
            report.submitted += 1;
            if code.is_success() {
                continue;
            }
            report.rejected += 1;
            debug!(seat = %position, %intent, ?code, "seat intent rejected");
            agent.rejected(intent, code);
        }
        tokio::select! {
            _ = token.cancelled() => break,
            changed = handle.updates().changed() => {
                if changed.is_err() {
                    break;
                }
            }
            _ = tokio::time::sleep(poll) => {}
        }
    }
    debug!(seat = %position, submitted = report.submitted, "seat task stopped");
    report
}
