//! Background sweeper tasks
//!
//! Two independently-scheduled loops, started on demand from the menu:
//! - the fine sweep aggregates what each borrower owes
//! - the notification sweep composes a status message per member
//!
//! Each loop reads the shared library under its mutex, sends one plain-text
//! report per tick over the report channel, and stops at the next tick
//! boundary once shutdown is signalled.

use biblio_config::SweepSchedule;
use biblio_core::Library;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

/// Handles for the two on-demand sweeper tasks.
pub struct Sweepers {
    library: Arc<Mutex<Library>>,
    schedule: SweepSchedule,
    reports: mpsc::UnboundedSender<String>,
    shutdown: watch::Receiver<bool>,
    fine_handle: Option<JoinHandle<()>>,
    notification_handle: Option<JoinHandle<()>>,
}

impl Sweepers {
    pub fn new(
        library: Arc<Mutex<Library>>,
        schedule: SweepSchedule,
        reports: mpsc::UnboundedSender<String>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            library,
            schedule,
            reports,
            shutdown,
            fine_handle: None,
            notification_handle: None,
        }
    }

    /// Start the fine sweep loop. Returns false if it is already running.
    pub fn start_fine_sweep(&mut self) -> bool {
        if self.fine_handle.is_some() {
            return false;
        }

        let library = self.library.clone();
        let reports = self.reports.clone();
        let mut shutdown = self.shutdown.clone();
        let interval = self.schedule.fine_interval;

        self.fine_handle = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick completes immediately; consume it so the first
            // sweep happens one full interval after start.
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let today = biblio_util::today();
                        let notices = {
                            let library = library.lock().await;
                            library.fine_sweep(today)
                        };

                        debug!(borrowers = notices.len(), "Fine sweep completed");

                        if notices.is_empty() {
                            continue;
                        }
                        let report = notices
                            .iter()
                            .map(|n| format!("Total fine for member {}: {}", n.member, n.total))
                            .collect::<Vec<_>>()
                            .join("\n");
                        if reports.send(report).is_err() {
                            break;
                        }
                    }
                    _ = shutdown.changed() => break,
                }
            }

            debug!("Fine sweeper stopped");
        }));

        true
    }

    /// Start the notification sweep loop. Returns false if it is already
    /// running.
    pub fn start_notification_sweep(&mut self) -> bool {
        if self.notification_handle.is_some() {
            return false;
        }

        let library = self.library.clone();
        let reports = self.reports.clone();
        let mut shutdown = self.shutdown.clone();
        let interval = self.schedule.notification_interval;

        self.notification_handle = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let today = biblio_util::today();
                        let notifications = {
                            let library = library.lock().await;
                            library.notification_sweep(today)
                        };

                        debug!(members = notifications.len(), "Notification sweep completed");

                        let report = if notifications.is_empty() {
                            "No notifications to send.".to_string()
                        } else {
                            notifications
                                .iter()
                                .map(|n| format!("Notification sent to {}:\n{}", n.name, n.message))
                                .collect::<Vec<_>>()
                                .join("\n\n")
                        };
                        if reports.send(report).is_err() {
                            break;
                        }
                    }
                    _ = shutdown.changed() => break,
                }
            }

            debug!("Notification sweeper stopped");
        }));

        true
    }

    pub fn schedule(&self) -> &SweepSchedule {
        &self.schedule
    }
}
