//! Reminder and scheduled-task store
//!
//! Session-owned, time-ordered store of pending spoken notifications. The
//! interpreter loop polls it once per iteration, before routing, so a
//! reminder that comes due during an unrelated command is still announced
//! promptly. No persistence: the store lives and dies with the session.

use chrono::{DateTime, Duration, Utc};
use std::collections::VecDeque;
use tracing::debug;

/// A one-shot spoken reminder
#[derive(Debug, Clone, PartialEq)]
pub struct Reminder {
    pub text: String,
    pub due: DateTime<Utc>,
}

/// A scheduled task announcement
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledTask {
    pub description: String,
    pub due: DateTime<Utc>,
}

/// Pending reminders and scheduled tasks for one session.
///
/// Reminders are consumed front-to-back: `due_reminders` stops at the first
/// front element that is not yet due. That makes non-decreasing due-time
/// insertion a caller obligation; `add_reminder` computes due times from
/// "now", so natural use satisfies it. Tasks carry no such obligation; the
/// whole collection is scanned on every check.
#[derive(Debug, Default)]
pub struct Scheduler {
    reminders: VecDeque<Reminder>,
    tasks: Vec<ScheduledTask>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a reminder due `delay` from now, appended to the back of the
    /// queue.
    ///
    /// Callers must add reminders in non-decreasing due-time order (which
    /// delay-from-now insertion gives for free); the due check only ever
    /// inspects the queue front.
    pub fn add_reminder(&mut self, text: impl Into<String>, delay: Duration) -> DateTime<Utc> {
        let due = Utc::now() + delay;
        let reminder = Reminder {
            text: text.into(),
            due,
        };
        debug!("Reminder queued for {}", due);
        self.reminders.push_back(reminder);
        due
    }

    /// Remove and return due reminders from the front of the queue, in
    /// order, stopping at the first non-due front element.
    pub fn due_reminders(&mut self, now: DateTime<Utc>) -> Vec<Reminder> {
        let mut due = Vec::new();
        while let Some(front) = self.reminders.front() {
            if front.due > now {
                break;
            }
            // Front exists and is due; pop cannot fail.
            if let Some(reminder) = self.reminders.pop_front() {
                due.push(reminder);
            }
        }
        due
    }

    /// Schedule a task announcement for an absolute time. No ordering
    /// requirement.
    pub fn add_task(&mut self, description: impl Into<String>, due: DateTime<Utc>) {
        debug!("Task scheduled for {}", due);
        self.tasks.push(ScheduledTask {
            description: description.into(),
            due,
        });
    }

    /// Remove and return every due task, regardless of position.
    pub fn due_tasks(&mut self, now: DateTime<Utc>) -> Vec<ScheduledTask> {
        let mut due = Vec::new();
        let mut i = 0;
        while i < self.tasks.len() {
            if self.tasks[i].due <= now {
                due.push(self.tasks.remove(i));
            } else {
                i += 1;
            }
        }
        due
    }

    pub fn pending_reminders(&self) -> usize {
        self.reminders.len()
    }

    pub fn pending_tasks(&self) -> usize {
        self.tasks.len()
    }
}
