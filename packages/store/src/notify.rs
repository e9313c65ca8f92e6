//! Transient user-facing notifications (toasts).
//!
//! Every entry is also emitted as a `tracing` event so failures land in the
//! log even when no frontend is subscribed.

use chrono::{DateTime, Utc};

use crate::observable::Observable;

/// Entries kept before the oldest are dropped.
pub const MAX_NOTIFICATIONS: usize = 50;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Notification {
    pub at: DateTime<Utc>,
    pub level: LogLevel,
    pub title: String,
    pub description: String,
}

/// Observable list of notifications, newest last, capped at
/// [`MAX_NOTIFICATIONS`].
#[derive(Clone, Debug, Default)]
pub struct Notifications {
    entries: Observable<Vec<Notification>>,
}

impl Notifications {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, level: LogLevel, title: &str, description: impl Into<String>) {
        let description = description.into();
        match level {
            LogLevel::Error => tracing::error!(%title, %description, "notification"),
            LogLevel::Warning => tracing::warn!(%title, %description, "notification"),
            LogLevel::Info | LogLevel::Success => {
                tracing::info!(%title, %description, "notification")
            }
        }
        self.entries.update(|entries| {
            entries.push(Notification {
                at: Utc::now(),
                level,
                title: title.to_string(),
                description,
            });
            if entries.len() > MAX_NOTIFICATIONS {
                let excess = entries.len() - MAX_NOTIFICATIONS;
                entries.drain(..excess);
            }
        });
    }

    pub fn entries(&self) -> Vec<Notification> {
        self.entries.get()
    }

    pub fn latest(&self) -> Option<Notification> {
        self.entries.with(|entries| entries.last().cloned())
    }

    pub fn clear(&self) {
        self.entries.set(Vec::new());
    }

    pub fn subscribe(&self) -> tokio::sync::watch::Receiver<Vec<Notification>> {
        self.entries.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oldest_entries_are_dropped() {
        let notifications = Notifications::new();
        for n in 0..MAX_NOTIFICATIONS + 5 {
            notifications.push(LogLevel::Info, "Saved", format!("entry {n}"));
        }

        let entries = notifications.entries();
        assert_eq!(entries.len(), MAX_NOTIFICATIONS);
        assert_eq!(entries[0].description, "entry 5");
        assert_eq!(
            notifications.latest().unwrap().description,
            format!("entry {}", MAX_NOTIFICATIONS + 4)
        );

        notifications.clear();
        assert!(notifications.entries().is_empty());
    }
}
