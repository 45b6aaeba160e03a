//! Transient success/error banners.
//!
//! Each report hands out a fresh [`NotificationToken`]. The shell is asked to
//! fire an expiry event carrying that token after the display window; the
//! expiry only clears the channel if no newer report has replaced it.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NotificationToken(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationChannel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NotificationStore {
    success: Option<NotificationToken>,
    error: Option<(String, NotificationToken)>,
    next_token: u64,
}

impl NotificationStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report_success(&mut self) -> NotificationToken {
        let token = self.issue();
        self.success = Some(token);
        token
    }

    pub fn report_error(&mut self, message: impl Into<String>) -> NotificationToken {
        let token = self.issue();
        self.error = Some((message.into(), token));
        token
    }

    /// Clears `channel` if `token` still identifies its active notification.
    pub fn expire(&mut self, channel: NotificationChannel, token: NotificationToken) -> bool {
        match channel {
            NotificationChannel::Success if self.success == Some(token) => {
                self.success = None;
                true
            }
            NotificationChannel::Error
                if self.error.as_ref().is_some_and(|(_, active)| *active == token) =>
            {
                self.error = None;
                true
            }
            _ => false,
        }
    }

    #[must_use]
    pub fn success(&self) -> bool {
        self.success.is_some()
    }

    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_ref().map(|(msg, _)| msg.as_str())
    }

    fn issue(&mut self) -> NotificationToken {
        self.next_token += 1;
        NotificationToken(self.next_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_clears_after_its_own_expiry() {
        let mut store = NotificationStore::new();
        let token = store.report_success();
        assert!(store.success());
        assert!(store.expire(NotificationChannel::Success, token));
        assert!(!store.success());
    }

    #[test]
    fn stale_expiry_does_not_clear_a_newer_error() {
        let mut store = NotificationStore::new();
        let first = store.report_error("Invalid password");
        let second = store.report_error("Network down");

        assert!(!store.expire(NotificationChannel::Error, first));
        assert_eq!(store.error_message(), Some("Network down"));

        assert!(store.expire(NotificationChannel::Error, second));
        assert_eq!(store.error_message(), None);
    }

    #[test]
    fn channels_are_independent() {
        let mut store = NotificationStore::new();
        let ok = store.report_success();
        let err = store.report_error("boom");

        assert!(!store.expire(NotificationChannel::Error, ok));
        assert!(!store.expire(NotificationChannel::Success, err));
        assert!(store.success());
        assert_eq!(store.error_message(), Some("boom"));
    }

    #[test]
    fn expiring_twice_is_harmless() {
        let mut store = NotificationStore::new();
        let token = store.report_success();
        assert!(store.expire(NotificationChannel::Success, token));
        assert!(!store.expire(NotificationChannel::Success, token));
    }
}
