//! Transient toast messaging.
//!
//! A single toast is shared by the whole page. A new notification overwrites
//! the visible one and restarts its dismissal timer; nothing is queued.

use std::time::{Duration, Instant};

use tracing::debug;

/// How long a toast stays visible.
pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_millis(4000);

/// Severity of a notification; selects the toast's icon and style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Success,
    Error,
    Warning,
    Info,
}

impl Severity {
    pub fn icon(self) -> &'static str {
        match self {
            Self::Success => "✔",
            Self::Error => "✖",
            Self::Warning => "⚠",
            Self::Info => "ℹ",
        }
    }

    /// Style class applied to the toast.
    pub fn class(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

/// A message to show to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub severity: Severity,
}

impl Notice {
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Success)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Error)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Warning)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Info)
    }
}

#[derive(Debug, Clone)]
struct Toast {
    notice: Notice,
    dismiss_at: Instant,
}

/// The page's single toast.
#[derive(Debug, Clone)]
pub struct NotificationCenter {
    duration: Duration,
    current: Option<Toast>,
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new(DEFAULT_TOAST_DURATION)
    }
}

impl NotificationCenter {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            current: None,
        }
    }

    /// Show `notice`, replacing any visible toast and restarting the timer.
    pub fn notify(&mut self, notice: Notice, now: Instant) {
        debug!(severity = notice.severity.class(), message = %notice.message, "toast");
        self.current = Some(Toast {
            notice,
            dismiss_at: now + self.duration,
        });
    }

    /// Dismiss the toast once its time is up. Returns whether it was dismissed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match &self.current {
            Some(toast) if now >= toast.dismiss_at => {
                self.current = None;
                true
            }
            _ => false,
        }
    }

    /// The visible notice, if any.
    pub fn visible(&self) -> Option<&Notice> {
        self.current.as_ref().map(|t| &t.notice)
    }

    /// When the visible toast will be dismissed.
    pub fn dismiss_at(&self) -> Option<Instant> {
        self.current.as_ref().map(|t| t.dismiss_at)
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_dismisses_after_duration() {
        let start = Instant::now();
        let mut center = NotificationCenter::default();
        center.notify(Notice::success("Saved"), start);

        assert!(!center.tick(start + Duration::from_millis(3999)));
        assert_eq!(center.visible().unwrap().message, "Saved");
        assert!(center.tick(start + Duration::from_millis(4000)));
        assert!(center.visible().is_none());
        assert!(!center.tick(start + Duration::from_millis(5000)));
    }

    #[test]
    fn new_notice_overwrites_and_restarts() {
        let start = Instant::now();
        let mut center = NotificationCenter::default();
        center.notify(Notice::info("first"), start);
        let later = start + Duration::from_millis(3000);
        center.notify(Notice::error("second"), later);

        assert_eq!(center.visible(), Some(&Notice::error("second")));
        assert!(!center.tick(start + Duration::from_millis(4500)));
        assert_eq!(center.dismiss_at(), Some(later + DEFAULT_TOAST_DURATION));
        assert!(center.tick(later + DEFAULT_TOAST_DURATION));
    }

    #[test]
    fn icons_differ_by_severity() {
        let icons = [
            Severity::Success.icon(),
            Severity::Error.icon(),
            Severity::Warning.icon(),
            Severity::Info.icon(),
        ];
        for (i, a) in icons.iter().enumerate() {
            for b in &icons[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
