//! Transient toast messages for mita
//!
//! Every surfaced success or failure goes through here; toasts expire on
//! their own and render in the footer.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

const TOAST_LIFETIME: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Error,
}

#[derive(Debug)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    created: Instant,
}

#[derive(Debug, Default)]
pub struct Notifier {
    toasts: VecDeque<Toast>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(message, ToastKind::Info);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(message, ToastKind::Success);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(message, ToastKind::Error);
    }

    fn push(&mut self, message: impl Into<String>, kind: ToastKind) {
        self.toasts.push_back(Toast {
            message: message.into(),
            kind,
            created: Instant::now(),
        });
    }

    /// Drop expired toasts. Called once per render tick.
    pub fn prune(&mut self) {
        let now = Instant::now();
        while let Some(front) = self.toasts.front() {
            if now.duration_since(front.created) > TOAST_LIFETIME {
                self.toasts.pop_front();
            } else {
                break;
            }
        }
    }

    /// The toast to display, newest first.
    pub fn current(&self) -> Option<&Toast> {
        self.toasts.back()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newest_toast_wins() {
        let mut notifier = Notifier::new();
        notifier.info("loading");
        notifier.error("network error");

        let current = notifier.current().unwrap();
        assert_eq!(current.message, "network error");
        assert_eq!(current.kind, ToastKind::Error);
    }

    #[test]
    fn prune_keeps_fresh_toasts() {
        let mut notifier = Notifier::new();
        notifier.success("saved");
        notifier.prune();
        assert!(notifier.current().is_some());
    }
}
