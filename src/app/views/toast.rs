use std::time::{Duration, Instant};

use crate::ArcStr;

pub const DEFAULT_DURATION: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToastKind {
    #[default]
    Error,
    Success,
}

/// A transient message that hides itself after `duration`.
#[derive(Debug, Clone)]
pub struct Toast {
    message: Option<ArcStr>,
    kind: ToastKind,
    duration: Duration,
    shown_at: Option<Instant>,
}

impl Default for Toast {
    fn default() -> Self {
        Self::new(DEFAULT_DURATION)
    }
}

impl Toast {
    /// Creates a hidden toast.
    ///
    /// # Arguments
    /// * `duration` - How long a toast stays visible
    pub fn new(duration: Duration) -> Self {
        Self {
            message: None,
            kind: ToastKind::default(),
            duration,
            shown_at: None,
        }
    }

    /// Shows `message`, restarting the timer even if a toast is visible.
    pub fn show(&mut self, message: impl Into<ArcStr>, kind: ToastKind, now: Instant) {
        self.message = Some(message.into());
        self.kind = kind;
        self.shown_at = Some(now);
    }

    /// Hides the toast right away.
    pub fn clear(&mut self) {
        self.message = None;
        self.shown_at = None;
    }

    /// Hides the toast once its time is up. Returns whether it just closed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.shown_at {
            Some(shown_at) if now.saturating_duration_since(shown_at) >= self.duration => {
                self.clear();
                true
            }
            _ => false,
        }
    }

    /// The visible message.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn kind(&self) -> ToastKind {
        self.kind
    }
}
