//! Transient user notifications.

use std::time::Duration;

use chrono::Utc;
use rand::distr::Alphanumeric;
use rand::Rng;
use tidemark_core::{ToastId, ToastKind};

/// How long a toast stays up before self-removing.
pub const TOAST_TTL: Duration = Duration::from_millis(3200);

/// A transient, auto-expiring notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    /// Unique id (timestamp plus random suffix).
    pub id: ToastId,
    /// Severity.
    pub kind: ToastKind,
    /// Message shown to the user.
    pub message: String,
}

impl Toast {
    /// Create a toast with a fresh id.
    #[must_use]
    pub fn new(kind: ToastKind, message: impl Into<String>) -> Self {
        Self {
            id: fresh_id(),
            kind,
            message: message.into(),
        }
    }
}

fn fresh_id() -> ToastId {
    let suffix: String = rand::rng()
        .sample_iter(Alphanumeric)
        .take(6)
        .map(char::from)
        .collect();
    ToastId::new(format!("{}_{suffix}", Utc::now().timestamp_millis()))
}
