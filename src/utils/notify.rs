use crate::utils::error::PlannerError;
use serde::Serialize;
use std::collections::VecDeque;
use std::time::Duration;

pub const DEFAULT_DURATION: Duration = Duration::from_millis(3000);
const MAX_PENDING: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
    Warning,
    #[default]
    Info,
}

/// Transient message for the presentation layer (a toast).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub level: NoticeLevel,
    pub message: String,
    pub duration: Duration,
}

impl Notification {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            duration: DEFAULT_DURATION,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, message)
    }
}

impl From<&PlannerError> for Notification {
    fn from(error: &PlannerError) -> Self {
        Notification::error(error.user_friendly_message())
    }
}

/// 只保留最近的幾則通知
#[derive(Debug, Default)]
pub struct Notifier {
    pending: VecDeque<Notification>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notify(&mut self, notification: Notification) {
        match notification.level {
            NoticeLevel::Error => tracing::error!("🔔 {}", notification.message),
            NoticeLevel::Warning => tracing::warn!("🔔 {}", notification.message),
            _ => tracing::info!("🔔 {}", notification.message),
        }
        if self.pending.len() == MAX_PENDING {
            self.pending.pop_front();
        }
        self.pending.push_back(notification);
    }

    pub fn drain(&mut self) -> Vec<Notification> {
        self.pending.drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
