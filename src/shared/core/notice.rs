// Dismissible banner state shown at the boundary of a handler.
//
// Handlers record the last user-facing problem here and also return it as an
// error. Nothing renders it in this crate; the CLI prints it.

use serde::Serialize;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.level {
            NoticeLevel::Info => "info",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Error => "error",
        };
        write!(f, "[{tag}] {}", self.message)
    }
}

/// Single-slot banner; a new notice replaces the previous one.
#[derive(Debug, Default)]
pub struct NoticeBoard {
    slot: Mutex<Option<Notice>>,
}

impl NoticeBoard {
    pub fn post(&self, notice: Notice) {
        *lock(&self.slot) = Some(notice);
    }

    pub fn current(&self) -> Option<Notice> {
        lock(&self.slot).clone()
    }

    pub fn dismiss(&self) {
        *lock(&self.slot) = None;
    }
}

/// Lock a std mutex, recovering the data if a previous holder panicked.
pub fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod notice_board_tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn it_should_keep_only_the_latest_notice_until_dismissed() {
        let board = NoticeBoard::default();
        board.post(Notice::info("syncing"));
        board.post(Notice::error("Failed to load attendance data"));
        assert_eq!(board.current().map(|n| n.level), Some(NoticeLevel::Error));

        board.dismiss();
        assert_eq!(board.current(), None);
    }

    #[rstest]
    fn it_should_prefix_the_level_when_printed() {
        assert_eq!(Notice::warning("2 rows failed").to_string(), "[warning] 2 rows failed");
    }
}
