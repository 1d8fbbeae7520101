use crate::ui::LAYOUT_TOKENS;

const APP_NAME: &str = "cvpage";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Success,
    Error,
}

impl NoticeKind {
    fn summary(self) -> &'static str {
        match self {
            Self::Info => "CV",
            Self::Success => "Export complete",
            Self::Error => "Export failed",
        }
    }

    fn icon(self) -> &'static str {
        match self {
            Self::Info => "dialog-information",
            Self::Success => "emblem-ok-symbolic",
            Self::Error => "dialog-error",
        }
    }
}

/// A transient, user-visible message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            message: message.into(),
        }
    }
}

pub trait Notifier {
    fn notify(&self, notice: &Notice);
}

/// Desktop notifications through the session notification daemon. When
/// disabled, notices are only logged.
#[derive(Debug, Clone, Copy)]
pub struct DesktopNotifier {
    enabled: bool,
}

impl DesktopNotifier {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl Notifier for DesktopNotifier {
    fn notify(&self, notice: &Notice) {
        tracing::info!(kind = ?notice.kind, message = %notice.message, "notice");
        if !self.enabled {
            return;
        }
        if let Err(err) = notify_rust::Notification::new()
            .appname(APP_NAME)
            .summary(notice.kind.summary())
            .body(&notice.message)
            .icon(notice.kind.icon())
            .timeout(notify_rust::Timeout::Milliseconds(
                LAYOUT_TOKENS.toast_duration_ms,
            ))
            .show()
        {
            tracing::warn!("system notification failed: {err}");
        }
    }
}

#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: std::cell::RefCell<Vec<Notice>>,
}

#[cfg(test)]
impl RecordingNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.borrow().clone()
    }
}

#[cfg(test)]
impl Notifier for RecordingNotifier {
    fn notify(&self, notice: &Notice) {
        self.notices.borrow_mut().push(notice.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_tag_kind() {
        assert_eq!(Notice::success("ok").kind, NoticeKind::Success);
        assert_eq!(Notice::error("no").kind, NoticeKind::Error);
        assert_eq!(Notice::info("hi").message, "hi");
    }

    #[test]
    fn disabled_desktop_notifier_only_logs() {
        DesktopNotifier::new(false).notify(&Notice::info("quiet"));
    }
}
