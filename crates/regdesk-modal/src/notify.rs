//! User-facing notifications

use parking_lot::Mutex;
use std::fmt::{self, Debug, Display};
use std::time::Duration;

/// Shown after any contained failure
pub const GENERIC_ERROR_MESSAGE: &str =
    "Something went wrong. Please try again or contact support if the problem persists.";

/// Shown after the backend accepts a registration
pub const SUCCESS_MESSAGE: &str =
    "Registration submitted successfully! You will receive a confirmation email shortly.";

/// How long a toast stays up unless told otherwise
pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_millis(5000);

/// How long the submission success toast stays up
pub const SUCCESS_TOAST_DURATION: Duration = Duration::from_millis(6000);

/// Toast styling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToastKind {
    /// Green
    Success,
    /// Red
    Error,
    /// Amber
    Warning,
    /// Neutral
    Info,
}

impl Display for ToastKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        };
        f.write_str(name)
    }
}

/// A transient message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    /// Text shown to the user
    pub message: String,
    /// Styling
    pub kind: ToastKind,
    /// Time on screen
    pub duration: Duration,
}

impl Toast {
    /// Toast with the default duration
    #[must_use]
    pub fn new(message: impl Into<String>, kind: ToastKind) -> Self {
        Self {
            message: message.into(),
            kind,
            duration: DEFAULT_TOAST_DURATION,
        }
    }

    /// Override the duration
    #[inline]
    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }
}

/// Sink for toasts
#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send + Sync + Debug {
    /// Show a toast
    fn notify(&self, toast: Toast);
}

/// Writes toasts to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, toast: Toast) {
        tracing::info!(
            kind = %toast.kind,
            duration_ms = u64::try_from(toast.duration.as_millis()).unwrap_or(u64::MAX),
            "{}",
            toast.message
        );
    }
}

/// Records toasts in memory
#[derive(Debug, Default)]
pub struct ToastLog {
    toasts: Mutex<Vec<Toast>>,
}

impl ToastLog {
    /// Empty log
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Toasts shown so far, oldest first
    #[must_use]
    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts.lock().clone()
    }

    /// Number of toasts shown
    #[must_use]
    pub fn len(&self) -> usize {
        self.toasts.lock().len()
    }

    /// Whether nothing was shown
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.toasts.lock().is_empty()
    }

    /// Most recent toast
    #[must_use]
    pub fn last(&self) -> Option<Toast> {
        self.toasts.lock().last().cloned()
    }
}

impl Notifier for ToastLog {
    fn notify(&self, toast: Toast) {
        self.toasts.lock().push(toast);
    }
}

/// Toast durations in force
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToastTimings {
    /// Ordinary toasts
    pub standard: Duration,
    /// The submission success toast
    pub success: Duration,
}

impl Default for ToastTimings {
    fn default() -> Self {
        Self {
            standard: DEFAULT_TOAST_DURATION,
            success: SUCCESS_TOAST_DURATION,
        }
    }
}

/// Log an unexpected error with its context and show the generic toast
pub fn report_error(
    notifier: &dyn Notifier,
    timings: &ToastTimings,
    context: &str,
    error: &dyn Display,
) {
    tracing::error!(context, error = %error, "Unexpected error");
    notifier.notify(
        Toast::new(GENERIC_ERROR_MESSAGE, ToastKind::Error).with_duration(timings.standard),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_error_shows_generic_toast() {
        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify()
            .withf(|toast| {
                toast.kind == ToastKind::Error
                    && toast.message == GENERIC_ERROR_MESSAGE
                    && toast.duration == DEFAULT_TOAST_DURATION
            })
            .times(1)
            .return_const(());

        report_error(&notifier, &ToastTimings::default(), "open", &"boom");
    }

    #[test]
    fn toast_log_keeps_order() {
        let log = ToastLog::new();
        log.notify(Toast::new("one", ToastKind::Info));
        log.notify(Toast::new("two", ToastKind::Success).with_duration(SUCCESS_TOAST_DURATION));

        assert_eq!(log.len(), 2);
        let last = log.last().unwrap();
        assert_eq!(last.message, "two");
        assert_eq!(last.duration, Duration::from_secs(6));
    }
}
