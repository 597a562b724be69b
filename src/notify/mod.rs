use std::fmt::Display;

/// Log a failed operation and show a blocking notice.
pub(crate) fn report_failure(context: &str, error: &impl Display) {
    let message = failure_message(context, error);
    leptos::logging::error!("{message}");
    alert(&message);
}

/// Blocking notice without logging, for validation messages.
pub(crate) fn alert(message: &str) {
    if let Some(w) = web_sys::window() {
        let _ = w.alert_with_message(message);
    }
}

pub(crate) fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}

/// `None` when cancelled.
pub(crate) fn prompt(message: &str, default: &str) -> Option<String> {
    web_sys::window()?
        .prompt_with_message_and_default(message, default)
        .ok()
        .flatten()
}

pub(crate) fn failure_message(context: &str, error: &impl Display) -> String {
    format!("{context}: {error}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiError, ApiErrorKind};

    #[test]
    fn test_failure_message_includes_cause() {
        let e = ApiError {
            kind: ApiErrorKind::Network,
            message: "connection refused".to_string(),
        };
        assert_eq!(
            failure_message("Failed to save document", &e),
            "Failed to save document: connection refused"
        );
    }
}
