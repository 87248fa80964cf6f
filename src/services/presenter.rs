//! Pure mapping from a status report to the desired display state.

use crate::models::{EmailCategory, Icon, PollStatus, StatusKind, StatusView, Tone};

/// Describes how the status display should look for `status`.
///
/// Every status other than `pending` hides the spinner and ends polling.
pub fn present(status: &PollStatus, category: EmailCategory) -> StatusView {
    let label = category.label();

    let (tone, icon, text, note) = match status.status {
        StatusKind::Pending => {
            let note = match status.retry_count {
                Some(retries) if retries > 0 => {
                    format!("Retrying delivery (attempt {}), this can take a little longer", retries + 1)
                }
                _ => "This usually takes 10-30 seconds".to_string(),
            };
            (Tone::Info, None, format!("Sending {}...", label), Some(note))
        }
        StatusKind::Sent => (
            Tone::Success,
            Some(Icon::CheckCircle),
            format!("{} sent successfully! Please check your inbox.", capitalize(label)),
            None,
        ),
        StatusKind::Failed => {
            let detail = match status.error_message.as_deref() {
                Some(error) if !error.is_empty() => format!("Error: {}", error),
                _ => "Please try again or contact support.".to_string(),
            };
            (
                Tone::Warning,
                Some(Icon::ExclamationTriangle),
                format!("Failed to send {}. {}", label, detail),
                None,
            )
        }
        StatusKind::NotFound => (
            Tone::Info,
            Some(Icon::InfoCircle),
            "Email status not found. Please try registering again.".to_string(),
            None,
        ),
        StatusKind::Error => (
            Tone::Danger,
            Some(Icon::TimesCircle),
            "Unable to check email status. Please refresh and try again.".to_string(),
            None,
        ),
        StatusKind::Timeout => (
            Tone::Warning,
            Some(Icon::Clock),
            format!(
                "Still waiting for your {} to go out. It may arrive shortly; check your inbox or try again later.",
                label
            ),
            None,
        ),
    };

    StatusView {
        status: status.status,
        spinner_visible: status.status == StatusKind::Pending,
        tone,
        icon,
        text,
        note,
        stops_polling: status.is_terminal(),
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
