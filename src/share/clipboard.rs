use std::time::Duration;

use async_trait::async_trait;
use log::warn;
use thiserror::Error;

/// How long the "copied" acknowledgement stays up on the result screen.
pub const RESULT_TOAST_DURATION: Duration = Duration::from_millis(3000);
/// Same, for the share dialog buttons.
pub const SHARE_DIALOG_TOAST_DURATION: Duration = Duration::from_millis(2500);

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard is not available: {0}")]
    Unavailable(String),
    #[error("clipboard write rejected: {0}")]
    Rejected(String),
}

/// Something that can put plain text where the user can copy it from.
#[async_trait]
pub trait ClipboardProvider: Send + Sync {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    Primary,
    Fallback,
    /// Neither provider worked, the user has to copy by hand.
    Failed { notice: String },
}

/// What is being copied; decides the wording of the manual-copy notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyTarget {
    Link,
    Message,
}

impl CopyTarget {
    fn manual_notice(self, text: &str) -> String {
        match self {
            CopyTarget::Link => format!("Failed to copy link. Please copy manually: {}", text),
            CopyTarget::Message => format!("Please manually copy the text:\n{}", text),
        }
    }
}

/// Tries `primary`, then `fallback`. Never fails; both errors are logged.
pub async fn copy_to_clipboard(
    primary: &dyn ClipboardProvider,
    fallback: &dyn ClipboardProvider,
    target: CopyTarget,
    text: &str,
) -> CopyOutcome {
    match primary.write_text(text).await {
        Ok(()) => return CopyOutcome::Primary,
        Err(err) => warn!("Failed to copy: {}", err),
    }
    match fallback.write_text(text).await {
        Ok(()) => CopyOutcome::Fallback,
        Err(err) => {
            warn!("Fallback copy failed as well: {}", err);
            CopyOutcome::Failed {
                notice: target.manual_notice(text),
            }
        }
    }
}

/// Acknowledgement shown after a copy, removed after `dismiss_after`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub text: &'static str,
    pub dismiss_after: Duration,
}

impl Toast {
    pub const LINK_COPIED: Toast = Toast {
        text: "🏴‍☠️ Link copied! Share it with yer mates.",
        dismiss_after: RESULT_TOAST_DURATION,
    };
    pub const DIALOG_LINK_COPIED: Toast = Toast {
        text: "🏴‍☠️ Link Copied!",
        dismiss_after: SHARE_DIALOG_TOAST_DURATION,
    };
    pub const DIALOG_MESSAGE_COPIED: Toast = Toast {
        text: "⚓ Copied Message!",
        dismiss_after: SHARE_DIALOG_TOAST_DURATION,
    };
}
