use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::BookingIntent;

/// Fixed notice appended in place of a reply when the backend call fails
/// or times out. The user's own turn is kept; the log is append-only.
pub const FAILURE_NOTICE: &str = "Sorry, I encountered an error. Please try again later.";

/// Sentinel returned when the backend reply carries no turns at all.
pub const NO_REPLY_SENTINEL: &str = "No response from assistant";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    User,
    Assistant,
}

/// One exchange unit in a conversation. Turns are appended to the
/// conversation log and never mutated or removed afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub speaker: Speaker,
    pub text: String,
    pub emitted_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent: Option<BookingIntent>,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::User,
            text: text.into(),
            emitted_at: Utc::now(),
            intent: None,
        }
    }

    pub fn assistant(text: impl Into<String>, intent: Option<BookingIntent>) -> Self {
        Self {
            speaker: Speaker::Assistant,
            text: text.into(),
            emitted_at: Utc::now(),
            intent,
        }
    }

    pub fn is_failure_notice(&self) -> bool {
        self.speaker == Speaker::Assistant && self.text == FAILURE_NOTICE
    }

    pub fn is_pay_action_for(&self, reference: &str) -> bool {
        self.speaker == Speaker::User
            && self
                .text
                .starts_with(&format!("process payment for {reference} "))
    }

    pub fn is_cancel_action_for(&self, reference: &str) -> bool {
        self.speaker == Speaker::User && self.text == cancel_action_text(reference)
    }
}

// Textual conventions for synthetic turns. The backend recognizes these
// verbatim, so the wording must not drift.

pub fn confirm_action_text(reference: &str) -> String {
    format!("confirm booking {reference}")
}

pub fn pay_action_text(reference: &str, payment: &Value) -> String {
    format!("process payment for {reference} with payment data: {payment}")
}

pub fn cancel_action_text(reference: &str) -> String {
    format!("cancel booking {reference}")
}
