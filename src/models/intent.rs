use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IntentKind {
    Created,
    AwaitingPayment,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BookingCategory {
    Doctor,
    Lab,
}

impl BookingCategory {
    pub fn label(&self) -> &'static str {
        match self {
            BookingCategory::Doctor => "Doctor Appointment",
            BookingCategory::Lab => "Lab Test",
        }
    }
}

/// Structured summary of a booking or payment event, extracted from an
/// assistant turn's text. Immutable once attached to its owning turn.
///
/// `reference` is the backend-assigned booking code and is treated as an
/// opaque key. `when` is kept verbatim; the backend owns date formatting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookingIntent {
    pub kind: IntentKind,
    pub reference: String,
    pub category: BookingCategory,
    pub detail: String,
    pub when: String,
    pub amount: f64,
}
