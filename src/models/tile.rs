use serde::Serialize;

use super::{BookingIntent, BookingStatus, IntentKind};

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TileAction {
    Confirm,
    Pay,
    Cancel,
}

/// Presentational contract for one booking tile. Selecting an action never
/// mutates the intent; it re-enters the controller as a new synthetic turn.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TileView {
    pub title: &'static str,
    pub reference: String,
    pub category: &'static str,
    pub detail: String,
    pub when: String,
    pub amount: f64,
    pub status: BookingStatus,
    pub actions: Vec<TileAction>,
}

/// Map an extracted intent and its derived status to what the widget should
/// draw. Terminal statuses win over the intent's own kind: once a booking is
/// settled the tile is read-only regardless of which turn it hangs off.
pub fn render_tile(intent: &BookingIntent, status: BookingStatus) -> TileView {
    let (title, actions) = match status {
        BookingStatus::Pending => match intent.kind {
            IntentKind::Created => (
                "Booking Confirmation",
                vec![TileAction::Confirm, TileAction::Cancel],
            ),
            IntentKind::AwaitingPayment => {
                ("Payment Gateway", vec![TileAction::Pay, TileAction::Cancel])
            }
        },
        BookingStatus::Booked => ("Booking Complete", vec![]),
        BookingStatus::Cancelled => ("Booking Cancelled", vec![]),
        BookingStatus::Rescheduled => ("Booking Rescheduled", vec![]),
    };

    TileView {
        title,
        reference: intent.reference.clone(),
        category: intent.category.label(),
        detail: intent.detail.clone(),
        when: intent.when.clone(),
        amount: intent.amount,
        status,
        actions,
    }
}
