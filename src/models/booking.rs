use serde::{Deserialize, Serialize};

use super::turn::{Speaker, Turn};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Booked,
    Rescheduled,
    Cancelled,
}

enum SettledAction {
    Pay,
    Cancel,
}

/// Current lifecycle stage of the booking identified by `reference`,
/// computed by folding the append-only turn log. Status is never stored on
/// an intent; each assistant turn carries its own immutable snapshot and
/// the latest stage is always re-derived from history.
///
/// A synthetic pay or cancel turn only settles once the backend answers
/// with something other than the transport-failure notice; an unanswered
/// or failed action leaves the booking where it was.
pub fn derive_status(turns: &[Turn], reference: &str) -> BookingStatus {
    let mut status = BookingStatus::Pending;
    let mut seen_intent = false;
    let mut in_flight: Option<SettledAction> = None;

    for turn in turns {
        match turn.speaker {
            Speaker::User => {
                if turn.is_pay_action_for(reference) {
                    in_flight = Some(SettledAction::Pay);
                } else if turn.is_cancel_action_for(reference) {
                    in_flight = Some(SettledAction::Cancel);
                }
            }
            Speaker::Assistant => {
                if turn.is_failure_notice() {
                    in_flight = None;
                    continue;
                }
                if let Some(action) = in_flight.take() {
                    status = match action {
                        SettledAction::Pay => BookingStatus::Booked,
                        SettledAction::Cancel => BookingStatus::Cancelled,
                    };
                }
                if seen_intent && turn.text.to_lowercase().contains("successfully rescheduled") {
                    status = BookingStatus::Rescheduled;
                }
                if let Some(intent) = &turn.intent {
                    if intent.reference == reference {
                        seen_intent = true;
                        status = BookingStatus::Pending;
                    }
                }
            }
        }
    }

    status
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{turn, BookingCategory, BookingIntent, IntentKind};

    fn created_intent(reference: &str) -> BookingIntent {
        BookingIntent {
            kind: IntentKind::Created,
            reference: reference.to_string(),
            category: BookingCategory::Doctor,
            detail: "Dr. Jane Smith".to_string(),
            when: "2024-06-01 10:00".to_string(),
            amount: 120.0,
        }
    }

    fn payment_intent(reference: &str) -> BookingIntent {
        BookingIntent {
            kind: IntentKind::AwaitingPayment,
            reference: reference.to_string(),
            category: BookingCategory::Doctor,
            detail: String::new(),
            when: String::new(),
            amount: 120.0,
        }
    }

    #[test]
    fn test_status_pending_after_created() {
        let turns = vec![
            Turn::user("book me in"),
            Turn::assistant("BOOKING_CREATED...", Some(created_intent("A1B2"))),
        ];
        assert_eq!(derive_status(&turns, "A1B2"), BookingStatus::Pending);
    }

    #[test]
    fn test_status_booked_after_settled_payment() {
        let turns = vec![
            Turn::assistant("created", Some(created_intent("A1B2"))),
            Turn::assistant("confirmed", Some(payment_intent("A1B2"))),
            Turn::user(turn::pay_action_text("A1B2", &serde_json::json!({}))),
            Turn::assistant("Payment received. Your appointment is booked.", None),
        ];
        assert_eq!(derive_status(&turns, "A1B2"), BookingStatus::Booked);
    }

    #[test]
    fn test_status_cancelled_after_settled_cancel() {
        let turns = vec![
            Turn::assistant("created", Some(created_intent("A1B2"))),
            Turn::user(turn::cancel_action_text("A1B2")),
            Turn::assistant("Your booking has been cancelled.", None),
        ];
        assert_eq!(derive_status(&turns, "A1B2"), BookingStatus::Cancelled);
    }

    #[test]
    fn test_failed_payment_does_not_settle() {
        let turns = vec![
            Turn::assistant("created", Some(created_intent("A1B2"))),
            Turn::user(turn::pay_action_text("A1B2", &serde_json::json!({}))),
            Turn::assistant(turn::FAILURE_NOTICE, None),
        ];
        assert_eq!(derive_status(&turns, "A1B2"), BookingStatus::Pending);
    }

    #[test]
    fn test_reschedule_notice_marks_rescheduled() {
        let turns = vec![
            Turn::assistant("created", Some(created_intent("A1B2"))),
            Turn::user("move it please"),
            Turn::assistant(
                "Successfully rescheduled appointment with Dr. Jane Smith",
                None,
            ),
        ];
        assert_eq!(derive_status(&turns, "A1B2"), BookingStatus::Rescheduled);
    }

    #[test]
    fn test_other_references_are_ignored() {
        let turns = vec![
            Turn::assistant("created", Some(created_intent("A1B2"))),
            Turn::user(turn::cancel_action_text("ZZ99")),
            Turn::assistant("Your booking has been cancelled.", None),
        ];
        assert_eq!(derive_status(&turns, "A1B2"), BookingStatus::Pending);
    }
}
