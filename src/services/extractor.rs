use std::sync::LazyLock;

use regex::Regex;

use crate::models::{BookingCategory, BookingIntent, IntentKind};

// Lead tokens and field layout must match what the backend is known to
// emit; see the booking tools on the assistant side.
static CREATED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)BOOKING_CREATED: Booking reference (\w+).*?(?:Doctor|Test): ([^,]+).*?Date: ([^,]+).*?Amount: \$(\d+(?:\.\d+)?)",
    )
    .expect("valid booking-created pattern")
});

static CONFIRMED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)BOOKING_CONFIRMED: Booking (\w+).*?Amount: \$(\d+(?:\.\d+)?)")
        .expect("valid booking-confirmed pattern")
});

static DETAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:Doctor Appointment|Lab Test): ([^,]+)").expect("valid detail pattern")
});

static DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Date: ([^,]+)").expect("valid date pattern")
});

/// Recognize a structured booking event in an assistant utterance.
///
/// The two pattern families are mutually exclusive and tried in order: a
/// text that matches the created lead token is never re-tested against the
/// awaiting-payment family. Partial matches (a required field missing or
/// unparseable) yield `None` and the text is treated as plain chat.
pub fn extract(text: &str) -> Option<BookingIntent> {
    if let Some(caps) = CREATED_RE.captures(text) {
        return extract_created(text, &caps);
    }
    extract_awaiting_payment(text)
}

fn extract_created(text: &str, caps: &regex::Captures<'_>) -> Option<BookingIntent> {
    let amount: f64 = caps[4].parse().ok()?;
    let category = if text.to_lowercase().contains("doctor") {
        BookingCategory::Doctor
    } else {
        BookingCategory::Lab
    };

    Some(BookingIntent {
        kind: IntentKind::Created,
        reference: caps[1].to_string(),
        category,
        detail: title_case(caps[2].trim()),
        when: caps[3].trim().to_string(),
        amount,
    })
}

fn extract_awaiting_payment(text: &str) -> Option<BookingIntent> {
    let caps = CONFIRMED_RE.captures(text)?;
    let lowered = text.to_lowercase();

    // The confirmed lead token also appears in contexts that do not yet
    // warrant a payment form; the progression phrase is a required second
    // condition, not an optimization.
    if !lowered.contains("proceeding to payment") {
        return None;
    }

    let amount: f64 = caps[2].parse().ok()?;

    // Item label and date are opportunistic here; missing ones downgrade to
    // empty strings instead of aborting the match.
    let detail = DETAIL_RE
        .captures(text)
        .map(|c| title_case(c[1].trim()))
        .unwrap_or_default();
    let when = DATE_RE
        .captures(text)
        .map(|c| c[1].trim().to_string())
        .unwrap_or_default();
    let category = if lowered.contains("doctor appointment") {
        BookingCategory::Doctor
    } else {
        BookingCategory::Lab
    };

    Some(BookingIntent {
        kind: IntentKind::AwaitingPayment,
        reference: caps[1].to_string(),
        category,
        detail,
        when,
        amount,
    })
}

/// Title-case a free-text label for display. The booking reference, not the
/// label, is the lookup key, so this never feeds back into matching.
fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const CREATED_TEXT: &str = "BOOKING_CREATED: Booking reference A1B2, Doctor: dr. jane smith, Date: 2024-06-01 10:00, Amount: $120.00";

    #[test]
    fn test_extracts_created_booking() {
        let intent = extract(CREATED_TEXT).unwrap();
        assert_eq!(intent.kind, IntentKind::Created);
        assert_eq!(intent.reference, "A1B2");
        assert_eq!(intent.category, BookingCategory::Doctor);
        assert_eq!(intent.detail, "Dr. Jane Smith");
        assert_eq!(intent.when, "2024-06-01 10:00");
        assert_eq!(intent.amount, 120.0);
    }

    #[test]
    fn test_created_without_doctor_keyword_defaults_to_lab() {
        let text = "BOOKING_CREATED: Booking reference L7X9, Test: lipid panel, Date: 2024-06-02, Amount: $45.50";
        let intent = extract(text).unwrap();
        assert_eq!(intent.category, BookingCategory::Lab);
        assert_eq!(intent.detail, "Lipid Panel");
        assert_eq!(intent.amount, 45.5);
    }

    #[test]
    fn test_extracts_awaiting_payment() {
        let text = "BOOKING_CONFIRMED: Booking A1B2 is confirmed. Amount: $120.00. Proceeding to payment.";
        let intent = extract(text).unwrap();
        assert_eq!(intent.kind, IntentKind::AwaitingPayment);
        assert_eq!(intent.reference, "A1B2");
        assert_eq!(intent.amount, 120.0);
        assert_eq!(intent.detail, "");
        assert_eq!(intent.when, "");
    }

    #[test]
    fn test_awaiting_payment_picks_up_optional_fields() {
        let text = "BOOKING_CONFIRMED: Booking A1B2. Doctor Appointment: dr. jane smith, Date: 2024-06-01 10:00, Amount: $120.00. Proceeding to payment.";
        let intent = extract(text).unwrap();
        assert_eq!(intent.kind, IntentKind::AwaitingPayment);
        assert_eq!(intent.category, BookingCategory::Doctor);
        assert_eq!(intent.detail, "Dr. Jane Smith");
        assert_eq!(intent.when, "2024-06-01 10:00");
    }

    #[test]
    fn test_confirmed_without_progression_phrase_is_plain_text() {
        let text = "BOOKING_CONFIRMED: Booking A1B2, Amount: $120.00. We'll see you soon!";
        assert!(extract(text).is_none());
    }

    #[test]
    fn test_amount_followed_by_sentence_period_still_extracts() {
        // The backend often ends the sentence right after the amount; the
        // trailing period must not be swallowed into the number.
        let text = "BOOKING_CREATED: Booking reference A1B2, Doctor: dr. jane smith, Date: 2024-06-01 10:00, Amount: $120.00.";
        let intent = extract(text).unwrap();
        assert_eq!(intent.amount, 120.0);

        let text = "BOOKING_CONFIRMED: Booking A1B2, Amount: $45.50. Proceeding to payment.";
        let intent = extract(text).unwrap();
        assert_eq!(intent.amount, 45.5);
    }

    #[test]
    fn test_plain_chat_text_yields_no_intent() {
        assert!(extract("Your appointment is in two weeks.").is_none());
    }

    #[test]
    fn test_partial_created_match_yields_no_intent() {
        // Reference and amount present but no item label or date.
        let text = "BOOKING_CREATED: Booking reference A1B2, Amount: $120.00";
        assert!(extract(text).is_none());
    }

    #[test]
    fn test_extraction_is_idempotent() {
        assert_eq!(extract(CREATED_TEXT), extract(CREATED_TEXT));
    }

    #[test]
    fn test_created_wins_over_awaiting_payment() {
        let text = format!("{CREATED_TEXT}. BOOKING_CONFIRMED: Booking A1B2, Amount: $120.00, proceeding to payment.");
        let intent = extract(&text).unwrap();
        assert_eq!(intent.kind, IntentKind::Created);
    }
}
