//! Booking state machine.
//!
//! ```text
//! new ──confirm──> confirmed ──request-complete──> requested_to_complete
//!  │                   │                                  │
//!  └──cancel──> cancel <┘          confirmed | requested_to_complete ──complete──> completed
//! ```

use api_notifications::notifier::BookingEvent;
use common::error::{AppError, Res};
use db::models::booking::Booking;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingStatus {
    New,
    Confirmed,
    RequestedToComplete,
    Completed,
    Cancel,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::New => "new",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::RequestedToComplete => "requested_to_complete",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancel => "cancel",
        }
    }

    pub fn parse(s: &str) -> Res<Self> {
        match s {
            "new" => Ok(BookingStatus::New),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "requested_to_complete" => Ok(BookingStatus::RequestedToComplete),
            "completed" => Ok(BookingStatus::Completed),
            "cancel" => Ok(BookingStatus::Cancel),
            other => Err(AppError::Invalid(format!(
                "\"{}\" is not a valid booking status",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingAction {
    Confirm,
    RequestComplete,
    Complete,
    Cancel,
}

impl BookingAction {
    /// Parses the `{action}` path segment.
    pub fn parse(s: &str) -> Res<Self> {
        match s {
            "confirm" => Ok(BookingAction::Confirm),
            "request-complete" => Ok(BookingAction::RequestComplete),
            "complete" => Ok(BookingAction::Complete),
            "cancel" => Ok(BookingAction::Cancel),
            other => Err(AppError::Invalid(format!(
                "\"{}\" is not a valid booking action",
                other
            ))),
        }
    }

    fn allowed_from(&self) -> &'static [BookingStatus] {
        match self {
            BookingAction::Confirm => &[BookingStatus::New],
            BookingAction::RequestComplete => &[BookingStatus::Confirmed],
            BookingAction::Complete => {
                &[BookingStatus::Confirmed, BookingStatus::RequestedToComplete]
            }
            BookingAction::Cancel => &[BookingStatus::New, BookingStatus::Confirmed],
        }
    }
}

/// Side of the booking the caller is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Party {
    Customer,
    Salon,
}

pub fn party_of(booking: &Booking, account_id: Uuid) -> Option<Party> {
    if booking.customer_id == account_id {
        Some(Party::Customer)
    } else if booking.salon_id == account_id {
        Some(Party::Salon)
    } else {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub to: BookingStatus,
    pub event: BookingEvent,
}

/// Checks the actor first, then the current status.
pub fn transition(
    action: BookingAction,
    party: Option<Party>,
    status: BookingStatus,
) -> Res<Transition> {
    let (to, event) = match (action, party) {
        (BookingAction::Confirm, Some(Party::Salon)) => {
            (BookingStatus::Confirmed, BookingEvent::Confirmed)
        }
        (BookingAction::RequestComplete, Some(Party::Salon)) => (
            BookingStatus::RequestedToComplete,
            BookingEvent::RequestedToComplete,
        ),
        (BookingAction::Complete, Some(Party::Customer)) => {
            (BookingStatus::Completed, BookingEvent::Completed)
        }
        (BookingAction::Cancel, Some(Party::Customer)) => {
            (BookingStatus::Cancel, BookingEvent::CanceledByCustomer)
        }
        (BookingAction::Cancel, Some(Party::Salon)) => {
            (BookingStatus::Cancel, BookingEvent::CanceledBySalon)
        }
        _ => {
            return Err(AppError::PermissionDenied(
                "You do not have permission to perform this action".to_string(),
            ));
        }
    };

    let allowed = action.allowed_from();
    if !allowed.contains(&status) {
        let expected = allowed
            .iter()
            .map(|s| format!("'{}'", s.as_str()))
            .collect::<Vec<_>>()
            .join(" or ");
        return Err(AppError::Invalid(format!(
            "The booking status must be {}",
            expected
        )));
    }

    Ok(Transition { to, event })
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::error::ErrorCode;

    #[test]
    fn salon_confirms_new_booking() {
        let t = transition(BookingAction::Confirm, Some(Party::Salon), BookingStatus::New).unwrap();
        assert_eq!(t.to, BookingStatus::Confirmed);
        assert_eq!(t.event, BookingEvent::Confirmed);
    }

    #[test]
    fn customer_cannot_confirm() {
        let err = transition(BookingAction::Confirm, Some(Party::Customer), BookingStatus::New)
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::PermissionDenied);
    }

    #[test]
    fn outsider_is_denied_before_status_is_checked() {
        let err = transition(BookingAction::Cancel, None, BookingStatus::Completed).unwrap_err();
        assert_eq!(err.code(), ErrorCode::PermissionDenied);
    }

    #[test]
    fn confirming_twice_names_the_expected_status() {
        let err = transition(BookingAction::Confirm, Some(Party::Salon), BookingStatus::Confirmed)
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::Invalid);
        assert_eq!(err.to_string(), "The booking status must be 'new'");
    }

    #[test]
    fn customer_completes_from_confirmed_or_requested() {
        for status in [BookingStatus::Confirmed, BookingStatus::RequestedToComplete] {
            let t = transition(BookingAction::Complete, Some(Party::Customer), status).unwrap();
            assert_eq!(t.to, BookingStatus::Completed);
        }
        let err = transition(BookingAction::Complete, Some(Party::Customer), BookingStatus::New)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "The booking status must be 'confirmed' or 'requested_to_complete'"
        );
    }

    #[test]
    fn either_party_cancels_until_work_starts() {
        let by_customer =
            transition(BookingAction::Cancel, Some(Party::Customer), BookingStatus::New).unwrap();
        assert_eq!(by_customer.event, BookingEvent::CanceledByCustomer);

        let by_salon =
            transition(BookingAction::Cancel, Some(Party::Salon), BookingStatus::Confirmed)
                .unwrap();
        assert_eq!(by_salon.event, BookingEvent::CanceledBySalon);

        let err = transition(
            BookingAction::Cancel,
            Some(Party::Salon),
            BookingStatus::RequestedToComplete,
        )
        .unwrap_err();
        assert_eq!(err.code(), ErrorCode::Invalid);
    }

    #[test]
    fn unknown_action_and_status_are_invalid() {
        assert_eq!(
            BookingAction::parse("approve").unwrap_err().code(),
            ErrorCode::Invalid
        );
        assert_eq!(
            BookingStatus::parse("done").unwrap_err().code(),
            ErrorCode::Invalid
        );
        assert_eq!(
            BookingAction::parse("request-complete").unwrap(),
            BookingAction::RequestComplete
        );
    }

    #[test]
    fn party_is_resolved_by_account_id() {
        let now = chrono::Utc::now().naive_utc();
        let booking = Booking {
            id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            salon_id: Uuid::new_v4(),
            status: "new".to_string(),
            total_net_amount: rust_decimal::Decimal::ZERO,
            currency: "VND".to_string(),
            created_at: now,
            updated_at: now,
        };
        assert_eq!(party_of(&booking, booking.customer_id), Some(Party::Customer));
        assert_eq!(party_of(&booking, booking.salon_id), Some(Party::Salon));
        assert_eq!(party_of(&booking, Uuid::new_v4()), None);
    }
}
