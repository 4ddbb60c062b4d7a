//! In-app notifications raised by booking events.
//!
//! Messages are composed without I/O and written with the caller's
//! connection, so they commit or roll back together with the booking change.

use chrono::{DateTime, Utc};
use common::{error::Res, misc::NotificationVerb};
use db::{
    dtos::notification::NotificationCreateRequest,
    models::{account::Account, booking::Booking},
};
use sqlx::PgConnection;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingEvent {
    Placed,
    Confirmed,
    RequestedToComplete,
    Completed,
    CanceledByCustomer,
    CanceledBySalon,
}

impl BookingEvent {
    pub fn verb(&self) -> NotificationVerb {
        match self {
            BookingEvent::Placed => NotificationVerb::BookingPlaced,
            BookingEvent::Confirmed => NotificationVerb::BookingConfirmed,
            BookingEvent::RequestedToComplete => NotificationVerb::BookingRequestedToComplete,
            BookingEvent::Completed => NotificationVerb::BookingCompleted,
            BookingEvent::CanceledByCustomer | BookingEvent::CanceledBySalon => {
                NotificationVerb::BookingCanceled
            }
        }
    }
}

/// Builds one notification per party that has to hear about `event`.
pub fn compose(
    event: BookingEvent,
    booking: &Booking,
    customer: &Account,
    salon: &Account,
    sent_at: DateTime<Utc>,
) -> Vec<NotificationCreateRequest> {
    let salon_name = salon.salon_name.as_deref().unwrap_or(&salon.username);
    let customer_name = &customer.username;

    let messages: Vec<(Uuid, &str, String)> = match event {
        BookingEvent::Placed => vec![
            (
                customer.id,
                "New booking",
                format!(
                    "You have just booked a haircut at {}. Please wait for the salon to confirm the booking.",
                    salon_name
                ),
            ),
            (
                salon.id,
                "New booking",
                format!(
                    "You have just received a booking of {}. Please confirm the booking in the booking history.",
                    customer_name
                ),
            ),
        ],
        BookingEvent::Confirmed => vec![(
            customer.id,
            "Booking confirmed",
            format!("{} has confirmed your booking.", salon_name),
        )],
        BookingEvent::RequestedToComplete => vec![(
            customer.id,
            "Please confirm your booking",
            format!(
                "{} has finished your booking. Please mark it as completed.",
                salon_name
            ),
        )],
        BookingEvent::Completed => vec![(
            salon.id,
            "Booking completed",
            format!("{} has marked the booking as completed.", customer_name),
        )],
        BookingEvent::CanceledByCustomer => vec![(
            salon.id,
            "Booking canceled",
            format!("{} has canceled the booking.", customer_name),
        )],
        BookingEvent::CanceledBySalon => vec![(
            customer.id,
            "Booking canceled",
            format!("{} has canceled your booking.", salon_name),
        )],
    };

    let sent_at = sent_at.to_rfc3339();
    messages
        .into_iter()
        .map(|(recipient_id, title, body)| NotificationCreateRequest {
            recipient_id,
            verb: event.verb(),
            data: serde_json::json!({
                "message_title": title,
                "message_body": body,
                "booking_id": booking.id,
                "sent_at": sent_at,
            }),
        })
        .collect()
}

/// Composes and stores the notifications for `event` on `conn`.
pub async fn notify(
    conn: &mut PgConnection,
    event: BookingEvent,
    booking: &Booking,
    customer: &Account,
    salon: &Account,
) -> Res<()> {
    for request in compose(event, booking, customer, salon, Utc::now()) {
        let recipient_id = request.recipient_id;
        db::notification::insert_notification(&mut *conn, request).await?;
        log::debug!(
            "Notified {} about {} of booking {}",
            recipient_id,
            event.verb(),
            booking.id
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dtos::notification::NotificationData;
    use rust_decimal::Decimal;

    fn account(kind: &str, username: &str, salon_name: Option<&str>) -> Account {
        let now = Utc::now().naive_utc();
        Account {
            id: Uuid::new_v4(),
            kind: kind.to_string(),
            username: username.to_string(),
            email: format!("{}@example.com", username),
            phone_number: "0900000000".to_string(),
            first_name: String::new(),
            last_name: String::new(),
            gender: None,
            salon_name: salon_name.map(str::to_string),
            avatar: None,
            background_image: None,
            vote_rate: None,
            is_closed: false,
            is_verified: true,
            otp: None,
            is_active: true,
            is_admin: false,
            total_completed_booking: 0,
            address_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn booking(customer: &Account, salon: &Account) -> Booking {
        let now = Utc::now().naive_utc();
        Booking {
            id: Uuid::new_v4(),
            customer_id: customer.id,
            salon_id: salon.id,
            status: "new".to_string(),
            total_net_amount: Decimal::from(120_000),
            currency: "VND".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn placed_booking_notifies_both_parties() {
        let customer = account("customer", "hoa", None);
        let salon = account("salon", "hair.house", Some("Hair House"));
        let booking = booking(&customer, &salon);

        let sent = compose(BookingEvent::Placed, &booking, &customer, &salon, Utc::now());
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].recipient_id, customer.id);
        assert_eq!(sent[1].recipient_id, salon.id);
        assert!(sent.iter().all(|n| n.verb == NotificationVerb::BookingPlaced));

        let data: NotificationData = serde_json::from_value(sent[0].data.clone()).unwrap();
        assert_eq!(data.booking_id, booking.id);
        assert!(data.message_body.contains("Hair House"));
    }

    #[test]
    fn status_changes_notify_the_other_party() {
        let customer = account("customer", "hoa", None);
        let salon = account("salon", "hair.house", Some("Hair House"));
        let booking = booking(&customer, &salon);

        let recipients = |event| {
            compose(event, &booking, &customer, &salon, Utc::now())
                .into_iter()
                .map(|n| n.recipient_id)
                .collect::<Vec<_>>()
        };
        assert_eq!(recipients(BookingEvent::Confirmed), vec![customer.id]);
        assert_eq!(recipients(BookingEvent::RequestedToComplete), vec![customer.id]);
        assert_eq!(recipients(BookingEvent::Completed), vec![salon.id]);
        assert_eq!(recipients(BookingEvent::CanceledByCustomer), vec![salon.id]);
        assert_eq!(recipients(BookingEvent::CanceledBySalon), vec![customer.id]);
    }

    #[test]
    fn salon_without_name_falls_back_to_username() {
        let customer = account("customer", "hoa", None);
        let salon = account("salon", "hair.house", None);
        let booking = booking(&customer, &salon);

        let sent = compose(BookingEvent::Confirmed, &booking, &customer, &salon, Utc::now());
        let data: NotificationData = serde_json::from_value(sent[0].data.clone()).unwrap();
        assert_eq!(data.message_body, "hair.house has confirmed your booking.");
    }
}
