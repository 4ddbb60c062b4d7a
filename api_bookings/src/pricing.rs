use common::error::{AppError, Res};
use db::models::service::SalonServiceDetail;
use rust_decimal::Decimal;
use uuid::Uuid;

/// Largest total a `NUMERIC(12, 0)` column holds.
const MAX_TOTAL: i64 = 999_999_999_999;

/// Picks the salon's offering for every requested catalog id, keeping request
/// order. Repeated ids count once.
pub fn select_offerings(
    requested: &[Uuid],
    offered: &[SalonServiceDetail],
) -> Res<Vec<SalonServiceDetail>> {
    let mut selected: Vec<SalonServiceDetail> = Vec::with_capacity(requested.len());
    for service_id in requested {
        if selected.iter().any(|s| s.service_id == *service_id) {
            continue;
        }
        let offering = offered
            .iter()
            .find(|s| s.service_id == *service_id)
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "The salon has not a service with id={}",
                    service_id
                ))
            })?;
        selected.push(offering.clone());
    }
    Ok(selected)
}

/// Sum of the selected prices and their shared currency.
pub fn total(selected: &[SalonServiceDetail]) -> Res<(Decimal, String)> {
    let Some(first) = selected.first() else {
        return Err(AppError::Required("At least one service is required".to_string()));
    };
    if let Some(other) = selected.iter().find(|s| s.currency != first.currency) {
        return Err(AppError::Invalid(format!(
            "Services priced in {} and {} cannot be booked together",
            first.currency, other.currency
        )));
    }
    let amount: Decimal = selected.iter().map(|s| s.price_amount).sum();
    if amount > Decimal::from(MAX_TOTAL) {
        return Err(AppError::Invalid(format!(
            "The booking total {} {} is too large",
            amount, first.currency
        )));
    }
    Ok((amount, first.currency.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::error::ErrorCode;

    fn offering(salon_id: Uuid, name: &str, amount: i64, currency: &str) -> SalonServiceDetail {
        SalonServiceDetail {
            id: Uuid::new_v4(),
            salon_id,
            service_id: Uuid::new_v4(),
            service_name: name.to_string(),
            service_gender: "male".to_string(),
            price_amount: Decimal::from(amount),
            currency: currency.to_string(),
            created_at: chrono::Utc::now().naive_utc(),
        }
    }

    #[test]
    fn total_is_the_sum_of_selected_prices() {
        let salon = Uuid::new_v4();
        let offered = vec![
            offering(salon, "Hair cut", 80_000, "VND"),
            offering(salon, "Shampoo", 40_000, "VND"),
            offering(salon, "Dye", 300_000, "VND"),
        ];
        let requested = [offered[0].service_id, offered[1].service_id];

        let selected = select_offerings(&requested, &offered).unwrap();
        assert_eq!(selected.len(), 2);
        assert_eq!(total(&selected).unwrap(), (Decimal::from(120_000), "VND".to_string()));
    }

    #[test]
    fn repeated_ids_count_once() {
        let salon = Uuid::new_v4();
        let offered = vec![offering(salon, "Hair cut", 80_000, "VND")];
        let id = offered[0].service_id;

        let selected = select_offerings(&[id, id, id], &offered).unwrap();
        assert_eq!(selected.len(), 1);
        assert_eq!(total(&selected).unwrap().0, Decimal::from(80_000));
    }

    #[test]
    fn first_missing_service_is_named() {
        let salon = Uuid::new_v4();
        let offered = vec![offering(salon, "Hair cut", 80_000, "VND")];
        let missing = Uuid::new_v4();

        let err =
            select_offerings(&[offered[0].service_id, missing, Uuid::new_v4()], &offered)
                .unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(
            err.to_string(),
            format!("The salon has not a service with id={}", missing)
        );
    }

    #[test]
    fn mixed_currencies_are_rejected() {
        let salon = Uuid::new_v4();
        let selected = vec![
            offering(salon, "Hair cut", 80_000, "VND"),
            offering(salon, "Shave", 5, "USD"),
        ];
        assert_eq!(total(&selected).unwrap_err().code(), ErrorCode::Invalid);
    }

    #[test]
    fn total_beyond_the_stored_precision_is_rejected() {
        let salon = Uuid::new_v4();
        let selected = vec![
            offering(salon, "Bridal package", MAX_TOTAL, "VND"),
            offering(salon, "Spa day", MAX_TOTAL, "VND"),
        ];
        assert_eq!(total(&selected).unwrap_err().code(), ErrorCode::Invalid);

        let at_cap = vec![offering(salon, "Bridal package", MAX_TOTAL, "VND")];
        assert_eq!(total(&at_cap).unwrap().0, Decimal::from(MAX_TOTAL));
    }

    #[test]
    fn nothing_selected_is_required() {
        assert_eq!(total(&[]).unwrap_err().code(), ErrorCode::Required);
    }
}
