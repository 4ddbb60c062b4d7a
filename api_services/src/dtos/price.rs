use common::error::{AppError, Res};
use rust_decimal::Decimal;
use serde::Deserialize;

pub const DEFAULT_CURRENCY: &str = "VND";

/// Largest amount a `NUMERIC(12, 0)` column holds.
const MAX_AMOUNT: i64 = 999_999_999_999;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct PriceInput {
    pub amount: Option<Decimal>,
    pub currency: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Price {
    pub amount: Decimal,
    pub currency: String,
}

impl PriceInput {
    /// Whole, non-negative amount and an ISO-4217 style code, `VND` when omitted.
    pub fn to_price(&self) -> Res<Price> {
        let Some(amount) = self.amount else {
            return Err(AppError::Required("Price amount is required".to_string()));
        };
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(AppError::Invalid("Price amount must not be negative".to_string()));
        }
        if !amount.fract().is_zero() {
            return Err(AppError::Invalid("Price amount must be a whole number".to_string()));
        }
        if amount > Decimal::from(MAX_AMOUNT) {
            return Err(AppError::Invalid("Price amount is too large".to_string()));
        }

        let currency = match self.currency.as_deref().map(str::trim) {
            None | Some("") => DEFAULT_CURRENCY.to_string(),
            Some(code) if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) => {
                code.to_ascii_uppercase()
            }
            Some(code) => {
                return Err(AppError::Invalid(format!("\"{}\" is not a valid currency", code)));
            }
        };

        Ok(Price {
            amount: amount.normalize(),
            currency,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::error::ErrorCode;

    fn input(amount: Option<i64>, currency: Option<&str>) -> PriceInput {
        PriceInput {
            amount: amount.map(Decimal::from),
            currency: currency.map(str::to_string),
        }
    }

    #[test]
    fn currency_defaults_to_vnd() {
        let price = input(Some(150_000), None).to_price().unwrap();
        assert_eq!(price.amount, Decimal::from(150_000));
        assert_eq!(price.currency, "VND");

        let price = input(Some(10), Some("usd")).to_price().unwrap();
        assert_eq!(price.currency, "USD");
    }

    #[test]
    fn missing_amount_is_required() {
        let err = input(None, Some("VND")).to_price().unwrap_err();
        assert_eq!(err.code(), ErrorCode::Required);
    }

    #[test]
    fn rejects_negative_fractional_and_oversized_amounts() {
        assert_eq!(input(Some(-1), None).to_price().unwrap_err().code(), ErrorCode::Invalid);
        assert_eq!(
            input(Some(1_000_000_000_000), None).to_price().unwrap_err().code(),
            ErrorCode::Invalid
        );
        let fractional = PriceInput {
            amount: Some(Decimal::new(105, 1)),
            currency: None,
        };
        assert_eq!(fractional.to_price().unwrap_err().code(), ErrorCode::Invalid);
    }

    #[test]
    fn rejects_malformed_currency() {
        let err = input(Some(1), Some("dong")).to_price().unwrap_err();
        assert_eq!(err.code(), ErrorCode::Invalid);
    }

    #[test]
    fn accepts_json_numbers_and_strings() {
        let parsed: PriceInput =
            serde_json::from_value(serde_json::json!({ "amount": 200000 })).unwrap();
        assert_eq!(parsed.to_price().unwrap().amount, Decimal::from(200_000));

        let parsed: PriceInput =
            serde_json::from_value(serde_json::json!({ "amount": "75000", "currency": "VND" }))
                .unwrap();
        assert_eq!(parsed.to_price().unwrap().amount, Decimal::from(75_000));
    }
}
