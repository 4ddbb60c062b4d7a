use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Res};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountKind {
    Customer,
    Salon,
}
impl AccountKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountKind::Customer => "customer",
            AccountKind::Salon => "salon",
        }
    }

    pub fn from_str(s: &str) -> Res<Self> {
        match s {
            "customer" => Ok(AccountKind::Customer),
            "salon" => Ok(AccountKind::Salon),
            other => Err(AppError::Internal(format!("Invalid account kind: {}", other))),
        }
    }
}
impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Gender of a customer, or the audience a catalog service targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}
impl Gender {
    pub const CHOICES: [&'static str; 3] = ["male", "female", "other"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "male" => Some(Gender::Male),
            "female" => Some(Gender::Female),
            "other" => Some(Gender::Other),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationVerb {
    BookingPlaced,
    BookingConfirmed,
    BookingCanceled,
    BookingRequestedToComplete,
    BookingCompleted,
}
impl NotificationVerb {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationVerb::BookingPlaced => "booking_placed",
            NotificationVerb::BookingConfirmed => "booking_confirmed",
            NotificationVerb::BookingCanceled => "booking_canceled",
            NotificationVerb::BookingRequestedToComplete => "booking_requested_to_complete",
            NotificationVerb::BookingCompleted => "booking_completed",
        }
    }
}
impl fmt::Display for NotificationVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_kind_round_trips_through_its_column_value() {
        for kind in [AccountKind::Customer, AccountKind::Salon] {
            assert_eq!(AccountKind::from_str(kind.as_str()).unwrap(), kind);
        }
        assert!(AccountKind::from_str("admin").is_err());
    }

    #[test]
    fn gender_parse_is_case_insensitive() {
        assert_eq!(Gender::parse(" Female "), Some(Gender::Female));
        assert_eq!(Gender::parse("unknown"), None);
    }

    #[test]
    fn verb_serializes_as_snake_case() {
        let json = serde_json::to_value(NotificationVerb::BookingRequestedToComplete).unwrap();
        assert_eq!(json, "booking_requested_to_complete");
    }
}
