use common::misc::AccountKind;
use uuid::Uuid;

pub struct AccountCreateRequest {
    pub kind: AccountKind,
    pub username: String,
    pub email: String,
    pub phone_number: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: Option<String>,
    pub salon_name: Option<String>,
    pub avatar: Option<String>,
    pub otp: String,
    pub address_id: Option<Uuid>,
}

/// Identity fields checked for uniqueness before an account is created.
pub struct IdentityCheck<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub phone_number: &'a str,
    pub salon_name: Option<&'a str>,
}

/// `None` leaves a column unchanged.
#[derive(Default)]
pub struct ProfileUpdateRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub avatar: Option<String>,
    pub phone_number: Option<String>,
    pub salon_name: Option<String>,
    pub background_image: Option<String>,
    pub is_closed: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SalonSortField {
    SalonName,
    CreatedAt,
    VoteRate,
    TotalCompletedBooking,
}
impl SalonSortField {
    pub fn column(&self) -> &'static str {
        match self {
            SalonSortField::SalonName => "salon_name",
            SalonSortField::CreatedAt => "created_at",
            SalonSortField::VoteRate => "vote_rate",
            SalonSortField::TotalCompletedBooking => "total_completed_booking",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SalonSort {
    pub field: SalonSortField,
    pub descending: bool,
}
impl SalonSort {
    /// Parses `field` or `-field`. Unknown fields yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let (descending, name) = match raw.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, raw),
        };
        let field = match name {
            "salon_name" => SalonSortField::SalonName,
            "created_at" => SalonSortField::CreatedAt,
            "vote_rate" => SalonSortField::VoteRate,
            "total_completed_booking" => SalonSortField::TotalCompletedBooking,
            _ => return None,
        };
        Some(Self { field, descending })
    }
}

pub struct SalonFilter {
    pub query: Option<String>,
    pub sort: Option<SalonSort>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_accepts_whitelisted_fields_with_direction() {
        assert_eq!(
            SalonSort::parse("-vote_rate"),
            Some(SalonSort {
                field: SalonSortField::VoteRate,
                descending: true
            })
        );
        assert_eq!(
            SalonSort::parse("salon_name").map(|s| s.descending),
            Some(false)
        );
    }

    #[test]
    fn sort_ignores_unknown_fields() {
        assert_eq!(SalonSort::parse("password_hash"), None);
        assert_eq!(SalonSort::parse("-id; DROP TABLE accounts"), None);
        assert_eq!(SalonSort::parse(""), None);
    }
}
