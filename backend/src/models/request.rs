use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Programs for which an employee may hold only one active (non-Rejected)
/// request at a time.
pub const ONE_TIME_PROGRAMS: [&str; 5] = [
    "Yoga and Meditation",
    "Mental Health Support",
    "Awareness Programs",
    "Health Checkup Camps",
    "Gym Membership",
];

pub fn is_one_time_program(program: &str) -> bool {
    ONE_TIME_PROGRAMS.contains(&program)
}

/// Status a request starts in. Updates may set any text; nothing in the
/// system validates transitions, only `Rejected` has meaning (it frees the
/// one-time-program slot).
pub const STATUS_PENDING: &str = "Pending";
pub const STATUS_REJECTED: &str = "Rejected";

/// A stored employee request, as returned by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Request {
    /// Store-assigned identifier, immutable.
    pub id: i32,
    pub name: String,
    pub email: String,
    pub emp_id: String,
    pub program: String,
    pub program_time: Option<String>,
    pub request_date: NaiveDate,
    pub status: String,
    pub loan_type: Option<String>,
    pub amount: Option<f64>,
    pub reason: Option<String>,
    pub document_path: Option<String>,
}

/// Draft of a request as submitted by the intake form.
///
/// Required fields stay `Option` on purpose: missing or empty values are
/// bound as NULL and rejected by the store's NOT NULL constraints rather
/// than by field-level validation.
#[derive(Debug, Clone, Default)]
pub struct NewRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub emp_id: Option<String>,
    pub program: Option<String>,
    pub program_time: Option<String>,
    pub request_date: Option<NaiveDate>,
    pub loan_type: Option<String>,
    pub amount: Option<f64>,
    pub reason: Option<String>,
    pub document_path: Option<String>,
}

/// Body of `PUT /api/requests/{id}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpdateStatusPayload {
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_time_program_set_is_exact() {
        assert!(is_one_time_program("Gym Membership"));
        assert!(is_one_time_program("Yoga and Meditation"));
        assert!(!is_one_time_program("Home Loan"));
        assert!(!is_one_time_program("gym membership"));
    }

    #[test]
    fn request_serializes_with_row_field_names() {
        let request = Request {
            id: 7,
            name: "Asha Rao".into(),
            email: "asha@example.com".into(),
            emp_id: "EMP-100".into(),
            program: "Gym Membership".into(),
            program_time: None,
            request_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            status: STATUS_PENDING.into(),
            loan_type: None,
            amount: None,
            reason: Some("annual membership".into()),
            document_path: Some("Uploads/123-456.pdf".into()),
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["id"], 7);
        assert_eq!(value["emp_id"], "EMP-100");
        assert_eq!(value["request_date"], "2025-06-01");
        assert_eq!(value["status"], "Pending");
        assert_eq!(value["document_path"], "Uploads/123-456.pdf");
    }
}
