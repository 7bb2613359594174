//! Request repository trait for dependency injection and testing.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::models::request::{is_one_time_program, NewRequest, Request, STATUS_PENDING, STATUS_REJECTED};

const REQUEST_COLUMNS: &str = "id, name, email, emp_id, program, program_time, request_date, \
     status, loan_type, amount, reason, document_path";

#[derive(Debug, thiserror::Error)]
pub enum CreateRequestError {
    /// The employee already holds an active request for a one-time program.
    /// The message echoes the existing record's status, lower-cased.
    #[error("You already have a {} request for {program}", .status.to_lowercase())]
    Duplicate { status: String, program: String },
    #[error(transparent)]
    Db(#[from] sqlx::Error),
}

/// Repository for request records.
///
/// Mockable with `MockRequestRepositoryTrait` in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RequestRepositoryTrait: Send + Sync {
    /// Insert a new request with status forced to Pending, enforcing the
    /// one-active-request rule for one-time programs.
    async fn create(&self, db: &PgPool, draft: &NewRequest) -> Result<Request, CreateRequestError>;

    /// All requests, newest request date first.
    async fn find_all(&self, db: &PgPool) -> Result<Vec<Request>, sqlx::Error>;

    /// Requests whose employee id matches exactly, newest request date first.
    async fn find_by_employee(&self, db: &PgPool, emp_id: &str)
        -> Result<Vec<Request>, sqlx::Error>;

    /// Overwrite a request's status. Returns `None` when the id is unknown.
    async fn update_status(
        &self,
        db: &PgPool,
        id: i32,
        status: &str,
    ) -> Result<Option<Request>, sqlx::Error>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RequestRepository;

impl RequestRepository {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl RequestRepositoryTrait for RequestRepository {
    async fn create(&self, db: &PgPool, draft: &NewRequest) -> Result<Request, CreateRequestError> {
        let mut tx = db.begin().await?;

        // The duplicate check and the insert must be atomic: without the
        // advisory lock two concurrent submissions for the same
        // (employee, program) pair could both pass the check.
        if let Some(program) = draft.program.as_deref().filter(|p| is_one_time_program(p)) {
            let emp_id = draft.emp_id.as_deref().unwrap_or_default();
            sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1)::bigint)")
                .bind(format!("{}:{}", emp_id, program))
                .execute(&mut *tx)
                .await?;

            let query = format!(
                "SELECT {REQUEST_COLUMNS} FROM requests \
                 WHERE emp_id = $1 AND program = $2 AND status <> $3 LIMIT 1"
            );
            let existing = sqlx::query_as::<_, Request>(&query)
                .bind(emp_id)
                .bind(program)
                .bind(STATUS_REJECTED)
                .fetch_optional(&mut *tx)
                .await?;

            if let Some(existing) = existing {
                return Err(CreateRequestError::Duplicate {
                    status: existing.status,
                    program: program.to_string(),
                });
            }
        }

        let query = format!(
            "INSERT INTO requests \
                (name, email, emp_id, program, program_time, request_date, status, \
                 loan_type, amount, reason, document_path) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING {REQUEST_COLUMNS}"
        );
        let row = sqlx::query_as::<_, Request>(&query)
            .bind(&draft.name)
            .bind(&draft.email)
            .bind(&draft.emp_id)
            .bind(&draft.program)
            .bind(&draft.program_time)
            .bind(draft.request_date)
            .bind(STATUS_PENDING)
            .bind(&draft.loan_type)
            .bind(draft.amount)
            .bind(&draft.reason)
            .bind(&draft.document_path)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(row)
    }

    async fn find_all(&self, db: &PgPool) -> Result<Vec<Request>, sqlx::Error> {
        let query = format!("SELECT {REQUEST_COLUMNS} FROM requests ORDER BY request_date DESC");
        sqlx::query_as::<_, Request>(&query).fetch_all(db).await
    }

    async fn find_by_employee(
        &self,
        db: &PgPool,
        emp_id: &str,
    ) -> Result<Vec<Request>, sqlx::Error> {
        let query = format!(
            "SELECT {REQUEST_COLUMNS} FROM requests WHERE emp_id = $1 ORDER BY request_date DESC"
        );
        sqlx::query_as::<_, Request>(&query)
            .bind(emp_id)
            .fetch_all(db)
            .await
    }

    async fn update_status(
        &self,
        db: &PgPool,
        id: i32,
        status: &str,
    ) -> Result<Option<Request>, sqlx::Error> {
        let query = format!(
            "UPDATE requests SET status = $1 WHERE id = $2 RETURNING {REQUEST_COLUMNS}"
        );
        sqlx::query_as::<_, Request>(&query)
            .bind(status)
            .bind(id)
            .fetch_optional(db)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_error_message_carries_lowercased_status_and_program() {
        let err = CreateRequestError::Duplicate {
            status: "Pending".into(),
            program: "Gym Membership".into(),
        };
        assert_eq!(
            err.to_string(),
            "You already have a pending request for Gym Membership"
        );

        let err = CreateRequestError::Duplicate {
            status: "Approved".into(),
            program: "Health Checkup Camps".into(),
        };
        assert_eq!(
            err.to_string(),
            "You already have a approved request for Health Checkup Camps"
        );
    }

    #[test]
    fn mock_request_repository_satisfies_trait_bounds() {
        fn check_send_sync<T: Send + Sync>() {}
        check_send_sync::<MockRequestRepositoryTrait>();
        let _mock = MockRequestRepositoryTrait::new();
    }
}
