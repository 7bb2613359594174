use sqlx::postgres::PgPool;
use std::sync::Arc;

pub type DbPool = Arc<PgPool>;

pub async fn create_pool(database_url: &str) -> anyhow::Result<DbPool> {
    let pool = PgPool::connect(database_url).await?;
    Ok(Arc::new(pool))
}

/// Ensures the `requests` table exists. Idempotent; called once at startup.
/// A failure here is fatal; the service cannot run against an unknown schema.
pub async fn init_schema(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS requests (
            id SERIAL PRIMARY KEY,
            name VARCHAR(255) NOT NULL,
            email VARCHAR(255) NOT NULL,
            emp_id VARCHAR(50) NOT NULL,
            program VARCHAR(255) NOT NULL,
            program_time VARCHAR(255),
            request_date DATE NOT NULL,
            status VARCHAR(50) NOT NULL DEFAULT 'Pending',
            loan_type VARCHAR(100),
            amount DOUBLE PRECISION,
            reason TEXT,
            document_path VARCHAR(255)
        )",
    )
    .execute(pool)
    .await?;
    Ok(())
}
