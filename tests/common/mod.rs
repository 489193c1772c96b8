//! Common test utilities

use chrono::NaiveDate;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Setup test database - truncate tables and seed one active customer.
///
/// Returns the pool and the seeded customer's ID.
pub async fn setup_test_db() -> (PgPool, String) {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");

    let pool = PgPoolOptions::new()
        .max_connections(20)
        .connect(&database_url)
        .await
        .expect("Failed to connect to DB");

    let mut tx = pool.begin().await.expect("Failed to begin transaction");

    // Clean up DB for fresh state
    sqlx::query("TRUNCATE TABLE transactions, accounts, customers RESTART IDENTITY CASCADE")
        .execute(&mut *tx)
        .await
        .expect("Failed to clean up DB");

    let customer_id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO customers (name, city, zipcode, date_of_birth, status)
        VALUES ('Cassius au Bellona', 'Agea', '110075', $1, 1)
        RETURNING customer_id
        "#,
    )
    .bind(NaiveDate::from_ymd_opt(1978, 12, 15).unwrap())
    .fetch_one(&mut *tx)
    .await
    .expect("Failed to seed customer");

    sqlx::query(
        r#"
        INSERT INTO customers (name, city, zipcode, date_of_birth, status)
        VALUES ('Roque au Fabii', 'Olympia', '110076', $1, 0)
        "#,
    )
    .bind(NaiveDate::from_ymd_opt(1981, 4, 2).unwrap())
    .execute(&mut *tx)
    .await
    .expect("Failed to seed inactive customer");

    tx.commit().await.expect("Failed to commit transaction");

    (pool, customer_id.to_string())
}
