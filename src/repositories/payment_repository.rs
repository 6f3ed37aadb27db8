//! Consultas SQL de la tabla payments

use sqlx::PgExecutor;

use crate::models::payment::{NewPayment, Payment};
use crate::utils::errors::AppResult;

pub async fn insert<'e, E: PgExecutor<'e>>(executor: E, payment: &NewPayment) -> AppResult<Payment> {
    let payment = sqlx::query_as::<_, Payment>(
        r#"
        INSERT INTO payments (rental_id, amount, payment_date, method)
        VALUES ($1, $2, NOW(), $3)
        RETURNING *
        "#,
    )
    .bind(payment.rental_id)
    .bind(payment.amount)
    .bind(&payment.method)
    .fetch_one(executor)
    .await?;

    Ok(payment)
}
