//! Consultas SQL de la tabla renters (solo lectura)

use sqlx::PgExecutor;

use crate::models::renter::Renter;
use crate::utils::errors::AppResult;

pub async fn find_by_id<'e, E: PgExecutor<'e>>(executor: E, renter_id: i64) -> AppResult<Option<Renter>> {
    let renter = sqlx::query_as::<_, Renter>("SELECT * FROM renters WHERE renter_id = $1")
        .bind(renter_id)
        .fetch_optional(executor)
        .await?;

    Ok(renter)
}

pub async fn find_by_email<'e, E: PgExecutor<'e>>(executor: E, email: &str) -> AppResult<Option<Renter>> {
    let renter = sqlx::query_as::<_, Renter>("SELECT * FROM renters WHERE LOWER(email) = LOWER($1)")
        .bind(email)
        .fetch_optional(executor)
        .await?;

    Ok(renter)
}
