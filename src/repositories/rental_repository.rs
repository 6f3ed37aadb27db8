//! Consultas SQL de la tabla rentals

use sqlx::PgExecutor;

use super::RentalFilter;
use crate::models::rental::{NewRental, Rental, RentalStatus};
use crate::utils::errors::AppResult;

pub async fn find_by_id<'e, E: PgExecutor<'e>>(executor: E, rental_id: i64) -> AppResult<Option<Rental>> {
    let rental = sqlx::query_as::<_, Rental>("SELECT * FROM rentals WHERE rental_id = $1")
        .bind(rental_id)
        .fetch_optional(executor)
        .await?;

    Ok(rental)
}

pub async fn find_for_update<'e, E: PgExecutor<'e>>(
    executor: E,
    rental_id: i64,
) -> AppResult<Option<Rental>> {
    let rental = sqlx::query_as::<_, Rental>("SELECT * FROM rentals WHERE rental_id = $1 FOR UPDATE")
        .bind(rental_id)
        .fetch_optional(executor)
        .await?;

    Ok(rental)
}

pub async fn list<'e, E: PgExecutor<'e>>(executor: E, filter: &RentalFilter) -> AppResult<Vec<Rental>> {
    let statuses: Option<Vec<String>> = filter
        .statuses
        .as_ref()
        .map(|statuses| statuses.iter().map(|s| s.as_str().to_string()).collect());

    let rentals = sqlx::query_as::<_, Rental>(
        r#"
        SELECT * FROM rentals
        WHERE ($1::BIGINT IS NULL OR renter_id = $1)
          AND ($2::BIGINT IS NULL OR vehicle_id = $2)
          AND ($3::TEXT[] IS NULL OR status::TEXT = ANY($3))
        ORDER BY rental_id
        "#,
    )
    .bind(filter.renter_id)
    .bind(filter.vehicle_id)
    .bind(statuses)
    .fetch_all(executor)
    .await?;

    Ok(rentals)
}

/// Alquileres que todavía reclaman el vehículo
pub async fn active_for_vehicle<'e, E: PgExecutor<'e>>(
    executor: E,
    vehicle_id: i64,
) -> AppResult<Vec<Rental>> {
    let rentals = sqlx::query_as::<_, Rental>(
        r#"
        SELECT * FROM rentals
        WHERE vehicle_id = $1
          AND status IN ('pending', 'approved', 'paid', 'rented')
        ORDER BY rental_id
        "#,
    )
    .bind(vehicle_id)
    .fetch_all(executor)
    .await?;

    Ok(rentals)
}

pub async fn insert<'e, E: PgExecutor<'e>>(executor: E, rental: &NewRental) -> AppResult<Rental> {
    let rental = sqlx::query_as::<_, Rental>(
        r#"
        INSERT INTO rentals (renter_id, vehicle_id, approved_by_id, start_date, end_date, total_cost, status)
        VALUES ($1, $2, NULL, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(rental.renter_id)
    .bind(rental.vehicle_id)
    .bind(rental.range.start())
    .bind(rental.range.end())
    .bind(rental.total_cost)
    .bind(RentalStatus::Pending)
    .fetch_one(executor)
    .await?;

    Ok(rental)
}

pub async fn update<'e, E: PgExecutor<'e>>(executor: E, rental: &Rental) -> AppResult<Rental> {
    let rental = sqlx::query_as::<_, Rental>(
        r#"
        UPDATE rentals
        SET renter_id = $2, vehicle_id = $3, approved_by_id = $4, start_date = $5,
            end_date = $6, total_cost = $7, status = $8, updated_at = NOW()
        WHERE rental_id = $1
        RETURNING *
        "#,
    )
    .bind(rental.rental_id)
    .bind(rental.renter_id)
    .bind(rental.vehicle_id)
    .bind(rental.approved_by_id)
    .bind(rental.start_date)
    .bind(rental.end_date)
    .bind(rental.total_cost)
    .bind(rental.status)
    .fetch_one(executor)
    .await?;

    Ok(rental)
}

pub async fn delete<'e, E: PgExecutor<'e>>(executor: E, rental_id: i64) -> AppResult<()> {
    sqlx::query("DELETE FROM rentals WHERE rental_id = $1")
        .bind(rental_id)
        .execute(executor)
        .await?;

    Ok(())
}

pub async fn delete_terminal<'e, E: PgExecutor<'e>>(executor: E) -> AppResult<u64> {
    let result = sqlx::query("DELETE FROM rentals WHERE status IN ('returned', 'rejected', 'cancelled')")
        .execute(executor)
        .await?;

    Ok(result.rows_affected())
}
