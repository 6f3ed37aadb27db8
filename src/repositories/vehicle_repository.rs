//! Consultas SQL de la tabla vehicles

use sqlx::PgExecutor;

use crate::models::vehicle::{Vehicle, VehicleData, VehicleStatus};
use crate::utils::errors::AppResult;

pub async fn find_by_id<'e, E: PgExecutor<'e>>(executor: E, vehicle_id: i64) -> AppResult<Option<Vehicle>> {
    let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE vehicle_id = $1")
        .bind(vehicle_id)
        .fetch_optional(executor)
        .await?;

    Ok(vehicle)
}

pub async fn find_for_update<'e, E: PgExecutor<'e>>(
    executor: E,
    vehicle_id: i64,
) -> AppResult<Option<Vehicle>> {
    let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE vehicle_id = $1 FOR UPDATE")
        .bind(vehicle_id)
        .fetch_optional(executor)
        .await?;

    Ok(vehicle)
}

pub async fn list<'e, E: PgExecutor<'e>>(
    executor: E,
    status: Option<VehicleStatus>,
) -> AppResult<Vec<Vehicle>> {
    let vehicles = sqlx::query_as::<_, Vehicle>(
        r#"
        SELECT * FROM vehicles
        WHERE ($1::vehicle_status IS NULL OR status = $1)
        ORDER BY vehicle_id
        "#,
    )
    .bind(status)
    .fetch_all(executor)
    .await?;

    Ok(vehicles)
}

pub async fn plate_number_exists<'e, E: PgExecutor<'e>>(
    executor: E,
    plate_number: &str,
    exclude_vehicle_id: Option<i64>,
) -> AppResult<bool> {
    let result: (bool,) = sqlx::query_as(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM vehicles
            WHERE LOWER(plate_number) = LOWER($1)
              AND ($2::BIGINT IS NULL OR vehicle_id <> $2)
        )
        "#,
    )
    .bind(plate_number)
    .bind(exclude_vehicle_id)
    .fetch_one(executor)
    .await?;

    Ok(result.0)
}

pub async fn insert<'e, E: PgExecutor<'e>>(executor: E, data: &VehicleData) -> AppResult<Vehicle> {
    let vehicle = sqlx::query_as::<_, Vehicle>(
        r#"
        INSERT INTO vehicles (vehicle_type, model, plate_number, price_per_day, status)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(&data.vehicle_type)
    .bind(&data.model)
    .bind(&data.plate_number)
    .bind(data.price_per_day)
    .bind(data.status)
    .fetch_one(executor)
    .await?;

    Ok(vehicle)
}

pub async fn update<'e, E: PgExecutor<'e>>(
    executor: E,
    vehicle_id: i64,
    data: &VehicleData,
) -> AppResult<Vehicle> {
    let vehicle = sqlx::query_as::<_, Vehicle>(
        r#"
        UPDATE vehicles
        SET vehicle_type = $2, model = $3, plate_number = $4, price_per_day = $5,
            status = $6, updated_at = NOW()
        WHERE vehicle_id = $1
        RETURNING *
        "#,
    )
    .bind(vehicle_id)
    .bind(&data.vehicle_type)
    .bind(&data.model)
    .bind(&data.plate_number)
    .bind(data.price_per_day)
    .bind(data.status)
    .fetch_one(executor)
    .await?;

    Ok(vehicle)
}

pub async fn set_status<'e, E: PgExecutor<'e>>(
    executor: E,
    vehicle_id: i64,
    status: VehicleStatus,
) -> AppResult<()> {
    sqlx::query("UPDATE vehicles SET status = $2, updated_at = NOW() WHERE vehicle_id = $1")
        .bind(vehicle_id)
        .bind(status)
        .execute(executor)
        .await?;

    Ok(())
}

pub async fn delete<'e, E: PgExecutor<'e>>(executor: E, vehicle_id: i64) -> AppResult<()> {
    sqlx::query("DELETE FROM vehicles WHERE vehicle_id = $1")
        .bind(vehicle_id)
        .execute(executor)
        .await?;

    Ok(())
}
