//! Consultas SQL de la tabla employees (solo lectura)

use sqlx::PgExecutor;

use crate::models::employee::Employee;
use crate::utils::errors::AppResult;

pub async fn find_by_id<'e, E: PgExecutor<'e>>(
    executor: E,
    employee_id: i64,
) -> AppResult<Option<Employee>> {
    let employee = sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE employee_id = $1")
        .bind(employee_id)
        .fetch_optional(executor)
        .await?;

    Ok(employee)
}

pub async fn find_by_username<'e, E: PgExecutor<'e>>(
    executor: E,
    username: &str,
) -> AppResult<Option<Employee>> {
    let employee = sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE username = $1")
        .bind(username)
        .fetch_optional(executor)
        .await?;

    Ok(employee)
}
