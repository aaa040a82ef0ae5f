use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{MySql, MySqlConnection};

use crate::model::employee::EmployeeChanges;

/// ===============================
/// SQL bindable value enum
/// ===============================
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    String(String),
    U64(u64),
    I64(i64),
    F64(f64),
    Bool(bool),
    Date(NaiveDate),
    DateTime(DateTime<Utc>),
}

/// ===============================
/// SQL update container
/// ===============================
#[derive(Debug)]
pub struct SqlUpdate {
    pub sql: String,
    pub values: Vec<SqlValue>,
}

/// ===============================
/// Build dynamic UPDATE SQL
/// ===============================
///
/// Column names come from code, never from the request. Values are always
/// bound. `extra_filter` is appended to the WHERE clause verbatim.
pub fn build_update_sql(
    table: &str,
    columns: &[(&'static str, SqlValue)],
    id_column: &str,
    id_value: u64,
    extra_filter: Option<&str>,
) -> Option<SqlUpdate> {
    if columns.is_empty() {
        return None;
    }

    let set_clause = columns
        .iter()
        .map(|(column, _)| format!("{} = ?", column))
        .collect::<Vec<_>>()
        .join(", ");

    let mut sql = format!("UPDATE {} SET {} WHERE {} = ?", table, set_clause, id_column);
    if let Some(filter) = extra_filter {
        sql.push_str(" AND ");
        sql.push_str(filter);
    }

    let mut values: Vec<SqlValue> = columns.iter().map(|(_, v)| v.clone()).collect();
    values.push(SqlValue::U64(id_value));

    Some(SqlUpdate { sql, values })
}

/// Column/value pairs for the fields an update actually supplies.
pub fn employee_change_columns(changes: &EmployeeChanges) -> Vec<(&'static str, SqlValue)> {
    let mut columns = Vec::new();

    if let Some(v) = changes.campus_id {
        columns.push(("campus_id", SqlValue::U64(v)));
    }
    if let Some(v) = changes.designation_id {
        columns.push(("designation_id", SqlValue::U64(v)));
    }
    if let Some(v) = &changes.user_id {
        columns.push(("user_id", SqlValue::String(v.clone())));
    }
    if let Some(v) = &changes.full_name {
        columns.push(("full_name", SqlValue::String(v.clone())));
    }
    if let Some(v) = &changes.father_name {
        columns.push(("father_name", SqlValue::String(v.clone())));
    }
    if let Some(v) = changes.gender {
        columns.push(("gender", SqlValue::String(v.to_string())));
    }
    if let Some(v) = changes.date_of_birth {
        columns.push(("date_of_birth", SqlValue::Date(v)));
    }
    if let Some(v) = &changes.cnic {
        columns.push(("cnic", SqlValue::String(v.clone())));
    }
    if let Some(v) = &changes.phone_no {
        columns.push(("phone_no", SqlValue::String(v.clone())));
    }
    if let Some(v) = &changes.mobile_no {
        columns.push(("mobile_no", SqlValue::String(v.clone())));
    }
    if let Some(v) = changes.blood_group {
        columns.push(("blood_group", SqlValue::String(v.to_string())));
    }
    if let Some(v) = &changes.email {
        columns.push(("email", SqlValue::String(v.clone())));
    }
    if let Some(v) = changes.hire_date {
        columns.push(("hire_date", SqlValue::Date(v)));
    }
    if let Some(v) = changes.salary {
        columns.push(("salary", SqlValue::F64(v)));
    }
    if let Some(v) = changes.is_hourly_salary {
        columns.push(("is_hourly_salary", SqlValue::Bool(v)));
    }
    if let Some(v) = changes.experience {
        columns.push(("experience", SqlValue::I64(v.into())));
    }
    if let Some(v) = &changes.image_path {
        columns.push(("image_path", SqlValue::String(v.clone())));
    }

    columns
}

/// ===============================
/// Execute the update
/// ===============================
pub async fn execute_update(conn: &mut MySqlConnection, update: SqlUpdate) -> Result<u64, sqlx::Error> {
    let mut query = sqlx::query::<MySql>(&update.sql);

    for value in update.values {
        query = match value {
            SqlValue::String(v) => query.bind(v),
            SqlValue::U64(v) => query.bind(v),
            SqlValue::I64(v) => query.bind(v),
            SqlValue::F64(v) => query.bind(v),
            SqlValue::Bool(v) => query.bind(v),
            SqlValue::Date(v) => query.bind(v),
            SqlValue::DateTime(v) => query.bind(v),
        };
    }

    let result = query.execute(conn).await?;
    Ok(result.rows_affected())
}
