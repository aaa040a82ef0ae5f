use async_trait::async_trait;
use chrono::Utc;
use sqlx::MySqlPool;

use crate::{
    error::AppResult,
    model::employee::{Employee, EmployeeChanges, NewEmployee},
    utils::db_utils::{SqlValue, build_update_sql, employee_change_columns, execute_update},
};

const EMPLOYEE_COLUMNS: &str = r#"
    employee_id, campus_id, designation_id, user_id, full_name, father_name, gender,
    date_of_birth, cnic, phone_no, mobile_no, blood_group, email, hire_date, salary,
    is_hourly_salary, experience, image_path, created_date, created_by, modified_date,
    modified_by, is_deleted, is_active
"#;

/// Columns that must be unique among non-deleted employees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Cnic,
    Email,
    UserRef,
}

impl UniqueField {
    pub fn column(self) -> &'static str {
        match self {
            UniqueField::Cnic => "cnic",
            UniqueField::Email => "email",
            UniqueField::UserRef => "user_id",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            UniqueField::Cnic => "CNIC",
            UniqueField::Email => "Email",
            UniqueField::UserRef => "UserId",
        }
    }
}

/// Employee persistence. Every operation except `hard_delete` only sees rows
/// with `is_deleted = false`.
#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    async fn get_by_id(&self, id: u64) -> AppResult<Option<Employee>>;

    async fn get_by_unique_field(&self, field: UniqueField, value: &str) -> AppResult<Option<Employee>>;

    /// True when another live row holds `value`; `exclude_id` skips the row being updated.
    async fn exists_by(&self, field: UniqueField, value: &str, exclude_id: Option<u64>) -> AppResult<bool>;

    /// Ordered by primary key.
    async fn list(&self, skip: u64, limit: u64) -> AppResult<Vec<Employee>>;

    async fn count(&self) -> AppResult<i64>;

    async fn create(&self, employee: &NewEmployee, created_by: u64) -> AppResult<Employee>;

    /// Writes only the supplied fields. `None` when the row is absent or deleted.
    async fn update(&self, id: u64, changes: &EmployeeChanges, modified_by: u64) -> AppResult<Option<Employee>>;

    /// Removes the row regardless of its deleted flag.
    async fn hard_delete(&self, id: u64) -> AppResult<bool>;

    /// Sets the deleted flag and clears the active flag; the row stays.
    async fn soft_delete(&self, id: u64, modified_by: u64) -> AppResult<bool>;

    async fn exists(&self, id: u64) -> AppResult<bool>;
}

#[derive(Clone)]
pub struct MySqlEmployeeRepository {
    pool: MySqlPool,
}

impl MySqlEmployeeRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EmployeeRepository for MySqlEmployeeRepository {
    async fn get_by_id(&self, id: u64) -> AppResult<Option<Employee>> {
        let sql = format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE employee_id = ? AND is_deleted = FALSE"
        );
        let employee = sqlx::query_as::<_, Employee>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(employee)
    }

    async fn get_by_unique_field(&self, field: UniqueField, value: &str) -> AppResult<Option<Employee>> {
        let sql = format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE {} = ? AND is_deleted = FALSE LIMIT 1",
            field.column()
        );
        let employee = sqlx::query_as::<_, Employee>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;
        Ok(employee)
    }

    async fn exists_by(&self, field: UniqueField, value: &str, exclude_id: Option<u64>) -> AppResult<bool> {
        let sql = format!(
            "SELECT COUNT(*) FROM employees WHERE {} = ? AND is_deleted = FALSE AND employee_id <> ?",
            field.column()
        );
        // ids start at 1, so 0 excludes nothing
        let matches = sqlx::query_scalar::<_, i64>(&sql)
            .bind(value)
            .bind(exclude_id.unwrap_or(0))
            .fetch_one(&self.pool)
            .await?;
        Ok(matches > 0)
    }

    async fn list(&self, skip: u64, limit: u64) -> AppResult<Vec<Employee>> {
        // MySQL is fine without ORDER BY, but paging must be deterministic
        let sql = format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE is_deleted = FALSE ORDER BY employee_id LIMIT ? OFFSET ?"
        );
        let employees = sqlx::query_as::<_, Employee>(&sql)
            .bind(limit)
            .bind(skip)
            .fetch_all(&self.pool)
            .await?;
        Ok(employees)
    }

    async fn count(&self) -> AppResult<i64> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM employees WHERE is_deleted = FALSE")
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    async fn create(&self, employee: &NewEmployee, created_by: u64) -> AppResult<Employee> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO employees
            (campus_id, designation_id, user_id, full_name, father_name, gender, date_of_birth,
             cnic, phone_no, mobile_no, blood_group, email, hire_date, salary, is_hourly_salary,
             experience, image_path, created_date, created_by, is_deleted, is_active)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, FALSE, TRUE)
            "#,
        )
        .bind(employee.campus_id)
        .bind(employee.designation_id)
        .bind(&employee.user_id)
        .bind(&employee.full_name)
        .bind(&employee.father_name)
        .bind(employee.gender.to_string())
        .bind(employee.date_of_birth)
        .bind(&employee.cnic)
        .bind(&employee.phone_no)
        .bind(&employee.mobile_no)
        .bind(employee.blood_group.map(|g| g.to_string()))
        .bind(&employee.email)
        .bind(employee.hire_date)
        .bind(employee.salary)
        .bind(employee.is_hourly_salary)
        .bind(employee.experience)
        .bind(&employee.image_path)
        .bind(Utc::now())
        .bind(created_by)
        .execute(&mut *tx)
        .await?;

        let sql = format!("SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE employee_id = ?");
        let created = sqlx::query_as::<_, Employee>(&sql)
            .bind(result.last_insert_id())
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(created)
    }

    async fn update(&self, id: u64, changes: &EmployeeChanges, modified_by: u64) -> AppResult<Option<Employee>> {
        let mut columns = employee_change_columns(changes);
        columns.push(("modified_date", SqlValue::DateTime(Utc::now())));
        columns.push(("modified_by", SqlValue::U64(modified_by)));

        let Some(update) = build_update_sql(
            "employees",
            &columns,
            "employee_id",
            id,
            Some("is_deleted = FALSE"),
        ) else {
            return self.get_by_id(id).await;
        };

        let mut tx = self.pool.begin().await?;
        execute_update(&mut *tx, update).await?;

        // rows_affected is 0 for no-op updates on MySQL, so re-read instead
        let sql = format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE employee_id = ? AND is_deleted = FALSE"
        );
        let updated = sqlx::query_as::<_, Employee>(&sql)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(updated)
    }

    async fn hard_delete(&self, id: u64) -> AppResult<bool> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query("DELETE FROM employees WHERE employee_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    async fn soft_delete(&self, id: u64, modified_by: u64) -> AppResult<bool> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query(
            r#"
            UPDATE employees
            SET is_deleted = TRUE, is_active = FALSE, modified_date = ?, modified_by = ?
            WHERE employee_id = ? AND is_deleted = FALSE
            "#,
        )
        .bind(Utc::now())
        .bind(modified_by)
        .bind(id)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    async fn exists(&self, id: u64) -> AppResult<bool> {
        let matches = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM employees WHERE employee_id = ? AND is_deleted = FALSE",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(matches > 0)
    }
}
