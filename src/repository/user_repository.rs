use async_trait::async_trait;
use chrono::Utc;
use sqlx::MySqlPool;

use crate::{
    error::AppResult,
    model::user::{NewUser, User},
};

const USER_COLUMNS: &str =
    "id, username, email, hashed_password, full_name, is_active, created_at, updated_at";

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn get_by_id(&self, id: u64) -> AppResult<Option<User>>;
    async fn get_by_username(&self, username: &str) -> AppResult<Option<User>>;
    async fn get_by_email(&self, email: &str) -> AppResult<Option<User>>;
    /// Ordered by id.
    async fn list(&self, skip: u64, limit: u64) -> AppResult<Vec<User>>;
    async fn create(&self, user: &NewUser) -> AppResult<User>;
    async fn update_full_name(&self, id: u64, full_name: &str) -> AppResult<Option<User>>;
    /// Removes the row.
    async fn delete(&self, id: u64) -> AppResult<bool>;
}

#[derive(Clone)]
pub struct MySqlUserRepository {
    pool: MySqlPool,
}

impl MySqlUserRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn fetch_one_by(&self, column: &str, value: impl ToString) -> AppResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE {column} = ?");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(value.to_string())
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn get_by_id(&self, id: u64) -> AppResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn get_by_username(&self, username: &str) -> AppResult<Option<User>> {
        self.fetch_one_by("username", username).await
    }

    async fn get_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.fetch_one_by("email", email).await
    }

    async fn list(&self, skip: u64, limit: u64) -> AppResult<Vec<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY id LIMIT ? OFFSET ?");
        let users = sqlx::query_as::<_, User>(&sql)
            .bind(limit)
            .bind(skip)
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    async fn create(&self, user: &NewUser) -> AppResult<User> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO users (username, email, hashed_password, full_name, is_active, created_at)
            VALUES (?, ?, ?, ?, TRUE, ?)
            "#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.hashed_password)
        .bind(&user.full_name)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?");
        let created = sqlx::query_as::<_, User>(&sql)
            .bind(result.last_insert_id())
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(created)
    }

    async fn update_full_name(&self, id: u64, full_name: &str) -> AppResult<Option<User>> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE users SET full_name = ?, updated_at = ? WHERE id = ?")
            .bind(full_name)
            .bind(Utc::now())
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?");
        let updated = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(updated)
    }

    async fn delete(&self, id: u64) -> AppResult<bool> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}
