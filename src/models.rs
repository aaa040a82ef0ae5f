use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct RegisterReq {
    #[validate(length(min = 3, max = 50, message = "must be between 3 and 50 characters"))]
    #[schema(example = "jdoe")]
    pub username: String,
    #[validate(
        email(message = "must be a valid email address"),
        length(max = 100, message = "cannot exceed 100 characters")
    )]
    #[schema(example = "john.doe@company.com")]
    pub email: String,
    #[validate(length(min = 8, message = "must be at least 8 characters"))]
    #[schema(example = "s3cret-passw0rd")]
    pub password: String,
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    #[schema(example = "John Doe", nullable = true)]
    pub full_name: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginReqDto {
    #[schema(example = "jdoe")]
    pub username: String,
    #[schema(example = "s3cret-passw0rd")]
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct ProfileUpdateReq {
    #[validate(length(min = 1, max = 100, message = "must be between 1 and 100 characters"))]
    #[schema(example = "Johnathan Doe", nullable = true)]
    pub full_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    #[schema(example = "bearer")]
    pub token_type: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: u64,
    /// username
    pub sub: String,
    pub iat: usize,
    pub exp: usize,
    pub jti: String,
}

/// `skip`/`limit` paging shared by the list endpoints.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct Pagination {
    /// Number of records to skip
    pub skip: Option<u64>,
    /// Maximum number of records to return (1-100)
    pub limit: Option<u64>,
}

pub const DEFAULT_LIMIT: u64 = 100;
pub const MAX_LIMIT: u64 = 100;

impl Pagination {
    /// `(skip, limit)` with defaults applied; a limit outside 1..=100 is rejected.
    pub fn bounds(&self) -> AppResult<(u64, u64)> {
        let limit = self.limit.unwrap_or(DEFAULT_LIMIT);
        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(AppError::BadRequest(format!(
                "Limit must be between 1 and {MAX_LIMIT}"
            )));
        }
        Ok((self.skip.unwrap_or(0), limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults() {
        assert_eq!(Pagination::default().bounds().unwrap(), (0, 100));
    }

    #[test]
    fn pagination_rejects_out_of_range_limit() {
        for limit in [0, 101, 150] {
            let page = Pagination { skip: None, limit: Some(limit) };
            assert!(matches!(page.bounds(), Err(AppError::BadRequest(_))));
        }
    }
}
