use std::sync::Arc;

use super::support::*;
use crate::{
    error::AppError,
    models::{LoginReqDto, ProfileUpdateReq, RegisterReq},
    repository::UserRepository,
    services::{AuthService, UserService},
};

fn auth_service() -> (AuthService, Arc<InMemoryUserRepository>) {
    let users = Arc::new(InMemoryUserRepository::default());
    (AuthService::new(users.clone(), JWT_SECRET, 1800), users)
}

fn register_req(username: &str, password: &str) -> RegisterReq {
    RegisterReq {
        username: username.to_string(),
        email: format!("{username}@example.com"),
        password: password.to_string(),
        full_name: None,
    }
}

fn failed_fields(err: AppError) -> Vec<(String, String)> {
    match err {
        AppError::Validation(fields) => fields.into_iter().map(|f| (f.field, f.message)).collect(),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[actix_web::test]
async fn long_passwords_are_accepted_and_usable() {
    let (auth, _) = auth_service();
    let password = "p".repeat(80);

    auth.register(&register_req("longpass", &password)).await.unwrap();
    let token = auth
        .login(&LoginReqDto {
            username: "longpass".into(),
            password,
        })
        .await
        .unwrap();
    assert_eq!(token.token_type, "bearer");
}

#[actix_web::test]
async fn password_length_counts_characters_not_bytes() {
    let (auth, users) = auth_service();

    // four characters, eight bytes
    let err = auth.register(&register_req("accents", "éééé")).await.unwrap_err();
    assert_eq!(
        failed_fields(err),
        vec![("password".to_string(), "must be at least 8 characters".to_string())]
    );
    assert!(users.get_by_username("accents").await.unwrap().is_none());

    assert!(auth.register(&register_req("accents", "éééééééé")).await.is_ok());
}

#[actix_web::test]
async fn register_reports_every_bad_field() {
    let (auth, _) = auth_service();
    let req = RegisterReq {
        username: "  jd  ".into(),
        email: "not-an-email".into(),
        password: "short".into(),
        full_name: Some("x".repeat(101)),
    };

    let fields: Vec<String> = failed_fields(auth.register(&req).await.unwrap_err())
        .into_iter()
        .map(|(field, _)| field)
        .collect();
    assert_eq!(fields, vec!["email", "full_name", "password", "username"]);
}

#[actix_web::test]
async fn register_normalizes_email_and_blank_full_name() {
    let (auth, _) = auth_service();
    let req = RegisterReq {
        username: " jdoe ".into(),
        email: " JDoe@Example.COM ".into(),
        password: "s3cret-passw0rd".into(),
        full_name: Some("   ".into()),
    };

    let user = auth.register(&req).await.unwrap();
    assert_eq!(user.username, "jdoe");
    assert_eq!(user.email, "jdoe@example.com");
    assert!(user.full_name.is_none());
}

#[actix_web::test]
async fn profile_name_over_limit_is_a_validation_error() {
    let (auth, users) = auth_service();
    let user = auth.register(&register_req("jdoe", "s3cret-passw0rd")).await.unwrap();
    let service = UserService::new(users);

    let err = service
        .update_profile(
            user.id,
            &ProfileUpdateReq {
                full_name: Some("x".repeat(101)),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(failed_fields(err)[0].0, "full_name");

    let err = service
        .update_profile(user.id, &ProfileUpdateReq { full_name: Some("  ".into()) })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(ref m) if m == "No update data provided"));
}
