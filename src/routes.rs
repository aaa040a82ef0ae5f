use crate::{
    api::{employee, users},
    auth::{handlers, middleware::auth_middleware},
    config::Config,
    error::{json_error_handler, path_error_handler, query_error_handler},
    state::AppState,
    utils::response::failure,
};
use actix_governor::{
    Governor, GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor,
    governor::middleware::NoOpMiddleware,
};
use actix_web::{HttpResponse, http::StatusCode, middleware::from_fn, web};

type Limiter = GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware>;

/// Per-IP limits on the public auth endpoints, shared by every worker.
#[derive(Clone)]
pub struct RateLimits {
    login: Limiter,
    register: Limiter,
}

impl RateLimits {
    pub fn from_config(config: &Config) -> Self {
        Self {
            login: build_limiter(config.rate_login_per_min),
            register: build_limiter(config.rate_register_per_min),
        }
    }
}

fn build_limiter(requests_per_min: u32) -> Limiter {
    let requests_per_min = requests_per_min.max(1);
    let per_ms = (60_000 / requests_per_min as u64).max(1);

    GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .expect("non-zero rate limit")
}

/// Unknown routes answer with the envelope too.
pub async fn not_found() -> HttpResponse {
    failure(StatusCode::NOT_FOUND, "Resource not found", Vec::new())
}

pub fn configure(cfg: &mut web::ServiceConfig, state: &AppState, limits: &RateLimits) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .app_data(web::Data::new(state.config.clone()))
        .app_data(web::Data::new(state.employees.clone()))
        .app_data(web::Data::new(state.auth.clone()))
        .app_data(web::Data::new(state.users.clone()));

    cfg.service(
        web::scope(&state.config.api_prefix)
            // Public routes
            .service(
                web::scope("/auth")
                    .service(
                        web::resource("/login")
                            .wrap(Governor::new(&limits.login))
                            .route(web::post().to(handlers::login)),
                    )
                    .service(
                        web::resource("/register")
                            .wrap(Governor::new(&limits.register))
                            .route(web::post().to(handlers::register)),
                    ),
            )
            // Protected routes
            .service(
                web::scope("/users")
                    .wrap(from_fn(auth_middleware))
                    // /users
                    .service(web::resource("").route(web::get().to(users::list_users)))
                    // /users/profile, before /{id} so it is not parsed as an id
                    .service(
                        web::resource("/profile").route(web::put().to(users::update_profile)),
                    )
                    // /users/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(users::get_user))
                            .route(web::delete().to(users::delete_user)),
                    ),
            )
            .service(
                web::scope("/Employees")
                    .wrap(from_fn(auth_middleware))
                    // /Employees
                    .service(
                        web::resource("")
                            .route(web::post().to(employee::create_employee))
                            .route(web::get().to(employee::list_employees)),
                    )
                    // /Employees/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::put().to(employee::update_employee))
                            .route(web::get().to(employee::get_employee))
                            .route(web::delete().to(employee::delete_employee)),
                    ),
            ),
    );
}
