use crate::api::employee::{EmployeeForm, EmployeeListResponse};
use crate::model::employee::Employee;
use crate::model::user::UserResponse;
use crate::models::{LoginReqDto, ProfileUpdateReq, RegisterReq, TokenResponse};
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "LMS API",
        version = "1.0.0",
        description = r#"
## Learning Management System backend

### Key Features
- **Users**: register, log in, list, view, delete, edit own profile
- **Employees**: create, update, list, view and soft-delete employee records,
  with an optional profile image uploaded as multipart form data

### Security
Everything except `/auth/*` and `/health` needs a JWT bearer token from
`POST /api/v1/auth/login`.

### Response Format
Every endpoint answers with `{message, success, statusCode, errors, data}`.
"#,
    ),
    paths(
        crate::auth::handlers::register,
        crate::auth::handlers::login,

        crate::api::users::list_users,
        crate::api::users::get_user,
        crate::api::users::delete_user,
        crate::api::users::update_profile,

        crate::api::employee::create_employee,
        crate::api::employee::list_employees,
        crate::api::employee::get_employee,
        crate::api::employee::update_employee,
        crate::api::employee::delete_employee,

        crate::api::health::health
    ),
    components(
        schemas(
            RegisterReq,
            LoginReqDto,
            TokenResponse,
            ProfileUpdateReq,
            UserResponse,
            Employee,
            EmployeeForm,
            EmployeeListResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Registration and login"),
        (name = "Users", description = "User management APIs"),
        (name = "Employee", description = "Employee management APIs"),
        (name = "Health", description = "Liveness check"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn employee_form_schema_lists_multipart_parts() {
        let doc: serde_json::Value =
            serde_json::from_str(&ApiDoc::openapi().to_json().unwrap()).unwrap();
        let props = &doc["components"]["schemas"]["EmployeeForm"]["properties"];

        for part in ["Email", "CampusId", "CNIC", "PhoneNo", "HireDate", "image"] {
            assert!(props.get(part).is_some(), "missing {part}");
        }
        assert_eq!(props["image"]["format"], "binary");
    }

    #[test]
    fn bearer_scheme_is_registered() {
        let doc: serde_json::Value =
            serde_json::from_str(&ApiDoc::openapi().to_json().unwrap()).unwrap();
        assert_eq!(doc["components"]["securitySchemes"]["bearer_auth"]["scheme"], "bearer");
    }
}
