//! Session and profile handlers.
//!
//! ```text
//! POST /api/v1/login {"username":"admin","password":"password"}
//! POST /api/v1/logout
//! GET /api/v1/users/{id}
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use utoipa::ToSchema;

use crate::domain::ports::UserProfile;
use crate::domain::{ApiResult, Error, LoginCredentials, LoginValidationError};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_user_id;

/// Login request body for `POST /api/v1/login`.
#[derive(Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.username, &value.password)
    }
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::EmptyUsername => Error::invalid_request("username must not be empty")
            .with_details(json!({ "field": "username", "code": "empty_username" })),
        LoginValidationError::EmptyPassword => Error::invalid_request("password must not be empty")
            .with_details(json!({ "field": "password", "code": "empty_password" })),
    }
}

/// Authenticate and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["session"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(map_login_validation_error)?;
    let user_id = state.login.authenticate(&credentials).await?;
    session.persist_user(&user_id)?;
    info!(user = %user_id, "session established");
    Ok(HttpResponse::Ok().finish())
}

/// Drop the current session.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses((status = 204, description = "Session cleared")),
    tags = ["session"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.purge();
    HttpResponse::NoContent().finish()
}

/// Profile payload for `GET /api/v1/users/{id}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    #[schema(example = "Ada Lovelace")]
    pub display_name: String,
    pub follower_count: u32,
    pub following_count: u32,
    /// Whether the caller follows this user; `false` without a session.
    pub is_following: bool,
}

impl From<UserProfile> for ProfileResponse {
    fn from(value: UserProfile) -> Self {
        let UserProfile { user, is_following } = value;
        Self {
            id: user.id().to_string(),
            display_name: user.display_name().to_string(),
            follower_count: user.follower_count(),
            following_count: user.following_count(),
            is_following,
        }
    }
}

/// Fetch a user's profile as seen by the caller.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User UUID")),
    responses(
        (status = 200, description = "Profile", body = ProfileResponse),
        (status = 400, description = "Malformed id", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<ProfileResponse>> {
    let ctx = session.actor_context()?;
    let subject = parse_user_id(&path.into_inner(), "id")?;
    let profile = state.profiles.fetch_profile(&ctx, &subject).await?;
    Ok(web::Json(profile.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FollowCounts, UserId};
    use crate::inbound::http::test_utils::{session_cookie, test_session_middleware};
    use crate::test_support::{MemoryBackend, TEST_PASSWORD};
    use actix_web::cookie::Cookie;
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use rstest::rstest;
    use serde_json::Value;

    fn test_app(
        state: HttpState,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(web::Data::new(state))
            .wrap(test_session_middleware())
            .service(
                web::scope("/api/v1")
                    .service(login)
                    .service(logout)
                    .service(get_user),
            )
    }

    fn login_request(username: &str, password: &str) -> actix_test::TestRequest {
        actix_test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(LoginRequest {
                username: username.to_owned(),
                password: password.to_owned(),
            })
    }

    async fn seeded() -> (MemoryBackend, UserId) {
        let backend = MemoryBackend::new();
        let id = backend
            .add_account(
                "ada",
                "Ada Lovelace",
                FollowCounts {
                    followers: 7,
                    following: 2,
                },
            )
            .await;
        (backend, id)
    }

    #[rstest]
    #[case("   ", "pw", "username must not be empty", "username", "empty_username")]
    #[case("ada", "", "password must not be empty", "password", "empty_password")]
    #[actix_web::test]
    async fn login_rejects_blank_fields(
        #[case] username: &str,
        #[case] password: &str,
        #[case] message: &str,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        let (backend, _) = seeded().await;
        let app = actix_test::init_service(test_app(backend.http_state())).await;

        let res =
            actix_test::call_service(&app, login_request(username, password).to_request()).await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["error"], message);
        assert_eq!(body["code"], "invalid_request");
        assert_eq!(body["details"]["field"], field);
        assert_eq!(body["details"]["code"], code);
    }

    #[actix_web::test]
    async fn login_with_wrong_password_is_unauthorised() {
        let (backend, _) = seeded().await;
        let app = actix_test::init_service(test_app(backend.http_state())).await;

        let res = actix_test::call_service(&app, login_request("ada", "nope").to_request()).await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["code"], "unauthenticated");
    }

    #[actix_web::test]
    async fn logout_clears_the_session_cookie() {
        let (backend, _) = seeded().await;
        let app = actix_test::init_service(test_app(backend.http_state())).await;
        let logged_in =
            actix_test::call_service(&app, login_request("ada", TEST_PASSWORD).to_request()).await;
        assert_eq!(logged_in.status(), StatusCode::OK);
        let cookie = session_cookie(&logged_in);

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/logout")
                .cookie(cookie)
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::NO_CONTENT);
        let cleared = res
            .response()
            .cookies()
            .find(|c| c.name() == "session")
            .map(Cookie::into_owned)
            .expect("removal cookie");
        assert_eq!(cleared.value(), "");
    }

    #[actix_web::test]
    async fn anonymous_profile_read_reports_not_following() {
        let (backend, id) = seeded().await;
        let app = actix_test::init_service(test_app(backend.http_state())).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/api/v1/users/{id}"))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: ProfileResponse = actix_test::read_body_json(res).await;
        assert_eq!(body.id, id.to_string());
        assert_eq!(body.display_name, "Ada Lovelace");
        assert_eq!(body.follower_count, 7);
        assert_eq!(body.following_count, 2);
        assert!(!body.is_following);
    }

    #[rstest]
    #[case::malformed("not-a-uuid", StatusCode::BAD_REQUEST, "invalid_request")]
    #[case::unknown("3fa85f64-5717-4562-b3fc-2c963f66afa6", StatusCode::NOT_FOUND, "not_found")]
    #[actix_web::test]
    async fn profile_read_failures(
        #[case] raw_id: &str,
        #[case] status: StatusCode,
        #[case] code: &str,
    ) {
        let (backend, _) = seeded().await;
        let app = actix_test::init_service(test_app(backend.http_state())).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/api/v1/users/{raw_id}"))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), status);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["code"], code);
    }
}
