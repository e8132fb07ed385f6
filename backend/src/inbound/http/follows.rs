//! Follow graph handlers.
//!
//! ```text
//! POST   /api/v1/users/{id}/follow
//! DELETE /api/v1/users/{id}/follow
//! ```
//!
//! The session is checked before the path id is parsed, so an anonymous
//! caller always sees `401` regardless of the id.

use actix_web::{delete, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{ActorContext, ApiResult, Error, FollowOutcome, UserId};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_user_id;

/// Response body for follow and unfollow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FollowResponse {
    /// Always `true`; failures use the error envelope instead.
    pub success: bool,
    /// Whether the caller follows the target after the call.
    pub is_following: bool,
    /// The target's follower count as stored after the call.
    pub follower_count: u32,
}

impl From<FollowOutcome> for FollowResponse {
    fn from(value: FollowOutcome) -> Self {
        Self {
            success: true,
            is_following: value.is_following,
            follower_count: value.follower_count,
        }
    }
}

fn target_from_path(
    session: &SessionContext,
    path: web::Path<String>,
) -> Result<(ActorContext, UserId), Error> {
    let ctx = session.actor_context()?;
    ctx.require_actor()?;
    let target = parse_user_id(&path.into_inner(), "id")?;
    Ok((ctx, target))
}

/// Follow a user.
#[utoipa::path(
    post,
    path = "/api/v1/users/{id}/follow",
    params(("id" = String, Path, description = "UUID of the user to follow")),
    responses(
        (status = 200, description = "Now following", body = FollowResponse),
        (status = 400, description = "Self-follow, already following or malformed id", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["follows"],
    operation_id = "followUser"
)]
#[post("/users/{id}/follow")]
pub async fn follow_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<FollowResponse>> {
    let (ctx, target) = target_from_path(&session, path)?;
    let outcome = state.follows.follow(&ctx, &target).await?;
    Ok(web::Json(outcome.into()))
}

/// Stop following a user.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}/follow",
    params(("id" = String, Path, description = "UUID of the user to unfollow")),
    responses(
        (status = 200, description = "No longer following", body = FollowResponse),
        (status = 400, description = "Not following or malformed id", body = ErrorSchema),
        (status = 401, description = "Login required", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["follows"],
    operation_id = "unfollowUser"
)]
#[delete("/users/{id}/follow")]
pub async fn unfollow_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<FollowResponse>> {
    let (ctx, target) = target_from_path(&session, path)?;
    let outcome = state.follows.unfollow(&ctx, &target).await?;
    Ok(web::Json(outcome.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::domain::FollowCounts;
    use crate::domain::ports::{MockFollowCommand, MockLoginService, MockUserProfileQuery};
    use crate::inbound::http::test_utils::{session_cookie, test_session_middleware};
    use crate::inbound::http::users::{LoginRequest, login};
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
                    .service(follow_user)
                    .service(unfollow_user),
            )
    }

    async fn login_cookie<S>(app: &S, username: &str) -> Cookie<'static>
    where
        S: actix_web::dev::Service<
                actix_http::Request,
                Response = actix_web::dev::ServiceResponse,
                Error = actix_web::Error,
            >,
    {
        let res = actix_test::call_service(
            app,
            actix_test::TestRequest::post()
                .uri("/api/v1/login")
                .set_json(LoginRequest {
                    username: username.to_owned(),
                    password: TEST_PASSWORD.to_owned(),
                })
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        session_cookie(&res)
    }

    fn follow_request(method: &str, target: &str) -> actix_test::TestRequest {
        let uri = format!("/api/v1/users/{target}/follow");
        match method {
            "DELETE" => actix_test::TestRequest::delete().uri(&uri),
            _ => actix_test::TestRequest::post().uri(&uri),
        }
    }

    struct Pair {
        backend: MemoryBackend,
        target: UserId,
    }

    async fn pair() -> Pair {
        let backend = MemoryBackend::new();
        backend
            .add_account("grace", "Grace Hopper", FollowCounts::default())
            .await;
        let target = backend
            .add_account(
                "ada",
                "Ada Lovelace",
                FollowCounts {
                    followers: 10,
                    following: 0,
                },
            )
            .await;
        Pair { backend, target }
    }

    #[actix_web::test]
    async fn follow_then_unfollow_round_trip() {
        let Pair { backend, target } = pair().await;
        let app = actix_test::init_service(test_app(backend.http_state())).await;
        let cookie = login_cookie(&app, "grace").await;

        let followed: FollowResponse = actix_test::call_and_read_body_json(
            &app,
            follow_request("POST", target.as_ref())
                .cookie(cookie.clone())
                .to_request(),
        )
        .await;
        let unfollowed: FollowResponse = actix_test::call_and_read_body_json(
            &app,
            follow_request("DELETE", target.as_ref())
                .cookie(cookie)
                .to_request(),
        )
        .await;

        assert_eq!(
            followed,
            FollowResponse {
                success: true,
                is_following: true,
                follower_count: 11,
            }
        );
        assert_eq!(
            unfollowed,
            FollowResponse {
                success: true,
                is_following: false,
                follower_count: 10,
            }
        );
    }

    #[actix_web::test]
    async fn second_follow_is_rejected_without_touching_counts() {
        let Pair { backend, target } = pair().await;
        let app = actix_test::init_service(test_app(backend.http_state())).await;
        let cookie = login_cookie(&app, "grace").await;
        let first = actix_test::call_service(
            &app,
            follow_request("POST", target.as_ref())
                .cookie(cookie.clone())
                .to_request(),
        )
        .await;
        assert_eq!(first.status(), StatusCode::OK);

        let res = actix_test::call_service(
            &app,
            follow_request("POST", target.as_ref())
                .cookie(cookie)
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["error"], "Already following this user");
        assert_eq!(body["code"], "conflict");
        let stored = backend.user(&target).await.expect("target");
        assert_eq!(stored.follower_count(), 11);
    }

    #[actix_web::test]
    async fn unknown_target_is_not_found() {
        let Pair { backend, .. } = pair().await;
        let app = actix_test::init_service(test_app(backend.http_state())).await;
        let cookie = login_cookie(&app, "grace").await;

        let res = actix_test::call_service(
            &app,
            follow_request("POST", UserId::random().as_ref())
                .cookie(cookie)
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["error"], "User not found");
    }

    #[actix_web::test]
    async fn unfollow_without_relationship_is_rejected() {
        let Pair { backend, target } = pair().await;
        let app = actix_test::init_service(test_app(backend.http_state())).await;
        let cookie = login_cookie(&app, "grace").await;

        let res = actix_test::call_service(
            &app,
            follow_request("DELETE", target.as_ref())
                .cookie(cookie)
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["error"], "Not following this user");
        assert_eq!(body["code"], "invalid_operation");
    }

    #[rstest]
    #[case("POST")]
    #[case("DELETE")]
    #[actix_web::test]
    async fn anonymous_callers_get_401_even_for_malformed_ids(#[case] method: &str) {
        let mut follows = MockFollowCommand::new();
        follows.expect_follow().never();
        follows.expect_unfollow().never();
        let state = HttpState::new(
            Arc::new(MockLoginService::new()),
            Arc::new(follows),
            Arc::new(MockUserProfileQuery::new()),
        );
        let app = actix_test::init_service(test_app(state)).await;

        let res =
            actix_test::call_service(&app, follow_request(method, "not-a-uuid").to_request())
                .await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["code"], "unauthenticated");
    }

    #[rstest]
    #[case("POST")]
    #[case("DELETE")]
    #[actix_web::test]
    async fn malformed_id_is_invalid_request_for_signed_in_callers(#[case] method: &str) {
        let Pair { backend, .. } = pair().await;
        let app = actix_test::init_service(test_app(backend.http_state())).await;
        let cookie = login_cookie(&app, "grace").await;

        let res = actix_test::call_service(
            &app,
            follow_request(method, "42").cookie(cookie).to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["code"], "invalid_request");
        assert_eq!(body["details"]["field"], "id");
    }

    #[actix_web::test]
    async fn actor_comes_from_the_session() {
        let actor = UserId::random();
        let target = UserId::random();
        let expected_actor = actor.clone();
        let expected_target = target.clone();

        let mut login_service = MockLoginService::new();
        let login_actor = actor.clone();
        login_service
            .expect_authenticate()
            .return_once(move |_| Ok(login_actor));
        let mut follows = MockFollowCommand::new();
        follows
            .expect_follow()
            .withf(move |ctx: &ActorContext, t: &UserId| {
                ctx.actor() == Some(&expected_actor) && t == &expected_target
            })
            .times(1)
            .return_once(|_, _| {
                Ok(FollowOutcome {
                    is_following: true,
                    follower_count: 1,
                })
            });
        let state = HttpState::new(
            Arc::new(login_service),
            Arc::new(follows),
            Arc::new(MockUserProfileQuery::new()),
        );
        let app = actix_test::init_service(test_app(state)).await;
        let cookie = login_cookie(&app, "anyone").await;

        let res = actix_test::call_service(
            &app,
            follow_request("POST", target.as_ref())
                .cookie(cookie)
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
    }
}
