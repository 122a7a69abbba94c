//! Users API handlers.
//!
//! ```text
//! POST /api/users {"username":"mluukkai","name":"Matti","password":"salainen"}
//! GET  /api/users
//! POST /api/login {"username":"mluukkai","password":"salainen"}
//! ```

use std::collections::HashMap;

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::ports::UserPersistenceError;
use crate::domain::{
    Blog, BlogId, Error, LoginCredentials, LoginValidationError, PasswordHash, User, UserId,
    Username, UserValidationError,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::authenticate;
use crate::inbound::http::state::HttpState;

/// Registration request body for `POST /api/users`.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Owned-blog projection substituted inline on user responses.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OwnedBlogSummary {
    pub id: String,
    pub title: String,
    pub author: String,
    pub url: String,
}

impl OwnedBlogSummary {
    fn from_blog(blog: &Blog) -> Self {
        Self {
            id: blog.id().to_string(),
            title: blog.title().to_owned(),
            author: blog.author().to_owned(),
            url: blog.url().to_owned(),
        }
    }
}

/// User representation returned by the registration and list routes.
///
/// Never carries the password hash.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub name: String,
    pub blogs: Vec<OwnedBlogSummary>,
}

impl UserResponse {
    fn new(user: &User, blogs: Vec<OwnedBlogSummary>) -> Self {
        Self {
            id: user.id().to_string(),
            username: user.username().to_string(),
            name: user.name().to_owned(),
            blogs,
        }
    }
}

/// Login request body for `POST /api/login`.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
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

/// Login response carrying the bearer token and public identity.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
    pub name: String,
}

fn map_user_validation_error(err: &UserValidationError) -> Error {
    let field = match err {
        UserValidationError::EmptyId | UserValidationError::InvalidId => "id",
        UserValidationError::EmptyUsername
        | UserValidationError::UsernameTooShort { .. }
        | UserValidationError::UsernameTooLong { .. }
        | UserValidationError::UsernameInvalidCharacters => "username",
        UserValidationError::PasswordTooShort { .. } => "password",
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field }))
}

fn map_user_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        // Store-level uniqueness validation is a client error.
        UserPersistenceError::DuplicateUsername { .. } => {
            Error::invalid_request(error.to_string())
        }
        UserPersistenceError::Connection { .. } | UserPersistenceError::Query { .. } => {
            Error::internal(error.to_string())
        }
    }
}

fn map_login_validation_error(err: &LoginValidationError) -> Error {
    match err {
        LoginValidationError::EmptyUsername => Error::invalid_request("username must not be empty")
            .with_details(json!({ "field": "username" })),
        LoginValidationError::EmptyPassword => Error::invalid_request("password must not be empty")
            .with_details(json!({ "field": "password" })),
    }
}

/// Register a new user.
///
/// The password is hashed exactly once here; only the hash is stored.
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = UserResponse),
        (status = 400, description = "Invalid username or password", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "registerUser",
    security([])
)]
#[post("/users")]
pub async fn register_user(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let username = Username::new(payload.username.unwrap_or_default())
        .map_err(|err| map_user_validation_error(&err))?;
    let password_hash = PasswordHash::from_plaintext(&payload.password.unwrap_or_default())
        .map_err(|err| map_user_validation_error(&err))?;

    let user = User::new(
        UserId::random(),
        username,
        payload.name.unwrap_or_default(),
        password_hash,
    );
    state
        .users
        .insert(&user)
        .await
        .map_err(map_user_persistence_error)?;

    Ok(HttpResponse::Created().json(UserResponse::new(&user, Vec::new())))
}

/// List known users with their owned blogs substituted inline.
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "Users", body = [UserResponse]),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "listUsers",
    security([])
)]
#[get("/users")]
pub async fn list_users(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<UserResponse>>> {
    let users = state
        .users
        .find_all()
        .await
        .map_err(map_user_persistence_error)?;
    let blogs: HashMap<BlogId, Blog> = state
        .blogs
        .find_all()
        .await
        .map_err(|error| Error::internal(error.to_string()))?
        .into_iter()
        .map(|blog| (*blog.id(), blog))
        .collect();

    let body = users
        .iter()
        .map(|user| {
            // Dangling ids (the documented delete race) are skipped rather
            // than surfaced.
            let owned = user
                .blogs()
                .iter()
                .filter_map(|id| blogs.get(id))
                .map(OwnedBlogSummary::from_blog)
                .collect();
            UserResponse::new(user, owned)
        })
        .collect();
    Ok(web::Json(body))
}

/// Authenticate a user and issue a bearer token.
#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = LoginResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials = LoginCredentials::try_from(payload.into_inner())
        .map_err(|err| map_login_validation_error(&err))?;
    let user = authenticate(&state, &credentials).await?;
    let token = state
        .tokens
        .issue(&user)
        .map_err(|error| Error::internal(error.to_string()))?;

    Ok(HttpResponse::Ok().json(LoginResponse {
        token,
        username: user.username().to_string(),
        name: user.name().to_owned(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TokenService;
    use crate::outbound::persistence::InMemoryStore;
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test, web};
    use rstest::rstest;
    use serde_json::Value;
    use std::sync::Arc;

    fn empty_state() -> (HttpState, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::default());
        let state = HttpState::new(store.clone(), store.clone(), TokenService::new(b"test-secret"));
        (state, store)
    }

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
        App::new().app_data(web::Data::new(state)).service(
            web::scope("/api")
                .service(register_user)
                .service(list_users)
                .service(login),
        )
    }

    async fn register(
        app: &impl actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
        username: &str,
        password: &str,
    ) -> actix_web::dev::ServiceResponse {
        let request = actix_test::TestRequest::post()
            .uri("/api/users")
            .set_json(RegisterRequest {
                username: Some(username.to_owned()),
                name: Some("Test User".to_owned()),
                password: Some(password.to_owned()),
            })
            .to_request();
        actix_test::call_service(app, request).await
    }

    #[actix_web::test]
    async fn registration_stores_a_hash_and_returns_the_public_projection() {
        let (state, _) = empty_state();
        let app = actix_test::init_service(test_app(state.clone())).await;

        let response = register(&app, "mluukkai", "salainen").await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(
            body.get("username").and_then(Value::as_str),
            Some("mluukkai")
        );
        assert!(body.get("password").is_none());
        assert!(body.get("passwordHash").is_none());
        assert_eq!(body.get("blogs").and_then(Value::as_array).map(Vec::len), Some(0));

        let stored = state
            .users
            .find_by_username("mluukkai")
            .await
            .expect("query")
            .expect("user present");
        assert_ne!(stored.password_hash().as_str(), "salainen");
        assert!(stored.password_hash().verify("salainen"));
    }

    #[rstest]
    #[case::missing_username(None, Some("salainen"), "username")]
    #[case::short_username(Some("ml"), Some("salainen"), "username")]
    #[case::missing_password(Some("mluukkai"), None, "password")]
    #[case::short_password(Some("mluukkai"), Some("pw"), "password")]
    #[actix_web::test]
    async fn registration_rejects_invalid_inputs_with_the_offending_field(
        #[case] username: Option<&str>,
        #[case] password: Option<&str>,
        #[case] expected_field: &str,
    ) {
        let (state, _) = empty_state();
        let app = actix_test::init_service(test_app(state.clone())).await;

        let request = actix_test::TestRequest::post()
            .uri("/api/users")
            .set_json(RegisterRequest {
                username: username.map(str::to_owned),
                name: None,
                password: password.map(str::to_owned),
            })
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(
            body.get("details")
                .and_then(|d| d.get("field"))
                .and_then(Value::as_str),
            Some(expected_field)
        );

        let users = state.users.find_all().await.expect("list");
        assert!(users.is_empty());
    }

    #[actix_web::test]
    async fn registration_rejects_duplicate_usernames() {
        let (state, _) = empty_state();
        let app = actix_test::init_service(test_app(state)).await;

        let first = register(&app, "root", "sekret").await;
        assert_eq!(first.status(), StatusCode::CREATED);

        let second = register(&app, "root", "sekret").await;
        assert_eq!(second.status(), StatusCode::BAD_REQUEST);
        let body: Error = actix_test::read_body_json(second).await;
        assert!(body.message.contains("already taken"));
    }

    #[actix_web::test]
    async fn login_returns_a_token_that_verifies_against_the_service() {
        let (state, _) = empty_state();
        let app = actix_test::init_service(test_app(state.clone())).await;
        register(&app, "mluukkai", "salainen").await;

        let request = actix_test::TestRequest::post()
            .uri("/api/login")
            .set_json(LoginRequest {
                username: "mluukkai".to_owned(),
                password: "salainen".to_owned(),
            })
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: LoginResponse = actix_test::read_body_json(response).await;
        assert_eq!(body.username, "mluukkai");

        let user_id = state.tokens.verify(&body.token).expect("token verifies");
        let stored = state
            .users
            .find_by_username("mluukkai")
            .await
            .expect("query")
            .expect("user present");
        assert_eq!(&user_id, stored.id());
    }

    #[rstest]
    #[case("mluukkai", "wrong-password")]
    #[case("nobody", "salainen")]
    #[actix_web::test]
    async fn login_rejects_bad_credentials_with_one_message(
        #[case] username: &str,
        #[case] password: &str,
    ) {
        let (state, _) = empty_state();
        let app = actix_test::init_service(test_app(state)).await;
        register(&app, "mluukkai", "salainen").await;

        let request = actix_test::TestRequest::post()
            .uri("/api/login")
            .set_json(LoginRequest {
                username: username.to_owned(),
                password: password.to_owned(),
            })
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body: Error = actix_test::read_body_json(response).await;
        assert_eq!(body.message, "invalid username or password");
    }

    #[actix_web::test]
    async fn list_users_substitutes_owned_blog_projections() {
        let (state, store) = empty_state();
        let app = actix_test::init_service(test_app(state.clone())).await;
        register(&app, "mluukkai", "salainen").await;

        let mut stored = state
            .users
            .find_by_username("mluukkai")
            .await
            .expect("query")
            .expect("user present");
        let blog = Blog::new(
            BlogId::random(),
            "first blog",
            "Tester one",
            "http://example.com/1",
            7,
            Some(*stored.id()),
        )
        .expect("valid blog");
        store.seed_blog(blog.clone());
        stored.grant_blog(*blog.id());
        state.users.update(&stored).await.expect("owner update");

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/api/users").to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(response).await;
        let users = body.as_array().expect("array body");
        assert_eq!(users.len(), 1);
        let owned = users[0].get("blogs").and_then(Value::as_array).expect("blogs");
        assert_eq!(owned.len(), 1);
        assert_eq!(
            owned[0].get("title").and_then(Value::as_str),
            Some("first blog")
        );
        assert!(owned[0].get("likes").is_none());
        assert!(users[0].get("passwordHash").is_none());
    }

    #[actix_web::test]
    async fn list_users_skips_dangling_owned_ids() {
        let (state, _) = empty_state();
        let app = actix_test::init_service(test_app(state.clone())).await;
        register(&app, "mluukkai", "salainen").await;

        let mut stored = state
            .users
            .find_by_username("mluukkai")
            .await
            .expect("query")
            .expect("user present");
        stored.grant_blog(BlogId::random());
        state.users.update(&stored).await.expect("owner update");

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/api/users").to_request(),
        )
        .await;
        let body: Value = actix_test::read_body_json(response).await;
        let users = body.as_array().expect("array body");
        let owned = users[0].get("blogs").and_then(Value::as_array).expect("blogs");
        assert!(owned.is_empty());
    }
}
