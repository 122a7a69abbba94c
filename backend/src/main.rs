//! Backend entry-point: wires REST endpoints, the token service, and the
//! document store behind explicit, injected state.

use std::env;
use std::sync::Arc;

use actix_web::{App, HttpResponse, HttpServer, web};
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};
use uuid::Uuid;

use backend::Trace;
#[cfg(debug_assertions)]
use backend::ApiDoc;
use backend::domain::{ApiResult, Error, TokenService};
use backend::inbound::http::health::{HealthState, live, ready};
use backend::inbound::http::state::HttpState;
use backend::inbound::http::{blogs, users};
use backend::outbound::persistence::InMemoryStore;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let secret = match env::var("SECRET") {
        Ok(value) if !value.is_empty() => value.into_bytes(),
        _ => {
            let allow_dev = env::var("TOKEN_ALLOW_EPHEMERAL").ok().as_deref() == Some("1");
            if cfg!(debug_assertions) || allow_dev {
                warn!("using ephemeral token secret (dev only); tokens expire on restart");
                Uuid::new_v4().simple().to_string().into_bytes()
            } else {
                return Err(std::io::Error::other(
                    "SECRET environment variable is required to sign tokens",
                ));
            }
        }
    };

    let port = env::var("PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(3003);

    let store = Arc::new(InMemoryStore::default());
    let state = web::Data::new(HttpState::new(
        store.clone(),
        store,
        TokenService::new(&secret),
    ));
    let health_state = web::Data::new(HealthState::new());
    // Clone for server factory so readiness probe remains accessible.
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || {
        let app = App::new()
            .app_data(state.clone())
            .app_data(server_health_state.clone())
            .wrap(Trace)
            .service(
                web::scope("/api")
                    .service(blogs::list_blogs)
                    .service(blogs::create_blog)
                    .service(blogs::update_blog)
                    .service(blogs::delete_blog)
                    .service(users::register_user)
                    .service(users::list_users)
                    .service(users::login),
            )
            .service(ready)
            .service(live)
            .default_service(web::route().to(unknown_endpoint));

        #[cfg(debug_assertions)]
        let app = app.service(
            SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
        );

        app
    })
    .bind(("0.0.0.0", port))?;

    health_state.mark_ready();
    server.run().await
}

async fn unknown_endpoint() -> ApiResult<HttpResponse> {
    Err(Error::not_found("unknown endpoint"))
}
