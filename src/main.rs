use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::extract::MatchedPath;
use dotenvy::dotenv;
use http::HeaderValue;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use profile_links_api::bootstrap::app_context::{AppContext, AppServices};
use profile_links_api::bootstrap::config::Config;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
        paths(
            profile_links_api::presentation::http::links::list_links,
            profile_links_api::presentation::http::links::reconcile_links,
            profile_links_api::presentation::http::links::create_link,
            profile_links_api::presentation::http::links::update_link,
            profile_links_api::presentation::http::links::delete_link,
            profile_links_api::presentation::http::health::health,
        ),
        components(schemas(
            profile_links_api::presentation::http::links::Link,
            profile_links_api::presentation::http::links::LinksResponse,
            profile_links_api::presentation::http::links::DesiredLinkItem,
            profile_links_api::presentation::http::links::ReconcileLinksRequest,
            profile_links_api::presentation::http::links::CreateLinkRequest,
            profile_links_api::presentation::http::links::UpdateLinkRequest,
            profile_links_api::presentation::http::error::ApiError,
            profile_links_api::presentation::http::error::ApiErrorBody,
            profile_links_api::presentation::http::health::HealthResp,
        )),
        tags(
            (name = "Links", description = "Profile links management"),
            (name = "Health", description = "System health checks")
        )
    )]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "profile_links_api=debug,axum=info,tower_http=info".into()),
        )
        .init();

    let cfg = Config::from_env()?;
    info!(?cfg, "Starting profile links backend");

    // Database
    let pool = profile_links_api::infrastructure::db::connect_pool(&cfg.database_url).await?;
    profile_links_api::infrastructure::db::migrate(&pool).await?;

    let link_repo = Arc::new(
        profile_links_api::infrastructure::db::repositories::link_repository_sqlx::SqlxLinkRepository::new(
            pool.clone(),
            cfg.max_profile_links,
        ),
    );
    let profile_repo = Arc::new(
        profile_links_api::infrastructure::db::repositories::profile_repository_sqlx::SqlxProfileRepository::new(
            pool.clone(),
        ),
    );

    let services = AppServices::new(link_repo, profile_repo);
    let ctx = AppContext::new(cfg.clone(), services);

    // Build CORS
    let cors = if let Some(origin) = cfg.frontend_url.clone() {
        match HeaderValue::from_str(&origin) {
            Ok(v) => CorsLayer::new()
                .allow_origin(v)
                .allow_methods([
                    http::Method::GET,
                    http::Method::POST,
                    http::Method::PUT,
                    http::Method::DELETE,
                    http::Method::PATCH,
                    http::Method::OPTIONS,
                ])
                .allow_headers([http::header::CONTENT_TYPE, http::header::AUTHORIZATION])
                .allow_credentials(true),
            Err(_) => CorsLayer::new()
                .allow_origin(AllowOrigin::mirror_request())
                .allow_methods([
                    http::Method::GET,
                    http::Method::POST,
                    http::Method::PUT,
                    http::Method::DELETE,
                    http::Method::PATCH,
                    http::Method::OPTIONS,
                ])
                .allow_headers([http::header::CONTENT_TYPE, http::header::AUTHORIZATION])
                .allow_credentials(true),
        }
    } else if cfg.is_production {
        // In production, FRONTEND_URL is mandatory (enforced earlier), but fall back to deny all
        CorsLayer::new()
            .allow_origin(AllowOrigin::exact(HeaderValue::from_static("http://invalid")))
            .allow_methods([
                http::Method::GET,
                http::Method::POST,
                http::Method::PUT,
                http::Method::DELETE,
                http::Method::PATCH,
                http::Method::OPTIONS,
            ])
            .allow_headers([http::header::CONTENT_TYPE, http::header::AUTHORIZATION])
    } else {
        // Development convenience
        CorsLayer::new()
            .allow_origin(AllowOrigin::mirror_request())
            .allow_methods([
                http::Method::GET,
                http::Method::POST,
                http::Method::PUT,
                http::Method::DELETE,
                http::Method::PATCH,
                http::Method::OPTIONS,
            ])
            .allow_headers([http::header::CONTENT_TYPE, http::header::AUTHORIZATION])
            .allow_credentials(true)
    };

    // Build API router
    let app = Router::new()
        .nest(
            "/api",
            profile_links_api::presentation::http::health::routes(pool.clone()),
        )
        .nest(
            "/api",
            profile_links_api::presentation::http::links::routes(ctx.clone()),
        )
        .merge(SwaggerUi::new("/api/docs").url("/api/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &http::Request<_>| {
                let method = req.method().clone();
                let uri = req.uri().clone();
                let matched = req
                    .extensions()
                    .get::<MatchedPath>()
                    .map(|p| p.as_str().to_string())
                    .unwrap_or_default();
                tracing::info_span!("http", %method, %uri, matched_path = %matched)
            }),
        );

    let api_addr = SocketAddr::from(([0, 0, 0, 0], cfg.api_port));
    info!(%api_addr, "HTTP API listening");
    let listener = tokio::net::TcpListener::bind(api_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
