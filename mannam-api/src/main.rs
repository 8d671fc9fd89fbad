use axum::routing::{delete, get, post, put};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

mod ai;
mod config;
mod events;
mod matching;
mod mission;
mod models;
mod routes;
mod schema;
mod services;

use ai::AiClient;
use config::AppConfig;
use mannam_shared::clients::db::{create_pool, DbPool};
use mannam_shared::clients::rabbitmq::RabbitMQClient;
use mannam_shared::middleware;

pub struct AppState {
    pub db: DbPool,
    pub config: AppConfig,
    pub rabbitmq: RabbitMQClient,
    pub ai: Option<AiClient>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    middleware::init_tracing("mannam-api");

    let config = AppConfig::load()?;
    let port = config.port;

    // The auth and cron extractors read these from the environment.
    std::env::set_var("JWT_SECRET", &config.jwt_secret);
    if !config.cron_secret.is_empty() {
        std::env::set_var("CRON_SECRET", &config.cron_secret);
    }

    let db = create_pool(&config.database_url, config.db_pool_size)?;
    let rabbitmq = RabbitMQClient::connect(&config.rabbitmq_url).await?;
    let ai = AiClient::from_config(&config);
    if ai.is_none() {
        tracing::info!("no AI api key configured, mission planning uses the random strategy only");
    }

    let metrics_handle = middleware::init_metrics();
    let state = Arc::new(AppState {
        db,
        config,
        rabbitmq,
        ai,
    });

    let app = Router::new()
        .route("/health", get(routes::health::health_check))
        .route(
            "/metrics",
            get(move || async move { metrics_handle.render() }),
        )
        .route(
            "/me",
            get(routes::profile::get_profile)
                .post(routes::profile::create_profile)
                .patch(routes::profile::update_profile),
        )
        .route("/questions", get(routes::questions::list_questions))
        .route("/questions/:id/answer", post(routes::questions::answer_question))
        .route(
            "/custom-questions",
            post(routes::custom_questions::create_custom_question),
        )
        .route(
            "/custom-questions/mine",
            get(routes::custom_questions::list_my_questions),
        )
        .route(
            "/custom-questions/to-answer",
            get(routes::custom_questions::list_questions_to_answer),
        )
        .route(
            "/custom-questions/:id/answer",
            post(routes::custom_questions::answer_custom_question),
        )
        .route(
            "/custom-questions/:id",
            delete(routes::custom_questions::delete_custom_question),
        )
        .route("/matches/run", post(routes::matches::run_matching))
        .route("/matches", get(routes::matches::list_matches))
        .route("/matches/:id/respond", put(routes::matches::respond))
        .route("/matches/:id/complete", put(routes::matches::complete))
        .route("/missions/:id", get(routes::missions::get_mission))
        .route(
            "/missions/:id/departure",
            post(routes::missions::confirm_departure),
        )
        .route("/notifications", get(routes::notifications::list_notifications))
        .route(
            "/notifications/unread-count",
            get(routes::notifications::unread_count),
        )
        .route(
            "/notifications/:id/read",
            put(routes::notifications::mark_read),
        )
        .route(
            "/notifications/read-all",
            put(routes::notifications::mark_all_read),
        )
        .route("/safety/reports", post(routes::safety::create_report))
        .route("/cron/expire-matches", post(routes::cron::expire_matches))
        .route("/cron/no-show-sweep", post(routes::cron::no_show_sweep))
        .route(
            "/cron/departure-reminder",
            post(routes::cron::departure_reminder),
        )
        .layer(axum::middleware::from_fn(middleware::metrics_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{port}");
    tracing::info!(addr = %addr, "mannam-api starting");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
