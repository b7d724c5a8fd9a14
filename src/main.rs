use actix_cors::Cors;
use actix_web::{web, App, HttpServer, HttpResponse, middleware, error, http::StatusCode};
use donor_match::config::Settings;
use donor_match::core::MatchingService;
use donor_match::models::ErrorResponse;
use donor_match::routes::{self, matches::AppState};
use donor_match::services::{
    DonorStore, InMemoryStore, LogDispatcher, MailRelayClient, NotificationDispatcher,
    PostgresClient,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, error, warn};
use tracing_subscriber::EnvFilter;

/// JSON error for malformed bodies and query strings
#[derive(Debug)]
struct JsonError(ErrorResponse);

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.0.error, self.0.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.0.status_code).unwrap_or(StatusCode::BAD_REQUEST)
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(&self.0)
    }
}

/// Handle JSON payload errors
fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    info!("JSON payload error on {}: {}", req.path(), err);
    JsonError(ErrorResponse {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    })
    .into()
}

/// Handle path parameter errors (non-numeric ids)
fn handle_path_error(err: error::PathError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    JsonError(ErrorResponse {
        error: "invalid_path".to_string(),
        message: format!("Invalid path parameter: {}", err),
        status_code: 400,
    })
    .into()
}

fn init_logging(level: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}

async fn build_store(settings: &Settings) -> std::io::Result<Arc<dyn DonorStore>> {
    let db = &settings.database;

    match &db.url {
        Some(url) => {
            let client = PostgresClient::from_settings(
                url,
                db.max_connections,
                db.min_connections,
                db.acquire_timeout_secs,
                db.idle_timeout_secs,
            )
            .await
            .map_err(|e| {
                error!("Failed to connect to PostgreSQL: {}", e);
                std::io::Error::new(std::io::ErrorKind::Other, e)
            })?;

            info!(
                "PostgreSQL store initialized (max: {} connections)",
                db.max_connections.unwrap_or(10)
            );
            Ok(Arc::new(client))
        }
        None => {
            warn!("No database.url configured, using the in-memory store");
            Ok(Arc::new(InMemoryStore::new()))
        }
    }
}

fn build_notifier(settings: &Settings) -> std::io::Result<Arc<dyn NotificationDispatcher>> {
    let cfg = &settings.notifications;

    match (cfg.enabled, &cfg.relay_endpoint) {
        (true, Some(endpoint)) => {
            let client = MailRelayClient::new(
                endpoint.clone(),
                cfg.api_key.clone().unwrap_or_default(),
                cfg.from_address.clone(),
                Duration::from_secs(cfg.timeout_secs),
            )
            .map_err(|e| {
                error!("Failed to build mail relay client: {}", e);
                std::io::Error::new(std::io::ErrorKind::Other, e)
            })?;

            info!("Mail relay notifications enabled ({})", endpoint);
            Ok(Arc::new(client))
        }
        (true, None) => {
            warn!("Notifications enabled without relay_endpoint, logging messages only");
            Ok(Arc::new(LogDispatcher))
        }
        (false, _) => {
            info!("Notifications disabled, logging messages only");
            Ok(Arc::new(LogDispatcher))
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;

    init_logging(&settings.logging.level, &settings.logging.format);

    info!("Starting Donor Match service...");

    let store = build_store(&settings).await?;
    let notifier = build_notifier(&settings)?;

    let rules = settings.matching.rules();
    info!("Matching rules: {:?}", rules);

    let app_state = AppState {
        service: Arc::new(MatchingService::new(store, notifier, rules)),
    };

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::PathConfig::default().error_handler(handle_path_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
