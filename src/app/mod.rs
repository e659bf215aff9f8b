use crate::clicks::ClickService;
use crate::config::Config;
use crate::db::{self, Pool};
use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use color_eyre::Result;
use eyre::WrapErr;
use log::{debug, error};
use r2d2_sqlite::SqliteConnectionManager;
use rate_limiter::BasicRateLimiter;
use std::sync::RwLock;
mod dtos;
mod error;
mod guards;
mod handlers;
mod helpers;
mod rate_limiter;

// IP addresses allowed to call the admin endpoints. Should
// probably be in the config instead.
pub const ALLOWED_IP_ADDRESSES: [&'static str; 2] =
  ["127.0.0.1", "::1"];

// Declare app state struct:
pub struct AppState {
  pub pool: Pool,
  pub click_service: ClickService,
  pub rate_limiter: RwLock<BasicRateLimiter>
}

impl AppState {

  pub fn check_rate_limit(&self) -> bool {
    let (needs_update, is_locked) = self.rate_limiter_needs_update();
    if needs_update {
      // Get a lock on the rate limiter:
      match self.rate_limiter.write() {
        Ok(mut rl) => return rl.update(),
        Err(e) => {
          error!("Could not get a write handle on the \
          rate limiter, SHOULD NEVER HAPPEN - {}", e);
        }
      }
    }
    is_locked
  }

  // Returns tuple: "needs update" first, then the current
  // is_locked value.
  fn rate_limiter_needs_update(&self) -> (bool, bool) {
    match self.rate_limiter.read() {
      Ok(rl) => (
        !rl.is_locked() || (rl.is_locked() && rl.is_expired()),
        rl.is_locked()
      ),
      Err(e) => {
        // Poisoned rate limiter locks should never happen,
        // log and let the request through.
        error!("Could not get a read handle on the rate limiter - \
          SHOULD NEVER HAPPEN - {}", e);
        (false, false)
      }
    }
  }

}

// Function to start the server.
// Has to be async because there's a .await at the end, the
// #[actix_web::main] decorator sits on main().
pub async fn run() -> Result<()> {
  let config = Config::from_env()
    .expect("Configuration (environment or .env file) is missing");
  debug!("Current config: {:?}", config);
  let manager = SqliteConnectionManager::file(&config.db_path);
  let pool = Pool::new(manager)
    .expect("Database connection failed");
  // Makes a first deployment on an empty file work:
  let conn = pool.get()?;
  db::create_schema(&conn)?;

  // Declare the ClickService, start its thread:
  let click_service = ClickService::open(&pool, config.message_queue_size)?;

  let bind_address = config.bind_address.clone();
  let cors_origin = config.cors_origin.clone();

  let app_state = web::Data::new(
    AppState {
      pool,
      click_service,
      rate_limiter: RwLock::new(
        BasicRateLimiter::new(
          config.rl_max_requests,
          config.rl_max_requests_time,
          config.rl_block_duration
        )
      )
    }
  );

  HttpServer::new(move|| {
    let cors = if cors_origin == "*" {
      Cors::permissive()
    } else {
      Cors::default()
        .allowed_origin(&cors_origin)
        .allowed_methods(vec!["GET", "POST", "PATCH"])
        .allow_any_header()
    };
    App::new()
      .app_data(app_state.clone())
      .app_data(web::PathConfig::default().error_handler(|_, _| {
        actix_web::error::ErrorBadRequest("Invalid path arguments")
      }))
      .app_data(web::QueryConfig::default().error_handler(|_, _| {
        actix_web::error::ErrorBadRequest("Invalid query string arguments")
      }))
      .app_data(web::JsonConfig::default().error_handler(|e, _| {
        // The serde message names the offending field:
        actix_web::error::ErrorBadRequest(format!("Invalid body - {}", e))
      }))
      .wrap(cors)
      .wrap(middleware::Logger::default())
      .configure(base_endpoints_config)
      .default_service(web::route().to(handlers::not_found))
  })
  .bind(bind_address)?
  .run()
  .await
  .context("Start Actix web server")

}

// Route configuration:
fn base_endpoints_config(cfg: &mut web::ServiceConfig) {
  // The admin endpoints respond with a 404 when the client
  // IP address isn't allowed.
  cfg.route("/", web::get().to(handlers::index))
    .route("/distributions", web::get().to(handlers::distributions))
    .route("/distributions/search", web::get().to(handlers::search_distributions))
    .route("/distributions/popular", web::get().to(handlers::popular_distributions))
    .route("/distribution/{idOrName}", web::get().to(handlers::distribution))
    .route("/distribution/{id}/click", web::post().to(handlers::record_click))
    .route("/news", web::get().to(handlers::news))
    .route("/match", web::post().to(handlers::match_distributions))
    .route(
      "/admin/broken-downloads",
      web::get()
        .guard(guards::IPRestrictedGuard::new(&ALLOWED_IP_ADDRESSES))
        .to(handlers::broken_downloads)
    )
    .route(
      "/admin/download/{id}",
      web::patch()
        .guard(guards::IPRestrictedGuard::new(&ALLOWED_IP_ADDRESSES))
        .to(handlers::patch_download)
    );
}
