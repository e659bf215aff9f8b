mod app;
mod clicks;
mod config;
mod db;
mod matcher;
mod utils;

use color_eyre::Result;
use dotenv::dotenv;
use std::env;

#[actix_web::main]
async fn main() -> Result<()> {
  dotenv().ok();
  // Default to "info" when RUST_LOG isn't set, the actix
  // request logger is silent otherwise:
  if env::var("RUST_LOG").is_err() {
    env::set_var("RUST_LOG", "info");
  }
  env_logger::init();

  app::run().await
}
