// Adding the context method to errors:
use color_eyre::Result;
use eyre::WrapErr;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
  pub db_path: String,
  pub bind_address: String,
  pub message_queue_size: usize,
  // Rate limiter settings:
  pub rl_max_requests: u32,
  pub rl_max_requests_time: u32,
  pub rl_block_duration: u32,
  // "*" means a fully permissive CORS setup:
  pub cors_origin: String,
  // Comma-separated RSS feed URLs for the news fetcher:
  pub news_feeds: String,
  // Link auditor settings:
  pub audit_timeout: u64,
  pub audit_user_agent: String
}

impl Config {

  pub fn from_env() -> Result<Config> {
    let mut c = config::Config::new();
    // RUST_LOG is already set in main.rs if it
    // was absent.
    // Let's set other default values. You have
    // to use lowercase when compared to what's
    // in the .env file.
    c.set_default("bind_address", "127.0.0.1:8080")?;
    // Used to set the queue size for sync_sender
    // (the click thread uses it):
    c.set_default("message_queue_size", 30)?;
    // Settings for the basic rate limiter:
    c.set_default("rl_max_requests", 120)?;
    c.set_default("rl_max_requests_time", 60)?;
    c.set_default("rl_block_duration", 60)?;
    c.set_default("cors_origin", "*")?;
    c.set_default("news_feeds", "")?;
    // The auditor does HEAD with an 8 second timeout,
    // and some mirrors reject anything that doesn't
    // look like a browser.
    c.set_default("audit_timeout", 8)?;
    c.set_default(
      "audit_user_agent",
      "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36"
    )?;

    c.merge(config::Environment::default())?;
    // The error has to be given a context for
    // color_eyre to work here:
    c.try_into()
      .context("Loading configuration from env")
  }

  pub fn feed_urls(&self) -> Vec<&str> {
    self.news_feeds
      .split(',')
      .map(|f| f.trim())
      .filter(|f| !f.is_empty())
      .collect()
  }

}
