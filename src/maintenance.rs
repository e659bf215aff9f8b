#![allow(dead_code)]
mod config;
mod db;
mod utils;

use color_eyre::Result;
use dotenv::dotenv;
use eyre::eyre;
use getopts::Options;
use log::{error, info, warn};
use r2d2_sqlite::SqliteConnectionManager;
use reqwest::blocking::Client;
use reqwest::header::RANGE;
use std::env;
use std::time::Duration;

use crate::config::Config;
use crate::db::entities::NewsItem;
use crate::db::Pool;
use crate::utils::time_utils;

/**
 * Binary meant for the out-of-band maintenance jobs: the
 * broken-link audit and the RSS news ingestion. Both are
 * best-effort diagnostics/imports run from cron, never part
 * of request serving.
 */

#[derive(Debug)]
enum UrlCheck {
  Reachable(u16),
  Broken(String)
}

// HEAD first. Some mirrors reject HEAD outright (405 and
// friends), so any failure gets one fallback attempt with a
// ranged GET that only asks for the first byte. No retries
// beyond that, no backoff.
fn check_url(client: &Client, url: &str) -> UrlCheck {
  let head_note = match client.head(url).send() {
    Ok(resp) if resp.status().is_success() => {
      return UrlCheck::Reachable(resp.status().as_u16());
    },
    Ok(resp) => format!("HEAD HTTP {}", resp.status().as_u16()),
    Err(e) => format!("HEAD failed ({})", error_kind(&e))
  };
  match client.get(url).header(RANGE, "bytes=0-0").send() {
    // 206 is a success status, this covers servers honoring
    // the range and servers ignoring it alike:
    Ok(resp) if resp.status().is_success() => {
      UrlCheck::Reachable(resp.status().as_u16())
    },
    Ok(resp) => UrlCheck::Broken(
      format!("{}, GET HTTP {}", head_note, resp.status().as_u16())
    ),
    Err(e) => UrlCheck::Broken(
      format!("{}, GET failed ({})", head_note, error_kind(&e))
    )
  }
}

// Timeouts are the interesting case for the report, the
// rest keeps the underlying message.
fn error_kind(e: &reqwest::Error) -> String {
  if e.is_timeout() {
    String::from("timeout")
  } else {
    e.to_string()
  }
}

fn run_link_audit(config: &Config, pool: &Pool) -> Result<()> {
  let client = Client::builder()
    .timeout(Duration::from_secs(config.audit_timeout))
    .user_agent(config.audit_user_agent.as_str())
    .build()?;

  let records = db::all_link_records(pool)?;
  info!("Auditing {} stored URLs...", records.len());
  let mut broken_count: usize = 0;
  for record in &records {
    match check_url(&client, &record.url) {
      UrlCheck::Reachable(status) => {
        info!("OK   [{}] {} - {}", status, record.label, record.url);
      },
      UrlCheck::Broken(reason) => {
        broken_count += 1;
        warn!("FAIL [{}] {} - {}", reason, record.label, record.url);
      }
    }
  }
  info!(
    "Link audit done: {} checked, {} reachable, {} broken",
    records.len(),
    records.len() - broken_count,
    broken_count
  );
  Ok(())
}

// An RSS item without a title or a link is useless for the
// news table and gets skipped. Unparseable pubDates fall
// back to "now" so the item still shows up in the feed.
fn news_item_from_rss(item: &rss::Item) -> Option<NewsItem> {
  let title = item.title()?.trim().to_string();
  let source_url = item.link()?.trim().to_string();
  if title.is_empty() || source_url.is_empty() {
    return None;
  }
  let published_at = item.pub_date()
    .and_then(time_utils::rfc2822_to_timestamp)
    .unwrap_or_else(time_utils::current_timestamp);
  Some(NewsItem {
    id: -1,
    title,
    source_url,
    published_at
  })
}

fn run_news_fetch(config: &Config, pool: &Pool) -> Result<()> {
  let feeds = config.feed_urls();
  if feeds.is_empty() {
    return Err(eyre!("No feed configured, set NEWS_FEEDS"));
  }
  let client = Client::builder()
    .timeout(Duration::from_secs(config.audit_timeout))
    .user_agent(config.audit_user_agent.as_str())
    .build()?;

  let mut inserted: usize = 0;
  let mut skipped: usize = 0;
  for feed in feeds {
    // A feed failing shouldn't kill the whole run:
    let bytes = match client.get(feed).send().and_then(|r| r.bytes()) {
      Ok(bytes) => bytes,
      Err(e) => {
        error!("Could not fetch feed {} - {}", feed, e);
        continue;
      }
    };
    let channel = match rss::Channel::read_from(&bytes[..]) {
      Ok(channel) => channel,
      Err(e) => {
        error!("Could not parse feed {} - {}", feed, e);
        continue;
      }
    };
    info!("Processing feed: {}", channel.title());
    for item in channel.items() {
      if let Some(news_item) = news_item_from_rss(item) {
        // Dedup on source URL happens in the insert:
        if db::insert_news_item(pool, &news_item)? {
          inserted += 1;
        } else {
          skipped += 1;
        }
      }
    }
  }
  info!(
    "News fetch done: {} inserted, {} already known",
    inserted, skipped
  );
  Ok(())
}

// Copy pasted this from getopts doc.
fn print_usage(program: &str, opts: Options) {
  let brief = format!("Usage: {} [options]", program);
  print!("{}", opts.usage(&brief));
}

fn main() -> Result<()> {
  dotenv().ok();
  if env::var("RUST_LOG").is_err() {
    env::set_var("RUST_LOG", "info");
  }
  env_logger::init();

  let args: Vec<String> = env::args().collect();
  let program = args[0].clone();
  let mut opts = Options::new();
  opts.optopt(
    "t",
    "task",
    "Run desired maintenance task (audit-links, fetch-news)",
    "TASK"
  );
  opts.optflag("h", "help", "Program usage");
  let opt_matches = opts.parse(args)?;
  if opt_matches.opt_present("h") {
    print_usage(&program, opts);
    return Ok(());
  }

  let config = Config::from_env()
    .expect("Configuration (environment or .env file) is missing");

  if let Some(task) = opt_matches.opt_str("t") {
    let manager = SqliteConnectionManager::file(&config.db_path);
    let pool = Pool::new(manager)
      .expect("Database connection failed");
    return match task.as_str() {
      "audit-links" => run_link_audit(&config, &pool),
      "fetch-news" => run_news_fetch(&config, &pool),
      _ => Err(eyre!("Provided task doesn't exist for maintenance"))
    };
  }

  print_usage(&program, opts);

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn rss_item(title: Option<&str>, link: Option<&str>, date: Option<&str>) -> rss::Item {
    let mut item = rss::Item::default();
    item.set_title(title.map(String::from));
    item.set_link(link.map(String::from));
    item.set_pub_date(date.map(String::from));
    item
  }

  #[test]
  fn rss_item_converts_with_parsed_date() {
    let item = rss_item(
      Some("Debian 13 released"),
      Some("https://example.org/debian-13"),
      Some("Sun, 07 Mar 2021 20:59:00 +0000")
    );
    let news = news_item_from_rss(&item).unwrap();
    assert_eq!(news.title, "Debian 13 released");
    assert_eq!(news.source_url, "https://example.org/debian-13");
    assert_eq!(news.published_at, 1615150740);
  }

  #[test]
  fn rss_item_without_link_is_skipped() {
    let item = rss_item(Some("No link here"), None, None);
    assert!(news_item_from_rss(&item).is_none());
  }

  #[test]
  fn rss_item_with_blank_title_is_skipped() {
    let item = rss_item(Some("  "), Some("https://example.org/x"), None);
    assert!(news_item_from_rss(&item).is_none());
  }

  #[test]
  fn rss_item_with_bad_date_falls_back_to_now() {
    let before = time_utils::current_timestamp();
    let item = rss_item(
      Some("Title"),
      Some("https://example.org/y"),
      Some("not a date")
    );
    let news = news_item_from_rss(&item).unwrap();
    assert!(news.published_at >= before);
  }
}
