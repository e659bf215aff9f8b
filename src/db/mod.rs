use color_eyre::Result;
use eyre::WrapErr;
use rusqlite::{params, Connection, OptionalExtension, Row, ToSql, NO_PARAMS};
pub mod entities;
mod mappers;
use crate::utils::text_utils;
use entities::*;
use mappers::*;

// Type alias to make function signatures much clearer:
pub type Pool = r2d2::Pool<r2d2_sqlite::SqliteConnectionManager>;

// The distribution queries all share the same SELECT so the
// mapper stays unique. The latest release is resolved with a
// max release_date scan (row id breaks date ties) and the
// architecture summary aggregates every download of the
// distribution, not just the latest release.
const DISTRIBUTION_SELECT: &str = "SELECT d.id, d.name, d.description, \
  d.website_url, d.logo_url, d.base_distro, d.desktop_environments, \
  r.version_number, r.release_date, r.is_lts, \
  (SELECT GROUP_CONCAT(DISTINCT dl.architecture) \
    FROM downloads dl, releases r2 \
    WHERE dl.release_id = r2.id AND r2.distro_id = d.id) \
  FROM distributions d \
  LEFT JOIN releases r ON r.id = ( \
    SELECT r3.id FROM releases r3 WHERE r3.distro_id = d.id \
    ORDER BY r3.release_date DESC, r3.id DESC LIMIT 1 \
  )";

// Stole most of the signature from the rusqlite doc.
fn select_many<T, P, F>(
  pool: &Pool,
  query: &str,
  params: P,
  mapper: F
) -> Result<Vec<T>>
  where
    P: IntoIterator,
    P::Item: ToSql,
    F: FnMut(&Row<'_>) -> Result<T, rusqlite::Error>,
{
  let conn = pool.clone().get()?;
  let mut stmt = conn.prepare(query)?;
  stmt.query_map(params, mapper)
    .and_then(Iterator::collect)
    .context("Generic select_many query")
}

fn select_one<T, P, F>(
  pool: &Pool,
  query: &str,
  params: P,
  mapper: F
) -> Result<Option<T>>
  where
    P: IntoIterator,
    P::Item: ToSql,
    F: FnOnce(&Row<'_>) -> Result<T, rusqlite::Error>,
{
  let conn = pool.clone().get()?;
  let mut stmt = conn.prepare(query)?;
  stmt.query_row(params, mapper)
    .optional()
    .context("Generic select_one query")
}

pub fn all_distributions(pool: &Pool) -> Result<Vec<Distribution>> {
  select_many(
    pool,
    &format!("{} ORDER BY d.name ASC", DISTRIBUTION_SELECT),
    NO_PARAMS,
    map_distribution
  )
}

pub fn distribution_by_id(
  pool: &Pool,
  distro_id: i32
) -> Result<Option<Distribution>> {
  select_one(
    pool,
    &format!("{} WHERE d.id = ?", DISTRIBUTION_SELECT),
    params![distro_id],
    map_distribution
  )
}

pub fn distribution_by_name(
  pool: &Pool,
  name: &str
) -> Result<Option<Distribution>> {
  select_one(
    pool,
    &format!("{} WHERE LOWER(d.name) = LOWER(?)", DISTRIBUTION_SELECT),
    params![name],
    map_distribution
  )
}

pub fn distribution_exists(pool: &Pool, distro_id: i32) -> Result<bool> {
  let conn = pool.clone().get()?;
  let mut stmt = conn.prepare(
    "SELECT count(*) FROM distributions WHERE id = ?"
  )?;
  let count: i64 = stmt.query_row(params![distro_id], |row| row.get(0))?;
  Ok(count > 0)
}

// Substring search on name and description. The term gets
// LIKE-escaped so "%" or "_" in user input stay literal.
pub fn search_distributions(
  pool: &Pool,
  term: &str,
  max: usize
) -> Result<Vec<Distribution>> {
  let pattern = format!("%{}%", text_utils::escape_like(term));
  select_many(
    pool,
    &format!(
      "{} WHERE d.name LIKE ?1 ESCAPE '\\' \
      OR d.description LIKE ?1 ESCAPE '\\' \
      ORDER BY d.name ASC LIMIT ?2",
      DISTRIBUTION_SELECT
    ),
    params![pattern, max as i64],
    map_distribution
  )
}

// At most one specs row per distribution, the comparison
// view copes with distributions that have none.
pub fn technical_specs_for_distribution(
  pool: &Pool,
  distro_id: i32
) -> Result<Option<TechnicalSpecs>> {
  select_one(
    pool,
    "SELECT id, distro_id, package_manager, init_system, \
    release_model, kernel_version, license \
    FROM technical_specs WHERE distro_id = ?",
    params![distro_id],
    map_technical_specs
  )
}

pub fn releases_for_distribution(
  pool: &Pool,
  distro_id: i32
) -> Result<Vec<Release>> {
  select_many(
    pool,
    "SELECT id, distro_id, version_number, release_date, is_lts \
    FROM releases WHERE distro_id = ? \
    ORDER BY release_date DESC, id DESC",
    params![distro_id],
    map_release
  )
}

pub fn downloads_for_release(
  pool: &Pool,
  release_id: i32
) -> Result<Vec<Download>> {
  select_many(
    pool,
    "SELECT id, release_id, architecture, iso_url, torrent_url, \
    checksum, download_size \
    FROM downloads WHERE release_id = ? \
    ORDER BY architecture ASC",
    params![release_id],
    map_download
  )
}

pub fn news_count(pool: &Pool) -> Result<i64> {
  let conn = pool.clone().get()?;
  let mut stmt = conn.prepare("SELECT count(*) FROM news")?;
  let count: i64 = stmt.query_row(NO_PARAMS, |row| row.get(0))?;
  Ok(count)
}

pub fn news_from_to(
  pool: &Pool,
  start: usize,
  max: usize
) -> Result<Vec<NewsItem>> {
  select_many(
    pool,
    "SELECT id, title, source_url, published_at FROM news \
    ORDER BY published_at DESC, id DESC LIMIT ? OFFSET ?",
    params![max as i64, start as i64],
    map_news_item
  )
}

// News items are deduplicated on their source URL, which
// carries a UNIQUE constraint. Returns false when the item
// was already known.
pub fn insert_news_item(pool: &Pool, item: &NewsItem) -> Result<bool> {
  let conn = pool.clone().get()?;
  let inserted = conn.execute(
    "INSERT OR IGNORE INTO news (title, source_url, published_at) \
    VALUES (?, ?, ?)",
    params![item.title, item.source_url, item.published_at]
  )?;
  Ok(inserted > 0)
}

// Takes a plain connection because the click thread holds on
// to one for its whole lifetime.
pub fn insert_download_click(
  conn: &Connection,
  distro_id: i32,
  clicked_at: i64
) -> Result<()> {
  conn.execute(
    "INSERT INTO download_clicks (distro_id, clicked_at) VALUES (?, ?)",
    params![distro_id, clicked_at]
  )?;
  Ok(())
}

pub fn top_distributions_by_clicks(
  pool: &Pool,
  since: i64,
  max: usize
) -> Result<Vec<ClickCount>> {
  select_many(
    pool,
    "SELECT c.distro_id, d.name, count(*) AS clicks \
    FROM download_clicks c, distributions d \
    WHERE d.id = c.distro_id AND c.clicked_at >= ? \
    GROUP BY c.distro_id, d.name \
    ORDER BY clicks DESC, d.name ASC LIMIT ?",
    params![since, max as i64],
    map_click_count
  )
}

// The sentinel filter from the admin tooling: URLs that are
// missing, empty, or still pointing at placeholder services.
pub fn broken_downloads(pool: &Pool) -> Result<Vec<BrokenDownload>> {
  select_many(
    pool,
    "SELECT dl.id, d.name, r.version_number, dl.architecture, \
    dl.iso_url, dl.torrent_url \
    FROM downloads dl, releases r, distributions d \
    WHERE dl.release_id = r.id AND r.distro_id = d.id \
    AND (dl.iso_url IS NULL OR dl.iso_url = '' \
      OR dl.iso_url LIKE '%placeholder%' \
      OR dl.torrent_url LIKE '%placeholder%') \
    ORDER BY d.name ASC, r.version_number ASC",
    NO_PARAMS,
    map_broken_download
  )
}

// Partial update, only the fields present in the struct end
// up in the SET clause. A double-Option field set to
// Some(None) writes NULL.
pub fn update_download(
  pool: &Pool,
  update: &DownloadUpdate
) -> Result<usize> {
  let mut sets: Vec<&str> = Vec::new();
  let mut values: Vec<&dyn ToSql> = Vec::new();
  if let Some(iso_url) = &update.iso_url {
    sets.push("iso_url = ?");
    values.push(iso_url);
  }
  if let Some(torrent_url) = &update.torrent_url {
    sets.push("torrent_url = ?");
    values.push(torrent_url);
  }
  if let Some(checksum) = &update.checksum {
    sets.push("checksum = ?");
    values.push(checksum);
  }
  if sets.is_empty() {
    return Ok(0);
  }
  let query = format!(
    "UPDATE downloads SET {} WHERE id = ?",
    sets.join(", ")
  );
  values.push(&update.id);
  let conn = pool.clone().get()?;
  conn.execute(&query, values)
    .context("Update download row")
}

// Everything the link auditor has to walk: ISO and torrent
// URLs plus the distribution logos. Labels are only used in
// the report output.
pub fn all_link_records(pool: &Pool) -> Result<Vec<LinkRecord>> {
  select_many(
    pool,
    "SELECT d.name || ' ' || r.version_number \
      || ' (' || dl.architecture || ' iso)', dl.iso_url \
    FROM downloads dl, releases r, distributions d \
    WHERE dl.release_id = r.id AND r.distro_id = d.id \
    AND dl.iso_url IS NOT NULL AND dl.iso_url != '' \
    UNION ALL \
    SELECT d.name || ' ' || r.version_number \
      || ' (' || dl.architecture || ' torrent)', dl.torrent_url \
    FROM downloads dl, releases r, distributions d \
    WHERE dl.release_id = r.id AND r.distro_id = d.id \
    AND dl.torrent_url IS NOT NULL AND dl.torrent_url != '' \
    UNION ALL \
    SELECT d.name || ' (logo)', d.logo_url FROM distributions d \
    WHERE d.logo_url IS NOT NULL AND d.logo_url != ''",
    NO_PARAMS,
    |row| Ok(LinkRecord {
      label: row.get(0)?,
      url: row.get(1)?
    })
  )
}

// Ran at startup so a fresh deployment works with an empty
// database file. All constraints live here, the application
// doesn't enforce anything the schema can't.
pub fn create_schema(conn: &Connection) -> Result<()> {
  conn.execute_batch(
    "CREATE TABLE IF NOT EXISTS distributions ( \
      id INTEGER PRIMARY KEY, \
      name TEXT NOT NULL, \
      description TEXT NOT NULL DEFAULT '', \
      website_url TEXT, \
      logo_url TEXT, \
      base_distro TEXT, \
      desktop_environments TEXT NOT NULL DEFAULT '' \
    ); \
    CREATE TABLE IF NOT EXISTS technical_specs ( \
      id INTEGER PRIMARY KEY, \
      distro_id INTEGER NOT NULL REFERENCES distributions(id), \
      package_manager TEXT, \
      init_system TEXT, \
      release_model TEXT, \
      kernel_version TEXT, \
      license TEXT \
    ); \
    CREATE TABLE IF NOT EXISTS releases ( \
      id INTEGER PRIMARY KEY, \
      distro_id INTEGER NOT NULL REFERENCES distributions(id), \
      version_number TEXT NOT NULL, \
      release_date TEXT NOT NULL, \
      is_lts INTEGER NOT NULL DEFAULT 0 \
    ); \
    CREATE TABLE IF NOT EXISTS downloads ( \
      id INTEGER PRIMARY KEY, \
      release_id INTEGER NOT NULL REFERENCES releases(id), \
      architecture TEXT NOT NULL, \
      iso_url TEXT, \
      torrent_url TEXT, \
      checksum TEXT, \
      download_size INTEGER \
    ); \
    CREATE TABLE IF NOT EXISTS news ( \
      id INTEGER PRIMARY KEY, \
      title TEXT NOT NULL, \
      source_url TEXT NOT NULL UNIQUE, \
      published_at INTEGER NOT NULL \
    ); \
    CREATE TABLE IF NOT EXISTS download_clicks ( \
      id INTEGER PRIMARY KEY, \
      distro_id INTEGER NOT NULL REFERENCES distributions(id), \
      clicked_at INTEGER NOT NULL \
    );"
  ).context("Create database schema")
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::utils::time_utils;
  use r2d2_sqlite::SqliteConnectionManager;

  // In-memory SQLite gives one separate database per
  // connection, so the test pool is capped at a single one.
  fn test_pool() -> Pool {
    let manager = SqliteConnectionManager::memory();
    let pool = r2d2::Pool::builder()
      .max_size(1)
      .build(manager)
      .unwrap();
    create_schema(&pool.get().unwrap()).unwrap();
    pool
  }

  fn insert_distro(pool: &Pool, id: i32, name: &str, description: &str) {
    pool.get().unwrap().execute(
      "INSERT INTO distributions \
      (id, name, description, website_url, logo_url, desktop_environments) \
      VALUES (?, ?, ?, 'https://example.org', 'https://example.org/logo.png', \
      'GNOME,KDE Plasma')",
      params![id, name, description]
    ).unwrap();
  }

  fn insert_release(
    pool: &Pool,
    id: i32,
    distro_id: i32,
    version: &str,
    date: &str,
    lts: i32
  ) {
    pool.get().unwrap().execute(
      "INSERT INTO releases (id, distro_id, version_number, release_date, is_lts) \
      VALUES (?, ?, ?, ?, ?)",
      params![id, distro_id, version, date, lts]
    ).unwrap();
  }

  fn insert_download(pool: &Pool, id: i32, release_id: i32, arch: &str, iso: &str) {
    pool.get().unwrap().execute(
      "INSERT INTO downloads (id, release_id, architecture, iso_url) \
      VALUES (?, ?, ?, ?)",
      params![id, release_id, arch, iso]
    ).unwrap();
  }

  #[test]
  fn latest_release_is_picked_by_max_date() {
    let pool = test_pool();
    insert_distro(&pool, 1, "Debian", "The universal operating system");
    insert_release(&pool, 1, 1, "11.0", "2021-08-14", 1);
    insert_release(&pool, 2, 1, "12.0", "2023-06-10", 1);
    insert_download(&pool, 1, 1, "amd64", "https://example.org/11.iso");
    insert_download(&pool, 2, 2, "amd64", "https://example.org/12.iso");
    insert_download(&pool, 3, 2, "arm64", "https://example.org/12-arm.iso");

    let distro = distribution_by_id(&pool, 1).unwrap().unwrap();
    assert_eq!(distro.latest_version, Some("12.0".to_string()));
    assert_eq!(distro.latest_release_date, Some("2023-06-10".to_string()));
    assert_eq!(distro.latest_is_lts, Some(1));
    // The architecture summary spans all releases:
    let archs = distro.architectures.unwrap();
    assert!(archs.contains("amd64"));
    assert!(archs.contains("arm64"));
  }

  #[test]
  fn distribution_without_release_still_lists() {
    let pool = test_pool();
    insert_distro(&pool, 1, "Hannah Montana Linux", "It exists");
    let all = all_distributions(&pool).unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].latest_version, None);
  }

  #[test]
  fn technical_specs_resolve_by_distribution() {
    let pool = test_pool();
    insert_distro(&pool, 1, "Gentoo", "Compile everything yourself");
    insert_distro(&pool, 2, "Tiny Core", "Absurdly small");
    pool.get().unwrap().execute(
      "INSERT INTO technical_specs \
      (id, distro_id, package_manager, init_system, release_model, \
      kernel_version, license) \
      VALUES (1, 1, 'Portage', 'OpenRC', 'Rolling', '6.6', 'GPL-2.0')",
      NO_PARAMS
    ).unwrap();

    let specs = technical_specs_for_distribution(&pool, 1)
      .unwrap()
      .unwrap();
    assert_eq!(specs.package_manager, Some("Portage".to_string()));
    assert_eq!(specs.init_system, Some("OpenRC".to_string()));
    assert_eq!(specs.release_model, Some("Rolling".to_string()));
    // No specs row for the second distribution:
    assert!(technical_specs_for_distribution(&pool, 2).unwrap().is_none());
  }

  #[test]
  fn distribution_by_name_is_case_insensitive() {
    let pool = test_pool();
    insert_distro(&pool, 1, "Fedora", "Leading edge");
    let found = distribution_by_name(&pool, "fedora").unwrap();
    assert!(found.is_some());
    assert_eq!(found.unwrap().id, 1);
  }

  #[test]
  fn search_matches_description_substring() {
    let pool = test_pool();
    insert_distro(&pool, 1, "Arch Linux", "A rolling release distribution");
    insert_distro(&pool, 2, "Linux Mint", "Friendly desktop distribution");
    let found = search_distributions(&pool, "rolling", 10).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "Arch Linux");
  }

  #[test]
  fn search_escapes_like_wildcards() {
    let pool = test_pool();
    insert_distro(&pool, 1, "Arch Linux", "A rolling release distribution");
    // "%" would match everything if it wasn't escaped:
    let found = search_distributions(&pool, "%", 10).unwrap();
    assert!(found.is_empty());
  }

  #[test]
  fn news_insert_dedups_on_source_url() {
    let pool = test_pool();
    let item = NewsItem {
      id: -1,
      title: "Debian 13 released".to_string(),
      source_url: "https://example.org/debian-13".to_string(),
      published_at: 1700000000
    };
    assert!(insert_news_item(&pool, &item).unwrap());
    assert!(!insert_news_item(&pool, &item).unwrap());
    assert_eq!(news_count(&pool).unwrap(), 1);
  }

  #[test]
  fn popularity_count_honors_the_time_window() {
    let pool = test_pool();
    insert_distro(&pool, 1, "Ubuntu", "Linux for human beings");
    insert_distro(&pool, 2, "Debian", "The universal operating system");
    let now = time_utils::current_timestamp();
    let conn = pool.get().unwrap();
    // Two recent clicks for Ubuntu, one stale one for Debian:
    insert_download_click(&conn, 1, now - 10).unwrap();
    insert_download_click(&conn, 1, now - 20).unwrap();
    insert_download_click(&conn, 2, now - 40 * 86_400).unwrap();
    drop(conn);

    let top = top_distributions_by_clicks(&pool, now - 30 * 86_400, 5).unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].name, "Ubuntu");
    assert_eq!(top[0].clicks, 2);
  }

  #[test]
  fn broken_downloads_catches_sentinels_and_empties() {
    let pool = test_pool();
    insert_distro(&pool, 1, "Slackware", "The oldest one");
    insert_release(&pool, 1, 1, "15.0", "2022-02-02", 0);
    insert_download(&pool, 1, 1, "amd64", "https://placehold.co/placeholder.iso");
    insert_download(&pool, 2, 1, "arm64", "");
    insert_download(&pool, 3, 1, "i686", "https://example.org/good.iso");

    let broken = broken_downloads(&pool).unwrap();
    let mut ids: Vec<i32> = broken.iter().map(|b| b.id).collect();
    ids.sort();
    assert_eq!(ids, vec![1, 2]);
  }

  #[test]
  fn update_download_writes_only_present_fields() {
    let pool = test_pool();
    insert_distro(&pool, 1, "Slackware", "The oldest one");
    insert_release(&pool, 1, 1, "15.0", "2022-02-02", 0);
    insert_download(&pool, 1, 1, "amd64", "https://example.org/old.iso");
    pool.get().unwrap().execute(
      "UPDATE downloads SET torrent_url = 'https://example.org/old.torrent' \
      WHERE id = 1",
      NO_PARAMS
    ).unwrap();

    let update = DownloadUpdate {
      id: 1,
      iso_url: Some("https://example.org/new.iso".to_string()),
      torrent_url: None,
      checksum: None
    };
    assert_eq!(update_download(&pool, &update).unwrap(), 1);
    let download = &downloads_for_release(&pool, 1).unwrap()[0];
    assert_eq!(download.iso_url, Some("https://example.org/new.iso".to_string()));
    // Untouched field stays:
    assert_eq!(
      download.torrent_url,
      Some("https://example.org/old.torrent".to_string())
    );
  }

  #[test]
  fn update_download_explicit_null_clears_the_field() {
    let pool = test_pool();
    insert_distro(&pool, 1, "Slackware", "The oldest one");
    insert_release(&pool, 1, 1, "15.0", "2022-02-02", 0);
    insert_download(&pool, 1, 1, "amd64", "https://example.org/a.iso");
    pool.get().unwrap().execute(
      "UPDATE downloads SET torrent_url = 'https://example.org/a.torrent' \
      WHERE id = 1",
      NO_PARAMS
    ).unwrap();

    let update = DownloadUpdate {
      id: 1,
      iso_url: None,
      torrent_url: Some(None),
      checksum: None
    };
    assert_eq!(update_download(&pool, &update).unwrap(), 1);
    let download = &downloads_for_release(&pool, 1).unwrap()[0];
    assert_eq!(download.torrent_url, None);
  }

  #[test]
  fn link_records_cover_isos_torrents_and_logos() {
    let pool = test_pool();
    insert_distro(&pool, 1, "Void Linux", "Independent rolling release");
    insert_release(&pool, 1, 1, "2024.06", "2024-06-01", 0);
    insert_download(&pool, 1, 1, "x86_64", "https://example.org/void.iso");

    let records = all_link_records(&pool).unwrap();
    // One ISO URL and one logo URL (fixture always sets a logo):
    assert_eq!(records.len(), 2);
    assert!(records.iter().any(|r| r.label.contains("iso")));
    assert!(records.iter().any(|r| r.label.contains("logo")));
  }
}
