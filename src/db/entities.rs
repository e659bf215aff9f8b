use serde::{Deserialize, Serialize};

// Ultra simple datatypes that map 1:1 on table rows,
// which is something SQLite fits naturally into.
// The JSON-facing shapes live in the DTO module.

// The latest_* fields and the architecture summary are
// computed by the list/detail queries (max release_date
// scan), they don't exist as columns.
#[derive(Debug, Serialize, Deserialize)]
pub struct Distribution {
  pub id: i32,
  pub name: String,
  pub description: String,
  pub website_url: Option<String>,
  pub logo_url: Option<String>,
  pub base_distro: Option<String>,
  // Stored comma-separated in the DB:
  pub desktop_environments: String,
  pub latest_version: Option<String>,
  pub latest_release_date: Option<String>,
  pub latest_is_lts: Option<i32>,
  pub architectures: Option<String>
}

// One row per distribution, this is what the comparison
// table is built from. Every column is nullable because the
// metadata scrapers fill these in piecemeal.
#[derive(Debug, Serialize, Deserialize)]
pub struct TechnicalSpecs {
  pub id: i32,
  pub distro_id: i32,
  pub package_manager: Option<String>,
  pub init_system: Option<String>,
  pub release_model: Option<String>,
  pub kernel_version: Option<String>,
  pub license: Option<String>
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Release {
  pub id: i32,
  pub distro_id: i32,
  pub version_number: String,
  // Kept as "YYYY-MM-DD" text, which sorts correctly:
  pub release_date: String,
  pub is_lts: i32
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Download {
  pub id: i32,
  pub release_id: i32,
  pub architecture: String,
  pub iso_url: Option<String>,
  pub torrent_url: Option<String>,
  pub checksum: Option<String>,
  pub download_size: Option<i64>
}

// Object I use to fit my "update only what's in
// the request body" agenda. The double Options
// distinguish "absent" from "explicit null".
#[derive(Debug)]
pub struct DownloadUpdate {
  pub id: i32,
  pub iso_url: Option<String>,
  pub torrent_url: Option<Option<String>>,
  pub checksum: Option<Option<String>>
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NewsItem {
  pub id: i64,
  pub title: String,
  pub source_url: String,
  pub published_at: i64
}

// Row shape for the 30-day popularity query:
#[derive(Debug, Serialize, Deserialize)]
pub struct ClickCount {
  pub distro_id: i32,
  pub name: String,
  pub clicks: i64
}

// Broken download rows carry enough context to be
// actionable in the admin UI:
#[derive(Debug, Serialize, Deserialize)]
pub struct BrokenDownload {
  pub id: i32,
  pub distro_name: String,
  pub version_number: String,
  pub architecture: String,
  pub iso_url: Option<String>,
  pub torrent_url: Option<String>
}

// What the link auditor walks over. The label is only
// used for reporting.
#[derive(Debug)]
pub struct LinkRecord {
  pub label: String,
  pub url: String
}
