use crate::db::entities::*;
use crate::matcher::{self, DistroMatch};
use crate::utils::{serde_utils, time_utils};
use derive_more::Display;
use serde::{Deserialize, Serialize};

// Entities get converted to DTOs with the From trait, the
// JSON shapes are all camelCase.

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestReleaseDto {
  pub version: String,
  pub release_date: String,
  pub lts: bool
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionDto {
  pub id: i32,
  pub name: String,
  pub description: String,
  #[serde(rename = "websiteURL")]
  pub website_url: Option<String>,
  #[serde(rename = "logoURL")]
  pub logo_url: Option<String>,
  pub base_distro: Option<String>,
  pub desktop_environments: Vec<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub latest_release: Option<LatestReleaseDto>,
  pub architectures: Vec<String>
}

fn split_csv(value: &str) -> Vec<String> {
  value.split(',')
    .map(|v| v.trim())
    .filter(|v| !v.is_empty())
    .map(String::from)
    .collect()
}

impl From<Distribution> for DistributionDto {
  fn from(distro: Distribution) -> Self {
    let latest_release = match (distro.latest_version, distro.latest_release_date) {
      (Some(version), Some(release_date)) => Some(LatestReleaseDto {
        version,
        release_date,
        lts: distro.latest_is_lts.unwrap_or(0) == 1
      }),
      _ => None
    };
    Self {
      id: distro.id,
      name: distro.name,
      description: distro.description,
      website_url: serde_utils::empty_string_to_none(distro.website_url),
      logo_url: serde_utils::empty_string_to_none(distro.logo_url),
      base_distro: serde_utils::empty_string_to_none(distro.base_distro),
      desktop_environments: split_csv(&distro.desktop_environments),
      latest_release,
      architectures: distro.architectures
        .map(|a| split_csv(&a))
        .unwrap_or(Vec::new())
    }
  }
}

// The detail endpoint nests the full release/download tree
// plus the comparison-table block:
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionDetailDto {
  #[serde(flatten)]
  pub distribution: DistributionDto,
  pub technical_specs: Option<TechnicalSpecsDto>,
  pub releases: Vec<ReleaseDto>
}

// Stays null on the detail payload when the distribution has
// no specs row yet.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechnicalSpecsDto {
  pub package_manager: Option<String>,
  pub init_system: Option<String>,
  pub release_model: Option<String>,
  pub kernel_version: Option<String>,
  pub license: Option<String>
}

impl From<TechnicalSpecs> for TechnicalSpecsDto {
  fn from(specs: TechnicalSpecs) -> Self {
    Self {
      package_manager: serde_utils::empty_string_to_none(specs.package_manager),
      init_system: serde_utils::empty_string_to_none(specs.init_system),
      release_model: serde_utils::empty_string_to_none(specs.release_model),
      kernel_version: serde_utils::empty_string_to_none(specs.kernel_version),
      license: serde_utils::empty_string_to_none(specs.license)
    }
  }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseDto {
  pub id: i32,
  pub version: String,
  pub release_date: String,
  pub lts: bool,
  pub downloads: Vec<DownloadDto>
}

impl ReleaseDto {
  pub fn new(release: Release, downloads: Vec<Download>) -> Self {
    Self {
      id: release.id,
      version: release.version_number,
      release_date: release.release_date,
      lts: release.is_lts == 1,
      downloads: downloads.into_iter().map(Into::into).collect()
    }
  }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadDto {
  pub id: i32,
  pub architecture: String,
  #[serde(rename = "isoURL")]
  pub iso_url: Option<String>,
  #[serde(rename = "torrentURL")]
  pub torrent_url: Option<String>,
  pub checksum: Option<String>,
  pub download_size: Option<i64>
}

impl From<Download> for DownloadDto {
  fn from(download: Download) -> Self {
    Self {
      id: download.id,
      architecture: download.architecture,
      iso_url: serde_utils::empty_string_to_none(download.iso_url),
      torrent_url: serde_utils::empty_string_to_none(download.torrent_url),
      checksum: download.checksum,
      download_size: download.download_size
    }
  }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItemDto {
  pub id: i64,
  pub title: String,
  #[serde(rename = "sourceURL")]
  pub source_url: String,
  pub published_at: String
}

impl From<NewsItem> for NewsItemDto {
  fn from(item: NewsItem) -> Self {
    Self {
      id: item.id,
      title: item.title,
      source_url: item.source_url,
      published_at: time_utils::timestamp_to_date_string(item.published_at)
    }
  }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopularDistributionDto {
  pub id: i32,
  pub name: String,
  pub clicks: i64
}

impl From<ClickCount> for PopularDistributionDto {
  fn from(count: ClickCount) -> Self {
    Self {
      id: count.distro_id,
      name: count.name,
      clicks: count.clicks
    }
  }
}

// Request body of the matcher endpoint. The enums come from
// the matcher module so unknown values already fail at
// deserialization with a 400.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchBody {
  pub experience: matcher::Experience,
  pub use_cases: Vec<matcher::UseCase>,
  pub hardware: matcher::Hardware,
  pub max: Option<usize>
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResultDto {
  pub name: String,
  pub score: u32,
  pub matched_tags: Vec<String>
}

impl From<DistroMatch> for MatchResultDto {
  fn from(m: DistroMatch) -> Self {
    Self {
      name: m.name.to_string(),
      score: m.score,
      matched_tags: m.matched_tags
    }
  }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrokenDownloadDto {
  pub id: i32,
  pub distribution: String,
  pub version: String,
  pub architecture: String,
  #[serde(rename = "isoURL")]
  pub iso_url: Option<String>,
  #[serde(rename = "torrentURL")]
  pub torrent_url: Option<String>
}

impl From<BrokenDownload> for BrokenDownloadDto {
  fn from(broken: BrokenDownload) -> Self {
    Self {
      id: broken.id,
      distribution: broken.distro_name,
      version: broken.version_number,
      architecture: broken.architecture,
      iso_url: broken.iso_url,
      torrent_url: broken.torrent_url
    }
  }
}

// Partial update body for the admin link fixer. The double
// Options on the nullable columns tell "absent" apart from
// "explicit null".
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadPatchDto {
  #[serde(rename = "isoURL")]
  pub iso_url: Option<String>,
  #[serde(
    rename = "torrentURL",
    default,
    deserialize_with = "serde_utils::deserialize_null_value"
  )]
  pub torrent_url: Option<Option<String>>,
  #[serde(
    default,
    deserialize_with = "serde_utils::deserialize_null_value"
  )]
  pub checksum: Option<Option<String>>
}

impl DownloadPatchDto {
  pub fn into_update(self, id: i32) -> DownloadUpdate {
    DownloadUpdate {
      id,
      iso_url: self.iso_url,
      torrent_url: self.torrent_url,
      checksum: self.checksum
    }
  }
}

// I use this in some responses. Should probably use it
// for all of them but uh... Yeah.
#[derive(Debug, Deserialize, Serialize)]
pub struct JsonStatus {
  pub status: String,
  pub message: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub id: Option<i32>
}

#[derive(Debug, Display)]
pub enum JsonStatusType {
  #[display(fmt = "success")]
  Success,
  #[display(fmt = "error")]
  Error
}

impl JsonStatus {
  pub fn new_with_id(
    status: JsonStatusType,
    message: &str,
    id: i32
  ) -> Self {
    Self {
      status: status.to_string(),
      message: String::from(message),
      id: Some(id)
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn base_distro_entity() -> Distribution {
    Distribution {
      id: 7,
      name: "Debian".to_string(),
      description: "The universal operating system".to_string(),
      website_url: Some("https://www.debian.org".to_string()),
      logo_url: Some("".to_string()),
      base_distro: None,
      desktop_environments: "GNOME, KDE Plasma,Xfce".to_string(),
      latest_version: Some("12.5".to_string()),
      latest_release_date: Some("2024-02-10".to_string()),
      latest_is_lts: Some(1),
      architectures: Some("amd64,arm64".to_string())
    }
  }

  #[test]
  fn distribution_to_dto_splits_csv_fields() {
    let dto = DistributionDto::from(base_distro_entity());
    assert_eq!(
      dto.desktop_environments,
      vec!["GNOME", "KDE Plasma", "Xfce"]
    );
    assert_eq!(dto.architectures, vec!["amd64", "arm64"]);
    // Empty logo URL becomes null in the JSON:
    assert_eq!(dto.logo_url, None);
  }

  #[test]
  fn distribution_without_release_has_no_latest_block() {
    let mut entity = base_distro_entity();
    entity.latest_version = None;
    entity.latest_release_date = None;
    entity.latest_is_lts = None;
    let dto = DistributionDto::from(entity);
    assert!(dto.latest_release.is_none());
  }

  #[test]
  fn latest_release_carries_the_lts_flag() {
    let dto = DistributionDto::from(base_distro_entity());
    let latest = dto.latest_release.unwrap();
    assert_eq!(latest.version, "12.5");
    assert!(latest.lts);
  }

  #[test]
  fn technical_specs_dto_blanks_become_null() {
    let dto = TechnicalSpecsDto::from(TechnicalSpecs {
      id: 1,
      distro_id: 7,
      package_manager: Some("apt".to_string()),
      init_system: Some(" ".to_string()),
      release_model: Some("Fixed".to_string()),
      kernel_version: None,
      license: Some("DFSG".to_string())
    });
    assert_eq!(dto.package_manager, Some("apt".to_string()));
    assert_eq!(dto.release_model, Some("Fixed".to_string()));
    // Blank-only column reads as null in the JSON:
    assert_eq!(dto.init_system, None);
    assert_eq!(dto.kernel_version, None);
  }

  #[test]
  fn patch_dto_distinguishes_null_from_absent() {
    let patch: DownloadPatchDto = serde_json::from_str(
      r#"{ "isoURL": "https://example.org/a.iso", "torrentURL": null }"#
    ).unwrap();
    let update = patch.into_update(3);
    assert_eq!(update.id, 3);
    assert_eq!(update.iso_url, Some("https://example.org/a.iso".to_string()));
    // Explicit null:
    assert_eq!(update.torrent_url, Some(None));
    // Absent field:
    assert_eq!(update.checksum, None);
  }

  #[test]
  fn match_body_deserializes_kebab_case_hardware() {
    let body: MatchBody = serde_json::from_str(
      r#"{ "experience": "beginner", "useCases": ["desktop"], "hardware": "low-end" }"#
    ).unwrap();
    assert_eq!(body.experience, matcher::Experience::Beginner);
    assert_eq!(body.hardware, matcher::Hardware::LowEnd);
    assert_eq!(body.max, None);
  }

  #[test]
  fn unknown_use_case_fails_deserialization() {
    let result = serde_json::from_str::<MatchBody>(
      r#"{ "experience": "beginner", "useCases": ["mining"], "hardware": "modern" }"#
    );
    assert!(result.is_err());
  }
}
