/*
 * The quiz-style recommendation scorer. Pure functions over
 * a compiled-in catalog of distro tags, no I/O anywhere.
 *
 * Scoring weights: experience match is worth 3, every
 * matching use case 2, a hardware match 1. Records scoring
 * zero are dropped, the rest sort by score, then by latest
 * release date, then by name.
 */

use serde::{Deserialize, Serialize};

mod catalog;

pub const EXPERIENCE_WEIGHT: u32 = 3;
pub const USE_CASE_WEIGHT: u32 = 2;
pub const HARDWARE_WEIGHT: u32 = 1;
// How many results the endpoint hands out unless asked
// otherwise:
pub const DEFAULT_RESULTS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Experience {
  Beginner,
  Intermediate,
  Advanced
}

impl Experience {
  pub fn label(&self) -> &'static str {
    match self {
      Experience::Beginner => "beginner friendly",
      Experience::Intermediate => "intermediate users",
      Experience::Advanced => "advanced users"
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UseCase {
  Desktop,
  Gaming,
  Development,
  Server,
  Privacy,
  Multimedia,
  Education
}

impl UseCase {
  pub fn label(&self) -> &'static str {
    match self {
      UseCase::Desktop => "desktop",
      UseCase::Gaming => "gaming",
      UseCase::Development => "development",
      UseCase::Server => "server",
      UseCase::Privacy => "privacy",
      UseCase::Multimedia => "multimedia",
      UseCase::Education => "education"
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Hardware {
  LowEnd,
  Modern,
  HighEnd
}

impl Hardware {
  pub fn label(&self) -> &'static str {
    match self {
      Hardware::LowEnd => "low-end hardware",
      Hardware::Modern => "modern hardware",
      Hardware::HighEnd => "high-end hardware"
    }
  }
}

// One static catalog record. The release date only exists
// to break score ties, newest first.
#[derive(Debug)]
pub struct DistroTags {
  pub name: &'static str,
  // "YYYY-MM-DD", so plain string comparison orders it:
  pub last_release: &'static str,
  pub experience: &'static [Experience],
  pub use_cases: &'static [UseCase],
  pub hardware: &'static [Hardware]
}

#[derive(Debug, Serialize)]
pub struct DistroMatch {
  pub name: &'static str,
  pub score: u32,
  pub matched_tags: Vec<String>,
  pub last_release: &'static str
}

pub fn catalog() -> &'static [DistroTags] {
  catalog::CATALOG
}

// The whole matcher. Iterating the record's own use case
// list gives set semantics for free: a use case repeated in
// the query can't score twice.
pub fn rank(
  experience: Experience,
  use_cases: &[UseCase],
  hardware: Hardware,
  records: &'static [DistroTags],
  max: usize
) -> Vec<DistroMatch> {
  let mut matches: Vec<DistroMatch> = records.iter()
    .filter_map(|record| {
      let mut score = 0;
      let mut matched_tags = Vec::new();
      if record.experience.contains(&experience) {
        score += EXPERIENCE_WEIGHT;
        matched_tags.push(experience.label().to_string());
      }
      for use_case in record.use_cases {
        if use_cases.contains(use_case) {
          score += USE_CASE_WEIGHT;
          matched_tags.push(use_case.label().to_string());
        }
      }
      if record.hardware.contains(&hardware) {
        score += HARDWARE_WEIGHT;
        matched_tags.push(hardware.label().to_string());
      }
      if score == 0 {
        None
      } else {
        Some(DistroMatch {
          name: record.name,
          score,
          matched_tags,
          last_release: record.last_release
        })
      }
    })
    .collect();

  matches.sort_by(|a, b| {
    b.score.cmp(&a.score)
      .then(b.last_release.cmp(a.last_release))
      .then(a.name.cmp(b.name))
  });
  matches.truncate(max);
  matches
}
