use super::dtos::*;
use super::error::{map_db_error, Error};
use super::helpers;
use super::AppState;
use crate::db::{self, entities::Distribution};
use crate::matcher;
use crate::utils::{text_utils, time_utils};
use actix_web::{web, HttpRequest, HttpResponse, Result};
use log::warn;
use serde::{Deserialize, Serialize};

// Module with all the API handler functions.

// Few constants that don't really qualify for the config
// file:
const MAX_NEWS: usize = 30;
const MAX_POPULAR: usize = 20;
const DEFAULT_POPULAR: usize = 5;
const MAX_SEARCH_RESULTS: usize = 30;
const MAX_SEARCH_TERM_LENGTH: usize = 100;
// The popularity window, in seconds:
const CLICK_WINDOW: i64 = 30 * 86_400;

/* --- Request query objects --- */
// These have to be public.
#[derive(Serialize, Deserialize)]
pub struct SearchQuery {
  pub q: String,
  pub max: Option<usize>
}

#[derive(Serialize, Deserialize)]
pub struct NewsQuery {
  pub max: Option<usize>,
  pub start: Option<usize>
}

#[derive(Serialize, Deserialize)]
pub struct PopularQuery {
  pub max: Option<usize>
}
/* --- End request query objects --- */

pub async fn index() -> HttpResponse {
  HttpResponse::Ok().body("Nothing here")
}

// Default response when no route matched the request:
pub async fn not_found() -> Result<HttpResponse, Error> {
  Err(Error::NotFound(String::from("Endpoint doesn't exist")))
}

pub async fn distributions(
  app_state: web::Data<AppState>
) -> Result<HttpResponse, Error> {
  let distros = db::all_distributions(&app_state.pool)
    .map_err(map_db_error)?;
  let dtos: Vec<DistributionDto> =
    distros.into_iter().map(|d| d.into()).collect();
  Ok(HttpResponse::Ok().json(dtos))
}

// Path variables have to be in a tuple.
// A numeric path segment is treated as an id, anything else
// as a (case-insensitive) distribution name.
pub async fn distribution(
  app_state: web::Data<AppState>,
  path: web::Path<(String,)>
) -> Result<HttpResponse, Error> {
  let id_or_name = path.into_inner().0;
  let distro: Option<Distribution> = match id_or_name.parse::<i32>() {
    Ok(distro_id) => db::distribution_by_id(&app_state.pool, distro_id),
    Err(_) => db::distribution_by_name(&app_state.pool, &id_or_name),
  }.map_err(map_db_error)?;

  match distro {
    Some(d) => {
      let distro_id = d.id;
      let specs = db::technical_specs_for_distribution(
        &app_state.pool,
        distro_id
      ).map_err(map_db_error)?;
      let mut releases: Vec<ReleaseDto> = Vec::new();
      for release in
        db::releases_for_distribution(&app_state.pool, distro_id)
          .map_err(map_db_error)? {
        let downloads = db::downloads_for_release(
          &app_state.pool,
          release.id
        ).map_err(map_db_error)?;
        releases.push(ReleaseDto::new(release, downloads));
      }
      Ok(HttpResponse::Ok().json(DistributionDetailDto {
        distribution: d.into(),
        technical_specs: specs.map(Into::into),
        releases
      }))
    },
    None => Err(Error::NotFound("Distribution does not exist".to_string()))
  }
}

// Substring search. An empty or blank term is not an error,
// it just returns nothing.
pub async fn search_distributions(
  app_state: web::Data<AppState>,
  query: web::Query<SearchQuery>
) -> Result<HttpResponse, Error> {
  let mut term = query.q.trim().to_string();
  text_utils::truncate_utf8(&mut term, MAX_SEARCH_TERM_LENGTH);
  if term.is_empty() {
    return Ok(HttpResponse::Ok().json(Vec::<DistributionDto>::new()));
  }
  let max = query.max
    .map(|m| if m > MAX_SEARCH_RESULTS { MAX_SEARCH_RESULTS } else { m })
    .unwrap_or(MAX_SEARCH_RESULTS);
  let distros = db::search_distributions(&app_state.pool, &term, max)
    .map_err(map_db_error)?;
  let dtos: Vec<DistributionDto> =
    distros.into_iter().map(|d| d.into()).collect();
  Ok(HttpResponse::Ok().json(dtos))
}

pub async fn news(
  app_state: web::Data<AppState>,
  query: web::Query<NewsQuery>
) -> Result<HttpResponse, Error> {
  let start = query.start.unwrap_or_default();
  let max = query.max
    .map(|m| if m > MAX_NEWS { MAX_NEWS } else { m })
    .unwrap_or(MAX_NEWS);

  let count: usize = db::news_count(&app_state.pool)
    .map_err(map_db_error)?
    as usize;
  // If start is beyond the list, respond with 404. Start at
  // 0 with no news at all just gives an empty list.
  if start > 0 && start >= count {
    return Err(Error::NotFound(String::from("No news found")));
  }
  let items: Vec<NewsItemDto> = db::news_from_to(
    &app_state.pool,
    start,
    max
  )
    .map_err(map_db_error)?
    .into_iter()
    .map(|n| n.into())
    .collect();
  Ok(HttpResponse::Ok().json(items))
}

// Top distributions by download clicks over the last 30
// days.
pub async fn popular_distributions(
  app_state: web::Data<AppState>,
  query: web::Query<PopularQuery>
) -> Result<HttpResponse, Error> {
  let max = query.max
    .map(|m| if m > MAX_POPULAR { MAX_POPULAR } else { m })
    .unwrap_or(DEFAULT_POPULAR);
  let since = time_utils::current_timestamp() - CLICK_WINDOW;
  let top: Vec<PopularDistributionDto> =
    db::top_distributions_by_clicks(&app_state.pool, since, max)
      .map_err(map_db_error)?
      .into_iter()
      .map(|c| c.into())
      .collect();
  Ok(HttpResponse::Ok().json(top))
}

// The click insert itself happens on the click thread, the
// handler only checks the distribution exists and hands the
// event over.
pub async fn record_click(
  app_state: web::Data<AppState>,
  path: web::Path<(i32,)>,
  req: HttpRequest
) -> Result<HttpResponse, Error> {
  let distro_id = path.into_inner().0;

  if app_state.check_rate_limit() {
    warn!(
      "Rate limited a click from {:?}",
      helpers::real_ip_addr(&req)
    );
    return Err(Error::TooManyRequests);
  }

  if !db::distribution_exists(&app_state.pool, distro_id)
    .map_err(map_db_error)? {
    return Err(Error::NotFound("Distribution does not exist".to_string()));
  }

  app_state.click_service.record(distro_id)
    .map_err(|e| Error::InternalServerError(e.to_string()))?;

  Ok(HttpResponse::Ok().json(
    JsonStatus::new_with_id(JsonStatusType::Success, "Click recorded", distro_id)
  ))
}

// The matcher endpoint. Unknown tier or use case values are
// already rejected by the Json extractor, the only check
// left here is the non-empty use case set.
pub async fn match_distributions(
  body: web::Json<MatchBody>
) -> Result<HttpResponse, Error> {
  let body = body.into_inner();
  if body.use_cases.is_empty() {
    return Err(Error::BadRequest(
      String::from("useCases cannot be empty")
    ));
  }
  let max = body.max.unwrap_or(matcher::DEFAULT_RESULTS);
  let results: Vec<MatchResultDto> = matcher::rank(
    body.experience,
    &body.use_cases,
    body.hardware,
    matcher::catalog(),
    max
  )
    .into_iter()
    .map(|m| m.into())
    .collect();
  Ok(HttpResponse::Ok().json(results))
}

// Admin endpoint (IP-guarded): downloads whose URLs are
// missing or known-bad sentinels.
pub async fn broken_downloads(
  app_state: web::Data<AppState>
) -> Result<HttpResponse, Error> {
  let broken: Vec<BrokenDownloadDto> =
    db::broken_downloads(&app_state.pool)
      .map_err(map_db_error)?
      .into_iter()
      .map(|b| b.into())
      .collect();
  Ok(HttpResponse::Ok().json(broken))
}

// Admin endpoint (IP-guarded): partial update of a download
// row, the link fixer UI uses it. Validation errors name the
// offending field.
pub async fn patch_download(
  app_state: web::Data<AppState>,
  path: web::Path<(i32,)>,
  body: web::Json<DownloadPatchDto>
) -> Result<HttpResponse, Error> {
  let download_id = path.into_inner().0;
  let patch = body.into_inner();

  if let Some(iso_url) = &patch.iso_url {
    if !text_utils::is_valid_http_url(iso_url) {
      return Err(Error::BadRequest(
        String::from("isoURL: must be a valid http(s) URL")
      ));
    }
  }
  if let Some(Some(torrent_url)) = &patch.torrent_url {
    if !text_utils::is_valid_http_url(torrent_url) {
      return Err(Error::BadRequest(
        String::from("torrentURL: must be a valid http(s) URL or null")
      ));
    }
  }
  if patch.iso_url.is_none()
    && patch.torrent_url.is_none()
    && patch.checksum.is_none() {
    return Err(Error::BadRequest(
      String::from("Nothing to update")
    ));
  }

  let updated = db::update_download(
    &app_state.pool,
    &patch.into_update(download_id)
  ).map_err(map_db_error)?;
  if updated == 0 {
    return Err(Error::NotFound("Download does not exist".to_string()));
  }
  Ok(HttpResponse::Ok().json(
    JsonStatus::new_with_id(JsonStatusType::Success, "Download updated", download_id)
  ))
}
