use super::entities::*;
use rusqlite::{Error, Row};

// Row mappers are kept as plain functions so the query
// functions in the parent module stay readable.

pub fn map_distribution(row: &Row) -> Result<Distribution, Error> {
  Ok(Distribution {
    id: row.get(0)?,
    name: row.get(1)?,
    description: row.get(2)?,
    website_url: row.get(3)?,
    logo_url: row.get(4)?,
    base_distro: row.get(5)?,
    desktop_environments: row.get(6)?,
    latest_version: row.get(7)?,
    latest_release_date: row.get(8)?,
    latest_is_lts: row.get(9)?,
    architectures: row.get(10)?
  })
}

pub fn map_technical_specs(row: &Row) -> Result<TechnicalSpecs, Error> {
  Ok(TechnicalSpecs {
    id: row.get(0)?,
    distro_id: row.get(1)?,
    package_manager: row.get(2)?,
    init_system: row.get(3)?,
    release_model: row.get(4)?,
    kernel_version: row.get(5)?,
    license: row.get(6)?
  })
}

pub fn map_release(row: &Row) -> Result<Release, Error> {
  Ok(Release {
    id: row.get(0)?,
    distro_id: row.get(1)?,
    version_number: row.get(2)?,
    release_date: row.get(3)?,
    is_lts: row.get(4)?
  })
}

pub fn map_download(row: &Row) -> Result<Download, Error> {
  Ok(Download {
    id: row.get(0)?,
    release_id: row.get(1)?,
    architecture: row.get(2)?,
    iso_url: row.get(3)?,
    torrent_url: row.get(4)?,
    checksum: row.get(5)?,
    download_size: row.get(6)?
  })
}

pub fn map_news_item(row: &Row) -> Result<NewsItem, Error> {
  Ok(NewsItem {
    id: row.get(0)?,
    title: row.get(1)?,
    source_url: row.get(2)?,
    published_at: row.get(3)?
  })
}

pub fn map_click_count(row: &Row) -> Result<ClickCount, Error> {
  Ok(ClickCount {
    distro_id: row.get(0)?,
    name: row.get(1)?,
    clicks: row.get(2)?
  })
}

pub fn map_broken_download(row: &Row) -> Result<BrokenDownload, Error> {
  Ok(BrokenDownload {
    id: row.get(0)?,
    distro_name: row.get(1)?,
    version_number: row.get(2)?,
    architecture: row.get(3)?,
    iso_url: row.get(4)?,
    torrent_url: row.get(5)?
  })
}
