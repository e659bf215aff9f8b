use chrono::{DateTime, Local, TimeZone};

// chrono formatting reference:
// https://docs.rs/chrono/0.4.19/chrono/format/strftime/index.html
const DATE_FORMAT: &'static str = "%d/%m/%Y %k:%M:%S%:z";

pub fn timestamp_to_date_string(timestamp: i64) -> String {
  Local.timestamp(timestamp, 0).format(DATE_FORMAT).to_string()
}

pub fn current_timestamp() -> i64 {
  Local::now().timestamp()
}

// RSS pubDate fields are RFC 2822. Feeds in the wild get
// this wrong often enough that callers should expect None.
pub fn rfc2822_to_timestamp(value: &str) -> Option<i64> {
  DateTime::parse_from_rfc2822(value.trim())
    .map(|d| d.timestamp())
    .ok()
}

#[cfg(test)]
mod tests {
  use super::*;

  // The formatted string carries the local UTC offset, so an
  // exact-string assert would depend on the machine timezone.
  // Parsing it back doesn't.
  #[test]
  fn local_time_formats_as_expected() {
    let timestamp: i64 = 1615150740;
    let result = timestamp_to_date_string(timestamp);
    let parsed = DateTime::parse_from_str(&result, DATE_FORMAT).unwrap();
    assert_eq!(timestamp, parsed.timestamp());
  }

  #[test]
  fn rfc2822_parses_a_typical_feed_date() {
    let result = rfc2822_to_timestamp("Sun, 07 Mar 2021 20:59:00 +0000");
    assert_eq!(Some(1615150740), result);
  }

  #[test]
  fn rfc2822_garbage_is_none() {
    assert_eq!(None, rfc2822_to_timestamp("yesterday, probably"));
  }
}
