// Escape the LIKE wildcards in user input. Queries using the
// result have to declare ESCAPE '\' too.
pub fn escape_like(term: &str) -> String {
  term
    .replace('\\', "\\\\")
    .replace('%', "\\%")
    .replace('_', "\\_")
}

// truncate() on String can panic when cutting a multibyte
// unicode char in half, hence this char-based version.
pub fn truncate_utf8(value: &mut String, max_chars: usize) {
  if value.chars().count() > max_chars {
    *value = value.chars().take(max_chars).collect();
  }
}

// Good enough URL validation for the admin PATCH endpoint,
// the link auditor is the real judge of what's reachable.
pub fn is_valid_http_url(value: &str) -> bool {
  let rest = if value.starts_with("https://") {
    &value[8..]
  } else if value.starts_with("http://") {
    &value[7..]
  } else {
    return false;
  };
  !rest.is_empty() && !rest.starts_with('/')
}
