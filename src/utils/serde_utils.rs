use serde::{Deserialize, Deserializer};

// Wraps the deserialized value in an extra Some so a field
// declared as Option<Option<T>> can tell "absent" (None,
// through #[serde(default)]) apart from "explicit null"
// (Some(None)). Used by the partial update DTOs.
pub fn deserialize_null_value<'de, D, T>(
  deserializer: D
) -> Result<Option<Option<T>>, D::Error>
where
  D: Deserializer<'de>,
  T: Deserialize<'de>,
{
  Option::<T>::deserialize(deserializer).map(Some)
}

// Some data sources hand out empty strings where NULL is
// meant. Done in plain code rather than a deserializer.
pub fn empty_string_to_none(value: Option<String>) -> Option<String> {
  match value {
    Some(s) => if s.trim().is_empty()
      { None } else { Some(s) },
    None => None
  }
}
