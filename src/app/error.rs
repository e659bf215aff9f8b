use actix_web::{error::ResponseError, HttpResponse};
use derive_more::Display;
use log::error;

// The String payloads are for the logs only, the HTTP body
// stays opaque for the 500-class variants so the full error
// output never shows up to random internet people.
#[derive(Debug, Display)]
pub enum Error {
  #[display(fmt = "Internal Server Error")]
  InternalServerError(String),
  #[display(fmt = "Database Error")]
  DatabaseError(String),
  #[display(fmt = "Not Found: {}", _0)]
  NotFound(String),
  #[display(fmt = "Bad Request: {}", _0)]
  BadRequest(String),
  #[display(fmt = "Too Many Requests")]
  TooManyRequests
}

// Plain text error responses, like the old API did.
impl ResponseError for Error {
  fn error_response(&self) -> HttpResponse {
    match self {
      Error::InternalServerError(_) | Error::DatabaseError(_) =>
        HttpResponse::InternalServerError().body(self.to_string()),
      Error::NotFound(_) => HttpResponse::NotFound().body(self.to_string()),
      Error::BadRequest(_) => HttpResponse::BadRequest().body(self.to_string()),
      Error::TooManyRequests =>
        HttpResponse::TooManyRequests().body(self.to_string())
    }
  }
}

// Most handlers just need "log the DB error, answer 500":
pub fn map_db_error(e: color_eyre::Report) -> Error {
  error!("Database error - {}", e);
  Error::DatabaseError(e.to_string())
}
