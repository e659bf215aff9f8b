use crate::utils::time_utils::current_timestamp;

/**
 * Just counts the amount of times sensible endpoints are
 * being called per unit of time, blocks them entirely for
 * a specific "block time" when the counter overflows.
 */
pub struct BasicRateLimiter {
  counter: u32,
  last_update: i64,
  is_limited: bool,
  max_requests: u32,
  max_requests_time: u32,
  block_duration: u32
}

impl BasicRateLimiter {

  pub fn new(
    max_requests: u32,
    max_requests_time: u32,
    block_duration: u32
  ) -> Self {
    Self {
      counter: 0,
      last_update: current_timestamp(),
      is_limited: false,
      max_requests,
      max_requests_time,
      block_duration
    }
  }

  pub fn is_locked(&self) -> bool {
    self.is_limited
  }

  pub fn is_expired(&self) -> bool {
    // If currently locked, check if past block_duration.
    // Check if past max_request_time otherwise.
    if self.is_locked() {
      current_timestamp() - self.last_update >= self.block_duration.into()
    } else {
      current_timestamp() - self.last_update >= self.max_requests_time.into()
    }
  }

  // Counts the request and answers whether it should be
  // blocked.
  pub fn update(&mut self) -> bool {
    if self.is_expired() {
      // Reset:
      self.counter = 0;
      self.last_update = current_timestamp();
      self.is_limited = false;
    } else if !self.is_limited {
      self.counter += 1;
      // Are we above the rate limit?
      if self.counter >= self.max_requests {
        self.is_limited = true;
        // Reset last_update so the block lasts its full
        // duration:
        self.last_update = current_timestamp();
      }
    }
    self.is_limited
  }

}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn stays_open_below_the_limit() {
    let mut rl = BasicRateLimiter::new(5, 60, 60);
    for _ in 0..3 {
      assert!(!rl.update());
    }
  }

  #[test]
  fn locks_once_the_limit_is_reached() {
    let mut rl = BasicRateLimiter::new(3, 60, 60);
    assert!(!rl.update());
    assert!(!rl.update());
    assert!(rl.update());
    assert!(rl.is_locked());
    // Still locked on the next request:
    assert!(rl.update());
  }

  #[test]
  fn lock_expires_after_the_block_duration() {
    let mut rl = BasicRateLimiter::new(1, 60, 0);
    assert!(rl.update());
    // block_duration of 0 means the next update resets:
    assert!(!rl.update());
  }
}
