/*
 * Download clicks are only ever used for the rolling 30-day
 * popularity count, so the insert happens on a dedicated
 * thread and never blocks a request. The handler talks to
 * the thread through a bounded sync_channel.
 */

use crate::db::{insert_download_click, Pool};
use crate::utils::time_utils::current_timestamp;
use color_eyre::Result;
use eyre::eyre;
use log::{debug, error, info};
use std::sync::mpsc::{self, SyncSender, TrySendError};
use std::thread::{self, JoinHandle};

#[derive(Debug)]
enum ClickMessage {
  Close,
  RecordClick(i32)
}

pub struct ClickService {
  tx: SyncSender<ClickMessage>,
  thread_handle: Option<JoinHandle<()>>
}

impl ClickService {

  pub fn open(pool: &Pool, queue_size: usize) -> Result<ClickService> {
    // Producers get an error instead of blocking when this
    // buffer fills up, see record() below.
    let (tx, rx) = mpsc::sync_channel::<ClickMessage>(queue_size);
    let connection = pool.clone().get()?;
    info!("Starting click thread...");
    let thread_handle = thread::spawn(move || loop {
      match rx.recv() {
        Ok(msg) => {
          match msg {
            ClickMessage::Close => {
              info!("Click thread terminating...");
              break;
            },
            ClickMessage::RecordClick(distro_id) => {
              debug!("Inserting download click for distro {}", distro_id);
              if let Err(e) = insert_download_click(
                &connection,
                distro_id,
                current_timestamp()
              ) {
                error!("Error from ClickService: \
                  could not insert download click - {}", e);
              }
            }
          }
        },
        // Stop the click thread in case of error:
        Err(_) => break
      }
    });
    Ok(ClickService {
      tx,
      thread_handle: Some(thread_handle)
    })
  }

  // A full buffer drops the click with an error log, that's
  // a popularity counter losing one event, not a problem
  // worth failing the request for. A dead thread is.
  pub fn record(&self, distro_id: i32) -> Result<()> {
    match self.tx.try_send(ClickMessage::RecordClick(distro_id)) {
      Ok(_) => Ok(()),
      Err(TrySendError::Full(msg)) => {
        error!("Click thread buffer is full, dropped: {:?}", msg);
        Ok(())
      },
      Err(TrySendError::Disconnected(msg)) => {
        error!("Click thread is dead, could not insert: {:?}", msg);
        Err(eyre!("Click thread appears to have died"))
      }
    }
  }

}

// Drop is a good place to ask for termination of the thread.
// The Option dance around the JoinHandle is the usual way to
// join from a &mut self context.
impl Drop for ClickService {
  fn drop(&mut self) {
    match self.tx.send(ClickMessage::Close) {
      Ok(_) => info!("ClickService is closing..."),
      Err(e) => error!("Could not close ClickService - {}", e)
    }
    self.thread_handle.take().map(JoinHandle::join);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::db::{self, create_schema};
  use r2d2_sqlite::SqliteConnectionManager;
  use rusqlite::params;

  fn test_pool() -> Pool {
    let manager = SqliteConnectionManager::memory();
    let pool = r2d2::Pool::builder()
      .max_size(1)
      .build(manager)
      .unwrap();
    create_schema(&pool.get().unwrap()).unwrap();
    pool
  }

  #[test]
  fn recorded_clicks_end_up_in_the_database() {
    // The service holds its own connection, so this test
    // needs an actual file both connections can see:
    let path = std::env::temp_dir()
      .join(format!("distrodex-clicks-test-{}.db", std::process::id()));
    let _ = std::fs::remove_file(&path);
    let manager = SqliteConnectionManager::file(&path);
    let pool = r2d2::Pool::builder().max_size(2).build(manager).unwrap();
    create_schema(&pool.get().unwrap()).unwrap();
    pool.get().unwrap().execute(
      "INSERT INTO distributions (id, name) VALUES (1, 'Ubuntu')",
      params![]
    ).unwrap();

    {
      let service = ClickService::open(&pool, 5).unwrap();
      service.record(1).unwrap();
      service.record(1).unwrap();
      // Drop joins the thread, flushing the queue.
    }

    let top = db::top_distributions_by_clicks(&pool, 0, 5).unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].clicks, 2);
    drop(pool);
    let _ = std::fs::remove_file(&path);
  }

  #[test]
  fn record_fails_once_the_thread_is_gone() {
    let pool = test_pool();
    let mut service = ClickService::open(&pool, 1).unwrap();
    // Kill the thread by hand:
    service.tx.send(ClickMessage::Close).unwrap();
    service.thread_handle.take().map(JoinHandle::join);
    assert!(service.record(1).is_err());
  }
}
