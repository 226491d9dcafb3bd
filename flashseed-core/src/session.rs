//! Connection manager: one connection per run, always released.
//!
//! `scoped` owns the store for the duration of the work and releases it on
//! every exit path. Release is bounded by the teardown timeout; when the
//! bound expires the connection is dropped instead of awaited, so a stuck
//! close can never keep the process alive.

use std::time::Duration;

use futures::future::BoxFuture;
use tracing::{debug, error, info, warn};

use crate::config::StoreConfig;
use crate::error::{Result, SeedError};
use crate::store::{FlashcardStore, PgFlashcardStore};

/// Open the single Postgres connection described by `config`.
///
/// Fails fast with a connectivity error; there is no retry.
pub async fn connect(config: &StoreConfig) -> Result<PgFlashcardStore> {
    let options = config.connect_options()?;
    let target = config.target();
    let waited = config.connect_timeout();

    info!(store = %target, collection = %config.collection, "connecting to data store");

    let connecting = PgFlashcardStore::connect(&options, config.collection.clone());
    match tokio::time::timeout(waited, connecting).await {
        Ok(Ok(store)) => {
            debug!(store = %target, "connected");
            Ok(store)
        }
        Ok(Err(source)) => Err(SeedError::connectivity(target, source)),
        Err(_) => Err(SeedError::ConnectTimeout { target, waited }),
    }
}

/// Close `store`, giving up after `timeout`.
pub async fn release<S: FlashcardStore>(store: S, timeout: Duration) -> Result<()> {
    match tokio::time::timeout(timeout, store.close()).await {
        Ok(result) => result,
        Err(_) => Err(SeedError::TeardownTimeout { waited: timeout }),
    }
}

/// Run `work` against `store`, then release it whatever the outcome.
///
/// A failed work result is returned unchanged. After successful work, a
/// release error that [`SeedError::is_fatal`] reports as fatal becomes the
/// result; an abandoned release is only logged.
pub async fn scoped<S, T, F>(mut store: S, teardown_timeout: Duration, work: F) -> Result<T>
where
    S: FlashcardStore,
    F: for<'a> FnOnce(&'a mut S) -> BoxFuture<'a, Result<T>>,
{
    let outcome = work(&mut store).await;

    if let Err(e) = &outcome {
        debug!(error = %e, "work failed, releasing connection");
    }

    match (outcome, release(store, teardown_timeout).await) {
        (outcome, Ok(())) => {
            debug!("connection released");
            outcome
        }
        (Ok(_), Err(e)) if e.is_fatal() => {
            error!(error = %e, "connection release failed");
            Err(e)
        }
        (outcome, Err(e)) => {
            warn!(error = %e, "connection release did not complete cleanly");
            outcome
        }
    }
}

/// Connect with `config`, run `work`, release.
pub async fn run<T, F>(config: &StoreConfig, work: F) -> Result<T>
where
    F: for<'a> FnOnce(&'a mut PgFlashcardStore) -> BoxFuture<'a, Result<T>>,
{
    let store = connect(config).await?;
    scoped(store, config.teardown_timeout(), work).await
}
