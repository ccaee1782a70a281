//! [`PurgeExpiredVerifications`] [`Task`].

use std::{convert::Infallible, error::Error, time};

use common::operations::{By, Delete, Perform, Start};
use tokio::time::interval;
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::user::{verification, Verification},
    infra::{database, Database},
    Service,
};

use super::Task;

/// Configuration for [`PurgeExpiredVerifications`] [`Task`].
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Interval between [`Verification`] purges.
    pub interval: time::Duration,
}

/// [`Task`] for purging expired [`Verification`]s.
///
/// Unverified registrations leave [`Verification`] rows behind once their
/// tokens expire; this task sweeps them periodically.
#[derive(Clone, Copy, Debug)]
pub struct PurgeExpiredVerifications<S> {
    /// [`Config`] of this [`Task`].
    config: Config,

    /// [`Service`] instance.
    service: S,
}

impl<Db> Task<Start<By<PurgeExpiredVerifications<Self>, Config>>>
    for Service<Db>
where
    PurgeExpiredVerifications<Service<Db>>:
        Task<Perform<()>, Ok = (), Err: Error> + Send + Sync + 'static,
    Self: Clone,
{
    type Ok = ();
    type Err = Infallible;

    async fn execute(
        &self,
        Start(by): Start<By<PurgeExpiredVerifications<Self>, Config>>,
    ) -> Result<Self::Ok, Self::Err> {
        let config = by.into_inner();
        let task = PurgeExpiredVerifications {
            config,
            service: self.clone(),
        };

        let mut interval = interval(task.config.interval);
        loop {
            let _ = interval.tick().await;
            _ = task.execute(Perform(())).await.map_err(|e| {
                log::error!("`task::PurgeExpiredVerifications` failed: {e}");
            });
        }
    }
}

impl<Db> Task<Perform<()>> for PurgeExpiredVerifications<Service<Db>>
where
    Db: Database<
        Delete<By<Verification, verification::ExpirationDateTime>>,
        Ok = (),
        Err = Traced<database::Error>,
    >,
{
    type Ok = ();
    type Err = ExecutionError;

    async fn execute(&self, _: Perform<()>) -> Result<Self::Ok, Self::Err> {
        let deadline = verification::ExpirationDateTime::now();
        self.service
            .database()
            .execute(Delete(By::new(deadline)))
            .await
            .map_err(tracerr::map_from_and_wrap!())
    }
}

/// Error of [`PurgeExpiredVerifications`] execution.
pub type ExecutionError = Traced<database::Error>;
