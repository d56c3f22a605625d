use std::time::Duration;

use common::{
    config::WatchdogConfig,
    repository::{Entity, RepositoryObject},
};

/// Periodically checks the pool and gives up after too many consecutive
/// failures. A supervisor is expected to restart the process.
pub struct Watchdog<T: Entity> {
    repository: RepositoryObject<T>,
    interval: Duration,
    max_failures: u32,
}

impl<T: Entity + 'static> Watchdog<T> {
    pub fn new(repository: RepositoryObject<T>, config: &WatchdogConfig) -> Self {
        Self {
            repository,
            interval: config.interval,
            max_failures: config.max_failures,
        }
    }

    /// Returns only once `max_failures` checks in a row have failed.
    pub async fn run(self) -> u32 {
        let mut failures = 0;
        loop {
            actix_web::rt::time::sleep(self.interval).await;
            match self.repository.health_check().await {
                Ok(_) => {
                    if failures > 0 {
                        log::info!("Database reachable again after {} failed checks", failures);
                    }
                    failures = 0;
                }
                Err(err) => {
                    failures += 1;
                    log::warn!(
                        "Database health check failed ({}/{}): {:#}",
                        failures,
                        self.max_failures,
                        err
                    );
                    if failures >= self.max_failures {
                        return failures;
                    }
                }
            }
        }
    }

    /// Runs the watchdog in the background and terminates the process when
    /// it gives up.
    pub fn spawn(self) {
        actix_web::rt::spawn(async move {
            let failures = self.run().await;
            log::error!(
                "Database unreachable for {} consecutive checks, shutting down",
                failures
            );
            std::process::exit(1);
        });
    }
}
