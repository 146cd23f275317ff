//! Periodic interest accrual job.
//!
//! Fires on a fixed wall-clock period and runs one batch interest pass
//! per firing, serialized behind the same lock as player operations.
//! The schedule is not persisted: after a restart the first firing is
//! one full period after startup, not aligned to any calendar day.

use crate::clan::{Clan, Member};
use crate::service::ClanService;
use crate::store::RecordStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::error;

/// Default accrual period: once per day.
pub const DEFAULT_PERIOD: Duration = Duration::from_secs(60 * 60 * 24);

/// Interest scheduler settings.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Wall-clock interval between accrual passes.
    pub period: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            period: DEFAULT_PERIOD,
        }
    }
}

impl SchedulerConfig {
    /// Override the accrual period (useful for tests and fast-forward
    /// game modes).
    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }
}

/// Spawn the interest scheduler onto the current tokio runtime.
///
/// Every `config.period` the task locks the shared service and runs
/// exactly one [`apply_daily_interest`](ClanService::apply_daily_interest)
/// pass. A failed pass is logged and retried at the next firing; the
/// task itself never exits, so abort the handle on shutdown.
pub fn spawn_interest_scheduler<C, M>(
    service: Arc<Mutex<ClanService<C, M>>>,
    config: SchedulerConfig,
) -> JoinHandle<()>
where
    C: RecordStore<Clan> + Send + 'static,
    M: RecordStore<Member> + Send + 'static,
{
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(config.period).await;

            let mut service = service.lock().await;
            if let Err(err) = service.apply_daily_interest() {
                error!(%err, "daily interest pass failed");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestHarness;

    #[tokio::test(start_paused = true)]
    async fn test_scheduler_fires_once_per_period() {
        let mut h = TestHarness::new();
        h.fund("Avia", 1_000);
        h.service.create_clan("Avia", "Embers").unwrap();
        h.service.deposit("Avia", 500).unwrap();

        let service = Arc::new(Mutex::new(h.service));
        let config = SchedulerConfig::default().with_period(Duration::from_secs(60));
        let handle = spawn_interest_scheduler(Arc::clone(&service), config);

        // Just shy of one period: nothing has fired yet.
        tokio::time::sleep(Duration::from_secs(59)).await;
        assert_eq!(
            service.lock().await.member_balance("Avia").unwrap().interest,
            0
        );

        // Cross the first period boundary.
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(
            service.lock().await.member_balance("Avia").unwrap().interest,
            10
        );

        // And the second.
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(
            service.lock().await.member_balance("Avia").unwrap().interest,
            20
        );

        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_scheduler_keeps_running_across_firings() {
        let h = TestHarness::new();
        let service = Arc::new(Mutex::new(h.service));
        let config = SchedulerConfig::default().with_period(Duration::from_secs(10));
        let handle = spawn_interest_scheduler(Arc::clone(&service), config);

        tokio::time::sleep(Duration::from_secs(35)).await;
        assert!(!handle.is_finished());
        handle.abort();
    }
}
