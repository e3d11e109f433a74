//! Cross-crate integration scenarios.

pub mod demand_control;
pub mod pipeline_flow;
pub mod restart_isolation;

use std::time::Duration;

use tokio::time::{sleep, timeout};

/// Poll a condition until it holds, failing the test after two seconds.
pub async fn wait_until(mut check: impl FnMut() -> bool) {
    timeout(Duration::from_secs(2), async {
        while !check() {
            sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("condition never held");
}
