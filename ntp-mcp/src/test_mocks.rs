use super::*;

use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;

/// Gateway double answering with a fixed time or a configured error.
pub struct MockNtpGateway {
    calls: AtomicUsize,
    error: Mutex<Option<ToolboxError>>,
    time: DateTime<Utc>,
}

impl MockNtpGateway {
    pub fn at(time: DateTime<Utc>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            error: Mutex::new(None),
            time,
        }
    }

    pub async fn set_error(&self, error: Option<ToolboxError>) {
        *self.error.lock().await = error;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockNtpGateway {
    fn default() -> Self {
        Self::at(fixed_time())
    }
}

#[async_trait]
impl NtpGateway for MockNtpGateway {
    async fn network_time(&self) -> ToolboxResult<NetworkTime> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(error) = self.error.lock().await.clone() {
            return Err(error);
        }
        Ok(NetworkTime {
            server: "ptbtime1.ptb.de".to_string(),
            time: self.time,
            offset_ms: 12,
            round_trip_ms: 8,
            stratum: 1,
        })
    }
}

/// 2026-10-16T12:03:07Z
pub fn fixed_time() -> DateTime<Utc> {
    DateTime::from_timestamp(1_792_152_187, 0).unwrap()
}

pub(super) fn build_server(gateway: Arc<MockNtpGateway>) -> NtpMcp {
    NtpMcp::with_gateway(gateway)
}
