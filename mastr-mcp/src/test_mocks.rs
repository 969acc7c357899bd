use super::*;

use tokio::sync::Mutex;

/// Gateway double that records queries and answers with canned sums.
pub struct MockMastrGateway {
    calls: Mutex<Vec<PowerSumsQuery>>,
    error: Mutex<Option<ToolboxError>>,
    sums: PowerSums,
}

impl Default for MockMastrGateway {
    fn default() -> Self {
        Self::with_sums(PowerSums {
            gross_kw: 1500.5,
            net_kw: 1400.0,
        })
    }
}

impl MockMastrGateway {
    pub fn with_sums(sums: PowerSums) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            error: Mutex::new(None),
            sums,
        }
    }

    pub async fn set_error(&self, error: Option<ToolboxError>) {
        *self.error.lock().await = error;
    }

    pub async fn calls(&self) -> Vec<PowerSumsQuery> {
        self.calls.lock().await.clone()
    }
}

#[async_trait]
impl MastrGateway for MockMastrGateway {
    async fn power_sums(&self, query: &PowerSumsQuery) -> ToolboxResult<PowerSums> {
        self.calls.lock().await.push(query.clone());

        if let Some(error) = self.error.lock().await.clone() {
            return Err(error);
        }
        Ok(self.sums)
    }
}

pub(super) fn build_server(gateway: Arc<MockMastrGateway>) -> MastrMcp {
    MastrMcp::with_gateway(gateway)
}
