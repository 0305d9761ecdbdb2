use tracing::debug;

use crate::client::ControlPlaneClient;
use crate::error::Error;
use crate::models::VpcResponse;

impl ControlPlaneClient {
    /// `GET /v1/vpcs`
    pub async fn list_vpcs(&self) -> Result<Vec<VpcResponse>, Error> {
        let url = self.api_url(&["vpcs"])?;
        debug!("listing vpcs");
        self.get(url).await
    }
}
