// Customer gateway endpoints

use tracing::debug;

use crate::client::ControlPlaneClient;
use crate::error::Error;
use crate::models::{CreateCustomerGatewayRequest, CreatedResource, CustomerGatewayResponse};

/// The only gateway type the control plane accepts for site-to-site IPsec.
pub const GATEWAY_TYPE_IPSEC: &str = "ipsec.1";

impl ControlPlaneClient {
    /// `GET /v1/customer-gateways`
    pub async fn list_customer_gateways(&self) -> Result<Vec<CustomerGatewayResponse>, Error> {
        let url = self.api_url(&["customer-gateways"])?;
        debug!("listing customer gateways");
        self.get(url).await
    }

    /// `GET /v1/customer-gateways/{id}`
    pub async fn get_customer_gateway(&self, id: &str) -> Result<CustomerGatewayResponse, Error> {
        let url = self.api_url(&["customer-gateways", id])?;
        self.get(url).await
    }

    /// Register a new customer gateway. Returns the provider-assigned id.
    ///
    /// The gateway is created without a name; attach one afterwards with
    /// [`label_resource`](Self::label_resource).
    ///
    /// `POST /v1/customer-gateways`
    pub async fn create_customer_gateway(&self, ip: &str, asn: u64) -> Result<String, Error> {
        let url = self.api_url(&["customer-gateways"])?;
        debug!(ip, asn, "creating customer gateway");
        let created: CreatedResource = self
            .post(
                url,
                &CreateCustomerGatewayRequest {
                    ip_address: ip,
                    bgp_asn: asn,
                    gateway_type: GATEWAY_TYPE_IPSEC,
                },
            )
            .await?;
        Ok(created.id)
    }
}
