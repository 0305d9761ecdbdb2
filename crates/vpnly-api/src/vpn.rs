// VPN connection endpoints
//
// Listing, single fetch, and customer-gateway re-association. Connections
// themselves are provisioned elsewhere; this surface never creates or
// deletes them.

use tracing::debug;

use crate::client::ControlPlaneClient;
use crate::error::Error;
use crate::models::{AssociateCustomerGatewayRequest, VpnConnectionResponse};

impl ControlPlaneClient {
    /// List all VPN connections in provider order.
    ///
    /// `GET /v1/vpn-connections`
    pub async fn list_vpn_connections(&self) -> Result<Vec<VpnConnectionResponse>, Error> {
        let url = self.api_url(&["vpn-connections"])?;
        debug!("listing vpn connections");
        self.get(url).await
    }

    /// Fetch a single VPN connection.
    ///
    /// `GET /v1/vpn-connections/{id}`
    pub async fn get_vpn_connection(&self, id: &str) -> Result<VpnConnectionResponse, Error> {
        let url = self.api_url(&["vpn-connections", id])?;
        self.get(url).await
    }

    /// Point a VPN connection at a different customer gateway.
    ///
    /// `PUT /v1/vpn-connections/{id}/customer-gateway`
    pub async fn associate_customer_gateway(
        &self,
        vpn_id: &str,
        gateway_id: &str,
    ) -> Result<(), Error> {
        let url = self.api_url(&["vpn-connections", vpn_id, "customer-gateway"])?;
        debug!(vpn_id, gateway_id, "associating customer gateway");
        self.put_unit(
            url,
            &AssociateCustomerGatewayRequest {
                customer_gateway_id: gateway_id,
            },
        )
        .await
    }
}
