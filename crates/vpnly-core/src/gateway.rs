// ── Resource gateway seam ──
//
// Everything the orchestrator needs from the control plane, expressed in
// domain types. `ControlPlaneClient` is the production implementation;
// tests substitute a scripted in-memory gateway.

use std::future::Future;
use std::net::Ipv4Addr;

use tracing::debug;
use vpnly_api::ControlPlaneClient;

use crate::error::CoreError;
use crate::model::{CustomerGateway, ResourceId, Vpc, VpnConnection};

/// Typed access to the remote resource store.
///
/// Reads fail with `GatewayUnavailable` or `NotFound`; writes may also fail
/// with `ValidationRejected`. Implementations never retry.
pub trait ResourceGateway: Send + Sync + 'static {
    fn list_vpn_connections(
        &self,
    ) -> impl Future<Output = Result<Vec<VpnConnection>, CoreError>> + Send;

    fn get_vpn_connection(
        &self,
        id: &ResourceId,
    ) -> impl Future<Output = Result<VpnConnection, CoreError>> + Send;

    fn list_customer_gateways(
        &self,
    ) -> impl Future<Output = Result<Vec<CustomerGateway>, CoreError>> + Send;

    fn get_customer_gateway(
        &self,
        id: &ResourceId,
    ) -> impl Future<Output = Result<CustomerGateway, CoreError>> + Send;

    fn associate_customer_gateway(
        &self,
        vpn_id: &ResourceId,
        gateway_id: &ResourceId,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;

    /// Create an `ipsec.1` customer gateway and return its new id.
    fn create_customer_gateway(
        &self,
        ip: Ipv4Addr,
        asn: u64,
    ) -> impl Future<Output = Result<ResourceId, CoreError>> + Send;

    /// Attach or overwrite the `Name` label of any resource.
    fn label_resource(
        &self,
        resource_id: &ResourceId,
        name: &str,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;

    fn list_vpcs(&self) -> impl Future<Output = Result<Vec<Vpc>, CoreError>> + Send;
}

const VPN_CONNECTION: &str = "VPN connection";
const CUSTOMER_GATEWAY: &str = "Customer gateway";
const ASSOCIATION_TARGET: &str = "VPN connection or customer gateway";

impl ResourceGateway for ControlPlaneClient {
    async fn list_vpn_connections(&self) -> Result<Vec<VpnConnection>, CoreError> {
        let raw = ControlPlaneClient::list_vpn_connections(self).await?;
        debug!(count = raw.len(), "received vpn connections");
        raw.into_iter().map(VpnConnection::try_from).collect()
    }

    async fn get_vpn_connection(&self, id: &ResourceId) -> Result<VpnConnection, CoreError> {
        let raw = ControlPlaneClient::get_vpn_connection(self, id.as_str())
            .await
            .map_err(|e| CoreError::from(e).for_entity(VPN_CONNECTION, id.as_str()))?;
        VpnConnection::try_from(raw)
    }

    async fn list_customer_gateways(&self) -> Result<Vec<CustomerGateway>, CoreError> {
        let raw = ControlPlaneClient::list_customer_gateways(self).await?;
        debug!(count = raw.len(), "received customer gateways");
        Ok(raw.into_iter().map(CustomerGateway::from).collect())
    }

    async fn get_customer_gateway(&self, id: &ResourceId) -> Result<CustomerGateway, CoreError> {
        let raw = ControlPlaneClient::get_customer_gateway(self, id.as_str())
            .await
            .map_err(|e| CoreError::from(e).for_entity(CUSTOMER_GATEWAY, id.as_str()))?;
        Ok(CustomerGateway::from(raw))
    }

    async fn associate_customer_gateway(
        &self,
        vpn_id: &ResourceId,
        gateway_id: &ResourceId,
    ) -> Result<(), CoreError> {
        // The provider answers 404 for either id without saying which.
        ControlPlaneClient::associate_customer_gateway(self, vpn_id.as_str(), gateway_id.as_str())
            .await
            .map_err(|e| {
                CoreError::from(e)
                    .for_entity(ASSOCIATION_TARGET, &format!("{vpn_id} or {gateway_id}"))
            })
    }

    async fn create_customer_gateway(&self, ip: Ipv4Addr, asn: u64) -> Result<ResourceId, CoreError> {
        let id = ControlPlaneClient::create_customer_gateway(self, &ip.to_string(), asn).await?;
        Ok(ResourceId::from(id))
    }

    async fn label_resource(&self, resource_id: &ResourceId, name: &str) -> Result<(), CoreError> {
        ControlPlaneClient::label_resource(self, resource_id.as_str(), name)
            .await
            .map_err(|e| CoreError::from(e).for_entity("Resource", resource_id.as_str()))
    }

    async fn list_vpcs(&self) -> Result<Vec<Vpc>, CoreError> {
        let raw = ControlPlaneClient::list_vpcs(self).await?;
        Ok(raw.into_iter().map(Vpc::from).collect())
    }
}
