// Scripted in-memory control plane for orchestrator tests.
//
// Responses are computed from the fake's state at dispatch time, then
// optionally delayed and/or replaced with a scripted failure. This lets
// tests reproduce late, stale responses under `start_paused` time.

#![allow(dead_code, clippy::unwrap_used)]

use std::collections::{HashMap, VecDeque};
use std::net::Ipv4Addr;
use std::sync::Mutex;
use std::time::Duration;

use secrecy::SecretString;

use vpnly_core::{
    CoreError, CustomerGateway, IkeSettings, IpsecProfile, ProfileSink, ResourceGateway,
    ResourceId, Tunnel, TunnelState, UNNAMED, UnavailableKind, Vpc, VpnConnection, VpnState,
};

// ── Scripting ───────────────────────────────────────────────────────

/// A scripted failure for the next matching call.
#[derive(Debug, Clone, Copy)]
pub enum Fail {
    Unavailable,
    NotFound,
    Rejected,
}

impl Fail {
    fn into_error(self, op: &str, key: &str) -> CoreError {
        match self {
            Self::Unavailable => CoreError::GatewayUnavailable {
                kind: UnavailableKind::Service,
                reason: format!("{op} failed (scripted)"),
            },
            Self::NotFound => CoreError::NotFound {
                entity_type: "Resource".into(),
                identifier: key.to_owned(),
            },
            Self::Rejected => CoreError::ValidationRejected {
                field: Some("InvalidParameterValue".into()),
                reason: format!("{op} rejected (scripted)"),
            },
        }
    }
}

#[derive(Default)]
struct Script {
    calls: Vec<(String, String)>,
    delays: HashMap<String, VecDeque<Duration>>,
    failures: HashMap<String, VecDeque<Fail>>,
}

impl Script {
    // Scripted entries are keyed "op" (any key) or "op:key" (one resource).
    fn take<T>(map: &mut HashMap<String, VecDeque<T>>, op: &str, key: &str) -> Option<T> {
        let specific = format!("{op}:{key}");
        if let Some(v) = map.get_mut(&specific).and_then(VecDeque::pop_front) {
            return Some(v);
        }
        map.get_mut(op).and_then(VecDeque::pop_front)
    }
}

struct Plan {
    op: &'static str,
    key: String,
    delay: Option<Duration>,
    failure: Option<Fail>,
}

impl Plan {
    async fn run(self) -> Result<(), CoreError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match self.failure {
            Some(fail) => Err(fail.into_error(self.op, &self.key)),
            None => Ok(()),
        }
    }
}

// ── State ───────────────────────────────────────────────────────────

#[derive(Default)]
struct State {
    vpns: Vec<VpnConnection>,
    gateways: Vec<CustomerGateway>,
    vpcs: Vec<Vpc>,
    next_gateway: u32,
}

#[derive(Default)]
pub struct FakeGateway {
    state: Mutex<State>,
    script: Mutex<Script>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Seeding ──

    pub fn with_gateway(self, id: &str, ip: &str, asn: u64, name: &str) -> Self {
        self.state.lock().unwrap().gateways.push(CustomerGateway {
            id: ResourceId::new(id),
            ip_address: ip.into(),
            bgp_asn: asn,
            name: name.into(),
        });
        self
    }

    pub fn with_vpn(self, id: &str, peer: &str, tunnels: Vec<Tunnel>) -> Self {
        self.state.lock().unwrap().vpns.push(vpn(id, peer, tunnels));
        self
    }

    pub fn with_vpc(self, id: &str, cidr: &str) -> Self {
        self.state.lock().unwrap().vpcs.push(Vpc {
            id: ResourceId::new(id),
            state: "available".into(),
            cidr_block: Some(cidr.into()),
            display_name: UNNAMED.into(),
        });
        self
    }

    // ── Scripting ──

    /// Delay the next call of `op` (optionally only for resource `key`).
    pub fn delay(&self, op: &str, key: Option<&str>, delay: Duration) {
        let slot = key.map_or_else(|| op.to_owned(), |k| format!("{op}:{k}"));
        self.script
            .lock()
            .unwrap()
            .delays
            .entry(slot)
            .or_default()
            .push_back(delay);
    }

    /// Fail the next call of `op` (optionally only for resource `key`).
    pub fn fail_next(&self, op: &str, key: Option<&str>, fail: Fail) {
        let slot = key.map_or_else(|| op.to_owned(), |k| format!("{op}:{k}"));
        self.script
            .lock()
            .unwrap()
            .failures
            .entry(slot)
            .or_default()
            .push_back(fail);
    }

    // ── Out-of-band changes ──

    /// Another operator deleted the connection.
    pub fn remove_vpn(&self, id: &str) {
        self.state
            .lock()
            .unwrap()
            .vpns
            .retain(|v| v.id.as_str() != id);
    }

    pub fn peer_of(&self, vpn_id: &str) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .vpns
            .iter()
            .find(|v| v.id.as_str() == vpn_id)
            .map(|v| v.peer_gateway_id.to_string())
    }

    pub fn gateway_named(&self, name: &str) -> Option<CustomerGateway> {
        self.state
            .lock()
            .unwrap()
            .gateways
            .iter()
            .find(|g| g.name == name)
            .cloned()
    }

    // ── Call accounting ──

    pub fn calls(&self, op: &str) -> usize {
        self.script
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|(o, _)| o == op)
            .count()
    }

    pub fn total_calls(&self) -> usize {
        self.script.lock().unwrap().calls.len()
    }

    fn begin(&self, op: &'static str, key: &str) -> Plan {
        let mut script = self.script.lock().unwrap();
        script.calls.push((op.to_owned(), key.to_owned()));
        let delay = Script::take(&mut script.delays, op, key);
        let failure = Script::take(&mut script.failures, op, key);
        Plan {
            op,
            key: key.to_owned(),
            delay,
            failure,
        }
    }
}

impl ResourceGateway for FakeGateway {
    async fn list_vpn_connections(&self) -> Result<Vec<VpnConnection>, CoreError> {
        let plan = self.begin("list_vpn_connections", "");
        let snapshot = self.state.lock().unwrap().vpns.clone();
        plan.run().await?;
        Ok(snapshot)
    }

    async fn get_vpn_connection(&self, id: &ResourceId) -> Result<VpnConnection, CoreError> {
        let plan = self.begin("get_vpn_connection", id.as_str());
        let found = self
            .state
            .lock()
            .unwrap()
            .vpns
            .iter()
            .find(|v| v.id == *id)
            .cloned();
        plan.run().await?;
        found.ok_or_else(|| Fail::NotFound.into_error("get_vpn_connection", id.as_str()))
    }

    async fn list_customer_gateways(&self) -> Result<Vec<CustomerGateway>, CoreError> {
        let plan = self.begin("list_customer_gateways", "");
        let snapshot = self.state.lock().unwrap().gateways.clone();
        plan.run().await?;
        Ok(snapshot)
    }

    async fn get_customer_gateway(&self, id: &ResourceId) -> Result<CustomerGateway, CoreError> {
        let plan = self.begin("get_customer_gateway", id.as_str());
        let found = self
            .state
            .lock()
            .unwrap()
            .gateways
            .iter()
            .find(|g| g.id == *id)
            .cloned();
        plan.run().await?;
        found.ok_or_else(|| Fail::NotFound.into_error("get_customer_gateway", id.as_str()))
    }

    async fn associate_customer_gateway(
        &self,
        vpn_id: &ResourceId,
        gateway_id: &ResourceId,
    ) -> Result<(), CoreError> {
        self.begin("associate_customer_gateway", vpn_id.as_str())
            .run()
            .await?;
        let mut state = self.state.lock().unwrap();
        let vpn = state
            .vpns
            .iter_mut()
            .find(|v| v.id == *vpn_id)
            .ok_or_else(|| Fail::NotFound.into_error("associate_customer_gateway", vpn_id.as_str()))?;
        vpn.peer_gateway_id = gateway_id.clone();
        Ok(())
    }

    async fn create_customer_gateway(&self, ip: Ipv4Addr, asn: u64) -> Result<ResourceId, CoreError> {
        self.begin("create_customer_gateway", "").run().await?;
        let mut state = self.state.lock().unwrap();
        state.next_gateway += 1;
        let id = ResourceId::new(format!("cgw-new-{}", state.next_gateway));
        state.gateways.push(CustomerGateway {
            id: id.clone(),
            ip_address: ip.to_string(),
            bgp_asn: asn,
            name: UNNAMED.into(),
        });
        Ok(id)
    }

    async fn label_resource(&self, resource_id: &ResourceId, name: &str) -> Result<(), CoreError> {
        self.begin("label_resource", resource_id.as_str())
            .run()
            .await?;
        let mut state = self.state.lock().unwrap();
        if let Some(gw) = state.gateways.iter_mut().find(|g| g.id == *resource_id) {
            gw.name = name.to_owned();
            return Ok(());
        }
        if let Some(vpn) = state.vpns.iter_mut().find(|v| v.id == *resource_id) {
            vpn.display_name = name.to_owned();
            return Ok(());
        }
        Err(Fail::NotFound.into_error("label_resource", resource_id.as_str()))
    }

    async fn list_vpcs(&self) -> Result<Vec<Vpc>, CoreError> {
        let plan = self.begin("list_vpcs", "");
        let snapshot = self.state.lock().unwrap().vpcs.clone();
        plan.run().await?;
        Ok(snapshot)
    }
}

// ── Builders ────────────────────────────────────────────────────────

pub fn tunnel(inside_cidr: &str, outside_ip: &str, psk: &str) -> Tunnel {
    Tunnel {
        state: TunnelState::Up,
        inside_cidr: inside_cidr.into(),
        outside_ip: outside_ip.into(),
        pre_shared_key: SecretString::from(psk.to_owned()),
        status_message: None,
        last_status_change: None,
    }
}

pub fn vpn(id: &str, peer: &str, tunnels: Vec<Tunnel>) -> VpnConnection {
    VpnConnection {
        id: ResourceId::new(id),
        state: VpnState::Available,
        display_name: UNNAMED.into(),
        peer_gateway_id: ResourceId::new(peer),
        gateway_ip: "198.51.100.7".into(),
        transit_gateway_id: None,
        tunnels,
        ike: IkeSettings {
            version: "ikev2".into(),
            encryption_algorithm: "AES256".into(),
            authentication_algorithm: "SHA2-256".into(),
            dh_group: 14,
            lifetime_seconds: 28800,
        },
    }
}

pub fn id(raw: &str) -> ResourceId {
    ResourceId::new(raw)
}

/// The two-gateway, one-connection fixture used across scenarios.
pub fn site_fixture() -> FakeGateway {
    FakeGateway::new()
        .with_gateway("G1", "10.0.0.1", 65000, "site-a")
        .with_gateway("G2", "10.0.0.2", 65001, "site-b")
        .with_vpn(
            "V1",
            "G1",
            vec![tunnel("169.254.0.0/30", "203.0.113.5", "abc123")],
        )
}

// ── Profile sink ────────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub pushed: Mutex<Vec<IpsecProfile>>,
}

impl ProfileSink for RecordingSink {
    fn push(&self, profile: IpsecProfile) -> Result<(), CoreError> {
        self.pushed.lock().unwrap().push(profile);
        Ok(())
    }
}
