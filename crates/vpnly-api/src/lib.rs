// vpnly-api: Async Rust client for the site-to-site VPN control-plane API

pub mod auth;
pub mod client;
pub mod error;
pub mod gateways;
pub mod labels;
pub mod models;
pub mod transport;
pub mod vpcs;
pub mod vpn;

pub use auth::Credentials;
pub use client::ControlPlaneClient;
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
