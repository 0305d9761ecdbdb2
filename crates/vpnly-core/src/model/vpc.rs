use serde::Serialize;

use super::id::ResourceId;

/// A virtual private cloud, listed read-only for context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Vpc {
    pub id: ResourceId,
    pub state: String,
    pub cidr_block: Option<String>,
    pub display_name: String,
}
