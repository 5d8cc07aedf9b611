//! Fleet-wide dashboard figures

use serde::{Deserialize, Serialize};

use crate::types::{Server, ServerStatus};

/// Aggregate view of the monitored fleet
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FleetSummary {
    pub total_servers: usize,
    pub online_servers: usize,
    /// Reachable servers above the low-space threshold
    pub low_space_alerts: usize,
    pub recommendations: usize,
    pub total_storage_tb: f64,
    pub used_storage_tb: f64,
}

impl FleetSummary {
    pub fn new(servers: &[Server], recommendations: usize) -> Self {
        let online_servers = servers
            .iter()
            .filter(|s| s.status == ServerStatus::Online)
            .count();
        let low_space_alerts = servers
            .iter()
            .filter(|s| s.status != ServerStatus::Offline && s.is_low_on_space())
            .count();
        let total_disk: f64 = servers.iter().map(|s| s.total_disk).sum();
        let used_disk: f64 = servers.iter().map(|s| s.used_disk).sum();

        Self {
            total_servers: servers.len(),
            online_servers,
            low_space_alerts,
            recommendations,
            total_storage_tb: total_disk / 1024.0,
            used_storage_tb: used_disk / 1024.0,
        }
    }
}
