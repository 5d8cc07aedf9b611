//! Shared types

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{de, Deserialize, Deserializer, Serialize};

use crate::{Error, Result};

/// Disk usage above this percentage raises a low-space warning
pub const LOW_SPACE_THRESHOLD_PERCENT: f64 = 85.0;

/// Monitored server
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Server {
    /// Server identifier (`srv-...`)
    pub id: String,
    /// Display name
    pub name: String,
    pub status: ServerStatus,
    /// Total disk in GB
    pub total_disk: f64,
    /// Used disk in GB
    pub used_disk: f64,
    pub ip_address: String,
}

impl Server {
    /// Used disk as a percentage of total disk
    pub fn usage_percent(&self) -> f64 {
        if self.total_disk <= 0.0 {
            return 0.0;
        }
        self.used_disk / self.total_disk * 100.0
    }

    /// Is usage above the low-space threshold?
    pub fn is_low_on_space(&self) -> bool {
        self.usage_percent() > LOW_SPACE_THRESHOLD_PERCENT
    }

    /// Get display string for server
    pub fn display(&self) -> String {
        format!("{} ({})", self.name, self.ip_address)
    }

    /// Status derived from reachability and disk usage
    pub fn status_for(online: bool, usage_percent: f64) -> ServerStatus {
        if !online {
            ServerStatus::Offline
        } else if usage_percent > LOW_SPACE_THRESHOLD_PERCENT {
            ServerStatus::Warning
        } else {
            ServerStatus::Online
        }
    }
}

/// Server status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ServerStatus {
    Online,
    Offline,
    Warning,
}

/// Request to add a server to the inventory
///
/// Missing fields deserialize to empty values so that [`NewServer::validate`]
/// reports them; disk sizes also accept numeric strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewServer {
    pub name: String,
    pub ip_address: String,
    #[serde(deserialize_with = "lenient_number")]
    pub total_disk: f64,
    #[serde(deserialize_with = "lenient_number")]
    pub used_disk: f64,
}

/// Accept `100`, `"100"` or `""` (read as zero)
fn lenient_number<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) if s.trim().is_empty() => Ok(0.0),
        Raw::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("'{}' is not a number", s))),
    }
}

impl NewServer {
    /// Check the structural constraints, collecting every violation
    pub fn validate(&self) -> Result<()> {
        let mut violations = Vec::new();

        if self.name.is_empty() {
            violations.push("Server name is required.");
        }
        if self.ip_address.is_empty() {
            violations.push("IP address is required.");
        } else if !is_ipv4(&self.ip_address) {
            violations.push("Please enter a valid IPv4 address.");
        }
        if !(self.total_disk.is_finite() && self.total_disk > 0.0) {
            violations.push("Total disk must be a positive number.");
        }
        if !(self.used_disk.is_finite() && self.used_disk >= 0.0) {
            violations.push("Used disk must be a non-negative number.");
        } else if self.used_disk > self.total_disk {
            violations.push("Used disk cannot be greater than total disk.");
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(Error::InvalidInput(violations.join(", ")))
        }
    }

    /// Build the inventory entry, assigning an id and initial status
    pub fn into_server<R: Rng + ?Sized>(self, rng: &mut R) -> Server {
        let usage = if self.total_disk > 0.0 {
            self.used_disk / self.total_disk * 100.0
        } else {
            0.0
        };

        Server {
            id: generate_server_id(Utc::now(), rng),
            status: Server::status_for(true, usage),
            name: self.name,
            ip_address: self.ip_address,
            total_disk: self.total_disk,
            used_disk: self.used_disk,
        }
    }
}

fn is_ipv4(value: &str) -> bool {
    let parts: Vec<&str> = value.split('.').collect();
    parts.len() == 4
        && parts.iter().all(|p| {
            !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()) && p.parse::<u8>().is_ok()
        })
}

/// `srv-<unix millis>-<5 base36 chars>`
pub fn generate_server_id<R: Rng + ?Sized>(now: DateTime<Utc>, rng: &mut R) -> String {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let suffix: String = (0..5)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect();
    format!("srv-{}-{}", now.timestamp_millis(), suffix)
}

/// Recommendation kind
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RecommendationKind {
    File,
    Folder,
}

/// Static cleanup recommendation for a file or folder on a server
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub id: String,
    /// Server name the item lives on
    pub server: String,
    pub name: String,
    pub path: String,
    /// Size in bytes
    pub size: u64,
    #[serde(rename = "type")]
    pub kind: RecommendationKind,
    pub last_modified: String,
    pub reason: String,
}

/// Action log severity
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Info,
    Warning,
    Error,
}

/// Action log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: u64,
    pub timestamp: DateTime<Utc>,
    pub message: String,
    pub level: LogLevel,
}

/// Format a byte count in human-readable form
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;
    const TB: u64 = GB * 1024;

    if bytes >= TB {
        format!("{:.2} TB", bytes as f64 / TB as f64)
    } else if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn new_server(ip: &str, total: f64, used: f64) -> NewServer {
        NewServer {
            name: "PROD-WEB-02".to_string(),
            ip_address: ip.to_string(),
            total_disk: total,
            used_disk: used,
        }
    }

    #[test]
    fn test_new_server_accepts_numeric_strings() {
        let new: NewServer = serde_json::from_str(
            r#"{"name":"A","ipAddress":"10.0.0.9","totalDisk":"100","usedDisk":" 42.5 "}"#,
        )
        .unwrap();
        assert_eq!(new.total_disk, 100.0);
        assert_eq!(new.used_disk, 42.5);

        let bad: std::result::Result<NewServer, _> =
            serde_json::from_str(r#"{"name":"A","totalDisk":"lots"}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_new_server_missing_fields_fail_validation() {
        let new: NewServer = serde_json::from_str(r#"{"name":"A"}"#).unwrap();
        let message = new.validate().unwrap_err().to_string();
        assert!(message.contains("IP address is required."));
        assert!(message.contains("Total disk must be a positive number."));
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(500), "500 bytes");
        assert_eq!(format_bytes(2048), "2.00 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.00 MB");
        assert_eq!(format_bytes(3 * 1024 * 1024 * 1024), "3.00 GB");
    }

    #[test]
    fn test_status_for() {
        assert_eq!(Server::status_for(false, 99.0), ServerStatus::Offline);
        assert_eq!(Server::status_for(true, 90.0), ServerStatus::Warning);
        assert_eq!(Server::status_for(true, 85.0), ServerStatus::Online);
    }

    #[test]
    fn test_new_server_validation() {
        assert!(new_server("192.168.1.12", 100.0, 50.0).validate().is_ok());
        assert!(new_server("192.168.1", 100.0, 50.0).validate().is_err());
        assert!(new_server("192.168.1.256", 100.0, 50.0).validate().is_err());
        assert!(new_server("10.0.0.5", 0.0, 0.0).validate().is_err());

        let err = new_server("", 100.0, 150.0).validate().unwrap_err();
        let msg = err.to_string();
        assert!(msg.starts_with("Invalid input: "));
        assert!(msg.contains("IP address is required."));
        assert!(msg.contains("Used disk cannot be greater than total disk."));
    }

    #[test]
    fn test_into_server_assigns_id_and_status() {
        let mut rng = StdRng::seed_from_u64(7);
        let server = new_server("10.0.0.9", 100.0, 90.0).into_server(&mut rng);
        assert!(server.id.starts_with("srv-"));
        assert_eq!(server.id.rsplit('-').next().map(str::len), Some(5));
        assert_eq!(server.status, ServerStatus::Warning);

        let server = new_server("10.0.0.9", 100.0, 30.0).into_server(&mut rng);
        assert_eq!(server.status, ServerStatus::Online);
    }

    #[test]
    fn test_recommendation_serializes_kind_as_type() {
        let rec = Recommendation {
            id: "rec-1".into(),
            server: "PROD-WEB-01".into(),
            name: "temp_logs".into(),
            path: "C:\\temp\\logs".into(),
            size: 10,
            kind: RecommendationKind::Folder,
            last_modified: "2023-05-20".into(),
            reason: "Large Temp Folder".into(),
        };
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["type"], "Folder");
        assert_eq!(json["lastModified"], "2023-05-20");
    }
}
