//! Seed data used when nothing has been persisted yet

use sentinel_core::{Recommendation, RecommendationKind, Server, ServerStatus};

fn server(id: &str, name: &str, status: ServerStatus, total: f64, used: f64, ip: &str) -> Server {
    Server {
        id: id.to_string(),
        name: name.to_string(),
        status,
        total_disk: total,
        used_disk: used,
        ip_address: ip.to_string(),
    }
}

/// Initial inventory
pub fn default_servers() -> Vec<Server> {
    vec![
        server("srv-001", "PROD-WEB-01", ServerStatus::Online, 500.0, 450.0, "192.168.1.10"),
        server("srv-002", "PROD-DB-01", ServerStatus::Online, 1024.0, 800.0, "192.168.1.11"),
        server("srv-003", "DEV-APP-01", ServerStatus::Warning, 250.0, 220.0, "10.0.0.5"),
        server("srv-004", "STAGING-CACHE", ServerStatus::Online, 100.0, 30.0, "10.0.0.21"),
        server("srv-005", "BACKUP-01", ServerStatus::Offline, 5120.0, 4800.0, "192.168.1.100"),
    ]
}

#[allow(clippy::too_many_arguments)]
fn recommendation(
    id: &str,
    server: &str,
    name: &str,
    path: &str,
    size: u64,
    kind: RecommendationKind,
    last_modified: &str,
    reason: &str,
) -> Recommendation {
    Recommendation {
        id: id.to_string(),
        server: server.to_string(),
        name: name.to_string(),
        path: path.to_string(),
        size,
        kind,
        last_modified: last_modified.to_string(),
        reason: reason.to_string(),
    }
}

/// Static cleanup recommendations
pub fn default_recommendations() -> Vec<Recommendation> {
    use RecommendationKind::{File, Folder};

    vec![
        recommendation(
            "rec-001",
            "PROD-WEB-01",
            "old_installer.exe",
            "C:\\Users\\admin\\Downloads\\old_installer.exe",
            157_286_400,
            File,
            "2022-01-15",
            "Old/Forgotten File",
        ),
        recommendation(
            "rec-002",
            "PROD-WEB-01",
            "temp_logs",
            "C:\\temp\\logs",
            5_368_709_120,
            Folder,
            "2023-05-20",
            "Large Temp Folder",
        ),
        recommendation(
            "rec-003",
            "DEV-APP-01",
            "project_archive.zip",
            "C:\\Users\\dev\\Desktop\\project_archive.zip",
            2_147_483_648,
            File,
            "2023-08-01",
            "Old/Forgotten File",
        ),
        recommendation(
            "rec-004",
            "PROD-DB-01",
            "Safe Browse Cache",
            "C:\\Users\\svc_db\\AppData\\...\\Safe Browse",
            8_589_934_592,
            Folder,
            "2024-05-01",
            "Large Safe Browse data",
        ),
        recommendation(
            "rec-005",
            "DEV-APP-01",
            "inactive_profile_j.doe",
            "C:\\Users\\j.doe",
            12_884_901_888,
            Folder,
            "2023-02-11",
            "Inactive User Profile",
        ),
    ]
}
