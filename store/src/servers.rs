//! Server inventory persisted as a JSON file

use rand::Rng;
use sentinel_core::{Error, NewServer, Result, Server, ServerStatus};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

use crate::seed;

/// Probability that a probed server answers
const ONLINE_PROBABILITY: f64 = 0.9;

/// Server inventory
///
/// Loaded once at startup; every mutation is written back to the backing
/// file when one is configured.
#[derive(Debug, Clone)]
pub struct ServerStore {
    path: Option<PathBuf>,
    servers: Vec<Server>,
}

impl ServerStore {
    /// Store that is never written to disk
    pub fn in_memory(servers: Vec<Server>) -> Self {
        Self {
            path: None,
            servers,
        }
    }

    /// Load the inventory from `path`, seeding it when the file does not exist
    #[instrument]
    pub async fn load(path: impl AsRef<Path> + std::fmt::Debug) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        match tokio::fs::read_to_string(&path).await {
            Ok(content) => {
                let servers: Vec<Server> = serde_json::from_str(&content).map_err(|e| {
                    Error::StoreError(format!("Failed to parse {}: {}", path.display(), e))
                })?;
                info!(count = servers.len(), "Loaded server inventory");
                Ok(Self {
                    path: Some(path),
                    servers,
                })
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("No server inventory found, seeding defaults");
                let mut store = Self {
                    path: Some(path),
                    servers: Vec::new(),
                };
                store.seed().await?;
                Ok(store)
            }
            Err(e) => Err(Error::StoreError(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    /// Replace the inventory with the default servers
    pub async fn seed(&mut self) -> Result<()> {
        self.commit(seed::default_servers()).await
    }

    /// Persist `servers`, then make them the in-memory inventory
    ///
    /// On a failed write the in-memory inventory is left untouched.
    async fn commit(&mut self, servers: Vec<Server>) -> Result<()> {
        self.write(&servers).await?;
        self.servers = servers;
        Ok(())
    }

    async fn write(&self, servers: &[Server]) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                Error::StoreError(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }

        let content = serde_json::to_string_pretty(servers)?;

        // Write then rename; readers never see a truncated file
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, content).await?;
        tokio::fs::rename(&tmp, path).await?;

        debug!(path = %path.display(), count = servers.len(), "Saved server inventory");
        Ok(())
    }

    pub fn list(&self) -> &[Server] {
        &self.servers
    }

    pub fn get(&self, id: &str) -> Option<&Server> {
        self.servers.iter().find(|s| s.id == id)
    }

    /// Validate and append a server
    pub async fn add<R: Rng + ?Sized>(&mut self, new: NewServer, rng: &mut R) -> Result<Server> {
        new.validate()?;
        let server = new.into_server(rng);

        let mut servers = self.servers.clone();
        servers.push(server.clone());
        self.commit(servers).await?;

        info!(id = %server.id, name = %server.name, "Added server");
        Ok(server)
    }

    /// Remove a server by id
    pub async fn remove(&mut self, id: &str) -> Result<Server> {
        let index = self
            .servers
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| Error::NotFound(format!("Server {}", id)))?;

        let mut servers = self.servers.clone();
        let server = servers.remove(index);
        self.commit(servers).await?;

        info!(id = %server.id, name = %server.name, "Removed server");
        Ok(server)
    }

    /// Re-probe every server's status
    ///
    /// The offline address never answers; any other server answers with
    /// a fixed probability, and answering servers low on space are flagged.
    pub fn refresh_statuses<R: Rng + ?Sized>(&mut self, rng: &mut R, offline_address: &str) {
        for server in &mut self.servers {
            let online = server.ip_address != offline_address && rng.gen_bool(ONLINE_PROBABILITY);
            let status = Server::status_for(online, server.usage_percent());
            if status == ServerStatus::Offline && server.status != ServerStatus::Offline {
                warn!(name = %server.name, "Server stopped responding");
            }
            server.status = status;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn new_server(name: &str) -> NewServer {
        NewServer {
            name: name.to_string(),
            ip_address: "192.168.1.12".to_string(),
            total_disk: 100.0,
            used_disk: 50.0,
        }
    }

    #[tokio::test]
    async fn test_load_seeds_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("servers.json");

        let store = ServerStore::load(&path).await.unwrap();
        assert_eq!(store.list().len(), 5);
        assert!(path.exists());

        let reloaded = ServerStore::load(&path).await.unwrap();
        assert_eq!(reloaded.list(), store.list());
    }

    #[tokio::test]
    async fn test_load_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("servers.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(matches!(
            ServerStore::load(&path).await,
            Err(Error::StoreError(_))
        ));
    }

    #[tokio::test]
    async fn test_add_and_remove_persist() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("servers.json");
        let mut rng = StdRng::seed_from_u64(3);

        let mut store = ServerStore::load(&path).await.unwrap();
        let added = store.add(new_server("PROD-WEB-02"), &mut rng).await.unwrap();
        assert_eq!(added.status, ServerStatus::Online);

        let reloaded = ServerStore::load(&path).await.unwrap();
        assert!(reloaded.get(&added.id).is_some());

        store.remove("srv-001").await.unwrap();
        let reloaded = ServerStore::load(&path).await.unwrap();
        assert!(reloaded.get("srv-001").is_none());
        assert_eq!(reloaded.list().len(), 5);
    }

    #[tokio::test]
    async fn test_failed_write_leaves_inventory_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("servers.json");
        let mut rng = StdRng::seed_from_u64(3);

        let mut store = ServerStore::load(&path).await.unwrap();
        // A directory in place of the temp file makes every write fail
        std::fs::create_dir(path.with_extension("json.tmp")).unwrap();

        let err = store.add(new_server("PROD-WEB-02"), &mut rng).await;
        assert!(matches!(err, Err(Error::IoError(_))));
        assert_eq!(store.list().len(), 5);

        assert!(store.remove("srv-001").await.is_err());
        assert!(store.get("srv-001").is_some());
        assert_eq!(store.list().len(), 5);

        std::fs::remove_dir(path.with_extension("json.tmp")).unwrap();
        let reloaded = ServerStore::load(&path).await.unwrap();
        assert_eq!(reloaded.list(), store.list());
    }

    #[tokio::test]
    async fn test_add_rejects_invalid_server() {
        let mut store = ServerStore::in_memory(Vec::new());
        let mut rng = StdRng::seed_from_u64(3);
        let mut bad = new_server("");
        bad.ip_address = "999.1.1.1".into();

        let err = store.add(bad, &mut rng).await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(store.list().is_empty());
    }

    #[tokio::test]
    async fn test_remove_unknown_server() {
        let mut store = ServerStore::in_memory(seed::default_servers());
        assert!(matches!(
            store.remove("srv-404").await,
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_refresh_statuses() {
        let mut store = ServerStore::in_memory(seed::default_servers());

        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            store.refresh_statuses(&mut rng, "192.168.1.100");

            for server in store.list() {
                if server.ip_address == "192.168.1.100" {
                    assert_eq!(server.status, ServerStatus::Offline);
                } else if server.status != ServerStatus::Offline {
                    assert_eq!(server.status == ServerStatus::Warning, server.is_low_on_space());
                }
            }
        }
    }
}
