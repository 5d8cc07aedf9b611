//! Simulated cleanup executor
//!
//! Stands in for a real remote-execution client. It performs no I/O: it
//! rejects a known-offline address and a known-bad credential up front,
//! waits to mimic remote latency, then synthesizes a believable result that
//! occasionally reports a partial failure.

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::cleanup::{CleanupExecutor, CleanupRequest, CleanupResult};
use crate::{Error, Result};

/// Smallest amount a simulated run reclaims (500 MiB)
pub const MIN_FREED_BYTES: u64 = 500 * 1024 * 1024;
/// Largest amount a simulated run reclaims (5 GiB)
pub const MAX_FREED_BYTES: u64 = 5 * 1024 * 1024 * 1024;

/// Items a simulated run reports as deleted, in deletion order
pub const SIMULATED_DELETIONS: [&str; 6] = [
    "C:\\Windows\\Temp\\tmpA3B1.tmp",
    "C:\\Windows\\Temp\\tmpCDE2.tmp",
    "C:\\Users\\Administrator\\AppData\\Local\\Temp\\log.txt",
    "C:\\Users\\Administrator\\Downloads\\old-installer.exe",
    "C:\\Users\\Administrator\\Downloads\\archive(1).zip",
    "C:\\$Recycle.Bin\\S-1-5-21-...",
];

/// Error recorded when the partial-failure branch is taken
pub const LOCKED_FILE_ERROR: &str =
    "Failed to delete 'C:\\Windows\\System32\\config\\SYSTEM.LOG1': File is in use.";

/// Simulator settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Simulated remote latency in milliseconds
    pub latency_ms: u64,
    /// Probability that a run reports a partial failure
    pub partial_failure_rate: f64,
    /// Address that is always reported unreachable
    pub offline_address: String,
    /// Credential that is always rejected
    pub rejected_credential: String,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            latency_ms: 1500,
            partial_failure_rate: 0.2,
            offline_address: "192.168.1.100".to_string(),
            rejected_credential: "badpassword".to_string(),
        }
    }
}

/// Source of the simulator's random decisions
#[derive(Debug, Clone, PartialEq)]
pub enum Chance {
    /// Fresh thread-local randomness for every call
    Random,
    /// A new generator seeded with this value for every call
    Seeded(u64),
    /// Fixed decisions; `freed_space_bytes` is clamped into range
    Fixed {
        freed_space_bytes: u64,
        partial_failure: bool,
    },
}

/// Decisions drawn for one simulated run
#[derive(Debug, Clone, Copy)]
struct Roll {
    freed_space_bytes: u64,
    partial_failure: bool,
}

impl Chance {
    fn roll(&self, partial_failure_rate: f64) -> Roll {
        let rate = if partial_failure_rate.is_nan() {
            0.0
        } else {
            partial_failure_rate.clamp(0.0, 1.0)
        };
        match self {
            Chance::Random => roll_with(&mut rand::thread_rng(), rate),
            Chance::Seeded(seed) => roll_with(&mut StdRng::seed_from_u64(*seed), rate),
            Chance::Fixed {
                freed_space_bytes,
                partial_failure,
            } => Roll {
                freed_space_bytes: (*freed_space_bytes).clamp(MIN_FREED_BYTES, MAX_FREED_BYTES),
                partial_failure: *partial_failure,
            },
        }
    }
}

fn roll_with<R: Rng + ?Sized>(rng: &mut R, partial_failure_rate: f64) -> Roll {
    Roll {
        freed_space_bytes: rng.gen_range(MIN_FREED_BYTES..=MAX_FREED_BYTES),
        partial_failure: rng.gen_bool(partial_failure_rate),
    }
}

/// Cleanup executor that simulates a remote run
#[derive(Debug, Clone)]
pub struct CleanupSimulator {
    config: SimulatorConfig,
    chance: Chance,
}

impl CleanupSimulator {
    /// Create a simulator with random outcomes
    pub fn new(config: SimulatorConfig) -> Self {
        Self::with_chance(config, Chance::Random)
    }

    /// Create a simulator with an explicit source of decisions
    pub fn with_chance(config: SimulatorConfig, chance: Chance) -> Self {
        Self { config, chance }
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Reject requests that model transport or authentication failures
    fn pre_check(&self, request: &CleanupRequest) -> Result<()> {
        if request.target_address() == self.config.offline_address {
            return Err(Error::Unreachable(request.target_address().to_string()));
        }
        if request.credential() == self.config.rejected_credential {
            return Err(Error::AuthenticationFailed(request.username().to_string()));
        }
        Ok(())
    }

    fn synthesize(&self) -> CleanupResult {
        let roll = self.chance.roll(self.config.partial_failure_rate);

        let mut result = CleanupResult {
            success: true,
            freed_space_bytes: roll.freed_space_bytes,
            deleted_items: SIMULATED_DELETIONS.iter().map(|s| s.to_string()).collect(),
            errors: Vec::new(),
        };

        if roll.partial_failure {
            result.record_failure(LOCKED_FILE_ERROR);
            result.deleted_items.pop();
        }

        result
    }
}

impl Default for CleanupSimulator {
    fn default() -> Self {
        Self::new(SimulatorConfig::default())
    }
}

#[async_trait]
impl CleanupExecutor for CleanupSimulator {
    #[instrument(skip(self), fields(target = %request.target_address()))]
    async fn execute(&self, request: &CleanupRequest) -> Result<CleanupResult> {
        if let Err(e) = self.pre_check(request) {
            warn!(error = %e, "Cleanup could not be attempted");
            return Err(e);
        }

        debug!(latency_ms = self.config.latency_ms, "Simulating remote cleanup");
        tokio::time::sleep(Duration::from_millis(self.config.latency_ms)).await;

        let result = self.synthesize();
        info!(
            success = result.success,
            freed_space_bytes = result.freed_space_bytes,
            deleted = result.deleted_items.len(),
            "Simulated cleanup finished"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cleanup::{run_cleanup, CleanupRequestInput};

    fn instant() -> SimulatorConfig {
        SimulatorConfig {
            latency_ms: 0,
            ..Default::default()
        }
    }

    fn forced(partial_failure: bool) -> CleanupSimulator {
        CleanupSimulator::with_chance(
            instant(),
            Chance::Fixed {
                freed_space_bytes: 2 * 1024 * 1024 * 1024,
                partial_failure,
            },
        )
    }

    #[tokio::test]
    async fn test_successful_run() {
        let sim = forced(false);
        let request = CleanupRequestInput::new("10.0.0.5", "admin", "correct");
        let outcome = run_cleanup(&sim, &request).await;

        let result = outcome.result().expect("expected a result");
        assert!(result.success);
        assert!(result.errors.is_empty());
        assert_eq!(result.deleted_items.len(), SIMULATED_DELETIONS.len());
        assert_eq!(result.freed_space_bytes, 2 * 1024 * 1024 * 1024);
    }

    #[tokio::test]
    async fn test_partial_failure_keeps_result() {
        let sim = forced(true);
        let request = CleanupRequestInput::new("10.0.0.5", "admin", "correct");
        let outcome = run_cleanup(&sim, &request).await;

        let result = outcome.result().expect("partial failure is still a result");
        assert!(!result.success);
        assert_eq!(result.errors, vec![LOCKED_FILE_ERROR.to_string()]);
        assert_eq!(result.deleted_items.len(), SIMULATED_DELETIONS.len() - 1);
        assert_eq!(result.deleted_items[0], SIMULATED_DELETIONS[0]);
        assert!(result.deleted_items.len() >= 3);
    }

    #[tokio::test]
    async fn test_offline_address_is_unreachable() {
        let sim = forced(false);
        for (user, credential) in [("admin", "correct"), ("other", "badpassword")] {
            let request = CleanupRequestInput::new("192.168.1.100", user, credential);
            let outcome = run_cleanup(&sim, &request).await;
            let message = outcome.error().expect("expected an error");
            assert!(message.contains("unreachable"));
            assert!(message.contains("192.168.1.100"));
        }
    }

    #[tokio::test]
    async fn test_bad_credential_is_rejected() {
        let sim = forced(false);
        let outcome =
            run_cleanup(&sim, &CleanupRequestInput::new("10.0.0.5", "admin", "badpassword")).await;
        assert_eq!(
            outcome.error(),
            Some("Authentication failed for user 'admin'. Access denied.")
        );
    }

    #[tokio::test]
    async fn test_empty_fields_never_produce_result() {
        let sim = forced(false);
        let inputs = [
            CleanupRequestInput::new("", "admin", "x"),
            CleanupRequestInput::new("10.0.0.5", "", "x"),
            CleanupRequestInput::new("10.0.0.5", "admin", ""),
            CleanupRequestInput::default(),
        ];
        for input in inputs {
            let outcome = run_cleanup(&sim, &input).await;
            assert!(outcome.error().unwrap().starts_with("Invalid input: "));
        }
    }

    #[tokio::test]
    async fn test_random_runs_respect_invariants() {
        for seed in 0..200 {
            let sim = CleanupSimulator::with_chance(instant(), Chance::Seeded(seed));
            let outcome =
                run_cleanup(&sim, &CleanupRequestInput::new("10.0.0.5", "admin", "correct")).await;
            let result = outcome.result().unwrap();
            assert!(result.freed_space_bytes >= MIN_FREED_BYTES);
            assert!(result.freed_space_bytes <= MAX_FREED_BYTES);
            assert!(result.is_consistent());
            assert!(result.deleted_items.len() >= SIMULATED_DELETIONS.len() - 1);
        }
    }

    #[tokio::test]
    async fn test_seeded_runs_are_reproducible() {
        let request = CleanupRequestInput::new("10.0.0.5", "admin", "correct");
        let a = CleanupSimulator::with_chance(instant(), Chance::Seeded(99));
        let b = CleanupSimulator::with_chance(instant(), Chance::Seeded(99));
        assert_eq!(run_cleanup(&a, &request).await, run_cleanup(&b, &request).await);
    }

    #[test]
    fn test_fixed_chance_clamps_freed_space() {
        let roll = Chance::Fixed {
            freed_space_bytes: 1,
            partial_failure: false,
        }
        .roll(0.2);
        assert_eq!(roll.freed_space_bytes, MIN_FREED_BYTES);

        let roll = Chance::Fixed {
            freed_space_bytes: u64::MAX,
            partial_failure: true,
        }
        .roll(0.2);
        assert_eq!(roll.freed_space_bytes, MAX_FREED_BYTES);
        assert!(roll.partial_failure);
    }

    #[test]
    fn test_certain_failure_rate() {
        let sim = CleanupSimulator::with_chance(
            SimulatorConfig {
                partial_failure_rate: 1.0,
                ..instant()
            },
            Chance::Random,
        );
        assert!(!sim.synthesize().success);
    }

    #[tokio::test]
    async fn test_concurrent_runs_do_not_block_each_other() {
        let sim = std::sync::Arc::new(CleanupSimulator::with_chance(
            SimulatorConfig {
                latency_ms: 200,
                ..Default::default()
            },
            Chance::Seeded(1),
        ));

        let started = std::time::Instant::now();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let sim = sim.clone();
                tokio::spawn(async move {
                    run_cleanup(
                        sim.as_ref(),
                        &CleanupRequestInput::new("10.0.0.5", "admin", "correct"),
                    )
                    .await
                })
            })
            .collect();

        for handle in handles {
            assert!(!handle.await.unwrap().is_error());
        }
        assert!(started.elapsed() < Duration::from_millis(1500));
    }
}
