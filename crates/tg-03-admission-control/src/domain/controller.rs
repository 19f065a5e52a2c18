//! # Admission Controller
//!
//! Publishes the minimum acceptable proof value and guards the settlement
//! section. The controller never blocks tip validation: it only watches
//! whether a settlement is already running when a new one is requested.

use parking_lot::RwLock;
use shared_types::{pow2, Amount};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::info;

/// Baseline minimum is 2^16.
pub const BASELINE_MINIMUM_BITS: u32 = 16;

/// Admission configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdmissionConfig {
    /// Minimum price before any contention, as a power of two.
    pub baseline_minimum_bits: u32,
}

impl Default for AdmissionConfig {
    fn default() -> Self {
        Self {
            baseline_minimum_bits: BASELINE_MINIMUM_BITS,
        }
    }
}

/// Counters for admission behaviour.
#[derive(Debug, Default)]
pub struct AdmissionStats {
    /// Settlements that found the section busy and doubled the price.
    pub contention_events: AtomicU64,
    /// Settlements that entered the section.
    pub settlements_entered: AtomicU64,
}

/// Owns `MinimumPrice` and the settlement section.
#[derive(Debug)]
pub struct AdmissionController {
    baseline: Amount,
    minimum: RwLock<Amount>,
    section: Arc<Mutex<()>>,
    stats: AdmissionStats,
}

impl AdmissionController {
    pub fn new(config: AdmissionConfig) -> Self {
        let baseline = pow2(config.baseline_minimum_bits);
        Self {
            minimum: RwLock::new(baseline.clone()),
            baseline,
            section: Arc::new(Mutex::new(())),
            stats: AdmissionStats::default(),
        }
    }

    /// The minimum a proof must decode to right now.
    pub fn current_minimum(&self) -> Amount {
        self.minimum.read().clone()
    }

    pub fn baseline(&self) -> &Amount {
        &self.baseline
    }

    /// Whether a settlement currently holds the section.
    pub fn is_settling(&self) -> bool {
        self.section.try_lock().is_err()
    }

    pub fn stats(&self) -> &AdmissionStats {
        &self.stats
    }

    /// Asks for the settlement section without waiting.
    ///
    /// A free section is taken on the spot. A busy one doubles the price
    /// before this returns, so every proof validated from here on pays the
    /// raised minimum. The price is halved again when the request enters or
    /// is dropped.
    pub fn request_settlement(self: &Arc<Self>) -> SettlementRequest {
        match Arc::clone(&self.section).try_lock_owned() {
            Ok(guard) => {
                self.stats.settlements_entered.fetch_add(1, Ordering::Relaxed);
                SettlementRequest {
                    state: RequestState::Entered(guard),
                }
            }
            Err(_) => SettlementRequest {
                state: RequestState::Queued {
                    bump: PriceBump::raise(Arc::clone(self)),
                    section: Arc::clone(&self.section),
                },
            },
        }
    }

    /// Enters the settlement section, waiting for any attempt in flight.
    pub async fn begin_settlement(self: &Arc<Self>) -> SettlementAttempt {
        self.request_settlement().enter().await
    }

    fn double(&self) {
        let mut minimum = self.minimum.write();
        *minimum <<= 1u32;
        info!(minimum = %*minimum, "Increasing minimum to {} wei", *minimum);
    }

    fn halve(&self) {
        let mut minimum = self.minimum.write();
        *minimum >>= 1u32;
        info!(minimum = %*minimum, "Decreasing minimum to {} wei", *minimum);
    }
}

impl Default for AdmissionController {
    fn default() -> Self {
        Self::new(AdmissionConfig::default())
    }
}

/// Doubling held while a contended request waits. Halves on drop, so a
/// cancelled wait cannot leave the price raised.
#[derive(Debug)]
struct PriceBump {
    controller: Arc<AdmissionController>,
}

impl PriceBump {
    fn raise(controller: Arc<AdmissionController>) -> Self {
        controller
            .stats
            .contention_events
            .fetch_add(1, Ordering::Relaxed);
        controller.double();
        Self { controller }
    }
}

impl Drop for PriceBump {
    fn drop(&mut self) {
        self.controller.halve();
    }
}

/// A settlement that has asked for the section.
#[derive(Debug)]
pub struct SettlementRequest {
    state: RequestState,
}

#[derive(Debug)]
enum RequestState {
    /// The section was free and is already held.
    Entered(OwnedMutexGuard<()>),
    /// Another settlement holds the section; the price stays doubled until
    /// this request enters or is dropped.
    Queued {
        bump: PriceBump,
        section: Arc<Mutex<()>>,
    },
}

impl SettlementRequest {
    pub fn is_contended(&self) -> bool {
        matches!(self.state, RequestState::Queued { .. })
    }

    /// Waits for the section.
    pub async fn enter(self) -> SettlementAttempt {
        match self.state {
            RequestState::Entered(guard) => SettlementAttempt {
                _guard: guard,
                contended: false,
            },
            RequestState::Queued { bump, section } => {
                let guard = section.lock_owned().await;
                let controller = Arc::clone(&bump.controller);
                drop(bump);
                controller
                    .stats
                    .settlements_entered
                    .fetch_add(1, Ordering::Relaxed);
                SettlementAttempt {
                    _guard: guard,
                    contended: true,
                }
            }
        }
    }
}

/// Exclusive hold on the settlement section.
#[derive(Debug)]
pub struct SettlementAttempt {
    _guard: OwnedMutexGuard<()>,
    contended: bool,
}

impl SettlementAttempt {
    /// Whether this attempt had to wait behind another settlement.
    pub fn was_contended(&self) -> bool {
        self.contended
    }
}
