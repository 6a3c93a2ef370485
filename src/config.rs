//! Protocol configuration options.

use crate::types::Bps;

/// Protocol configuration.
#[derive(Debug, Clone)]
pub struct ProtocolConfig {
    /// Minimum ratio of locked value to debt value at borrow time.
    pub min_collateral_ratio: Bps,
    /// Locked-to-debt ratio below which a position becomes liquidatable.
    pub liquidation_threshold: Bps,
    /// Maximum number of events to retain in memory.
    pub max_events: usize,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            min_collateral_ratio: Bps(12_500),
            liquidation_threshold: Bps(11_000),
            max_events: 100_000,
        }
    }
}
