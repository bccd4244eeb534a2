//! Achievement rewards for CO2 milestones.
//!
//! Reaching the first 10 kg of CO2 saved mints a one-time achievement token.
//! The only issuer today is simulated: it fabricates a transaction id and
//! logs, with no external call.

use rand::Rng;

use crate::models::User;

/// Running total (kg) at which the first achievement is minted.
pub const ACHIEVEMENT_THRESHOLD_KG: f64 = 10.0;

/// Name of the achievement minted at [`ACHIEVEMENT_THRESHOLD_KG`].
pub const FIRST_10KG_ACHIEVEMENT: &str = "First 10kg Saved";

/// Proof that an achievement was minted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewardReceipt {
    pub achievement: String,
    /// `0x`-prefixed transaction hash.
    pub transaction_id: String,
}

/// Mints achievement tokens.
pub trait RewardIssuer: Send + Sync {
    fn mint_achievement(&self, user: &User, achievement: &str) -> RewardReceipt;
}

/// Whether adding `delta` to `previous` crosses the achievement threshold.
///
/// Only the consumption that moves the total from below the threshold to at
/// or above it qualifies, so each user earns the achievement once.
#[must_use]
pub fn crosses_threshold(previous: f64, delta: f64) -> bool {
    previous < ACHIEVEMENT_THRESHOLD_KG && previous + delta >= ACHIEVEMENT_THRESHOLD_KG
}

/// Issuer that pretends to mint on a blockchain.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedRewardIssuer;

impl RewardIssuer for SimulatedRewardIssuer {
    fn mint_achievement(&self, user: &User, achievement: &str) -> RewardReceipt {
        let transaction_id = random_transaction_id();
        tracing::info!(
            user_id = %user.id,
            achievement,
            transaction_id = %transaction_id,
            "Minted achievement token (simulated)"
        );

        RewardReceipt {
            achievement: achievement.to_owned(),
            transaction_id,
        }
    }
}

/// `0x` followed by 64 lowercase hex characters.
fn random_transaction_id() -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";

    let mut rng = rand::rng();
    let mut id = String::with_capacity(66);
    id.push_str("0x");
    for _ in 0..64 {
        id.push(char::from(HEX[rng.random_range(0..HEX.len())]));
    }
    id
}
