//! Price discovery for the city currency.
//!
//! Once per tick the price moves by the relative gap between demand and
//! supply, scaled by an elasticity, plus bounded noise. Demand is supply
//! scaled by the collective mood plus whatever was spent on purchases this
//! tick. The price never falls below a configured floor.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Deserialize;

use township_types::{Dice, EconomyLedger, Mood, PricePoint, trim_to_recent};

/// Price discovery tuning.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// Sensitivity of price to the demand/supply gap.
    pub elasticity: f64,
    /// Half-width of the uniform noise band, as a fraction of price.
    pub noise: f64,
    /// Lowest price the currency can reach.
    pub price_floor: f64,
    /// Lower bound of the traded fraction of supply.
    pub volume_min: f64,
    /// Upper bound of the traded fraction of supply.
    pub volume_max: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            elasticity: 0.05,
            noise: 0.02,
            price_floor: 0.01,
            volume_min: 0.01,
            volume_max: 0.05,
        }
    }
}

/// Outcome of one round of price discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceMove {
    /// Price before discovery.
    pub previous: Decimal,
    /// Price after discovery.
    pub price: Decimal,
    /// Market cap at the new price.
    pub market_cap: Decimal,
    /// Modeled volume at the new price.
    pub daily_volume: Decimal,
}

/// How strongly the city's mood inflates currency demand.
pub const fn mood_multiplier(mood: Mood) -> f64 {
    match mood {
        Mood::Calm => 1.0,
        Mood::Focused => 1.01,
        Mood::Restless => 0.99,
        Mood::Melancholy => 0.97,
        Mood::Euphoric => 1.05,
        Mood::Chaotic => 0.95,
    }
}

/// Run price discovery for the tick and record the new price.
///
/// Resets the per-tick spending accumulator.
pub fn discover_price(
    epoch: u64,
    economy: &mut EconomyLedger,
    mood: Mood,
    config: &PricingConfig,
    dice: &mut dyn Dice,
    history_cap: usize,
) -> PriceMove {
    let previous = economy.price;
    let price = previous.to_f64().unwrap_or(config.price_floor);
    let supply = economy.circulating_supply.to_f64().unwrap_or(0.0);
    let spending = economy.spending_this_tick.to_f64().unwrap_or(0.0);

    let gap = if supply > 0.0 {
        let demand = supply.mul_add(mood_multiplier(mood), spending);
        (demand - supply) / supply
    } else {
        0.0
    };
    let noise = dice.between(-config.noise, config.noise);
    let delta = price * config.elasticity.mul_add(gap, noise);
    let next = (price + delta).max(config.price_floor);

    let next_price = to_decimal(next, 6).unwrap_or(previous);
    let market_cap = next_price
        .checked_mul(economy.total_supply)
        .unwrap_or(economy.market_cap);
    let traded_fraction = dice.between(config.volume_min, config.volume_max);
    let daily_volume = to_decimal(supply * traded_fraction * next, 2).unwrap_or(Decimal::ZERO);

    economy.price = next_price;
    economy.market_cap = market_cap;
    economy.daily_volume = daily_volume;
    economy.spending_this_tick = Decimal::ZERO;
    economy.price_history.push(PricePoint {
        epoch,
        price: next_price,
    });
    trim_to_recent(&mut economy.price_history, history_cap);

    PriceMove {
        previous,
        price: next_price,
        market_cap,
        daily_volume,
    }
}

/// Convert a float to a [`Decimal`] rounded to `dp` places.
///
/// Returns `None` for non-finite input.
pub fn to_decimal(value: f64, dp: u32) -> Option<Decimal> {
    if value.is_finite() {
        Decimal::from_f64_retain(value).map(|d| d.round_dp(dp))
    } else {
        None
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use township_types::SeededDice;

    fn economy_with_supply(supply: i64) -> EconomyLedger {
        EconomyLedger {
            circulating_supply: Decimal::new(supply, 0),
            ..EconomyLedger::default()
        }
    }

    #[test]
    fn price_never_drops_below_floor() {
        let mut economy = economy_with_supply(1_000);
        economy.price = Decimal::new(1, 2);
        let config = PricingConfig {
            elasticity: 50.0,
            ..PricingConfig::default()
        };
        let mut dice = SeededDice::from_seed(5);
        for epoch in 0..50 {
            discover_price(epoch, &mut economy, Mood::Chaotic, &config, &mut dice, 288);
            assert!(economy.price >= Decimal::new(1, 2));
        }
    }

    #[test]
    fn spending_pushes_price_up() {
        let mut economy = economy_with_supply(1_000);
        economy.spending_this_tick = Decimal::new(10_000, 0);
        let config = PricingConfig {
            noise: 0.0,
            ..PricingConfig::default()
        };
        let mut dice = SeededDice::from_seed(5);
        let moved = discover_price(1, &mut economy, Mood::Calm, &config, &mut dice, 288);
        assert!(moved.price > moved.previous);
        assert_eq!(economy.spending_this_tick, Decimal::ZERO);
    }

    #[test]
    fn market_cap_uses_total_supply() {
        let mut economy = economy_with_supply(1_000);
        let mut dice = SeededDice::from_seed(9);
        let moved = discover_price(
            1,
            &mut economy,
            Mood::Calm,
            &PricingConfig::default(),
            &mut dice,
            288,
        );
        assert_eq!(
            moved.market_cap,
            moved.price.checked_mul(Decimal::new(21_000_000, 0)).unwrap()
        );
    }

    #[test]
    fn history_is_bounded() {
        let mut economy = economy_with_supply(100);
        let mut dice = SeededDice::from_seed(2);
        for epoch in 0..20 {
            discover_price(epoch, &mut economy, Mood::Focused, &PricingConfig::default(), &mut dice, 5);
        }
        assert_eq!(economy.price_history.len(), 5);
        assert_eq!(economy.price_history.first().unwrap().epoch, 15);
    }

    #[test]
    fn empty_supply_only_drifts_by_noise() {
        let mut economy = EconomyLedger::default();
        let config = PricingConfig {
            noise: 0.0,
            ..PricingConfig::default()
        };
        let mut dice = SeededDice::from_seed(2);
        let moved = discover_price(1, &mut economy, Mood::Euphoric, &config, &mut dice, 10);
        assert_eq!(moved.price, Decimal::ONE);
        assert_eq!(moved.daily_volume, Decimal::ZERO);
    }
}
