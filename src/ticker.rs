use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::TickerConfig;
use crate::error::ConfigError;
use crate::model::shock::Shock;
use crate::model::tick::Tick;

/// Random-walk price source.
///
/// Owns the current price. Each `advance` moves it by a uniform step in
/// `[-max_step, max_step)` and never lets it drop under the floor.
#[derive(Debug)]
pub struct PriceTicker<R = StdRng> {
    price: f64,
    floor: f64,
    max_step: f64,
    buy_multiplier: f64,
    sell_multiplier: f64,
    rng: R,
}

impl PriceTicker<StdRng> {
    pub fn from_entropy(config: &TickerConfig) -> Result<Self, ConfigError> {
        Self::new(config, StdRng::from_entropy())
    }
}

impl<R: Rng> PriceTicker<R> {
    /// Rejects settings `advance` cannot sample from, such as a
    /// non-positive `max_step`.
    pub fn new(config: &TickerConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            price: config.initial_price,
            floor: config.price_floor,
            max_step: config.max_step,
            buy_multiplier: config.buy_multiplier,
            sell_multiplier: config.sell_multiplier,
            rng,
        })
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    /// Take one cadence step and emit the new price stamped with `now`.
    pub fn advance(&mut self, now: i64) -> Tick {
        let delta = self.rng.gen_range(-self.max_step..self.max_step);
        self.price = (self.price + delta).max(self.floor);
        Tick::new(now, self.price)
    }

    /// Multiply the current price without emitting a tick. The next
    /// `advance` starts from the shocked price.
    pub fn apply_shock(&mut self, multiplier: f64) {
        self.price = (self.price * multiplier).max(self.floor);
    }

    pub fn apply(&mut self, shock: Shock) -> f64 {
        let multiplier = match shock {
            Shock::Buy => self.buy_multiplier,
            Shock::Sell => self.sell_multiplier,
        };
        self.apply_shock(multiplier);
        self.price
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticker(seed: u64) -> PriceTicker {
        PriceTicker::new(&TickerConfig::default(), StdRng::seed_from_u64(seed)).unwrap()
    }

    #[test]
    fn advance_moves_at_most_one_step() {
        let mut t = ticker(7);
        let mut prev = t.price();
        for now in 0..500 {
            let tick = t.advance(now);
            assert_eq!(tick.timestamp, now);
            assert!((tick.price - t.price()).abs() < f64::EPSILON);
            assert!((tick.price - prev).abs() <= 1.0);
            prev = tick.price;
        }
    }

    #[test]
    fn price_never_drops_below_floor() {
        let config = TickerConfig {
            initial_price: 0.5,
            max_step: 5.0,
            ..TickerConfig::default()
        };
        let mut t = PriceTicker::new(&config, StdRng::seed_from_u64(1)).unwrap();
        for now in 0..1_000 {
            assert!(t.advance(now).price >= 0.0);
        }
    }

    #[test]
    fn shocks_use_configured_multipliers() {
        let mut t = ticker(3);
        assert!((t.apply(Shock::Buy) - 157.5).abs() < 1e-9);
        assert!((t.apply(Shock::Sell) - 149.625).abs() < 1e-9);
    }

    #[test]
    fn new_rejects_empty_step_range() {
        let config = TickerConfig {
            max_step: 0.0,
            ..TickerConfig::default()
        };
        let err = PriceTicker::new(&config, StdRng::seed_from_u64(1)).unwrap_err();
        assert_eq!(err, ConfigError::InvalidMaxStep(0.0));
    }
}
