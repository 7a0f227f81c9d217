use rand::rngs::StdRng;
use rand::SeedableRng;

use candle_sim::config::TickerConfig;
use candle_sim::error::ConfigError;
use candle_sim::model::shock::Shock;
use candle_sim::ticker::PriceTicker;

fn ticker(seed: u64) -> PriceTicker {
    PriceTicker::new(&TickerConfig::default(), StdRng::seed_from_u64(seed)).unwrap()
}

#[test]
/// Verifies the shock scenario:
/// a buy shock moves 150 to 157.5 immediately, and the next advance walks from 157.5.
fn buy_shock_becomes_base_of_next_advance() {
    let mut t = ticker(42);
    assert!((t.price() - 150.0).abs() < f64::EPSILON);

    t.apply_shock(1.05);
    assert!((t.price() - 157.5).abs() < 1e-9);

    let tick = t.advance(1);
    assert!(
        (tick.price - 157.5).abs() <= 1.0,
        "next tick {} should be within one step of the shocked price",
        tick.price
    );
}

#[test]
fn sell_shock_uses_configured_multiplier() {
    let mut t = ticker(1);
    let price = t.apply(Shock::Sell);
    assert!((price - 142.5).abs() < 1e-9);
}

#[test]
fn same_seed_gives_same_walk() {
    let mut a = ticker(9);
    let mut b = ticker(9);
    for now in 0..100 {
        assert_eq!(a.advance(now), b.advance(now));
    }
}

#[test]
fn custom_floor_is_respected() {
    let config = TickerConfig {
        initial_price: 10.0,
        price_floor: 9.5,
        max_step: 3.0,
        ..TickerConfig::default()
    };
    let mut t = PriceTicker::new(&config, StdRng::seed_from_u64(5)).unwrap();
    for now in 0..500 {
        assert!(t.advance(now).price >= 9.5);
    }
    t.apply_shock(0.1);
    assert!((t.price() - 9.5).abs() < f64::EPSILON);
}

#[test]
/// Verifies settings validation at construction:
/// a degenerate step range is rejected instead of panicking on the first advance.
fn ticker_rejects_unsampleable_settings() {
    for max_step in [0.0, -1.0, f64::NAN] {
        let config = TickerConfig {
            max_step,
            ..TickerConfig::default()
        };
        let result = PriceTicker::new(&config, StdRng::seed_from_u64(0));
        assert!(
            matches!(result, Err(ConfigError::InvalidMaxStep(_))),
            "max_step {} should be rejected",
            max_step
        );
    }

    let below_floor = TickerConfig {
        initial_price: 1.0,
        price_floor: 2.0,
        ..TickerConfig::default()
    };
    assert!(PriceTicker::new(&below_floor, StdRng::seed_from_u64(0)).is_err());
}
