use crate::model::candle::Candle;
use crate::model::shock::Shock;
use crate::model::tick::Tick;

#[derive(Debug, Clone)]
pub enum AppEvent {
    /// One cadence step: the emitted tick and the candle it was folded into.
    Tick { tick: Tick, candle: Candle, candles: usize },
    ShockApplied { shock: Shock, price: f64 },
    SimulatorStopped,
    LogMessage(String),
}
