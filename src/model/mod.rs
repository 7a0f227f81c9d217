pub mod candle;
pub mod shock;
pub mod tick;
