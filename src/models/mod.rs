mod candle;
mod catalog;
mod fingerprint;
mod interval;
mod period;
mod window;
pub mod timestamp;

pub use candle::{Candle, PriceChange, PriceSeries};
pub use catalog::Catalog;
pub use fingerprint::{canonical_float, fingerprint_id, Fingerprint};
pub use interval::CandleInterval;
pub use period::Period;
pub use window::WindowLabel;
