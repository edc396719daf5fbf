// Domain types and value objects
mod bar;
mod tick;
mod timeframe;

// Re-export commonly used types to the world
pub use bar::{Bar, CandleType};
pub use tick::LiveTick;
pub use timeframe::{InvalidTimeframe, Timeframe};
