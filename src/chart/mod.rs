//! Live chart lifecycle: series setup, data replacement, live patching and
//! teardown, independent of the widget that draws it.

mod live_chart;
mod observers;
mod surface;

pub use live_chart::{ChartEvents, CrosshairCallback, LiveChart};
pub use observers::{Signal, Subscription};
pub use surface::{
    CandleStyle, ChartSurface, CrosshairMove, CrosshairOhlc, LineStyle, VolumePoint, VolumeScale,
};
