mod indicators;

pub use indicators::{
    IndicatorPoint, OverlayKind, OverlaySeries, OverlaySpec, compute_overlays, ema, sma,
};
