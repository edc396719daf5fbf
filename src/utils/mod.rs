mod time_utils;

pub use time_utils::{TimeUtils, epoch_sec_to_label};
