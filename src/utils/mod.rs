mod colors;
mod format;
pub mod time_utils;

pub use colors::{hue_to_hsl, symbol_hue};
pub use format::{format_amount, format_percent, format_price};
pub use time_utils::{Clock, ManualClock, SystemClock, TimeUtils, format_clock_time};
