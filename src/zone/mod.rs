//! Platform weight accounting, danger classification, and the periodic
//! monitor that ties them to broadcasts and the pool recharge.

pub mod danger;
pub mod messages;
pub mod monitor;
pub mod status;
pub mod weight;

pub use danger::{classify, DangerLevel};
pub use monitor::{ambient_echo, MonitorReport, PlatformMonitor};
pub use status::format_citizen_status;
pub use weight::{citizen_item_count, current_danger_level, platform_weight, stashed_item_count};
