//! Per-domain collectors.
//!
//! Each collector walks a bounded key set (years, or one fixed request),
//! calls its source once per key, and accumulates flat records across keys.
//! A failed key is skipped, never retried; an empty accumulation means the
//! domain's output file is not written at all.

pub mod circuits;
pub mod race_results;
pub mod schedules;
pub mod session_results;
pub mod standings;
pub mod weather;

pub use circuits::collect_circuits;
pub use race_results::{collect_singapore_results, SINGAPORE_CIRCUIT_ID};
pub use schedules::collect_schedules;
pub use session_results::collect_session_results;
pub use standings::{collect_constructor_standings, collect_driver_standings};
pub use weather::collect_weather;
