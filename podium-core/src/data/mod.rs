//! Remote source clients and shared client plumbing.

pub mod ergast;
pub mod openf1;
pub mod openweather;
pub mod pacing;
pub mod source;

pub use ergast::ErgastClient;
pub use openf1::OpenF1Client;
pub use openweather::OpenWeatherClient;
pub use pacing::RequestPacer;
pub use source::{
    CollectProgress, HistoricalWeatherSource, RaceDataSource, SessionDataSource, SilentProgress,
    SourceError, StdoutProgress,
};
