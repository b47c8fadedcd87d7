//! # Source Factory
//!
//! Sample source construction module.
//!
//! Responsibilities:
//! - Build concrete `SampleSource` implementations from a `WatchBlueprint`
//! - Mock IMU with synthetic motion profiles
//! - Replay of recorded JSONL sample logs
//!
//! A real bus-attached IMU driver would be a third implementation of the
//! same trait; the engine never learns which one it is talking to.

pub mod error;
pub mod factory;
pub mod mock_imu;
pub mod replay;

pub use contracts::{MotionProfile, SampleSource, SourceKind, WatchBlueprint};
pub use error::{Result, SourceFactoryError};
pub use factory::SourceFactory;
pub use mock_imu::{MockImuConfig, MockImuSource};
pub use replay::{ReplayOptions, ReplaySource};
