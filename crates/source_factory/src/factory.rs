//! SourceFactory core implementation
//!
//! Selects and constructs the concrete `SampleSource` for a blueprint.

use contracts::{SampleSource, SourceKind, WatchBlueprint};
use tracing::{info, instrument};

use crate::error::{Result, SourceFactoryError};
use crate::mock_imu::{MockImuConfig, MockImuSource};
use crate::replay::{ReplayOptions, ReplaySource};

/// Sample source factory
///
/// The rest of the pipeline only ever sees `Box<dyn SampleSource>`; the
/// blueprint decides which implementation backs it.
pub struct SourceFactory;

impl SourceFactory {
    /// Build the source described by the blueprint
    #[instrument(
        name = "source_factory_from_blueprint",
        skip(blueprint),
        fields(source_id = %blueprint.source.id, kind = ?blueprint.source.kind)
    )]
    pub fn from_blueprint(blueprint: &WatchBlueprint) -> Result<Box<dyn SampleSource>> {
        let spec = &blueprint.source;

        match spec.kind {
            SourceKind::Mock => {
                info!(profile = ?spec.profile, frequency_hz = spec.frequency_hz, "building mock imu");
                Ok(Box::new(MockImuSource::new(
                    spec.id.clone(),
                    MockImuConfig {
                        frequency_hz: spec.frequency_hz,
                        profile: spec.profile,
                        offsets: spec.offsets,
                    },
                )))
            }
            SourceKind::Replay => {
                let path = spec.replay.path.as_ref().ok_or_else(|| {
                    SourceFactoryError::MissingReplayPath {
                        source_id: spec.id.clone(),
                    }
                })?;

                info!(path = %path.display(), "building replay source");
                let source = ReplaySource::load(
                    path,
                    spec.id.clone(),
                    ReplayOptions {
                        speed_multiplier: spec.replay.speed_multiplier,
                        loop_playback: spec.replay.loop_playback,
                    },
                    spec.offsets,
                )?;
                Ok(Box::new(source))
            }
        }
    }
}
