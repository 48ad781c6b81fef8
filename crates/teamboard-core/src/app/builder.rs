//! TrackerBuilder - トラッカーの構築とワイヤリング
//!
//! Ports default to production implementations; tests swap in a
//! `FixedClock` or a recording sink. The configuration is validated before
//! anything is wired (fail-fast).

use std::sync::Arc;

use tracing::debug;

use crate::app::tracker::Tracker;
use crate::config::{ConfigError, TrackerConfig};
use crate::ports::{Clock, EventSink, IdGenerator, MonotonicIdGenerator, NoopEventSink, SystemClock};

/// TrackerBuilder は Tracker を構築
///
/// # 使用例
/// ```ignore
/// let tracker = TrackerBuilder::new()
///     .config(TrackerConfig::load("teamboard.toml")?)
///     .event_sink(LogEventSink)
///     .build()?;
/// ```
///
/// # Fail-fast 設計
/// - build() 時に設定を検証（ttl が 0 なら BuildError）
/// - 未指定の port は本番用のデフォルトで埋める
pub struct TrackerBuilder {
    config: TrackerConfig,
    clock: Option<Arc<dyn Clock>>,
    ids: Option<Arc<dyn IdGenerator>>,
    sink: Option<Arc<dyn EventSink>>,
}

/// BuildError は構築時のエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),
}

impl TrackerBuilder {
    pub fn new() -> Self {
        Self {
            config: TrackerConfig::default(),
            clock: None,
            ids: None,
            sink: None,
        }
    }

    pub fn config(mut self, config: TrackerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Some(Arc::new(clock));
        self
    }

    /// Defaults to a `MonotonicIdGenerator` over the tracker's clock.
    pub fn id_generator(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Some(Arc::new(ids));
        self
    }

    pub fn event_sink(mut self, sink: impl EventSink + 'static) -> Self {
        self.sink = Some(Arc::new(sink));
        self
    }

    /// # 検証
    /// - ttl が 0 なら `BuildError::InvalidConfig`
    pub fn build(self) -> Result<Tracker, BuildError> {
        self.config.validate()?;

        let clock: Arc<dyn Clock> = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        let ids = self
            .ids
            .unwrap_or_else(|| Arc::new(MonotonicIdGenerator::new(Arc::clone(&clock))));
        let sink = self.sink.unwrap_or_else(|| Arc::new(NoopEventSink));

        let seed = self.config.seed_sample_data;
        let mut tracker = Tracker::new(self.config, clock, ids, sink);
        if seed {
            tracker.load_sample_data();
        }
        debug!(seed, "tracker built");
        Ok(tracker)
    }
}

impl Default for TrackerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Level, MemberId, NewMember, Role};
    use crate::ports::FixedClock;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_build_default_seeds_sample_data() {
        let tracker = TrackerBuilder::new().build().unwrap();
        assert_eq!(tracker.members().len(), 3);
        assert_eq!(tracker.tasks().len(), 2);
        assert!(tracker.notifications().is_empty());
    }

    #[test]
    fn test_build_without_seed() {
        let tracker = TrackerBuilder::new()
            .config(TrackerConfig {
                seed_sample_data: false,
                ..TrackerConfig::default()
            })
            .build()
            .unwrap();
        assert!(tracker.members().is_empty());
        assert!(tracker.tasks().is_empty());
    }

    #[test]
    fn test_build_rejects_zero_ttl() {
        let result = TrackerBuilder::new()
            .config(TrackerConfig {
                celebration_ttl_ms: 0,
                ..TrackerConfig::default()
            })
            .build();
        assert!(matches!(
            result,
            Err(BuildError::InvalidConfig(ConfigError::Invalid(_)))
        ));
    }

    #[test]
    fn test_build_with_custom_id_generator() {
        let at = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let clock = FixedClock::new(at);
        let mut tracker = TrackerBuilder::new()
            .config(TrackerConfig {
                seed_sample_data: false,
                ..TrackerConfig::default()
            })
            .clock(clock.clone())
            .id_generator(MonotonicIdGenerator::new(clock))
            .build()
            .unwrap();

        let first = tracker
            .add_member(NewMember::new("Ann", Role::default(), "a@x.com", Level::Junior))
            .unwrap();
        let second = tracker
            .add_member(NewMember::new("Bob", Role::default(), "b@x.com", Level::Junior))
            .unwrap();

        // millisecond ids, bumped within the same instant
        let millis = u64::try_from(at.timestamp_millis()).unwrap();
        assert_eq!(first, MemberId::new(millis));
        assert!(second > first);
    }

    #[test]
    fn test_generated_ids_skip_seed_ids() {
        // a clock at the epoch would otherwise mint id 1
        let epoch = Utc.timestamp_millis_opt(0).unwrap();
        let mut tracker = TrackerBuilder::new()
            .clock(FixedClock::new(epoch))
            .build()
            .unwrap();

        let id = tracker
            .add_member(NewMember::new("Ann", Role::default(), "a@x.com", Level::Junior))
            .unwrap();

        assert!(id > MemberId::new(3));
        assert_eq!(tracker.members().len(), 4);
    }
}
