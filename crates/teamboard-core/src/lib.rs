//! teamboard-core
//!
//! Core of a marketing-team task tracker: members, tasks with bulk
//! operations, transient notifications and a completion celebration.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, member, task, notification, celebration, errors, events）
//! - **ports**: 抽象化レイヤー（Clock, IdGenerator, EventSink）
//! - **registry / board / notifications**: 各コンポーネントの状態
//! - **timers**: 期限キュー
//! - **report**: 集計
//! - **app**: Tracker, TrackerBuilder, TimerDriver
//! - **config**: 設定（TOML + 環境変数）

pub mod app;
pub mod board;
pub mod config;
pub mod domain;
pub mod notifications;
pub mod ports;
pub mod registry;
pub mod report;
pub mod seed;
pub mod timers;

pub use crate::app::{
    BuildError, BulkOutcome, SharedTracker, TimerDriver, Tracker, TrackerBuilder, TrackerSnapshot,
};
pub use crate::config::{ConfigError, TrackerConfig};
