//! App - アプリケーション層
//!
//! このモジュールは、ports とコンポーネントを組み合わせてトラッカーを構成します。
//!
//! # 主要コンポーネント
//! - **TrackerBuilder**: 構築とワイヤリング（設定の検証）
//! - **Tracker**: すべての操作の入口（members, tasks, notifications, celebration）
//! - **TimerDriver**: 期限の発火ループ

pub mod builder;
pub mod driver;
pub mod tracker;

pub use self::builder::{BuildError, TrackerBuilder};
pub use self::driver::{SharedTracker, TimerDriver, TrackerGuard};
pub use self::tracker::{BulkOutcome, Tracker, TrackerSnapshot};
