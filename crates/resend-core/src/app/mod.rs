//! App - アプリケーション層
//!
//! ports を組み合わせて、発見 → 集約 → 再送 の流れを実装します。
//!
//! # 主要コンポーネント
//! - **BuildNotificationCollector**: 1 build の pending record
//! - **ProjectNotificationAggregator**: project 単位の aggregate（存在ルール付き）
//! - **FleetNotificationRegistry**: fleet 全体の snapshot と pending module 一覧
//! - **ReplayEngine**: aggregate ごとに失敗を隔離した一括再送
//! - **ResendAppBuilder**: 上記のワイヤリング

pub mod aggregator;
pub mod builder;
pub mod collector;
pub mod registry;
pub mod replay;
pub mod status;

pub use self::aggregator::ProjectNotificationAggregator;
pub use self::builder::{BuildError, ResendApp, ResendAppBuilder};
pub use self::collector::BuildNotificationCollector;
pub use self::registry::FleetNotificationRegistry;
pub use self::replay::ReplayEngine;
pub use self::status::RegistryStatus;
