//! Ports - 抽象化レイヤー
//!
//! host（project / build / 設定ストア）と通知の送信先をこのモジュールの
//! trait で抽象化します。registry と replay engine はここに依存し、
//! 実装（in-memory host、HTTP sender など）は impls に置きます。
//!
//! # 設計原則
//! - host の状態が正本（source of truth）。このクレートは何も永続化しない
//! - すべての port は注入される（グローバルな host accessor は使わない）

pub mod build_actions;
pub mod clock;
pub mod config_lookup;
pub mod fleet_source;
pub mod id_generator;
pub mod sender;

pub use self::build_actions::BuildActionSource;
pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::config_lookup::DeliveryConfigLookup;
pub use self::fleet_source::FleetProjectSource;
pub use self::id_generator::{IdGenerator, UlidGenerator};
pub use self::sender::{NotificationSender, SenderFactory};
