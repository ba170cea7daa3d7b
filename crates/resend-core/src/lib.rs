//! resend-core
//!
//! 失敗した build 通知を fleet 全体から集めて、管理者の操作で一括再送する
//! ためのコア。
//!
//! # モジュール構成
//! - **domain**: record, aggregate, snapshot, outcome, errors, ids
//! - **ports**: host / 設定ストア / sender の抽象化（FleetProjectSource など）
//! - **app**: collector → aggregator → registry → replay engine、builder
//! - **impls**: InMemoryHost、RecordingSenderFactory、HttpSenderFactory など

pub mod app;
pub mod domain;
pub mod impls;
pub mod ports;

pub use app::{FleetNotificationRegistry, ReplayEngine, ResendApp, ResendAppBuilder};
pub use domain::{ReplayReport, ResendError};
