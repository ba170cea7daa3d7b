//! Impls - ports の実装
//!
//! # 含まれる実装
//! - **InMemoryHost**: 開発・テスト用の host（JSON の fleet ファイルから読み込み可能）
//! - **RecordingSenderFactory**: 送信を記録するだけの sender（dry-run / テスト用）
//! - **ResolvingSenderFactory**: 送信成功時に InMemoryHost の pending を消す decorator
//! - **HttpSenderFactory**: endpoint に JSON を POST する本番用 sender

pub mod http_sender;
pub mod inmem_host;
pub mod recording_sender;
pub mod resolving_sender;

pub use self::http_sender::HttpSenderFactory;
pub use self::inmem_host::{BuildState, FleetState, InMemoryHost, PendingModule, ProjectState};
pub use self::recording_sender::{RecordingSenderFactory, SentBatch};
pub use self::resolving_sender::ResolvingSenderFactory;
