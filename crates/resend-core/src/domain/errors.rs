//! Errors - エラー型と分類
//!
//! ResendError は refresh / replay の内部でだけ発生し、project 単位で
//! 捕捉されます。fleet 全体の操作を中断させるエラーはありません。

use thiserror::Error;

/// ErrorKind は運用上の分類（ログのフィールドに使う）
///
/// - Transient: 一時的なエラー（次回の replay で解消しうる）
/// - Permanent: 恒久的なエラー（設定の修正が必要）
/// - Infrastructure: host / IO の障害
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transient,
    Permanent,
    Infrastructure,
}

#[derive(Debug, Error)]
pub enum ResendError {
    #[error("host error: {0}")]
    Host(String),

    #[error("failed to aggregate project '{project}': {source}")]
    Aggregation {
        project: String,
        #[source]
        source: Box<ResendError>,
    },

    #[error("failed to build sender for project '{project}': {source}")]
    SenderConstruction {
        project: String,
        #[source]
        source: Box<ResendError>,
    },

    #[error("failed to send notifications of build {build}: {source}")]
    Send {
        build: String,
        #[source]
        source: Box<ResendError>,
    },

    #[error("delivery rejected: {0}")]
    Delivery(String),

    #[error("invalid delivery config: {0}")]
    InvalidConfig(String),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ResendError {
    pub fn aggregation(project: impl Into<String>, source: ResendError) -> Self {
        Self::Aggregation {
            project: project.into(),
            source: Box::new(source),
        }
    }

    pub fn sender_construction(project: impl Into<String>, source: ResendError) -> Self {
        Self::SenderConstruction {
            project: project.into(),
            source: Box::new(source),
        }
    }

    pub fn send(build: impl ToString, source: ResendError) -> Self {
        Self::Send {
            build: build.to_string(),
            source: Box::new(source),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Aggregation { source, .. }
            | Self::SenderConstruction { source, .. }
            | Self::Send { source, .. } => source.kind(),
            Self::Delivery(_) | Self::Http(_) => ErrorKind::Transient,
            Self::InvalidConfig(_) | Self::Json(_) => ErrorKind::Permanent,
            Self::Host(_) | Self::Io(_) => ErrorKind::Infrastructure,
        }
    }
}
