//! 错误类型
//!
//! 编解码错误（`CodecError`）与模型层统一错误（`ModelError`）

use thiserror::Error;

use crate::validation::ValidationErrors;

/// 错误大类，API 层据此决定返回给用户还是触发数据完整性告警
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 输入（线上 JSON 或库中存储的字节）无法解析为期望的形状
    MalformedInput,
    /// 语法正确，但违反了语义规则
    ConstraintViolation,
    /// 内部错误（规则注册失败等）
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::MalformedInput => "malformed_input",
            ErrorKind::ConstraintViolation => "constraint_violation",
            ErrorKind::Internal => "internal",
        }
    }
}

/// 值编解码错误
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("malformed duration {input:?}: {reason}")]
    MalformedDuration { input: String, reason: &'static str },

    #[error("{type_name}: expected a byte sequence, got {found}")]
    InvalidEncoding {
        type_name: &'static str,
        found: &'static str,
    },

    #[error("{type_name}: malformed content: {source}")]
    MalformedContent {
        type_name: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl CodecError {
    pub(crate) fn malformed_duration(input: &str, reason: &'static str) -> Self {
        CodecError::MalformedDuration {
            input: input.to_string(),
            reason,
        }
    }
}

/// 模型层统一错误
#[derive(Debug, Error)]
pub enum ModelError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error("missing fields: {}", .0.join(","))]
    MissingFields(Vec<String>),

    #[error("validation rule registration failed: {0}")]
    Registration(String),
}

impl ModelError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ModelError::Codec(_) | ModelError::Json(_) => ErrorKind::MalformedInput,
            ModelError::Validation(_) | ModelError::MissingFields(_) => {
                ErrorKind::ConstraintViolation
            }
            ModelError::Registration(_) => ErrorKind::Internal,
        }
    }

    /// 对外的稳定错误码
    pub fn code(&self) -> &'static str {
        self.kind().as_str()
    }
}

pub type Result<T, E = ModelError> = std::result::Result<T, E>;
