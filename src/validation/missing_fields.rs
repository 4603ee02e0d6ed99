//! 缺失字段报告
//!
//! 把校验失败集合归约为有序字段名列表，以及一条 `missing fields: a,b` 错误

use super::engine::ValidationErrors;
use crate::error::ModelError;

impl ValidationErrors {
    /// 按收集顺序返回字段名；`use_actual_field` 为真时优先使用完整字段路径
    pub fn field_names(&self, use_actual_field: bool) -> Vec<String> {
        self.iter()
            .map(|e| e.name(use_actual_field).to_string())
            .collect()
    }
}

/// 提取缺失字段名；错误不是校验失败时返回 `None`
pub fn missing_fields(err: &ModelError, use_actual_field: bool) -> Option<Vec<String>> {
    match err {
        ModelError::Validation(errors) => Some(errors.field_names(use_actual_field)),
        _ => None,
    }
}

/// 把校验失败转换为 `ModelError::MissingFields`，其他错误原样返回
pub fn missing_fields_err(err: ModelError, use_actual_field: bool) -> ModelError {
    match err {
        ModelError::Validation(errors) => {
            ModelError::MissingFields(errors.field_names(use_actual_field))
        }
        other => other,
    }
}
