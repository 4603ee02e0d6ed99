//! 校验模块
//!
//! 规则引擎、内置规则（`cosmosrpcurl`、`derivationpath`、`semver`）、
//! 缺失字段报告以及 JSON 绑定

pub mod cosmos_rpc;
pub mod derivation_path;
pub mod engine;
pub mod missing_fields;
pub mod semver;

use serde::de::DeserializeOwned;

use crate::{config::ValidationConfig, error::ModelError};

pub use cosmos_rpc::{cosmos_rpc_url, validate_cosmos_rpc_url, RpcUrlError, COSMOS_RPC_URL};
pub use derivation_path::{derivation_path, parse_derivation_path, DERIVATION_PATH};
pub use engine::{
    Constraint, FieldCheck, FieldError, FieldValue, RuleEngine, StructLevel, StructValidator,
    Validatable, ValidationErrors,
};
pub use missing_fields::{missing_fields, missing_fields_err};
pub use semver::{semver, SEMVER};

/// 内置规则名
pub const BUILTIN_RULES: [&str; 3] = [COSMOS_RPC_URL, DERIVATION_PATH, SEMVER];

/// 注册全部内置规则
pub fn register_builtin_rules(validator: &mut dyn StructValidator) -> Result<(), ModelError> {
    cosmos_rpc_url(validator)?;
    derivation_path(validator)?;
    semver(validator)
}

/// 按配置注册规则
pub fn register_configured_rules(
    validator: &mut dyn StructValidator,
    config: &ValidationConfig,
) -> Result<(), ModelError> {
    for rule in &config.rules {
        match rule.as_str() {
            COSMOS_RPC_URL => cosmos_rpc_url(validator)?,
            DERIVATION_PATH => derivation_path(validator)?,
            SEMVER => semver(validator)?,
            other => {
                return Err(ModelError::Registration(format!(
                    "unknown validation rule {other}"
                )))
            }
        }
    }
    Ok(())
}

/// 已注册全部内置规则的引擎
pub fn default_engine() -> Result<RuleEngine, ModelError> {
    let mut engine = RuleEngine::new();
    register_builtin_rules(&mut engine)?;
    Ok(engine)
}

/// 解码 JSON 并校验
pub fn bind_json<T>(body: &[u8], validator: &dyn StructValidator) -> Result<T, ModelError>
where
    T: DeserializeOwned + Validatable,
{
    let value: T = serde_json::from_slice(body)?;
    validator.validate_struct(&value)?;
    Ok(value)
}
