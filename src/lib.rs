//! chainmodels - 多链钱包 / 索引后端的链元数据模型与校验层
//!
//! 链配置在内存、API JSON 与数据库列三种表示之间的编解码，
//! 以及提交记录的可插拔字段/结构体校验。

pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod utils;
pub mod validation;

// 重新导出常用类型
pub use error::{CodecError, ErrorKind, ModelError};

// 统一模块导出
pub mod prelude {
    pub use crate::{
        domain::{
            Bech32Config, Chain, ChannelQuery, DbStringMap, Denom, DenomList, GasPrice, NodeInfo,
            PublicNodeEndpoints, Threshold,
        },
        error::{CodecError, ModelError},
        infrastructure::{BlobCodec, DbValue},
        validation::{
            bind_json, default_engine, missing_fields, missing_fields_err, RuleEngine,
            StructValidator, Validatable, ValidationErrors,
        },
    };
}
