//! 数据库列编解码
//!
//! 复合字段在库中各占一列，存储为 JSON 编码的字节块（Postgres JSONB）。
//! 本模块是字节块与内存中复合值之间唯一的转换层。

use serde::{de::DeserializeOwned, Serialize};

use crate::error::CodecError;

/// 数据库驱动交给扫描器的原始列值
#[derive(Debug, Clone, PartialEq)]
pub enum DbValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
}

impl DbValue {
    /// 值的类型名，用于错误信息
    pub fn kind(&self) -> &'static str {
        match self {
            DbValue::Null => "null",
            DbValue::Bool(_) => "bool",
            DbValue::Int(_) => "int",
            DbValue::Float(_) => "float",
            DbValue::Text(_) => "text",
            DbValue::Bytes(_) => "bytes",
        }
    }
}

/// 以单个字节块存储的复合值
///
/// 解码失败不会产生部分填充的值：`decode_blob` 直接返回错误，
/// `scan` 则把目标重置为零值后返回错误。
pub trait BlobCodec: DeserializeOwned + Default {
    /// 类型名，用于错误信息与日志
    const TYPE_NAME: &'static str;

    /// 存储形式（不含仅用于展示的派生字段）
    type Stored<'a>: Serialize
    where
        Self: 'a;

    fn to_storage(&self) -> Self::Stored<'_>;

    fn encode_blob(&self) -> Result<DbValue, CodecError> {
        serde_json::to_vec(&self.to_storage())
            .map(DbValue::Bytes)
            .map_err(|source| CodecError::MalformedContent {
                type_name: Self::TYPE_NAME,
                source,
            })
    }

    fn decode_blob(value: &DbValue) -> Result<Self, CodecError> {
        decode_json_blob(Self::TYPE_NAME, value)
    }

    fn scan(&mut self, value: &DbValue) -> Result<(), CodecError> {
        match Self::decode_blob(value) {
            Ok(decoded) => {
                *self = decoded;
                Ok(())
            }
            Err(e) => {
                *self = Self::default();
                Err(e)
            }
        }
    }
}

/// 把字节块按 JSON 解析为目标类型；JSON `null` 解析为零值
pub fn decode_json_blob<T: DeserializeOwned + Default>(
    type_name: &'static str,
    value: &DbValue,
) -> Result<T, CodecError> {
    let DbValue::Bytes(bytes) = value else {
        tracing::warn!(
            type_name,
            found = value.kind(),
            "stored column is not a byte sequence"
        );
        return Err(CodecError::InvalidEncoding {
            type_name,
            found: value.kind(),
        });
    };

    serde_json::from_slice::<Option<T>>(bytes)
        .map(Option::unwrap_or_default)
        .map_err(|source| {
            tracing::warn!(type_name, error = %source, "stored column holds malformed JSON");
            CodecError::MalformedContent { type_name, source }
        })
}

/// 为复合类型实现 Postgres JSONB 列的 sqlx 编解码，写入时使用 `to_storage` 形式
macro_rules! impl_jsonb_column {
    ($($ty:ty),* $(,)?) => {$(
        impl ::sqlx::Type<::sqlx::Postgres> for $ty {
            fn type_info() -> ::sqlx::postgres::PgTypeInfo {
                <::sqlx::types::Json<Self> as ::sqlx::Type<::sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &::sqlx::postgres::PgTypeInfo) -> bool {
                <::sqlx::types::Json<Self> as ::sqlx::Type<::sqlx::Postgres>>::compatible(ty)
            }
        }

        impl<'q> ::sqlx::Encode<'q, ::sqlx::Postgres> for $ty {
            fn encode_by_ref(
                &self,
                buf: &mut ::sqlx::postgres::PgArgumentBuffer,
            ) -> ::sqlx::encode::IsNull {
                let stored = ::sqlx::types::Json(
                    $crate::infrastructure::column_codec::BlobCodec::to_storage(self),
                );
                ::sqlx::Encode::<'q, ::sqlx::Postgres>::encode_by_ref(&stored, buf)
            }
        }

        impl<'r> ::sqlx::Decode<'r, ::sqlx::Postgres> for $ty {
            fn decode(
                value: ::sqlx::postgres::PgValueRef<'r>,
            ) -> Result<Self, ::sqlx::error::BoxDynError> {
                let ::sqlx::types::Json(inner) = <::sqlx::types::Json<Option<Self>> as ::sqlx::Decode<
                    'r,
                    ::sqlx::Postgres,
                >>::decode(value)?;
                Ok(inner.unwrap_or_default())
            }
        }
    )*};
}

pub(crate) use impl_jsonb_column;

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Sample {
        name: String,
        weights: BTreeMap<String, u32>,
    }

    impl BlobCodec for Sample {
        const TYPE_NAME: &'static str = "Sample";
        type Stored<'a> = &'a Sample;

        fn to_storage(&self) -> &Sample {
            self
        }
    }

    #[test]
    fn test_blob_round_trip() {
        let mut sample = Sample {
            name: "osmosis".to_string(),
            ..Default::default()
        };
        sample.weights.insert("uosmo".to_string(), 3);

        let encoded = sample.encode_blob().unwrap();
        assert_eq!(Sample::decode_blob(&encoded).unwrap(), sample);
        // 重复编码得到完全相同的字节
        assert_eq!(
            Sample::decode_blob(&encoded).unwrap().encode_blob().unwrap(),
            encoded
        );
    }

    #[test]
    fn test_non_bytes_rejected() {
        let err = Sample::decode_blob(&DbValue::Text("{}".into())).unwrap_err();
        assert!(matches!(
            err,
            CodecError::InvalidEncoding { found: "text", .. }
        ));
        assert!(Sample::decode_blob(&DbValue::Null).is_err());
    }

    #[test]
    fn test_json_null_is_zero_value() {
        let mut sample = Sample {
            name: "stale".to_string(),
            ..Default::default()
        };
        sample.scan(&DbValue::Bytes(b"null".to_vec())).unwrap();
        assert_eq!(sample, Sample::default());
        // SQL NULL 仍然不是字节块
        assert!(Sample::decode_blob(&DbValue::Null).is_err());
    }

    #[test]
    fn test_scan_resets_on_failure() {
        let mut sample = Sample {
            name: "stale".to_string(),
            ..Default::default()
        };
        let err = sample.scan(&DbValue::Bytes(b"foo".to_vec())).unwrap_err();
        assert!(matches!(err, CodecError::MalformedContent { .. }));
        assert_eq!(sample, Sample::default());
    }
}
