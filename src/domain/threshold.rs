//! 有效出块时间阈值
//!
//! 线上与库中均为持续时间字符串（如 "32m"），内存中为 `Duration`

use std::{fmt, str::FromStr, time::Duration};

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use sqlx::{
    encode::IsNull,
    error::BoxDynError,
    postgres::{PgArgumentBuffer, PgTypeInfo, PgValueRef},
    Decode, Encode, Postgres, Type,
};

use crate::{
    error::CodecError,
    infrastructure::column_codec::DbValue,
    utils::time_utils::{format_duration, parse_duration},
};

/// 可存库的持续时间
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Threshold(Duration);

impl Threshold {
    pub fn new(duration: Duration) -> Self {
        Self(duration)
    }

    pub fn duration(&self) -> Duration {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// 从库中读取：只接受文本列
    pub fn scan(&mut self, value: &DbValue) -> Result<(), CodecError> {
        let DbValue::Text(text) = value else {
            tracing::warn!(found = value.kind(), "threshold column is not text");
            *self = Self::default();
            return Err(CodecError::InvalidEncoding {
                type_name: "Threshold",
                found: value.kind(),
            });
        };

        match text.parse() {
            Ok(parsed) => {
                *self = parsed;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "threshold column holds a malformed duration");
                *self = Self::default();
                Err(e)
            }
        }
    }

    /// 写入库：规范持续时间字符串
    pub fn to_storage(&self) -> DbValue {
        DbValue::Text(self.to_string())
    }
}

impl From<Duration> for Threshold {
    fn from(duration: Duration) -> Self {
        Self(duration)
    }
}

impl FromStr for Threshold {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_duration(s).map(Self)
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_duration(self.0))
    }
}

impl Serialize for Threshold {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Threshold {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

impl Type<Postgres> for Threshold {
    fn type_info() -> PgTypeInfo {
        <String as Type<Postgres>>::type_info()
    }

    fn compatible(ty: &PgTypeInfo) -> bool {
        <String as Type<Postgres>>::compatible(ty)
    }
}

impl<'q> Encode<'q, Postgres> for Threshold {
    fn encode_by_ref(&self, buf: &mut PgArgumentBuffer) -> IsNull {
        <String as Encode<'q, Postgres>>::encode(self.to_string(), buf)
    }
}

impl<'r> Decode<'r, Postgres> for Threshold {
    fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
        let raw = <&str as Decode<'r, Postgres>>::decode(value)?;
        Ok(raw.parse::<Threshold>()?)
    }
}
