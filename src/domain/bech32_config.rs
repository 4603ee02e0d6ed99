//! 链的 Bech32 前缀配置
//!
//! 六个原始前缀片段是唯一的真实数据；派生前缀每次都由片段拼接得出，
//! 只出现在 API 输出中，不入库。

use serde::{Deserialize, Serialize, Serializer};

use crate::validation::{Constraint, FieldCheck, FieldValue, Validatable};

/// Bech32 前缀配置
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Bech32Config {
    pub main_prefix: String,
    pub prefix_account: String,
    pub prefix_validator: String,
    pub prefix_consensus: String,
    pub prefix_public: String,
    pub prefix_operator: String,
}

/// API 输出形式：原始片段 + 派生前缀
#[derive(Debug, Serialize)]
pub struct Bech32ConfigWire<'a> {
    pub main_prefix: &'a str,
    pub prefix_account: &'a str,
    pub prefix_validator: &'a str,
    pub prefix_consensus: &'a str,
    pub prefix_public: &'a str,
    pub prefix_operator: &'a str,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub acc_addr: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub acc_pub: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub val_addr: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub val_pub: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub cons_addr: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub cons_pub: String,
}

/// 存储形式：仅原始片段
#[derive(Debug, Serialize)]
pub struct Bech32ConfigRecord<'a> {
    pub main_prefix: &'a str,
    pub prefix_account: &'a str,
    pub prefix_validator: &'a str,
    pub prefix_consensus: &'a str,
    pub prefix_public: &'a str,
    pub prefix_operator: &'a str,
}

impl Bech32Config {
    /// Bech32 prefix of an account's address
    pub fn bech32_prefix_acc_addr(&self) -> String {
        self.main_prefix.clone()
    }

    /// Bech32 prefix of an account's public key
    pub fn bech32_prefix_acc_pub(&self) -> String {
        format!("{}{}", self.main_prefix, self.prefix_public)
    }

    /// Bech32 prefix of a validator's operator address
    pub fn bech32_prefix_val_addr(&self) -> String {
        format!(
            "{}{}{}",
            self.main_prefix, self.prefix_validator, self.prefix_operator
        )
    }

    /// Bech32 prefix of a validator's operator public key
    pub fn bech32_prefix_val_pub(&self) -> String {
        format!(
            "{}{}{}{}",
            self.main_prefix, self.prefix_validator, self.prefix_operator, self.prefix_public
        )
    }

    /// Bech32 prefix of a consensus node address
    pub fn bech32_prefix_cons_addr(&self) -> String {
        format!(
            "{}{}{}",
            self.main_prefix, self.prefix_validator, self.prefix_consensus
        )
    }

    /// Bech32 prefix of a consensus node public key
    pub fn bech32_prefix_cons_pub(&self) -> String {
        format!(
            "{}{}{}{}",
            self.main_prefix, self.prefix_validator, self.prefix_consensus, self.prefix_public
        )
    }

    pub fn to_wire(&self) -> Bech32ConfigWire<'_> {
        Bech32ConfigWire {
            main_prefix: &self.main_prefix,
            prefix_account: &self.prefix_account,
            prefix_validator: &self.prefix_validator,
            prefix_consensus: &self.prefix_consensus,
            prefix_public: &self.prefix_public,
            prefix_operator: &self.prefix_operator,
            acc_addr: self.bech32_prefix_acc_addr(),
            acc_pub: self.bech32_prefix_acc_pub(),
            val_addr: self.bech32_prefix_val_addr(),
            val_pub: self.bech32_prefix_val_pub(),
            cons_addr: self.bech32_prefix_cons_addr(),
            cons_pub: self.bech32_prefix_cons_pub(),
        }
    }

    pub fn to_storage(&self) -> Bech32ConfigRecord<'_> {
        Bech32ConfigRecord {
            main_prefix: &self.main_prefix,
            prefix_account: &self.prefix_account,
            prefix_validator: &self.prefix_validator,
            prefix_consensus: &self.prefix_consensus,
            prefix_public: &self.prefix_public,
            prefix_operator: &self.prefix_operator,
        }
    }
}

// JSON 编码始终走 API 形式；解码只读取原始片段，派生字段被忽略
impl Serialize for Bech32Config {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_wire().serialize(serializer)
    }
}

impl Validatable for Bech32Config {
    fn struct_name(&self) -> &'static str {
        "Bech32Config"
    }

    fn fields(&self) -> Vec<FieldCheck<'_>> {
        use Constraint::Required;
        vec![
            FieldCheck::new("main_prefix", FieldValue::Str(&self.main_prefix), [Required]),
            FieldCheck::new(
                "prefix_account",
                FieldValue::Str(&self.prefix_account),
                [Required],
            ),
            FieldCheck::new(
                "prefix_validator",
                FieldValue::Str(&self.prefix_validator),
                [Required],
            ),
            FieldCheck::new(
                "prefix_consensus",
                FieldValue::Str(&self.prefix_consensus),
                [Required],
            ),
            FieldCheck::new(
                "prefix_public",
                FieldValue::Str(&self.prefix_public),
                [Required],
            ),
            FieldCheck::new(
                "prefix_operator",
                FieldValue::Str(&self.prefix_operator),
                [Required],
            ),
        ]
    }
}
