//! BIP32 派生路径校验
//!
//! 路径格式：`m/<index>['][/<index>[']]...`，带 `'` 的分量为强化派生

use once_cell::sync::Lazy;
use regex::Regex;

use super::engine::StructValidator;
use crate::error::ModelError;

pub const DERIVATION_PATH: &str = "derivationpath";

/// 强化派生起始索引 (2^31)
const HARDENED_OFFSET: u32 = 0x8000_0000;

static DERIVATION_PATH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^m(/[0-9]+'?)+$").expect("derivation path regex is valid"));

/// 派生路径的一个分量
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildIndex {
    pub index: u32,
    pub hardened: bool,
}

impl ChildIndex {
    /// 含强化偏移的原始索引
    pub fn raw(&self) -> u32 {
        if self.hardened {
            self.index | HARDENED_OFFSET
        } else {
            self.index
        }
    }
}

/// 注册 `derivationpath` 规则
pub fn derivation_path(validator: &mut dyn StructValidator) -> Result<(), ModelError> {
    if let Some(engine) = validator.engine() {
        engine.register_validation(DERIVATION_PATH, |value| {
            parse_derivation_path(value).map(|_| ())
        })?;
    }
    Ok(())
}

/// 解析派生路径
pub fn parse_derivation_path(path: &str) -> Result<Vec<ChildIndex>, String> {
    if path.is_empty() {
        return Err("derivation path cannot be empty".to_string());
    }
    if !DERIVATION_PATH_RE.is_match(path) {
        return Err(format!("malformed derivation path {path}"));
    }

    path[2..]
        .split('/')
        .map(|component| {
            let (digits, hardened) = match component.strip_suffix('\'') {
                Some(digits) => (digits, true),
                None => (component, false),
            };
            let index: u32 = digits
                .parse()
                .map_err(|_| format!("derivation index {digits} out of range"))?;
            if index >= HARDENED_OFFSET {
                return Err(format!("derivation index {digits} out of range"));
            }
            Ok(ChildIndex { index, hardened })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_paths() {
        let path = parse_derivation_path("m/44'/60'/0'/1").unwrap();
        assert_eq!(path.len(), 4);
        assert_eq!(
            path[0],
            ChildIndex {
                index: 44,
                hardened: true
            }
        );
        assert_eq!(path[0].raw(), 0x8000_002C);
        assert!(!path[3].hardened);

        assert!(parse_derivation_path("m/44'/61'/0'/0").is_ok());
        assert!(parse_derivation_path("m/44'/118'/0'/0/0").is_ok());
        assert!(parse_derivation_path("m/0").is_ok());
    }

    #[test]
    fn test_invalid_paths() {
        for path in [
            "",
            "/////",
            "m",
            "m/",
            "m/abc'/61'/0'/0",
            "44'/60'/0'/0/0",
            "m/44''/0",
            "m/44'/60'/",
            "m/2147483648",
        ] {
            assert!(parse_derivation_path(path).is_err(), "{path:?} should fail");
        }
    }
}
