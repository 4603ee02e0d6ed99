//! 语义化版本校验（Cosmos SDK 版本号，如 `v0.44.3`）

use once_cell::sync::Lazy;
use regex::Regex;

use super::engine::StructValidator;
use crate::error::ModelError;

pub const SEMVER: &str = "semver";

pub const ERR_NOT_SEMVER: &str = "version string is not semver-compliant";

static SEMVER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^v(0|[1-9][0-9]*)\.(0|[1-9][0-9]*)\.(0|[1-9][0-9]*)",
        r"(?:-((?:0|[1-9][0-9]*|[0-9]*[a-zA-Z-][0-9a-zA-Z-]*)(?:\.(?:0|[1-9][0-9]*|[0-9]*[a-zA-Z-][0-9a-zA-Z-]*))*))?",
        r"(?:\+([0-9a-zA-Z-]+(?:\.[0-9a-zA-Z-]+)*))?$",
    ))
    .expect("semver regex is valid")
});

/// 解析后的版本号
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version<'a> {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub pre_release: Option<&'a str>,
    pub build: Option<&'a str>,
}

/// 注册 `semver` 规则
pub fn semver(validator: &mut dyn StructValidator) -> Result<(), ModelError> {
    if let Some(engine) = validator.engine() {
        engine.register_validation(SEMVER, |value| {
            if is_valid(value) {
                Ok(())
            } else {
                Err(ERR_NOT_SEMVER.to_string())
            }
        })?;
    }
    Ok(())
}

pub fn is_valid(value: &str) -> bool {
    parse(value).is_some()
}

/// 解析 `vMAJOR.MINOR.PATCH[-PRE][+BUILD]`，不合法时返回 `None`
pub fn parse(value: &str) -> Option<Version<'_>> {
    let caps = SEMVER_RE.captures(value)?;
    Some(Version {
        major: caps.get(1)?.as_str().parse().ok()?,
        minor: caps.get(2)?.as_str().parse().ok()?,
        patch: caps.get(3)?.as_str().parse().ok()?,
        pre_release: caps.get(4).map(|m| m.as_str()),
        build: caps.get(5).map(|m| m.as_str()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_semver() {
        assert!(is_valid("v0.44.3"));
        assert!(is_valid("v0.45.0-rc1"));
        assert!(is_valid("v1.0.0-alpha.1+build.5"));

        assert!(!is_valid("0.44.3"));
        assert!(!is_valid("random string"));
        assert!(!is_valid("v0.44"));
        assert!(!is_valid("v01.2.3"));
        assert!(!is_valid(""));
    }

    #[test]
    fn test_parse() {
        let v = parse("v0.47.5-rc.1+meta").unwrap();
        assert_eq!((v.major, v.minor, v.patch), (0, 47, 5));
        assert_eq!(v.pre_release, Some("rc.1"));
        assert_eq!(v.build, Some("meta"));
    }
}
