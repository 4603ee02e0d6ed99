//! 规则引擎
//!
//! 每个实体以有序的 (字段, 约束列表) 描述自身的校验规则，
//! 由 `RuleEngine` 统一执行。所有字段都会被检查，失败项按声明顺序收集。

use std::{collections::HashMap, fmt, sync::Arc, time::Duration};

use crate::error::ModelError;

/// 命名规则：输入字段的字符串值，返回失败原因
pub type RuleFn = Arc<dyn Fn(&str) -> Result<(), String> + Send + Sync>;

/// 字段取值的只读视图
#[derive(Clone)]
pub enum FieldValue<'a> {
    Str(&'a str),
    Bool(bool),
    Int(i64),
    Float(f64),
    Duration(Duration),
    /// 字符串列表
    StrList(&'a [String]),
    /// 嵌套结构体列表
    StructList(Vec<&'a dyn Validatable>),
    /// 映射，仅关心条目数
    Map(usize),
    Struct(&'a dyn Validatable),
}

impl FieldValue<'_> {
    /// 是否为零值
    ///
    /// 结构体视为总有值，其内部字段由递归校验负责。
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Str(s) => s.is_empty(),
            FieldValue::Bool(b) => !b,
            FieldValue::Int(i) => *i == 0,
            FieldValue::Float(f) => *f == 0.0,
            FieldValue::Duration(d) => d.is_zero(),
            FieldValue::StrList(items) => items.is_empty(),
            FieldValue::StructList(items) => items.is_empty(),
            FieldValue::Map(len) => *len == 0,
            FieldValue::Struct(_) => false,
        }
    }

    fn len(&self) -> Option<usize> {
        match self {
            FieldValue::Str(s) => Some(s.chars().count()),
            FieldValue::StrList(items) => Some(items.len()),
            FieldValue::StructList(items) => Some(items.len()),
            FieldValue::Map(len) => Some(*len),
            FieldValue::Int(i) => usize::try_from(*i).ok(),
            _ => None,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            FieldValue::Str(_) => "string",
            FieldValue::Bool(_) => "bool",
            FieldValue::Int(_) => "int",
            FieldValue::Float(_) => "float",
            FieldValue::Duration(_) => "duration",
            FieldValue::StrList(_) => "string list",
            FieldValue::StructList(_) => "struct list",
            FieldValue::Map(_) => "map",
            FieldValue::Struct(_) => "struct",
        }
    }
}

impl fmt::Debug for FieldValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Str(s) => write!(f, "Str({s:?})"),
            FieldValue::Bool(b) => write!(f, "Bool({b})"),
            FieldValue::Int(i) => write!(f, "Int({i})"),
            FieldValue::Float(v) => write!(f, "Float({v})"),
            FieldValue::Duration(d) => write!(f, "Duration({d:?})"),
            FieldValue::StrList(items) => write!(f, "StrList({items:?})"),
            FieldValue::StructList(items) => write!(f, "StructList(len={})", items.len()),
            FieldValue::Map(len) => write!(f, "Map(len={len})"),
            FieldValue::Struct(s) => write!(f, "Struct({})", s.struct_name()),
        }
    }
}

/// 字段约束，按顺序执行，遇到第一个失败即停止该字段
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// 必须为非零值
    Required,
    /// 指定的兄弟字段非空时，本字段也必须非空
    RequiredWith(&'static str),
    /// 值为空时跳过后续约束
    OmitEmpty,
    /// 最小长度（字符串按字符数，列表/映射按条目数）
    Min(usize),
    /// 后续约束作用于列表中的每个元素
    Dive,
    /// 引擎中注册的命名规则
    Rule(&'static str),
}

impl Constraint {
    fn tag(&self) -> &'static str {
        match self {
            Constraint::Required => "required",
            Constraint::RequiredWith(_) => "required_with",
            Constraint::OmitEmpty => "omitempty",
            Constraint::Min(_) => "min",
            Constraint::Dive => "dive",
            Constraint::Rule(name) => *name,
        }
    }

    fn param(&self) -> Option<String> {
        match self {
            Constraint::RequiredWith(other) => Some((*other).to_string()),
            Constraint::Min(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// 单个字段的校验声明
pub struct FieldCheck<'a> {
    pub name: &'static str,
    pub value: FieldValue<'a>,
    pub constraints: Vec<Constraint>,
}

impl<'a> FieldCheck<'a> {
    pub fn new(
        name: &'static str,
        value: FieldValue<'a>,
        constraints: impl Into<Vec<Constraint>>,
    ) -> Self {
        Self {
            name,
            value,
            constraints: constraints.into(),
        }
    }
}

/// 可被引擎校验的结构体
pub trait Validatable {
    /// 根命名空间使用的结构体名
    fn struct_name(&self) -> &'static str;

    /// 按声明顺序列出字段及其约束
    fn fields(&self) -> Vec<FieldCheck<'_>>;

    /// 跨字段的结构体级校验，在字段校验之后执行
    fn validate_struct_level(&self, _level: &mut StructLevel<'_>) {}
}

/// 单个字段的校验失败
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// 字段名（线上 JSON 名），列表元素带下标，如 `tendermint_rpc[0]`
    pub field: String,
    /// 不同于 `field` 时给出的完整字段路径，如 `node_info.bech32_config.main_prefix`
    pub actual_field: Option<String>,
    /// 含根结构体名的命名空间
    pub namespace: String,
    pub tag: String,
    pub param: Option<String>,
    pub reason: Option<String>,
}

impl FieldError {
    pub fn new(field: impl Into<String>, tag: impl Into<String>) -> Self {
        let field = field.into();
        Self {
            namespace: field.clone(),
            field,
            actual_field: None,
            tag: tag.into(),
            param: None,
            reason: None,
        }
    }

    pub fn with_actual_field(mut self, actual_field: impl Into<String>) -> Self {
        self.actual_field = Some(actual_field.into());
        self
    }

    /// 报告用的名称
    pub fn name(&self, use_actual_field: bool) -> &str {
        match (&self.actual_field, use_actual_field) {
            (Some(actual), true) => actual,
            _ => &self.field,
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Key: '{}' Error:Field validation for '{}' failed on the '{}' tag",
            self.namespace, self.field, self.tag
        )?;
        if let Some(reason) = &self.reason {
            write!(f, " ({reason})")?;
        }
        Ok(())
    }
}

/// 一次结构体校验收集到的全部失败，保持收集顺序
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
        self.0.iter()
    }
}

impl From<Vec<FieldError>> for ValidationErrors {
    fn from(errors: Vec<FieldError>) -> Self {
        Self(errors)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{err}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// 结构体级校验的上下文
pub struct StructLevel<'e> {
    namespace: String,
    path: Option<String>,
    errors: &'e mut Vec<FieldError>,
}

impl StructLevel<'_> {
    /// 报告一个字段失败
    pub fn report_error(
        &mut self,
        field: &str,
        tag: &str,
        param: Option<String>,
        reason: impl Into<String>,
    ) {
        let reason = reason.into();
        tracing::debug!(
            namespace = %self.namespace,
            field,
            tag,
            %reason,
            "struct level validation failed"
        );
        self.errors.push(FieldError {
            field: field.to_string(),
            actual_field: self.path.as_ref().map(|p| format!("{p}.{field}")),
            namespace: format!("{}.{}", self.namespace, field),
            tag: tag.to_string(),
            param,
            reason: Some(reason),
        });
    }
}

/// 结构体校验能力
///
/// 注册钩子通过 `engine()` 获取底层引擎；不提供引擎的实现会被钩子跳过。
pub trait StructValidator {
    fn engine(&mut self) -> Option<&mut RuleEngine>;

    fn validate_struct(&self, value: &dyn Validatable) -> Result<(), ValidationErrors>;
}

/// 命名规则注册表与校验执行器
///
/// 启动时注册一次，此后可被多个调用方并发只读使用。
#[derive(Clone, Default)]
pub struct RuleEngine {
    rules: HashMap<String, RuleFn>,
}

impl fmt::Debug for RuleEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.rules.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("RuleEngine").field("rules", &names).finish()
    }
}

// 字段位置：线上名、可选的完整路径、命名空间
struct Location {
    field: String,
    path: Option<String>,
    namespace: String,
}

impl Location {
    fn child(parent_path: Option<&str>, parent_namespace: &str, field: &str) -> Self {
        Self {
            field: field.to_string(),
            path: parent_path.map(|p| format!("{p}.{field}")),
            namespace: format!("{parent_namespace}.{field}"),
        }
    }

    fn element(&self, index: usize) -> Self {
        Self {
            field: format!("{}[{index}]", self.field),
            path: self.path.as_ref().map(|p| format!("{p}[{index}]")),
            namespace: format!("{}[{index}]", self.namespace),
        }
    }

    // 嵌套结构体内部字段的完整路径前缀
    fn nested_path(&self) -> String {
        self.path.clone().unwrap_or_else(|| self.field.clone())
    }
}

impl RuleEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册命名规则；同名重复注册会覆盖旧规则
    pub fn register_validation<F>(&mut self, name: &str, rule: F) -> Result<(), ModelError>
    where
        F: Fn(&str) -> Result<(), String> + Send + Sync + 'static,
    {
        if name.trim().is_empty() {
            return Err(ModelError::Registration(
                "rule name cannot be empty".to_string(),
            ));
        }
        if self.rules.insert(name.to_string(), Arc::new(rule)).is_some() {
            tracing::debug!(rule = name, "validation rule re-registered");
        } else {
            tracing::debug!(rule = name, "validation rule registered");
        }
        Ok(())
    }

    pub fn has_rule(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// 对单个值执行命名规则；值不是字符串时按失败处理
    pub fn check_rule(&self, name: &str, value: &FieldValue<'_>) -> Result<(), String> {
        let Some(rule) = self.rules.get(name) else {
            return Err(format!("validation rule {name} is not registered"));
        };
        match value {
            FieldValue::Str(s) => rule(s),
            other => Err(format!("rule {name} cannot check a {} value", other.kind())),
        }
    }

    /// 校验整个结构体，收集所有失败
    pub fn validate(&self, value: &dyn Validatable) -> Result<(), ValidationErrors> {
        let mut errors = Vec::new();
        self.walk(value, None, value.struct_name(), &mut errors);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(errors))
        }
    }

    fn walk(
        &self,
        value: &dyn Validatable,
        path: Option<&str>,
        namespace: &str,
        errors: &mut Vec<FieldError>,
    ) {
        let fields = value.fields();
        for check in &fields {
            let location = Location::child(path, namespace, check.name);
            self.check_value(&check.value, &check.constraints, &fields, &location, errors);
        }

        let mut level = StructLevel {
            namespace: namespace.to_string(),
            path: path.map(str::to_string),
            errors,
        };
        value.validate_struct_level(&mut level);
    }

    fn check_value(
        &self,
        value: &FieldValue<'_>,
        constraints: &[Constraint],
        siblings: &[FieldCheck<'_>],
        location: &Location,
        errors: &mut Vec<FieldError>,
    ) {
        for (idx, constraint) in constraints.iter().enumerate() {
            let outcome = match constraint {
                Constraint::Required => {
                    if value.is_empty() {
                        Err(None)
                    } else {
                        Ok(())
                    }
                }
                Constraint::RequiredWith(other) => {
                    let other_present = siblings
                        .iter()
                        .find(|s| s.name == *other)
                        .is_some_and(|s| !s.value.is_empty());
                    if other_present && value.is_empty() {
                        Err(Some(format!("required when {other} is present")))
                    } else {
                        Ok(())
                    }
                }
                Constraint::OmitEmpty => {
                    if value.is_empty() {
                        return;
                    }
                    Ok(())
                }
                Constraint::Min(min) => match value.len() {
                    Some(len) if len >= *min => Ok(()),
                    Some(len) => Err(Some(format!("length {len} is below {min}"))),
                    None => Err(Some(format!("{} value has no length", value.kind()))),
                },
                Constraint::Rule(name) => self.check_rule(name, value).map_err(Some),
                Constraint::Dive => {
                    self.dive(value, &constraints[idx + 1..], location, errors);
                    return;
                }
            };

            if let Err(reason) = outcome {
                Self::push(errors, location, constraint, reason);
                return;
            }
        }

        if let FieldValue::Struct(nested) = value {
            let path = location.nested_path();
            self.walk(*nested, Some(&path), &location.namespace, errors);
        }
    }

    fn dive(
        &self,
        value: &FieldValue<'_>,
        constraints: &[Constraint],
        location: &Location,
        errors: &mut Vec<FieldError>,
    ) {
        match value {
            FieldValue::StrList(items) => {
                for (i, item) in items.iter().enumerate() {
                    let element = FieldValue::Str(item);
                    self.check_value(&element, constraints, &[], &location.element(i), errors);
                }
            }
            FieldValue::StructList(items) => {
                for (i, item) in items.iter().enumerate() {
                    let element = FieldValue::Struct(*item);
                    self.check_value(&element, constraints, &[], &location.element(i), errors);
                }
            }
            FieldValue::Struct(_) => {
                self.check_value(value, constraints, &[], location, errors);
            }
            other => Self::push(
                errors,
                location,
                &Constraint::Dive,
                Some(format!("cannot dive into a {} value", other.kind())),
            ),
        }
    }

    fn push(
        errors: &mut Vec<FieldError>,
        location: &Location,
        constraint: &Constraint,
        reason: Option<String>,
    ) {
        tracing::debug!(
            namespace = %location.namespace,
            tag = constraint.tag(),
            reason = reason.as_deref().unwrap_or(""),
            "field validation failed"
        );
        errors.push(FieldError {
            field: location.field.clone(),
            actual_field: location.path.clone(),
            namespace: location.namespace.clone(),
            tag: constraint.tag().to_string(),
            param: constraint.param(),
            reason,
        });
    }
}

impl StructValidator for RuleEngine {
    fn engine(&mut self) -> Option<&mut RuleEngine> {
        Some(self)
    }

    fn validate_struct(&self, value: &dyn Validatable) -> Result<(), ValidationErrors> {
        self.validate(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Inner {
        code: String,
    }

    impl Validatable for Inner {
        fn struct_name(&self) -> &'static str {
            "Inner"
        }

        fn fields(&self) -> Vec<FieldCheck<'_>> {
            vec![FieldCheck::new(
                "code",
                FieldValue::Str(&self.code),
                [Constraint::Required],
            )]
        }
    }

    struct Outer {
        name: String,
        tags: Vec<String>,
        inner: Inner,
        count: i64,
    }

    impl Validatable for Outer {
        fn struct_name(&self) -> &'static str {
            "Outer"
        }

        fn fields(&self) -> Vec<FieldCheck<'_>> {
            use Constraint::*;
            vec![
                FieldCheck::new("name", FieldValue::Str(&self.name), [Required]),
                FieldCheck::new(
                    "tags",
                    FieldValue::StrList(&self.tags),
                    [OmitEmpty, Dive, Rule("lowercase")],
                ),
                FieldCheck::new("inner", FieldValue::Struct(&self.inner), [Required]),
                FieldCheck::new("count", FieldValue::Int(self.count), [Rule("lowercase")]),
            ]
        }
    }

    fn engine() -> RuleEngine {
        let mut engine = RuleEngine::new();
        engine
            .register_validation("lowercase", |s| {
                if s.chars().all(|c| !c.is_uppercase()) {
                    Ok(())
                } else {
                    Err(format!("{s} is not lowercase"))
                }
            })
            .unwrap();
        engine
    }

    #[test]
    fn test_collects_all_failures_in_order() {
        let outer = Outer {
            name: String::new(),
            tags: vec!["ok".into(), "BAD".into()],
            inner: Inner {
                code: String::new(),
            },
            count: 3,
        };

        let errs = engine().validate(&outer).unwrap_err();
        let namespaces: Vec<&str> = errs.iter().map(|e| e.namespace.as_str()).collect();
        assert_eq!(
            namespaces,
            vec![
                "Outer.name",
                "Outer.tags[1]",
                "Outer.inner.code",
                "Outer.count"
            ]
        );
        assert_eq!(errs.0[1].tag, "lowercase");
        assert_eq!(errs.0[2].field, "code");
        assert_eq!(errs.0[2].actual_field.as_deref(), Some("inner.code"));
        // 非字符串值上的命名规则按失败处理
        assert_eq!(errs.0[3].tag, "lowercase");
    }

    #[test]
    fn test_unregistered_rule_fails_closed() {
        let outer = Outer {
            name: "x".into(),
            tags: vec!["a".into()],
            inner: Inner { code: "c".into() },
            count: 0,
        };
        let errs = RuleEngine::new().validate(&outer).unwrap_err();
        assert_eq!(errs.len(), 2);
        assert!(errs.iter().all(|e| e.tag == "lowercase"));
    }

    #[test]
    fn test_reregistration_is_idempotent() {
        let mut engine = engine();
        engine.register_validation("lowercase", |_| Ok(())).unwrap();
        engine.register_validation("lowercase", |_| Ok(())).unwrap();
        assert!(engine.has_rule("lowercase"));
        assert!(engine.register_validation("  ", |_| Ok(())).is_err());
    }

    #[test]
    fn test_display() {
        let err = FieldError {
            field: "name".into(),
            actual_field: None,
            namespace: "Outer.name".into(),
            tag: "required".into(),
            param: None,
            reason: None,
        };
        assert_eq!(
            err.to_string(),
            "Key: 'Outer.name' Error:Field validation for 'name' failed on the 'required' tag"
        );
    }
}
