//! 代币面额

use serde::{Deserialize, Serialize};

use crate::infrastructure::column_codec::{impl_jsonb_column, BlobCodec};
use crate::validation::{Constraint, FieldCheck, FieldValue, Validatable};

/// 分档 gas 价格
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GasPrice {
    pub low: f64,
    pub average: f64,
    pub high: f64,
}

impl GasPrice {
    pub fn is_empty(&self) -> bool {
        *self == GasPrice::default()
    }
}

impl BlobCodec for GasPrice {
    const TYPE_NAME: &'static str = "GasPrice";
    type Stored<'a> = &'a GasPrice;

    fn to_storage(&self) -> &GasPrice {
        self
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

fn is_zero(value: &i64) -> bool {
    *value == 0
}

/// 链原生的代币面额及其校验状态
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Denom {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    pub display_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub logo: String,
    #[serde(skip_serializing_if = "is_zero")]
    pub precision: i64,
    #[serde(skip_serializing_if = "is_false")]
    pub verified: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub stakable: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub ticker: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub price_id: String,
    #[serde(skip_serializing_if = "is_false")]
    pub fee_token: bool,
    pub gas_price_levels: GasPrice,
    pub fetch_price: bool,
    pub relayer_denom: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_thresh_relayer_balance: Option<i64>,
}

impl Validatable for Denom {
    fn struct_name(&self) -> &'static str {
        "Denom"
    }

    fn fields(&self) -> Vec<FieldCheck<'_>> {
        vec![FieldCheck::new(
            "name",
            FieldValue::Str(&self.name),
            [Constraint::Required],
        )]
    }
}

/// 面额列表，整体存为一列
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DenomList(pub Vec<Denom>);

impl DenomList {
    pub fn iter(&self) -> std::slice::Iter<'_, Denom> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 嵌套校验用的元素视图
    pub fn as_validatable(&self) -> Vec<&dyn Validatable> {
        self.0.iter().map(|d| d as &dyn Validatable).collect()
    }
}

impl From<Vec<Denom>> for DenomList {
    fn from(denoms: Vec<Denom>) -> Self {
        Self(denoms)
    }
}

impl FromIterator<Denom> for DenomList {
    fn from_iter<I: IntoIterator<Item = Denom>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a DenomList {
    type Item = &'a Denom;
    type IntoIter = std::slice::Iter<'a, Denom>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl BlobCodec for DenomList {
    const TYPE_NAME: &'static str = "DenomList";
    type Stored<'a> = &'a DenomList;

    fn to_storage(&self) -> &DenomList {
        self
    }
}

impl_jsonb_column!(GasPrice, DenomList);

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::error::CodecError;
    use crate::infrastructure::column_codec::DbValue;

    fn atom() -> Denom {
        Denom {
            name: "uatom".into(),
            display_name: "ATOM".into(),
            precision: 6,
            verified: true,
            ticker: "ATOM".into(),
            gas_price_levels: GasPrice {
                low: 0.01,
                average: 0.025,
                high: 0.03,
            },
            relayer_denom: true,
            minimum_thresh_relayer_balance: Some(24000),
            ..Default::default()
        }
    }

    #[test]
    fn test_gas_price_is_empty() {
        assert!(GasPrice::default().is_empty());
        assert!(!GasPrice {
            high: 0.5,
            ..Default::default()
        }
        .is_empty());
    }

    #[test]
    fn test_denom_omits_zero_optionals() {
        let encoded = serde_json::to_value(Denom::default()).unwrap();
        assert_eq!(
            encoded,
            json!({
                "display_name": "",
                "gas_price_levels": {"low": 0.0, "average": 0.0, "high": 0.0},
                "fetch_price": false,
                "relayer_denom": false
            })
        );
    }

    #[test]
    fn test_denom_list_blob() {
        let list = DenomList(vec![atom()]);
        let blob = list.encode_blob().unwrap();
        assert_eq!(DenomList::decode_blob(&blob).unwrap(), list);

        let mut scanned = list.clone();
        let err = scanned.scan(&DbValue::Int(5)).unwrap_err();
        assert!(matches!(err, CodecError::InvalidEncoding { found: "int", .. }));
        assert!(scanned.is_empty());
    }

    #[test]
    fn test_gas_price_blob_rejects_wrong_shape() {
        let mut gas = GasPrice {
            low: 1.0,
            ..Default::default()
        };
        let err = gas
            .scan(&DbValue::Bytes(br#"{"low": "cheap"}"#.to_vec()))
            .unwrap_err();
        assert!(matches!(err, CodecError::MalformedContent { .. }));
        assert!(gas.is_empty());
    }
}
