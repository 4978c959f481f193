//! Per-fund static profile (inception date, latest size, managers, ...).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Upstream attribute keys and the item names they are published under.
pub const PROFILE_ITEMS: &[(&str, &str)] = &[
    ("fd_code", "基金代码"),
    ("fd_name", "基金名称"),
    ("fd_full_name", "基金全称"),
    ("found_date", "成立时间"),
    ("totshare", "最新规模"),
    ("keeper_name", "基金公司"),
    ("manager_name", "基金经理"),
    ("trup_name", "托管银行"),
    ("type_desc", "基金类型"),
    ("rating_source", "评级机构"),
    ("rating_desc", "基金评级"),
    ("invest_orientation", "投资策略"),
    ("invest_target", "投资目标"),
    ("performance_bench_mark", "业绩比较基准"),
];

/// Envelope returned by the fund detail endpoint.
#[derive(Serialize, Deserialize, Debug)]
pub struct ProfileResponse {
    #[serde(default)]
    pub data: Option<FundProfile>,
    #[serde(default)]
    pub result_code: i64,
    #[serde(default)]
    pub message: Option<String>,
}

/// Attribute bag for one fund. Values are kept as raw JSON and rendered
/// to text on access, since upstream mixes strings and numbers.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct FundProfile {
    fields: Map<String, Value>,
}

impl FundProfile {
    /// Returns the attribute under its upstream key, rendered as text.
    /// Null and empty values read as absent.
    pub fn get(&self, key: &str) -> Option<String> {
        match self.fields.get(key)? {
            Value::Null => None,
            Value::String(s) if s.trim().is_empty() => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Returns the attribute under its published item name (e.g. `成立时间`).
    pub fn item(&self, name: &str) -> Option<String> {
        PROFILE_ITEMS
            .iter()
            .find(|(_, item)| *item == name)
            .and_then(|(key, _)| self.get(key))
    }
}
