use crate::core::Record;
use regex::Regex;
use std::sync::OnceLock;

fn newline_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n+").unwrap())
}

/// 單一修正規則。規則必須是全函數且冪等：套用兩次與套用一次結果相同
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizationRule {
    /// 將陣列欄位換成第一個元素（空陣列換成 null），遞迴套用到巢狀子物件
    ScalarizeArray { field: String },
    /// 頂層字串欄位：連續換行換成單一空格並修剪前後空白
    CollapseWhitespace { field: String },
    /// 無條件刪除頂層欄位
    RemoveField { field: String },
}

impl NormalizationRule {
    pub fn apply(&self, record: &mut Record) {
        match self {
            NormalizationRule::ScalarizeArray { field } => {
                for (key, value) in record.data.iter_mut() {
                    if key == field {
                        scalarize(value);
                    } else {
                        scalarize_nested(field, value);
                    }
                }
            }
            NormalizationRule::CollapseWhitespace { field } => {
                if let Some(serde_json::Value::String(s)) = record.data.get_mut(field) {
                    *s = newline_runs().replace_all(s, " ").trim().to_string();
                }
            }
            NormalizationRule::RemoveField { field } => {
                record.data.remove(field);
            }
        }
    }
}

fn scalarize(value: &mut serde_json::Value) {
    // 反覆取第一個元素直到不是陣列，維持冪等
    loop {
        let first = match value {
            serde_json::Value::Array(items) => {
                items.first().cloned().unwrap_or(serde_json::Value::Null)
            }
            _ => break,
        };
        *value = first;
    }
}

fn scalarize_nested(field: &str, value: &mut serde_json::Value) {
    match value {
        serde_json::Value::Object(map) => {
            for (key, nested) in map.iter_mut() {
                if key == field {
                    scalarize(nested);
                } else {
                    scalarize_nested(field, nested);
                }
            }
        }
        serde_json::Value::Array(items) => {
            for item in items.iter_mut() {
                scalarize_nested(field, item);
            }
        }
        _ => {}
    }
}

/// 依序套用的規則集合。刪除規則永遠排在其他規則之後
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<NormalizationRule>,
}

impl RuleSet {
    pub fn new(rules: Vec<NormalizationRule>) -> Self {
        let (removals, mut ordered): (Vec<_>, Vec<_>) = rules
            .into_iter()
            .partition(|rule| matches!(rule, NormalizationRule::RemoveField { .. }));
        ordered.extend(removals);
        Self { rules: ordered }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn rules(&self) -> &[NormalizationRule] {
        &self.rules
    }

    pub fn apply(&self, record: &Record) -> Record {
        let mut normalized = record.clone();
        for rule in &self.rules {
            rule.apply(&mut normalized);
        }
        normalized
    }
}
