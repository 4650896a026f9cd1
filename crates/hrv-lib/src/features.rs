use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Named scalar features. Values may be non-finite when a statistic is
/// degenerate for the input (e.g. an empty HF band); consumers decide how
/// to treat those.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureSet(BTreeMap<String, f64>);

impl FeatureSet {
    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Key union; entries of `other` win on collision.
    pub fn merge(&mut self, other: FeatureSet) {
        self.0.extend(other.0);
    }

    /// Non-finite values become `null`.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.0
                .iter()
                .map(|(k, v)| {
                    let value = serde_json::Number::from_f64(*v)
                        .map(serde_json::Value::Number)
                        .unwrap_or(serde_json::Value::Null);
                    (k.clone(), value)
                })
                .collect(),
        )
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for FeatureSet {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_is_key_union() {
        let mut a: FeatureSet = [("sdnn", 10.0), ("rmssd", 5.0)].into_iter().collect();
        let b: FeatureSet = [("lf", 1.0), ("hf", 2.0)].into_iter().collect();
        a.merge(b);
        assert_eq!(a.len(), 4);
        assert_eq!(a.get("hf"), Some(2.0));
        assert!(a.contains("sdnn") && a.contains("lf"));
    }

    #[test]
    fn json_maps_non_finite_to_null() {
        let set: FeatureSet = [("csi", f64::NAN), ("sd1", 1.5)].into_iter().collect();
        let json = set.to_json();
        assert!(json["csi"].is_null());
        assert_eq!(json["sd1"].as_f64(), Some(1.5));
    }
}
