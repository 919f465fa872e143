use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt};

pub type Map = BTreeMap<String, String>;

/// Selects a set of workloads by exact label equality.
///
/// An empty selector selects everything.
#[derive(Clone, Debug, Eq, PartialEq, Default, Deserialize, Serialize, JsonSchema)]
#[serde(transparent)]
pub struct Selector(Map);

// === Selector ===

impl Selector {
    pub fn from_map(map: Map) -> Self {
        Self(map)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the value the selector requires for `key`, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn matches(&self, labels: &Map) -> bool {
        for (k, v) in self.0.iter() {
            if labels.get(k) != Some(v) {
                return false;
            }
        }

        true
    }
}

impl AsRef<Map> for Selector {
    #[inline]
    fn as_ref(&self) -> &Map {
        &self.0
    }
}

impl From<Map> for Selector {
    #[inline]
    fn from(map: Map) -> Self {
        Self::from_map(map)
    }
}

impl std::iter::FromIterator<(String, String)> for Selector {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self::from_map(iter.into_iter().collect())
    }
}

impl std::iter::FromIterator<(&'static str, &'static str)> for Selector {
    fn from_iter<T: IntoIterator<Item = (&'static str, &'static str)>>(iter: T) -> Self {
        Self::from_map(
            iter.into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}

/// Renders the selector the way Kubernetes prints a set-based selector: `k1=v1,k2=v2`, ordered by
/// key.
impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (k, v)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}={}", k, v)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use maplit::{btreemap, convert_args};
    use std::iter::FromIterator;

    #[test]
    fn test_matches() {
        for (selector, labels, matches, msg) in &[
            (Selector::default(), Map::default(), true, "empty match"),
            (
                Selector::default(),
                convert_args!(btreemap!("foo" => "bar")),
                true,
                "empty selector matches anything",
            ),
            (
                Selector::from_iter(Some(("foo", "bar"))),
                convert_args!(btreemap!("foo" => "bar")),
                true,
                "exact label match",
            ),
            (
                Selector::from_iter(Some(("foo", "bar"))),
                convert_args!(btreemap!("foo" => "bar", "bah" => "baz")),
                true,
                "sufficient label match",
            ),
            (
                Selector::from_iter(vec![("foo", "bar"), ("bah", "baz")]),
                convert_args!(btreemap!("foo" => "bar")),
                false,
                "missing label",
            ),
            (
                Selector::from_iter(Some(("foo", "bar"))),
                convert_args!(btreemap!("foo" => "baz")),
                false,
                "mismatched value",
            ),
            (
                Selector::from_iter(Some(("foo", "bar"))),
                Map::default(),
                false,
                "no labels",
            ),
        ] {
            assert_eq!(selector.matches(labels), *matches, "{}", msg);
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(Selector::default().to_string(), "");
        assert_eq!(
            Selector::from_iter(Some(("app", "none"))).to_string(),
            "app=none"
        );
        assert_eq!(
            Selector::from_iter(vec![("version", "v1"), ("app", "gw")]).to_string(),
            "app=gw,version=v1",
        );
    }

    #[test]
    fn deserializes_from_map() {
        let selector: Selector = serde_json::from_str(r#"{"istio":"ingressgateway"}"#).unwrap();
        assert_eq!(selector.get("istio"), Some("ingressgateway"));
        assert_eq!(selector.get("app"), None);
    }
}
