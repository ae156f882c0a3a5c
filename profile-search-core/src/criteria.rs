use profile_search_common::{MatchMode, ProfileSearchError, Result};
use serde::Deserialize;
use serde_json::Value;

/// Ages a row must fall in. An empty filter places no constraint.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AgeFilter {
    #[default]
    Unset,
    Values(Vec<i64>),
    Between { min: i64, max: i64 }, // inclusive
}

impl AgeFilter {
    pub fn is_empty(&self) -> bool {
        match self {
            AgeFilter::Unset => true,
            AgeFilter::Values(v) => v.is_empty(),
            AgeFilter::Between { .. } => false,
        }
    }

    pub fn contains(&self, age: i64) -> bool {
        match self {
            AgeFilter::Unset => false,
            AgeFilter::Values(v) => v.contains(&age),
            AgeFilter::Between { min, max } => (*min..=*max).contains(&age),
        }
    }
}

/// Normalized search request: text lowercased, term lists split, trimmed and lowercased.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Criteria {
    pub job: Option<String>,
    pub hobbies: Vec<String>,
    pub ages: AgeFilter,
    pub location: Option<String>,
    pub qualities: Vec<String>,
    pub gender: Option<String>,
    pub mode: Option<MatchMode>,
}

#[derive(Debug, Default, Deserialize)]
struct RawCriteria {
    #[serde(default)]
    job_query: Option<String>,
    #[serde(default)]
    hobby_query: Option<Value>,
    #[serde(default)]
    age_range: Option<Value>,
    #[serde(default)]
    location_query: Option<String>,
    #[serde(default)]
    qualities_query: Option<Value>,
    #[serde(default)]
    gender_query: Option<String>,
    #[serde(default)]
    mode: Option<MatchMode>,
}

fn bad(msg: impl Into<String>) -> ProfileSearchError {
    ProfileSearchError::BadRequest(msg.into())
}

fn text_query(q: Option<String>) -> Option<String> {
    q.filter(|s| !s.is_empty()).map(|s| s.to_lowercase())
}

pub fn split_terms(s: &str, sep: char) -> Vec<String> {
    s.split(sep)
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

fn term_list(field: &str, v: Option<Value>, sep: char) -> Result<Vec<String>> {
    match v {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::String(s)) => Ok(split_terms(&s, sep)),
        Some(Value::Array(items)) => {
            let mut terms = Vec::new();
            for item in items {
                match item {
                    Value::String(s) => terms.extend(split_terms(&s, sep)),
                    Value::Null => {}
                    other => return Err(bad(format!("{field}: expected string terms, got {other}"))),
                }
            }
            Ok(terms)
        }
        Some(other) => Err(bad(format!("{field}: expected a string or list of strings, got {other}"))),
    }
}

fn age_number(v: &Value) -> Result<i64> {
    let parsed = match v {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| bad(format!("age_range: invalid literal for integer: {v}")))
}

fn age_filter(v: Option<Value>) -> Result<AgeFilter> {
    match v {
        None | Some(Value::Null) => Ok(AgeFilter::Unset),
        Some(Value::Array(items)) => {
            let ages = items.iter().map(age_number).collect::<Result<Vec<_>>>()?;
            Ok(AgeFilter::Values(ages))
        }
        Some(Value::Object(map)) => {
            let (Some(min), Some(max)) = (map.get("min"), map.get("max")) else {
                return Err(bad("age_range: object form needs both 'min' and 'max'"));
            };
            let (min, max) = (age_number(min)?, age_number(max)?);
            if min > max {
                return Err(bad(format!("age_range: min {min} is greater than max {max}")));
            }
            Ok(AgeFilter::Between { min, max })
        }
        Some(other) => Err(bad(format!("age_range: expected a list of integers, got {other}"))),
    }
}

impl Criteria {
    pub fn from_value(v: Value, sep: char) -> Result<Self> {
        if !v.is_object() {
            return Err(bad("criteria must be a JSON object"));
        }
        let raw: RawCriteria = serde_json::from_value(v).map_err(|e| bad(e.to_string()))?;
        Ok(Self {
            job: text_query(raw.job_query),
            hobbies: term_list("hobby_query", raw.hobby_query, sep)?,
            ages: age_filter(raw.age_range)?,
            location: text_query(raw.location_query),
            qualities: term_list("qualities_query", raw.qualities_query, sep)?,
            gender: text_query(raw.gender_query),
            mode: raw.mode,
        })
    }

    pub fn from_json(body: &[u8], sep: char) -> Result<Self> {
        let v: Value = serde_json::from_slice(body).map_err(|e| bad(e.to_string()))?;
        Self::from_value(v, sep)
    }

    /// true when no field constrains anything
    pub fn is_unconstrained(&self) -> bool {
        self.job.is_none()
            && self.hobbies.is_empty()
            && self.ages.is_empty()
            && self.location.is_none()
            && self.qualities.is_empty()
            && self.gender.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(v: Value) -> Result<Criteria> {
        Criteria::from_value(v, ',')
    }

    #[test]
    fn comma_string_and_list_normalize_alike() {
        let a = parse(json!({"hobby_query": "reading,chess"})).unwrap();
        let b = parse(json!({"hobby_query": ["reading", "chess"]})).unwrap();
        assert_eq!(a.hobbies, vec!["reading", "chess"]);
        assert_eq!(a, b);
    }

    #[test]
    fn terms_trimmed_lowercased_and_blank_dropped() {
        let c = parse(json!({"qualities_query": [" Kind ", "Honest,", ""]})).unwrap();
        assert_eq!(c.qualities, vec!["kind", "honest"]);
    }

    #[test]
    fn empty_values_are_unconstrained() {
        let c = parse(json!({
            "job_query": "", "hobby_query": [], "age_range": [],
            "location_query": "", "qualities_query": "", "gender_query": null
        }))
        .unwrap();
        assert!(c.is_unconstrained());
        assert!(parse(json!({})).unwrap().is_unconstrained());
    }

    #[test]
    fn text_queries_lowercased() {
        let c = parse(json!({"job_query": "Software Engineer", "gender_query": "Female"})).unwrap();
        assert_eq!(c.job.as_deref(), Some("software engineer"));
        assert_eq!(c.gender.as_deref(), Some("female"));
    }

    #[test]
    fn age_list_and_bounds() {
        let c = parse(json!({"age_range": [25, 30.0, "31"]})).unwrap();
        assert_eq!(c.ages, AgeFilter::Values(vec![25, 30, 31]));
        assert!(c.ages.contains(25));
        assert!(!c.ages.contains(26));
        let c = parse(json!({"age_range": {"min": 25, "max": 30}})).unwrap();
        assert!(c.ages.contains(26));
        assert!(c.ages.contains(30));
        assert!(!c.ages.contains(31));
    }

    #[test]
    fn non_numeric_age_is_bad_request() {
        let err = parse(json!({"age_range": [25, "old"]})).unwrap_err();
        assert!(matches!(err, ProfileSearchError::BadRequest(m) if m.contains("\"old\"")));
        assert!(parse(json!({"age_range": [25.5]})).is_err());
        assert!(parse(json!({"age_range": {"min": 40, "max": 30}})).is_err());
        assert!(parse(json!({"age_range": {"min": 40}})).is_err());
    }

    #[test]
    fn malformed_payloads_are_bad_requests() {
        assert!(matches!(Criteria::from_json(b"{not json", ','), Err(ProfileSearchError::BadRequest(_))));
        assert!(matches!(parse(json!([1, 2])), Err(ProfileSearchError::BadRequest(_))));
        assert!(matches!(parse(json!({"job_query": 7})), Err(ProfileSearchError::BadRequest(_))));
        assert!(matches!(parse(json!({"hobby_query": [1]})), Err(ProfileSearchError::BadRequest(_))));
    }

    #[test]
    fn mode_override_and_unknown_fields() {
        let c = parse(json!({"mode": "and", "page": 3})).unwrap();
        assert_eq!(c.mode, Some(MatchMode::All));
        assert!(parse(json!({"mode": "xor"})).is_err());
    }

    #[test]
    fn mode_spelling_matches_cli() {
        assert_eq!(parse(json!({"mode": "OR"})).unwrap().mode, Some(MatchMode::Any));
        assert_eq!(parse(json!({"mode": "All"})).unwrap().mode, Some(MatchMode::All));
        assert_eq!(parse(json!({"mode": null})).unwrap().mode, None);
    }

    #[test]
    fn custom_separator() {
        let c = Criteria::from_value(json!({"hobby_query": "chess;golf"}), ';').unwrap();
        assert_eq!(c.hobbies, vec!["chess", "golf"]);
    }
}
