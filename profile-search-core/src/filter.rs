use crate::criteria::{AgeFilter, Criteria};
use crate::dataset::{Cell, Dataset, Row};
use crate::record::Profile;
use profile_search_common::{MatchMode, ProfileSearchError, Result};

// --- predicate outcomes ---

/// Result of one per-field test. `Vacuous` means the test could not be applied:
/// the query is empty or the row has no value for the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Matched,
    Unmatched,
    Vacuous,
}

impl Outcome {
    fn from_bool(b: bool) -> Self {
        if b { Outcome::Matched } else { Outcome::Unmatched }
    }

    /// Any-mode never counts missing data, All-mode never penalizes it.
    pub fn holds(self, mode: MatchMode) -> bool {
        match (self, mode) {
            (Outcome::Matched, _) => true,
            (Outcome::Unmatched, _) => false,
            (Outcome::Vacuous, MatchMode::Any) => false,
            (Outcome::Vacuous, MatchMode::All) => true,
        }
    }
}

// --- per-field predicates ---

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

fn substring(value: Option<&str>, query: Option<&str>) -> Outcome {
    match (value, query) {
        (Some(v), Some(q)) if !q.is_empty() => Outcome::from_bool(contains_ci(v, q)),
        _ => Outcome::Vacuous,
    }
}

fn any_term(value: Option<&str>, terms: &[String]) -> Outcome {
    match value {
        Some(v) if !terms.is_empty() => {
            let v = v.to_lowercase();
            Outcome::from_bool(terms.iter().any(|t| v.contains(t.as_str())))
        }
        _ => Outcome::Vacuous,
    }
}

pub fn job_predicate(p: &Profile, query: Option<&str>) -> Outcome {
    substring(p.job.as_deref(), query)
}

pub fn hobby_predicate(p: &Profile, terms: &[String]) -> Outcome {
    any_term(p.hobbies.as_deref(), terms)
}

pub fn location_predicate(p: &Profile, query: Option<&str>) -> Outcome {
    substring(p.location.as_deref(), query)
}

pub fn qualities_predicate(p: &Profile, terms: &[String]) -> Outcome {
    any_term(p.qualities.as_deref(), terms)
}

pub fn gender_predicate(p: &Profile, query: Option<&str>) -> Outcome {
    match (p.gender.as_deref(), query) {
        (Some(g), Some(q)) if !q.is_empty() => Outcome::from_bool(g.to_lowercase() == q),
        _ => Outcome::Vacuous,
    }
}

/// Integer value of an age cell; floats truncate toward zero.
pub fn age_of(cell: &Cell, column: &str) -> Result<i64> {
    let invalid = |value: String| ProfileSearchError::InvalidValue { column: column.to_owned(), value };
    match cell {
        Cell::Int(v) => Ok(*v),
        Cell::Float(f) if f.is_finite() => Ok(f.trunc() as i64),
        Cell::Float(f) => Err(invalid(f.to_string())),
        Cell::Text(s) => {
            let t = s.trim();
            t.parse::<i64>()
                .ok()
                .or_else(|| t.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
                .ok_or_else(|| invalid(s.clone()))
        }
        Cell::Null => Err(invalid(String::new())),
    }
}

/// Fails when the row's age must be read and is not a number.
pub fn age_predicate(p: &Profile, ages: &AgeFilter, column: &str) -> Result<Outcome> {
    match &p.age {
        Some(cell) if !ages.is_empty() => Ok(Outcome::from_bool(ages.contains(age_of(cell, column)?))),
        _ => Ok(Outcome::Vacuous),
    }
}

// --- row and dataset evaluation ---

/// All six outcomes for one profile, in field order: job, hobby, age, location, qualities, gender.
pub fn outcomes(p: &Profile, c: &Criteria, age_column: &str) -> Result<[Outcome; 6]> {
    Ok([
        job_predicate(p, c.job.as_deref()),
        hobby_predicate(p, &c.hobbies),
        age_predicate(p, &c.ages, age_column)?,
        location_predicate(p, c.location.as_deref()),
        qualities_predicate(p, &c.qualities),
        gender_predicate(p, c.gender.as_deref()),
    ])
}

pub fn profile_matches(p: &Profile, c: &Criteria, mode: MatchMode, age_column: &str) -> Result<bool> {
    let all = outcomes(p, c, age_column)?;
    Ok(match mode {
        MatchMode::Any => all.iter().any(|o| o.holds(mode)),
        MatchMode::All => all.iter().all(|o| o.holds(mode)),
    })
}

/// Rows satisfying `criteria` under `mode`, in dataset order. Any row error aborts the whole scan.
pub fn evaluate<'a>(dataset: &'a Dataset, criteria: &Criteria, mode: MatchMode) -> Result<Vec<&'a Row>> {
    let age_column = dataset.columns().age.as_str();
    let mut out = Vec::new();
    for row in dataset.rows() {
        if profile_matches(row.profile(), criteria, mode, age_column)? {
            out.push(row);
        }
    }
    Ok(out)
}

/// Rows where any non-missing cell contains `query`, case-insensitively.
pub fn search_any<'a>(dataset: &'a Dataset, query: &str) -> Result<Vec<&'a Row>> {
    if query.is_empty() {
        return Err(ProfileSearchError::BadRequest("No query parameter provided".into()));
    }
    let needle = query.to_lowercase();
    Ok(dataset
        .rows()
        .iter()
        .filter(|row| row.texts().any(|t| contains_ci(t, &needle)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> Profile {
        Profile {
            name: Some("Anna".into()),
            age: Some(Cell::Int(25)),
            gender: Some("Female".into()),
            salary: Some(Cell::Int(50000)),
            hobbies: Some("I enjoy Chess on weekends".into()),
            qualities: Some("Kindness, Honesty".into()),
            location: Some("New Delhi".into()),
            job: Some("Software Engineer".into()),
        }
    }

    fn terms(ts: &[&str]) -> Vec<String> {
        ts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn job_substring_case_insensitive() {
        assert_eq!(job_predicate(&profile(), Some("engineer")), Outcome::Matched);
        assert_eq!(job_predicate(&profile(), Some("doctor")), Outcome::Unmatched);
        assert_eq!(job_predicate(&profile(), None), Outcome::Vacuous);
        assert_eq!(job_predicate(&profile(), Some("")), Outcome::Vacuous);
        let p = Profile { job: None, ..profile() };
        assert_eq!(job_predicate(&p, Some("engineer")), Outcome::Vacuous);
    }

    #[test]
    fn hobby_any_term() {
        assert_eq!(hobby_predicate(&profile(), &terms(&["reading", "chess"])), Outcome::Matched);
        assert_eq!(hobby_predicate(&profile(), &terms(&["reading"])), Outcome::Unmatched);
        assert_eq!(hobby_predicate(&profile(), &[]), Outcome::Vacuous);
    }

    #[test]
    fn age_membership() {
        let ages = AgeFilter::Values(vec![25, 30]);
        assert_eq!(age_predicate(&profile(), &ages, "age").unwrap(), Outcome::Matched);
        let p = Profile { age: Some(Cell::Int(26)), ..profile() };
        assert_eq!(age_predicate(&p, &ages, "age").unwrap(), Outcome::Unmatched);
        let p = Profile { age: Some(Cell::Float(30.0)), ..profile() };
        assert_eq!(age_predicate(&p, &ages, "age").unwrap(), Outcome::Matched);
        assert_eq!(age_predicate(&profile(), &AgeFilter::Values(vec![]), "age").unwrap(), Outcome::Vacuous);
    }

    #[test]
    fn non_numeric_age_errors_only_when_needed() {
        let p = Profile { age: Some(Cell::Text("twenty".into())), ..profile() };
        let err = age_predicate(&p, &AgeFilter::Values(vec![20]), "Age").unwrap_err();
        assert!(matches!(err, ProfileSearchError::InvalidValue { ref column, .. } if column == "Age"));
        assert_eq!(age_predicate(&p, &AgeFilter::Unset, "Age").unwrap(), Outcome::Vacuous);
    }

    #[test]
    fn gender_exact_case_insensitive() {
        assert_eq!(gender_predicate(&profile(), Some("female")), Outcome::Matched);
        assert_eq!(gender_predicate(&profile(), Some("fem")), Outcome::Unmatched);
    }

    #[test]
    fn null_gender_passes_all_but_not_any() {
        let p = Profile { gender: None, ..profile() };
        let c = Criteria { gender: Some("male".into()), ..Criteria::default() };
        assert!(profile_matches(&p, &c, MatchMode::All, "age").unwrap());
        assert!(!profile_matches(&p, &c, MatchMode::Any, "age").unwrap());
        // another predicate can still carry the row in any-mode
        let c = Criteria { job: Some("engineer".into()), ..c };
        assert!(profile_matches(&p, &c, MatchMode::Any, "age").unwrap());
    }

    #[test]
    fn empty_criteria() {
        let c = Criteria::default();
        assert!(!profile_matches(&profile(), &c, MatchMode::Any, "age").unwrap());
        assert!(profile_matches(&profile(), &c, MatchMode::All, "age").unwrap());
    }

    #[test]
    fn all_mode_needs_every_constraint() {
        let c = Criteria {
            job: Some("engineer".into()),
            location: Some("mumbai".into()),
            ..Criteria::default()
        };
        assert!(!profile_matches(&profile(), &c, MatchMode::All, "age").unwrap());
        assert!(profile_matches(&profile(), &c, MatchMode::Any, "age").unwrap());
    }

    #[test]
    fn holds_table() {
        assert!(Outcome::Vacuous.holds(MatchMode::All));
        assert!(!Outcome::Vacuous.holds(MatchMode::Any));
        assert!(!Outcome::Unmatched.holds(MatchMode::All));
        assert!(Outcome::Matched.holds(MatchMode::Any));
    }
}
