//! Header-based column classification

use crate::domain::{CellValue, ColumnClassification};
use crate::redaction::rules::{normalize_header, AliasRule};

/// Classifies columns from header text using alias rules in order
#[derive(Debug, Clone)]
pub struct ColumnClassifier {
    rules: Vec<AliasRule>,
}

impl ColumnClassifier {
    pub fn new(rules: Vec<AliasRule>) -> Self {
        Self { rules }
    }

    /// Returns one classification per header cell
    ///
    /// Without a header every column scans normally; callers treat indices
    /// past the end of the returned vector the same way.
    pub fn classify(&self, header: Option<&[CellValue]>) -> Vec<ColumnClassification> {
        let Some(header) = header else {
            return Vec::new();
        };

        header
            .iter()
            .map(|cell| {
                let text = cell.as_text().unwrap_or_default();
                self.classify_header(&text)
            })
            .collect()
    }

    /// Classifies a single header label; the first matching rule wins
    pub fn classify_header(&self, header: &str) -> ColumnClassification {
        let normalized = normalize_header(header);
        self.rules
            .iter()
            .find(|rule| rule.matches(&normalized))
            .map(|rule| ColumnClassification::Forced(rule.entity_type.clone()))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MatchMode;
    use crate::domain::EntityType;

    fn rule(entity: &str, aliases: &[&str], mode: MatchMode) -> AliasRule {
        AliasRule {
            entity_type: EntityType::new(entity).unwrap(),
            aliases: aliases.iter().map(|a| normalize_header(a)).collect(),
            match_mode: mode,
        }
    }

    fn classifier() -> ColumnClassifier {
        ColumnClassifier::new(vec![
            rule("DATE_OF_BIRTH", &["DOB", "DateOfBirth"], MatchMode::Exact),
            rule("MRN", &["MRN", "Medical Record Number"], MatchMode::Exact),
            rule("PERSON", &["name"], MatchMode::Contains),
        ])
    }

    #[test]
    fn test_case_insensitive_aliases() {
        let c = classifier();
        let forced = |t: &str| ColumnClassification::Forced(EntityType::new(t).unwrap());
        assert_eq!(c.classify_header("dob"), forced("DATE_OF_BIRTH"));
        assert_eq!(c.classify_header("Date of Birth"), forced("DATE_OF_BIRTH"));
        assert_eq!(c.classify_header("mrn"), forced("MRN"));
        assert_eq!(c.classify_header("Patient Name"), forced("PERSON"));
        assert_eq!(c.classify_header("Diagnosis"), ColumnClassification::None);
    }

    #[test]
    fn test_header_row_classification() {
        let header = vec![
            CellValue::from("MRN"),
            CellValue::Empty,
            CellValue::from("Notes"),
            CellValue::Number(2024.0),
        ];
        let classes = classifier().classify(Some(&header));
        assert_eq!(classes.len(), 4);
        assert!(classes[0].forced_type().is_some());
        assert!(classes[1..].iter().all(|c| *c == ColumnClassification::None));
    }

    #[test]
    fn test_no_header_scans_everything() {
        assert!(classifier().classify(None).is_empty());
    }

    #[test]
    fn test_first_rule_wins() {
        let c = ColumnClassifier::new(vec![
            rule("PERSON", &["name"], MatchMode::Contains),
            rule("HEALTH_PLAN", &["plan name"], MatchMode::Exact),
        ]);
        assert_eq!(
            c.classify_header("Plan Name"),
            ColumnClassification::Forced(EntityType::new("PERSON").unwrap())
        );
    }
}
