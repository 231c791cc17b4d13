use itertools::Itertools;

use crate::analysis::FeedbackDraft;
use crate::error::{Result, SessionError};
use crate::schema::MetricSchema;
use crate::score::{Score, Status};
use crate::util::mean;

/// Feedback on one sub-metric. The status is always derived from the score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackItem {
    category: String,
    subcategory: String,
    score: Score,
    feedback: String,
    improvement: String,
}

impl FeedbackItem {
    pub fn new(
        category: impl Into<String>,
        subcategory: impl Into<String>,
        score: Score,
        feedback: impl Into<String>,
        improvement: impl Into<String>,
    ) -> Self {
        Self {
            category: category.into(),
            subcategory: subcategory.into(),
            score,
            feedback: feedback.into(),
            improvement: improvement.into(),
        }
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn subcategory(&self) -> &str {
        &self.subcategory
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn status(&self) -> Status {
        self.score.status()
    }

    pub fn feedback(&self) -> &str {
        &self.feedback
    }

    pub fn improvement(&self) -> &str {
        &self.improvement
    }
}

/// Ordered feedback for one completed session.
///
/// Items stay in the order they were supplied; grouping by category is a
/// view over that sequence. The catalog is immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedbackCatalog {
    categories: Vec<String>,
    items: Vec<FeedbackItem>,
}

impl FeedbackCatalog {
    /// Validate drafts against the schema and build the catalog.
    pub fn from_drafts(schema: &MetricSchema, drafts: &[FeedbackDraft]) -> Result<Self> {
        let items = drafts
            .iter()
            .map(|draft| {
                if !schema.has_category(&draft.category) {
                    return Err(SessionError::UnknownCategory(draft.category.clone()));
                }
                let score = Score::new(draft.score).map_err(|source| SessionError::InvalidScore {
                    metric: draft.subcategory.clone(),
                    source,
                })?;
                Ok(FeedbackItem::new(
                    draft.category.as_str(),
                    draft.subcategory.as_str(),
                    score,
                    draft.feedback.as_str(),
                    draft.improvement.as_str(),
                ))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            categories: schema
                .category_names()
                .unique()
                .map(str::to_string)
                .collect(),
            items,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn items(&self) -> &[FeedbackItem] {
        &self.items
    }

    /// Categories in declared order, including ones without items.
    pub fn all_categories(&self) -> &[String] {
        &self.categories
    }

    pub fn items_by_category<'a>(
        &'a self,
        category: &'a str,
    ) -> impl Iterator<Item = &'a FeedbackItem> + 'a {
        self.items.iter().filter(move |i| i.category == category)
    }

    /// Status of the rounded mean score across a category's items.
    pub fn category_status(&self, category: &str) -> Option<Status> {
        let scores: Vec<f64> = self
            .items_by_category(category)
            .map(|i| i.score.value() as f64)
            .collect();
        let avg = mean(&scores)?;
        Score::new(avg.round() as i64).ok().map(Score::status)
    }

    /// Improvement tips in catalog order, without repeats.
    pub fn improvements(&self) -> Vec<&str> {
        self.items
            .iter()
            .map(|i| i.improvement.as_str())
            .filter(|s| !s.is_empty())
            .unique()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{Analyzer, DemoAnalyzer};
    use crate::score::ScoreError;
    use assert_matches::assert_matches;

    fn draft(category: &str, subcategory: &str, score: i64, improvement: &str) -> FeedbackDraft {
        FeedbackDraft {
            category: category.to_string(),
            subcategory: subcategory.to_string(),
            score,
            feedback: format!("{subcategory} feedback"),
            improvement: improvement.to_string(),
        }
    }

    fn demo_catalog() -> FeedbackCatalog {
        let schema = MetricSchema::dashboard();
        let report = DemoAnalyzer.analyze(&schema);
        FeedbackCatalog::from_drafts(&schema, &report.feedback).unwrap()
    }

    #[test]
    fn status_is_derived_from_score() {
        let catalog = demo_catalog();
        for item in catalog.items() {
            assert_eq!(item.status(), Status::from_score(item.score()));
        }
        // sample data labels eye contact as needing work, but 66 is on track
        let eye = catalog
            .items_by_category("Non Verbal")
            .find(|i| i.subcategory() == "Eye Contact")
            .unwrap();
        assert_eq!(eye.status(), Status::Good);
    }

    #[test]
    fn items_keep_insertion_order() {
        let schema = MetricSchema::dashboard();
        let drafts = vec![
            draft("Non Verbal", "Body Posture", 90, "a"),
            draft("Content Strength", "Word Usage", 40, "b"),
            draft("Non Verbal", "Eye Contact", 10, "c"),
            draft("Non Verbal", "Hand Gestures", 70, "d"),
        ];
        let catalog = FeedbackCatalog::from_drafts(&schema, &drafts).unwrap();
        let names: Vec<&str> = catalog
            .items_by_category("Non Verbal")
            .map(|i| i.subcategory())
            .collect();
        assert_eq!(names, vec!["Body Posture", "Eye Contact", "Hand Gestures"]);
    }

    #[test]
    fn categories_follow_schema_even_when_empty() {
        let catalog = demo_catalog();
        assert_eq!(
            catalog.all_categories(),
            &["Non Verbal", "Delivery of Speech", "Content Strength"]
        );
        assert_eq!(catalog.items_by_category("Missing").count(), 0);
    }

    #[test]
    fn repeated_category_names_are_listed_once() {
        let schema: MetricSchema = serde_json::from_str(
            r#"{"headline":[],"categories":[
                {"name":"Voice","metrics":[]},
                {"name":"Body","metrics":[]},
                {"name":"Voice","metrics":[]}]}"#,
        )
        .unwrap();
        let drafts = vec![draft("Voice", "Pace", 70, "")];
        let catalog = FeedbackCatalog::from_drafts(&schema, &drafts).unwrap();
        assert_eq!(catalog.all_categories(), &["Voice", "Body"]);
        let shown: usize = catalog
            .all_categories()
            .iter()
            .map(|c| catalog.items_by_category(c).count())
            .sum();
        assert_eq!(shown, 1);
    }

    #[test]
    fn category_rollup() {
        let catalog = demo_catalog();
        // (66 + 75) / 2 = 70.5 rounds to 71
        assert_eq!(catalog.category_status("Non Verbal"), Some(Status::Good));
        assert_eq!(
            catalog.category_status("Delivery of Speech"),
            Some(Status::Excellent)
        );
        assert_eq!(catalog.category_status("Nowhere"), None);
    }

    #[test]
    fn rollup_rounds_half_up_into_next_bucket() {
        let schema = MetricSchema::dashboard();
        let drafts = vec![
            draft("Non Verbal", "Eye Contact", 79, ""),
            draft("Non Verbal", "Body Posture", 80, ""),
        ];
        let catalog = FeedbackCatalog::from_drafts(&schema, &drafts).unwrap();
        assert_eq!(
            catalog.category_status("Non Verbal"),
            Some(Status::Excellent)
        );
    }

    #[test]
    fn improvements_are_deduplicated() {
        let schema = MetricSchema::dashboard();
        let drafts = vec![
            draft("Non Verbal", "Eye Contact", 60, "Look up"),
            draft("Non Verbal", "Body Posture", 60, ""),
            draft("Delivery of Speech", "Vocal Features", 60, "Slow down"),
            draft("Content Strength", "Word Usage", 60, "Look up"),
        ];
        let catalog = FeedbackCatalog::from_drafts(&schema, &drafts).unwrap();
        assert_eq!(catalog.improvements(), vec!["Look up", "Slow down"]);
    }

    #[test]
    fn unknown_category_is_rejected() {
        let schema = MetricSchema::trainer();
        let drafts = vec![draft("Non Verbal", "Eye Contact", 60, "")];
        assert_matches!(
            FeedbackCatalog::from_drafts(&schema, &drafts),
            Err(SessionError::UnknownCategory(c)) if c == "Non Verbal"
        );
    }

    #[test]
    fn out_of_range_feedback_score_is_rejected() {
        let schema = MetricSchema::dashboard();
        let drafts = vec![draft("Non Verbal", "Eye Contact", 101, "")];
        assert_matches!(
            FeedbackCatalog::from_drafts(&schema, &drafts),
            Err(SessionError::InvalidScore { metric, source: ScoreError::OutOfRange(101) })
                if metric == "Eye Contact"
        );
    }
}
