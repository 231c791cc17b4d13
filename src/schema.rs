use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// A single scored dimension, keyed the way the analysis backend names it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricSpec {
    pub key: String,
    pub label: String,
}

impl MetricSpec {
    pub fn new(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySpec {
    pub name: String,
    pub metrics: Vec<MetricSpec>,
}

/// Which metrics a session reports on and how feedback is grouped.
///
/// Headline metrics are the top-level scores every report must carry.
/// Categories are declared in display order; their sub-metrics are optional
/// extras the backend may also score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricSchema {
    pub headline: Vec<MetricSpec>,
    #[serde(default)]
    pub categories: Vec<CategorySpec>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, ValueEnum, strum_macros::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SchemaPreset {
    /// clarity, structure and confidence only
    Trainer,
    /// headline scores plus non-verbal, delivery and content breakdowns
    Dashboard,
}

impl SchemaPreset {
    pub fn schema(self) -> MetricSchema {
        match self {
            SchemaPreset::Trainer => MetricSchema::trainer(),
            SchemaPreset::Dashboard => MetricSchema::dashboard(),
        }
    }
}

fn headline_metrics() -> Vec<MetricSpec> {
    vec![
        MetricSpec::new("clarity", "Clarity"),
        MetricSpec::new("structure", "Structure"),
        MetricSpec::new("confidence", "Confidence"),
    ]
}

impl MetricSchema {
    pub fn trainer() -> Self {
        Self {
            headline: headline_metrics(),
            categories: vec![],
        }
    }

    pub fn dashboard() -> Self {
        Self {
            headline: headline_metrics(),
            categories: vec![
                CategorySpec {
                    name: "Non Verbal".to_string(),
                    metrics: vec![
                        MetricSpec::new("eyeContact", "Eye Contact"),
                        MetricSpec::new("facialExpression", "Facial Expressions"),
                        MetricSpec::new("handGestures", "Hand Gestures"),
                        MetricSpec::new("bodyPosture", "Body Posture"),
                    ],
                },
                CategorySpec {
                    name: "Delivery of Speech".to_string(),
                    metrics: vec![
                        MetricSpec::new("vocalFeatures", "Vocal Features"),
                        MetricSpec::new("speechFluency", "Speech Fluency"),
                    ],
                },
                CategorySpec {
                    name: "Content Strength".to_string(),
                    metrics: vec![
                        MetricSpec::new("wordUsage", "Word Usage"),
                        MetricSpec::new("sentenceAnalysis", "Sentence Analysis"),
                    ],
                },
            ],
        }
    }

    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.name.as_str())
    }

    pub fn has_category(&self, name: &str) -> bool {
        self.categories.iter().any(|c| c.name == name)
    }

    /// Every metric key the schema knows, headline first.
    pub fn metric_keys(&self) -> impl Iterator<Item = &str> {
        self.headline
            .iter()
            .chain(self.categories.iter().flat_map(|c| c.metrics.iter()))
            .map(|m| m.key.as_str())
    }

    pub fn label_for(&self, key: &str) -> Option<&str> {
        self.headline
            .iter()
            .chain(self.categories.iter().flat_map(|c| c.metrics.iter()))
            .find(|m| m.key == key)
            .map(|m| m.label.as_str())
    }
}

impl Default for MetricSchema {
    fn default() -> Self {
        Self::dashboard()
    }
}
