//! What the analysis backend hands back once a recording has been processed.
//!
//! Everything here is unvalidated input; the session checks it before any of
//! it becomes visible.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::schema::MetricSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
#[serde(rename_all = "lowercase")]
pub enum RewriteStyle {
    Professional,
    Friendly,
    Concise,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rewrite {
    pub style: RewriteStyle,
    pub title: String,
    pub content: String,
}

/// Feedback on one sub-metric as supplied by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackDraft {
    pub category: String,
    pub subcategory: String,
    pub score: i64,
    pub feedback: String,
    pub improvement: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub transcript: String,
    pub scores: BTreeMap<String, i64>,
    #[serde(default)]
    pub feedback: Vec<FeedbackDraft>,
    #[serde(default)]
    pub rewrites: Vec<Rewrite>,
}

impl AnalysisReport {
    pub fn with_scores<I, K>(transcript: &str, scores: I) -> Self
    where
        I: IntoIterator<Item = (K, i64)>,
        K: Into<String>,
    {
        Self {
            transcript: transcript.to_string(),
            scores: scores.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            feedback: vec![],
            rewrites: vec![],
        }
    }
}

/// Source of analysis results. Called off the session's thread.
pub trait Analyzer: Send + Sync + 'static {
    fn analyze(&self, schema: &MetricSchema) -> AnalysisReport;
}

/// Returns a fixed sample analysis, trimmed to whatever the schema asks for.
///
/// Metrics the sample data has never heard of get [`DEMO_FALLBACK_SCORE`], so
/// a custom schema still produces a complete report.
#[derive(Debug, Clone, Copy, Default)]
pub struct DemoAnalyzer;

const DEMO_TRANSCRIPT: &str = "Hi, I'm Sarah, a software engineer with 5 years of experience in full-stack development. I specialize in React and Node.js, and I'm passionate about creating user-friendly applications that solve real-world problems. I'm currently looking for opportunities where I can contribute to innovative projects while growing my skills in emerging technologies.";

const DEMO_SCORES: [(&str, i64); 11] = [
    ("clarity", 85),
    ("structure", 78),
    ("confidence", 82),
    ("eyeContact", 66),
    ("facialExpression", 75),
    ("handGestures", 80),
    ("bodyPosture", 88),
    ("vocalFeatures", 82),
    ("speechFluency", 85),
    ("wordUsage", 71),
    ("sentenceAnalysis", 73),
];

pub const DEMO_FALLBACK_SCORE: i64 = 75;

// (category, subcategory, score, feedback, improvement)
const DEMO_FEEDBACK: [(&str, &str, i64, &str, &str); 4] = [
    (
        "Non Verbal",
        "Eye Contact",
        66,
        "You could do a better job of maintaining eye contact with the interviewer.",
        "Maintain eye contact for at least 75% of the duration",
    ),
    (
        "Non Verbal",
        "Facial Expressions",
        75,
        "Your facial expressions are generally appropriate and engaging.",
        "Keep up your smile while speaking, to appear more confident",
    ),
    (
        "Delivery of Speech",
        "Vocal Features",
        82,
        "Excellent vocal delivery with good modulation and clarity.",
        "Continue maintaining your natural pitch and tone",
    ),
    (
        "Content Strength",
        "Word Usage",
        71,
        "Good vocabulary usage with professional terminology.",
        "Incorporate more specific industry keywords",
    ),
];

fn demo_rewrites() -> Vec<Rewrite> {
    vec![
        Rewrite {
            style: RewriteStyle::Professional,
            title: "Professional Version".to_string(),
            content: "I'm Sarah Johnson, a Senior Software Engineer with five years of demonstrated expertise in full-stack development, specializing in React and Node.js ecosystems. My focus centers on architecting scalable, user-centric applications that address complex business challenges. I'm actively seeking senior-level opportunities within innovative organizations where I can drive technical excellence while expanding my expertise in emerging technologies.".to_string(),
        },
        Rewrite {
            style: RewriteStyle::Friendly,
            title: "Friendly & Approachable".to_string(),
            content: "Hey there! I'm Sarah, and I absolutely love building things that make people's lives easier. I've been coding for about 5 years now, mainly working with React and Node.js to create apps that people actually enjoy using. What really gets me excited is tackling those tricky problems and turning them into something simple and beautiful. I'm on the hunt for my next adventure with a team that's as passionate about innovation as I am!".to_string(),
        },
        Rewrite {
            style: RewriteStyle::Concise,
            title: "Concise & Direct".to_string(),
            content: "Sarah Johnson. Five years full-stack development. React, Node.js specialist. I build user-friendly applications that solve real problems. Seeking innovative opportunities to drive impact while advancing in emerging tech.".to_string(),
        },
    ]
}

impl Analyzer for DemoAnalyzer {
    fn analyze(&self, schema: &MetricSchema) -> AnalysisReport {
        let scores = schema
            .metric_keys()
            .map(|key| {
                let score = DEMO_SCORES
                    .iter()
                    .find(|(known, _)| *known == key)
                    .map_or(DEMO_FALLBACK_SCORE, |(_, score)| *score);
                (key.to_string(), score)
            })
            .collect();

        let feedback = DEMO_FEEDBACK
            .iter()
            .filter(|(category, ..)| schema.has_category(category))
            .map(
                |(category, subcategory, score, feedback, improvement)| FeedbackDraft {
                    category: category.to_string(),
                    subcategory: subcategory.to_string(),
                    score: *score,
                    feedback: feedback.to_string(),
                    improvement: improvement.to_string(),
                },
            )
            .collect();

        AnalysisReport {
            transcript: DEMO_TRANSCRIPT.to_string(),
            scores,
            feedback,
            rewrites: demo_rewrites(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_trainer_report_has_headline_scores_only() {
        let report = DemoAnalyzer.analyze(&MetricSchema::trainer());
        assert_eq!(report.scores.len(), 3);
        assert_eq!(report.scores.get("clarity"), Some(&85));
        assert_eq!(report.scores.get("structure"), Some(&78));
        assert_eq!(report.scores.get("confidence"), Some(&82));
        assert!(report.feedback.is_empty());
        assert_eq!(report.rewrites.len(), 3);
    }

    #[test]
    fn demo_dashboard_report_covers_all_metrics() {
        let report = DemoAnalyzer.analyze(&MetricSchema::dashboard());
        assert_eq!(report.scores.len(), 11);
        assert_eq!(report.feedback.len(), 4);
        assert_eq!(report.feedback[0].subcategory, "Eye Contact");
        assert!(report.transcript.starts_with("Hi, I'm Sarah"));
    }

    #[test]
    fn unknown_metrics_get_the_fallback_score() {
        let schema: MetricSchema = serde_json::from_str(
            r#"{"headline":[{"key":"pace","label":"Pace"},{"key":"clarity","label":"Clarity"}],
                "categories":[{"name":"Voice","metrics":[{"key":"volume","label":"Volume"}]}]}"#,
        )
        .unwrap();
        let report = DemoAnalyzer.analyze(&schema);
        assert_eq!(report.scores.len(), 3);
        assert_eq!(report.scores.get("pace"), Some(&DEMO_FALLBACK_SCORE));
        assert_eq!(report.scores.get("volume"), Some(&DEMO_FALLBACK_SCORE));
        assert_eq!(report.scores.get("clarity"), Some(&85));
        assert!(report.feedback.is_empty());
    }

    #[test]
    fn rewrites_come_in_style_order() {
        let report = DemoAnalyzer.analyze(&MetricSchema::trainer());
        let styles: Vec<RewriteStyle> = report.rewrites.iter().map(|r| r.style).collect();
        assert_eq!(
            styles,
            vec![
                RewriteStyle::Professional,
                RewriteStyle::Friendly,
                RewriteStyle::Concise
            ]
        );
    }

    #[test]
    fn report_json_defaults_optional_sections() {
        let json = r#"{"transcript":"hello","scores":{"clarity":90}}"#;
        let report: AnalysisReport = serde_json::from_str(json).unwrap();
        assert_eq!(report.scores.get("clarity"), Some(&90));
        assert!(report.feedback.is_empty());
        assert!(report.rewrites.is_empty());
    }
}
