use std::fmt::Write;

use crate::schema::MetricSchema;
use crate::session::SessionResults;
use crate::util::format_clock;

/// Plain-text summary of a finished session, as printed by `--headless`.
pub fn render_text(results: &SessionResults, schema: &MetricSchema) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Pitch analysis ({} recorded, {})",
        format_clock(results.recorded_for.as_secs()),
        results.completed_at.format("%Y-%m-%d %H:%M")
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "Transcript");
    let _ = writeln!(out, "  {}", results.transcript);
    let _ = writeln!(out);

    let _ = writeln!(out, "Scores");
    for metric in &schema.headline {
        if let Some(score) = results.scores.get(&metric.key) {
            let status = score.status();
            let _ = writeln!(
                out,
                "  {:<12} {:>4}  {} ({})",
                metric.label,
                score.to_string(),
                status,
                status.label()
            );
        }
    }

    let catalog = &results.feedback;
    if !catalog.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Feedback");
        for category in catalog.all_categories() {
            let Some(rollup) = catalog.category_status(category) else {
                continue;
            };
            let _ = writeln!(out, "  {} [{}]", category, rollup.label());
            for item in catalog.items_by_category(category) {
                let _ = writeln!(
                    out,
                    "    {} {} [{}]: {}",
                    item.subcategory(),
                    item.score(),
                    item.status().label(),
                    item.feedback()
                );
            }
        }

        let improvements = catalog.improvements();
        if !improvements.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "Improvements");
            for tip in improvements {
                let _ = writeln!(out, "  - {tip}");
            }
        }
    }

    for (idx, rewrite) in results.rewrites.iter().enumerate() {
        if idx == 0 {
            let _ = writeln!(out);
            let _ = writeln!(out, "Rewrites");
        }
        let _ = writeln!(out, "  {}. {}", idx + 1, rewrite.title);
        let _ = writeln!(out, "     {}", rewrite.content);
    }

    out
}
