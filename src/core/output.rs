//! Report rendering for CLI surfaces.

use crate::core::check::CheckStatus;
use crate::core::orchestrator::RunReport;
use colored::Colorize;

/// Collapse newlines/extra whitespace and bound length for terminal display.
pub fn compact_line(input: &str, max_chars: usize) -> String {
    let collapsed = input.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut chars = collapsed.chars();
    let preview: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}...", preview)
    } else {
        preview
    }
}

/// `1 file`, `3 files`.
pub fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}

/// Human-readable report. Every failed check gets its own section.
pub fn render_text(report: &RunReport) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "presubmit: program={} files={} run={}\n",
        report.program, report.changed_files, report.run_id
    ));

    for outcome in &report.outcomes {
        let tag = match &outcome.status {
            CheckStatus::Passed => "PASS".green().bold(),
            CheckStatus::Skipped => "SKIP".yellow(),
            CheckStatus::Disabled => "OFF ".dimmed(),
            CheckStatus::Failed { .. } => "FAIL".red().bold(),
        };
        out.push_str(&format!(
            "  [{}] {} ({} ms)\n",
            tag, outcome.name, outcome.duration_ms
        ));
    }

    for outcome in report.failures() {
        if let CheckStatus::Failed { reason, paths } = &outcome.status {
            out.push_str(&format!("\n{} {}\n", "FAILED".red().bold(), outcome.name));
            for line in reason.lines() {
                out.push_str(&format!("  {}\n", line));
            }
            for path in paths {
                out.push_str(&format!("    {}\n", path));
            }
        }
    }

    let failed = report.count(CheckStatus::is_failed);
    let passed = report.count(|s| *s == CheckStatus::Passed);
    let skipped = report.count(|s| *s == CheckStatus::Skipped);
    let summary = format!(
        "\npresubmit: summary pass={} fail={} skip={} ({} ms)",
        passed, failed, skipped, report.duration_ms
    );
    if failed == 0 {
        out.push_str(&format!("{}\n", summary.green()));
    } else {
        out.push_str(&format!(
            "{}\n{}\n",
            summary.red(),
            compact_line(
                &format!(
                    "{} failed: {}",
                    plural(failed, "check"),
                    report
                        .failures()
                        .map(|o| o.name.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
                200
            )
        ));
    }
    out
}
