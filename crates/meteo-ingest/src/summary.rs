//! Plain-text summary of an ingestion run.

use chrono::SecondsFormat;
use meteo_data::accumulator::StopReason;
use meteo_data::pipeline::IngestOutcome;

/// Format a count with thousands separators, e.g. `50000` → `"50,000"`.
pub fn format_count(value: usize) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn stop_label(reason: Option<StopReason>) -> &'static str {
    match reason {
        Some(StopReason::RecordLimit) => "RecordLimit",
        Some(StopReason::FileLimit) => "FileLimit",
        Some(StopReason::Exhausted) => "Exhausted",
        None => "-",
    }
}

fn interval_label(outcome: &IngestOutcome) -> String {
    match outcome.store.interval_range() {
        Some((start, end)) => format!(
            "{} .. {}",
            start.to_rfc3339_opts(SecondsFormat::Secs, true),
            end.to_rfc3339_opts(SecondsFormat::Secs, true)
        ),
        None => "-".to_string(),
    }
}

/// Render the summary printed at the end of a run.
pub fn render(outcome: &IngestOutcome) -> String {
    let report = &outcome.report;
    let store = &outcome.store;

    format!(
        "Files found:       {}\n\
         Files processed:   {} ({} failed)\n\
         Records decoded:   {}\n\
         Records replaced:  {}\n\
         Unique keys:       {}\n\
         Stations:          {}\n\
         Interval range:    {}\n\
         Stop reason:       {}\n\
         Load time:         {:.2}s\n",
        format_count(outcome.metadata.files_found),
        format_count(report.files_processed),
        format_count(report.files_failed),
        format_count(report.records_decoded),
        format_count(report.records_replaced),
        format_count(store.len()),
        format_count(store.station_count()),
        interval_label(outcome),
        stop_label(report.stop_reason),
        outcome.metadata.load_time_seconds
    )
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use meteo_data::accumulator::{IngestReport, ObservationStore};
    use meteo_data::pipeline::IngestMetadata;

    fn outcome(report: IngestReport) -> IngestOutcome {
        IngestOutcome {
            store: ObservationStore::new(),
            report,
            metadata: IngestMetadata {
                generated_at: "2024-01-02T14:00:00+00:00".to_string(),
                files_found: 1234,
                load_time_seconds: 0.5,
            },
        }
    }

    // ── format_count ──────────────────────────────────────────────────────────

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(50_000), "50,000");
        assert_eq!(format_count(1_234_567), "1,234,567");
    }

    // ── render ────────────────────────────────────────────────────────────────

    #[test]
    fn test_render_empty_run() {
        let text = render(&outcome(IngestReport {
            stop_reason: Some(StopReason::Exhausted),
            ..IngestReport::default()
        }));

        assert!(text.contains("Files found:       1,234"));
        assert!(text.contains("Unique keys:       0"));
        assert!(text.contains("Interval range:    -"));
        assert!(text.contains("Stop reason:       Exhausted"));
    }

    #[test]
    fn test_render_one_line_per_field() {
        let text = render(&outcome(IngestReport::default()));
        assert_eq!(text.lines().count(), 9);
        assert!(text.ends_with("s\n"));
        assert!(text.lines().all(|l| !l.starts_with(' ')));
    }

    #[test]
    fn test_render_counts_and_failures() {
        let text = render(&outcome(IngestReport {
            files_processed: 3,
            files_failed: 1,
            records_decoded: 60_000,
            records_replaced: 12,
            stop_reason: Some(StopReason::FileLimit),
        }));

        assert!(text.contains("Files processed:   3 (1 failed)"));
        assert!(text.contains("Records decoded:   60,000"));
        assert!(text.contains("Records replaced:  12"));
        assert!(text.contains("Stop reason:       FileLimit"));
    }
}
