//! Human-readable rendering of resolution results.

use chrono::NaiveDate;
use duedate_core::{ComplianceItem, DueDateResult, Urgency, truncate_text};
use duedate_engine::{Attempt, AttemptOutcome};

const LABEL_WIDTH: usize = 26;
const MAX_NOTE_CHARS: usize = 200;

/// Print a resolved item as a vertical card.
pub fn print_result_card(
    item: &ComplianceItem,
    result: &DueDateResult,
    trail: &[Attempt],
    today: NaiveDate,
) {
    println!("=== {} ===", item.title);
    if !item.description.is_empty() {
        println!("{}", truncate_text(&item.description, MAX_NOTE_CHARS));
    }
    println!();

    println!("Resolution");
    field("due_date", &result.due_date.to_string());
    field("urgency", Urgency::for_due_date(result.due_date, today).as_str());
    field("method", result.method.as_str());
    field("confidence", &format!("{:.2}", result.confidence));
    if let Some(period) = &result.validity_period {
        field("validity_period", period);
    }
    field("application_date", &item.application_date.to_string());
    if !item.responsible_email.is_empty() {
        field("responsible", &item.responsible_email);
    }
    println!();

    println!("Justification");
    field("notes", &truncate_text(&result.calculation_notes, MAX_NOTE_CHARS));
    if let Some(warning) = &result.warning {
        field("warning", warning);
    }
    for url in &result.source_urls {
        field("source", url);
    }
    println!();

    if !trail.is_empty() {
        println!("Strategies tried");
        for attempt in trail {
            field(attempt.method.as_str(), &describe(&attempt.outcome));
        }
        println!();
    }
}

/// Print one ledger row per line.
pub fn print_ledger_row(
    title: &str,
    due: NaiveDate,
    method: &str,
    confidence: f64,
    today: NaiveDate,
) {
    println!(
        "{due}  {:<8}  {:<20}  {confidence:.2}  {}",
        Urgency::for_due_date(due, today).as_str(),
        method,
        truncate_text(title, 60),
    );
}

fn field(label: &str, value: &str) {
    println!("  {:<LABEL_WIDTH$} {}", label, value);
}

fn describe(outcome: &AttemptOutcome) -> String {
    match outcome {
        AttemptOutcome::Accepted => "accepted".to_string(),
        AttemptOutcome::BelowThreshold(c) => {
            format!("rejected (confidence {c:.2} below threshold)")
        }
        AttemptOutcome::NoResult => "no result".to_string(),
        AttemptOutcome::Failed(e) => format!("failed: {e}"),
        AttemptOutcome::Skipped(reason) => format!("skipped: {reason}"),
    }
}
