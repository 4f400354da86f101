//! AI-backed commands: queue calls, wait for the queue to drain, report

use crate::progress::ProgressType;
use crate::render;
use anyhow::{bail, Result};
use application::{ApplicationResult, ReviewService};
use common::{TaskHandle, TaskOutcome};
use console::style;
use domain::{Segment, SegmentActivity, TargetLanguage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Translate,
    Audit,
    Breakdown,
}

impl Operation {
    fn progress(self) -> ProgressType {
        match self {
            Operation::Translate => ProgressType::Translation,
            Operation::Audit => ProgressType::Audit,
            Operation::Breakdown => ProgressType::WordBreakdown,
        }
    }

    fn verb(self) -> &'static str {
        match self {
            Operation::Translate => "Translating",
            Operation::Audit => "Auditing",
            Operation::Breakdown => "Analyzing words of",
        }
    }

    fn activity(self) -> SegmentActivity {
        match self {
            Operation::Translate => SegmentActivity::Translating,
            Operation::Audit => SegmentActivity::Analyzing,
            Operation::Breakdown => SegmentActivity::AnalyzingWords,
        }
    }

    fn request(self, service: &ReviewService, id: &str) -> ApplicationResult<Option<TaskHandle>> {
        match self {
            Operation::Translate => service.request_translation(id),
            Operation::Audit => service.request_audit(id),
            Operation::Breakdown => service.request_word_breakdown(id),
        }
    }
}

/// Queue `operation` for each id, then wait and print every result
pub async fn run(service: &ReviewService, operation: Operation, ids: &[String]) -> Result<()> {
    // Nothing is queued unless every id resolves
    let ids = ids
        .iter()
        .map(|id| service.resolve_id(id))
        .collect::<ApplicationResult<Vec<String>>>()?;

    let mut queued = Vec::new();
    for id in ids {
        match operation.request(service, &id)? {
            Some(handle) => queued.push((id, handle)),
            None => println!(
                "{} {} is already queued",
                style("!").yellow(),
                render::short_id(&id)
            ),
        }
    }

    drain(service, operation, queued).await
}

/// Audit every pending segment, or all of them
pub async fn review_all(service: &ReviewService, only_pending: bool) -> Result<()> {
    let queued = service.request_audit_all(only_pending);
    if queued.is_empty() {
        let what = if only_pending { "pending " } else { "" };
        println!("{}", style(format!("No {what}segments to audit")).dim());
        return Ok(());
    }

    drain(service, Operation::Audit, queued).await
}

async fn drain(
    service: &ReviewService,
    operation: Operation,
    queued: Vec<(String, TaskHandle)>,
) -> Result<()> {
    if queued.is_empty() {
        return Ok(());
    }

    let total = queued.len();
    let spinner = operation
        .progress()
        .create_spinner(&format!("{} {} segment(s)", operation.verb(), total));
    let language = service.language();
    let mut failures = 0;

    for (done, (id, handle)) in queued.into_iter().enumerate() {
        let outcome = handle.wait().await;
        spinner.set_message(&format!(
            "{} {} segment(s), {} finished",
            operation.verb(),
            total,
            done + 1
        ));

        match outcome {
            TaskOutcome::Completed => match service.segment(&id) {
                Ok(after) => {
                    if !spinner.suspend(|| report(service, operation, &after, &language)) {
                        failures += 1;
                    }
                }
                Err(_) => spinner.suspend(|| {
                    println!(
                        "{} {} was deleted before its turn",
                        style("!").yellow(),
                        render::short_id(&id)
                    )
                }),
            },
            TaskOutcome::Panicked | TaskOutcome::Abandoned => {
                failures += 1;
                spinner.suspend(|| {
                    println!(
                        "{} {} did not finish ({:?})",
                        style("✗").red(),
                        render::short_id(&id),
                        outcome
                    )
                });
            }
        }
    }

    if failures == 0 {
        spinner.finish_success();
        Ok(())
    } else {
        let message = format!("{failures} of {total} request(s) failed");
        spinner.finish_error(&message);
        bail!(message)
    }
}

/// Print the result of one finished call; false when it failed
fn report(service: &ReviewService, operation: Operation, segment: &Segment, language: &TargetLanguage) -> bool {
    println!();
    println!(
        "{} {}",
        style(render::short_id(&segment.id)).cyan(),
        render::truncate(&segment.source_text, 60)
    );

    if let Some(message) = service.last_failure(&segment.id, operation.activity()) {
        println!("  {} {}", style("✗").red(), style(message).yellow());
        return false;
    }

    match operation {
        Operation::Translate => {
            println!("  {} {}", style(language.as_str()).bold(), segment.target_text);
        }
        Operation::Audit => {
            render::print_feedback(segment);
            if matches!(&segment.ai_feedback, Some(feedback) if feedback.word_breakdown().is_some()) {
                render::print_breakdown(segment, language);
            }
        }
        Operation::Breakdown => render::print_breakdown(segment, language),
    }
    true
}
