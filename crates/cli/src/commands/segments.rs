//! Segment editing commands

use crate::render;
use anyhow::{bail, Result};
use application::ReviewService;
use console::{style, Term};
use domain::{SegmentCategory, SegmentStatus};

pub fn list(service: &ReviewService) -> Result<()> {
    let segments = service.segments();
    let language = service.language();
    if segments.is_empty() {
        println!(
            "{}",
            style("No segments yet. Add one with `proofreader add \"<English text>\"`.").dim()
        );
        return Ok(());
    }

    render::segment_table(&segments, &language).printstd();
    println!(
        "{} segments, translating into {}",
        segments.len(),
        style(language).cyan()
    );
    Ok(())
}

pub fn show(service: &ReviewService, id: &str) -> Result<()> {
    let id = service.resolve_id(id)?;
    let segment = service.segment(&id)?;
    render::print_segment(&segment, &service.language());
    Ok(())
}

pub fn add(service: &ReviewService, source: &str, target: &str) -> Result<()> {
    if source.trim().is_empty() {
        bail!("Source text cannot be empty");
    }
    let segment = service.add_segment(source, target);
    println!(
        "{} Added segment {}",
        style("✓").green(),
        style(render::short_id(&segment.id)).cyan()
    );
    Ok(())
}

pub fn edit(
    service: &ReviewService,
    id: &str,
    source: Option<String>,
    target: Option<String>,
) -> Result<()> {
    if source.is_none() && target.is_none() {
        bail!("Nothing to change, pass --source and/or --target");
    }
    let id = service.resolve_id(id)?;
    let segment = service.edit_segment(&id, source, target)?;
    println!(
        "{} Updated segment {}",
        style("✓").green(),
        style(render::short_id(&segment.id)).cyan()
    );
    Ok(())
}

pub fn set_status(service: &ReviewService, id: &str, status: SegmentStatus) -> Result<()> {
    let id = service.resolve_id(id)?;
    let segment = service.set_status(&id, status)?;
    println!(
        "{} {} is now {}",
        style("✓").green(),
        style(render::short_id(&segment.id)).cyan(),
        style(segment.status).bold()
    );
    Ok(())
}

pub fn set_category(service: &ReviewService, id: &str, category: SegmentCategory) -> Result<()> {
    let id = service.resolve_id(id)?;
    let segment = service.set_category(&id, category)?;
    println!(
        "{} {} categorized as {}",
        style("✓").green(),
        style(render::short_id(&segment.id)).cyan(),
        style(segment.category).bold()
    );
    Ok(())
}

pub fn delete(service: &ReviewService, id: &str) -> Result<()> {
    let id = service.resolve_id(id)?;
    service.delete_segment(&id)?;
    println!("{} Deleted segment {}", style("✓").green(), render::short_id(&id));
    Ok(())
}

pub fn clear(service: &ReviewService, yes: bool) -> Result<()> {
    let count = service.segments().len();
    if count == 0 {
        println!("{}", style("Nothing to clear").dim());
        return Ok(());
    }

    if !yes {
        let term = Term::stderr();
        term.write_line(&format!(
            "Are you sure you want to clear all {count} segments? This cannot be undone. [y/N]"
        ))?;
        let answer = term.read_line()?;
        if !matches!(answer.trim().to_lowercase().as_str(), "y" | "yes") {
            println!("Cancelled");
            return Ok(());
        }
    }

    let removed = service.clear();
    println!("{} Removed {} segments", style("✓").green(), removed);
    Ok(())
}
