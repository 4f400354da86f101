//! Terminal rendering of segments

use console::style;
use domain::{Segment, SegmentStatus, TargetLanguage, WordBreakdownEntry};
use prettytable::{format, Cell, Row, Table};

const ID_WIDTH: usize = 8;
const TEXT_WIDTH: usize = 40;

/// Leading part of an id, enough to address a segment from the command line
pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(ID_WIDTH) {
        Some((end, _)) => &id[..end],
        None => id,
    }
}

/// First line of `text`, cut to `max` characters
pub fn truncate(text: &str, max: usize) -> String {
    let line = text.lines().next().unwrap_or("");
    let count = line.chars().count();
    if count <= max && line.len() == text.trim_end().len() {
        return line.to_string();
    }
    let kept: String = line.chars().take(max.saturating_sub(1)).collect();
    format!("{kept}…")
}

fn status_spec(status: SegmentStatus) -> &'static str {
    match status {
        SegmentStatus::Pending => "Fy",
        SegmentStatus::Reviewed => "Fb",
        SegmentStatus::Approved => "Fg",
        SegmentStatus::NeedsWork => "Fr",
    }
}

pub fn segment_table(segments: &[Segment], language: &TargetLanguage) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BOX_CHARS);
    table.set_titles(Row::new(vec![
        Cell::new("ID").style_spec("b"),
        Cell::new("Status").style_spec("b"),
        Cell::new("Category").style_spec("b"),
        Cell::new("English").style_spec("b"),
        Cell::new(language.as_str()).style_spec("b"),
        Cell::new("AI").style_spec("b"),
    ]));

    for segment in segments {
        let ai = match (&segment.ai_feedback, &segment.word_breakdown) {
            (Some(_), Some(_)) => "feedback, words",
            (Some(_), None) => "feedback",
            (None, Some(_)) => "words",
            (None, None) => "",
        };
        table.add_row(Row::new(vec![
            Cell::new(short_id(&segment.id)),
            Cell::new(segment.status.as_str()).style_spec(status_spec(segment.status)),
            Cell::new(segment.category.as_str()),
            Cell::new(&truncate(&segment.source_text, TEXT_WIDTH)),
            Cell::new(&truncate(&segment.target_text, TEXT_WIDTH)),
            Cell::new(ai),
        ]));
    }

    table
}

pub fn breakdown_table(entries: &[WordBreakdownEntry], language: &TargetLanguage) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);
    table.set_titles(Row::new(vec![
        Cell::new(language.as_str()).style_spec("b"),
        Cell::new("English").style_spec("b"),
        Cell::new("Role/Note").style_spec("b"),
    ]));
    for entry in entries {
        table.add_row(Row::new(vec![
            Cell::new(&entry.target_word),
            Cell::new(&entry.source_equivalent),
            Cell::new(&entry.context),
        ]));
    }
    table
}

pub fn print_feedback(segment: &Segment) {
    match &segment.ai_feedback {
        Some(feedback) => {
            println!("{}", style("AI feedback").bold());
            for line in feedback.summary().lines() {
                println!("  {line}");
            }
        }
        None => println!("{}", style("No AI feedback yet").dim()),
    }
}

pub fn print_breakdown(segment: &Segment, language: &TargetLanguage) {
    if let Some(entries) = segment.word_breakdown.as_deref() {
        println!("{}", style("Word breakdown").bold());
        if entries.is_empty() {
            println!("  {}", style("(empty)").dim());
        } else {
            breakdown_table(entries, language).printstd();
        }
    }
}

pub fn print_segment(segment: &Segment, language: &TargetLanguage) {
    println!(
        "{} {}  {}  {}",
        style("Segment").bold(),
        style(&segment.id).cyan(),
        segment.status,
        style(segment.category).dim()
    );
    println!("{}", style("English").bold());
    println!("  {}", segment.source_text);
    println!("{}", style(language.as_str()).bold());
    if segment.target_text.is_empty() {
        println!("  {}", style("(no translation)").dim());
    } else {
        println!("  {}", segment.target_text);
    }
    print_feedback(segment);
    print_breakdown(segment, language);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("1"), "1");
        assert_eq!(short_id("0123456789abcdef"), "01234567");
    }

    #[test]
    fn test_truncate_keeps_short_single_lines() {
        assert_eq!(truncate("Bonjour", 10), "Bonjour");
        assert_eq!(truncate("", 10), "");
    }

    #[test]
    fn test_truncate_marks_cut_text() {
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
        assert_eq!(truncate("first\nsecond", 20), "first…");
        assert_eq!(truncate("éééééé", 4), "ééé…");
    }

    #[test]
    fn test_segment_table_has_a_row_per_segment() {
        let segments = domain::default_segments();
        let table = segment_table(&segments, &TargetLanguage::default());
        assert_eq!(table.len(), segments.len());
    }
}
