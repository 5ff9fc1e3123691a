//! Plain-text rendering of posts, drafts and scores.

use std::fmt::Write;

use chrono::{DateTime, Local, Utc};

use planner_core::domain::{
    Draft, PRESET_TONES, Post, PostBody, PostScore, Status, Tones, X_CHAR_LIMIT, time_left,
};

/// One dashboard line: id, status, countdown or creation date, first words.
pub fn post_line(post: &Post, open_id: Option<&str>, now: DateTime<Utc>) -> String {
    let marker = if open_id == Some(post.id().as_str()) { "*" } else { " " };
    let body = post.body();
    let when = match time_left(body.scheduled_at(), now) {
        Some(left) => format!("[{left}]"),
        None => body.created_at().with_timezone(&Local).format("%Y-%m-%d").to_string(),
    };
    let units = body.content().len();
    let thread = if units > 1 { format!(" [{units} posts]") } else { String::new() };
    let first = &body.content().first().text;
    let headline = if first.trim().is_empty() {
        "Untitled Post".to_string()
    } else {
        preview(first, 48)
    };

    format!(
        "{marker} {id:<14} {status:<13} {when}{thread}  {headline}",
        id = post.id(),
        status = body.status(),
    )
}

/// Full view of the draft being edited.
pub fn draft(draft: &Draft) -> String {
    let mut out = String::new();
    let title = match draft.id() {
        Some(id) => format!("Editing post {id}"),
        None => "New draft".to_string(),
    };
    let _ = writeln!(out, "{title}");
    body(&mut out, draft.body());
    out
}

fn body(out: &mut String, body: &PostBody) {
    let _ = writeln!(
        out,
        "  status: {} ({})",
        body.status(),
        body.status().description()
    );
    if !body.tones().is_empty() {
        let tones: Vec<&str> = body.tones().iter().collect();
        let _ = writeln!(out, "  tones: {}", tones.join(", "));
    }
    if let Some(at) = body.scheduled_at() {
        let _ = writeln!(
            out,
            "  scheduled: {}",
            at.with_timezone(&Local).format("%Y-%m-%d %H:%M")
        );
    }

    for (i, unit) in body.content().units().iter().enumerate() {
        let count = unit.char_count();
        let flag = if unit.over_limit() { " OVER LIMIT" } else { "" };
        let _ = writeln!(out, "  #{} ({count}/{X_CHAR_LIMIT}{flag})", i + 1);
        if unit.text.is_empty() {
            let _ = writeln!(out, "    (empty)");
        }
        for line in unit.text.lines() {
            let _ = writeln!(out, "    {line}");
        }
        if let Some(image) = &unit.image {
            let _ = writeln!(out, "    [image: {}]", preview(image, 40));
        }
    }
}

/// Preset tones, marking those on the draft. Custom labels follow.
pub fn tones(active: Option<&Tones>) -> String {
    let mut out = String::new();
    let on = |label: &str| active.is_some_and(|t| t.contains(label));
    for label in PRESET_TONES {
        let mark = if on(label) { "x" } else { " " };
        let _ = writeln!(out, "  [{mark}] {label}");
    }
    for label in active.into_iter().flat_map(Tones::iter) {
        if !PRESET_TONES.iter().any(|preset| *preset == label) {
            let _ = writeln!(out, "  [x] {label} (custom)");
        }
    }
    out
}

pub fn statuses() -> String {
    let mut out = String::new();
    for status in Status::ALL {
        let _ = writeln!(out, "  {:<13} {}", status.as_str(), status.description());
    }
    out
}

pub fn score(score: &PostScore) -> String {
    let mut out = String::new();
    for (name, metric) in score.metrics() {
        let bar: String = "#".repeat(metric.score as usize);
        let _ = writeln!(
            out,
            "  {name:<15} {:>2}/10 {bar:<10}  {}",
            metric.score, metric.rationale
        );
    }
    out
}

fn preview(text: &str, max_chars: usize) -> String {
    let flat: String = text.split_whitespace().collect::<Vec<_>>().join(" ");
    match flat.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &flat[..idx]),
        None => flat,
    }
}
