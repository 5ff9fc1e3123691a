//! Shell command parsing.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use thiserror::Error;

use planner_core::domain::{PostId, Status, StatusFilter};

/// One line of shell input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Help,
    List,
    Filter(StatusFilter),
    New,
    Edit(PostId),
    Delete(PostId),
    Show,
    Copy,
    Text { index: usize, text: String },
    AddUnit,
    RemoveUnit(usize),
    Image { index: usize, reference: String },
    RemoveImage(usize),
    Tone(String),
    Untone(String),
    Tones,
    Status(Status),
    Statuses,
    Schedule(DateTime<Utc>),
    Unschedule,
    Hashtag { index: usize, tag: String },
    Save,
    Cancel,
    Dashboard,
    Brainstorm(Option<String>),
    UseIdea(usize),
    Analyze(String),
    Readiness,
    Hashtags,
    Score,
    Rephrase(usize),
    Format(usize),
    Theme,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown command '{0}' (try 'help')")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("{0}")]
    Invalid(String),
}

pub const HELP: &str = "\
Posts:
  list                       show posts matching the filter
  filter <All|status>        filter by Idea, Perfect or Ready to Post
  new                        start a new draft
  edit <id>                  open a saved post
  delete <id>                delete a saved post (asks for confirmation)
Draft:
  show | copy                print the draft | print the thread as plain text
  text <n> <text>            set the text of post #n
  add | remove <n>           append an empty post | remove post #n
  image <n> <ref> | unimage <n>
  tone <label> | untone <label>  toggle a tone | remove it
  tones                      list preset tones, marking the draft's
  status <status>            set the draft status
  statuses                   list statuses and what they mean
  schedule <when> | unschedule   RFC 3339 or 'YYYY-MM-DD HH:MM' local time
  hashtag <n> <#tag>         append a hashtag to post #n
  save | cancel
AI:
  readiness | hashtags | score | rephrase <n> | format <n>
  brainstorm [topic]         then 'use <n>' to draft an idea
  analyze <text>             review a published post
Other:
  dashboard | theme | help | quit";

/// Parse one input line. Empty lines are not commands.
pub fn parse(line: &str) -> Result<Option<ShellCommand>, ParseError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb.to_lowercase().as_str() {
        "help" | "?" => ShellCommand::Help,
        "list" | "ls" => ShellCommand::List,
        "filter" => ShellCommand::Filter(
            required(rest, "filter <All|Idea|Perfect|Ready to Post>")?
                .parse()
                .map_err(invalid)?,
        ),
        "new" => ShellCommand::New,
        "edit" => ShellCommand::Edit(PostId::from(required(rest, "edit <id>")?)),
        "delete" | "rm" => ShellCommand::Delete(PostId::from(required(rest, "delete <id>")?)),
        "show" => ShellCommand::Show,
        "copy" => ShellCommand::Copy,
        "text" => {
            let (index, text) = index_and_rest(rest, "text <n> <text>")?;
            ShellCommand::Text { index, text }
        }
        "add" => ShellCommand::AddUnit,
        "remove" => ShellCommand::RemoveUnit(index(rest, "remove <n>")?),
        "image" => {
            let (index, reference) = index_and_rest(rest, "image <n> <reference>")?;
            if reference.is_empty() {
                return Err(ParseError::Usage("image <n> <reference>"));
            }
            ShellCommand::Image { index, reference }
        }
        "unimage" => ShellCommand::RemoveImage(index(rest, "unimage <n>")?),
        "tone" => ShellCommand::Tone(required(rest, "tone <label>")?.to_string()),
        "untone" => ShellCommand::Untone(required(rest, "untone <label>")?.to_string()),
        "tones" => ShellCommand::Tones,
        "statuses" => ShellCommand::Statuses,
        "status" => ShellCommand::Status(
            required(rest, "status <Idea|Perfect|Ready to Post>")?
                .parse()
                .map_err(invalid)?,
        ),
        "schedule" => ShellCommand::Schedule(parse_when(required(rest, "schedule <when>")?)?),
        "unschedule" => ShellCommand::Unschedule,
        "hashtag" => {
            let (index, tag) = index_and_rest(rest, "hashtag <n> <#tag>")?;
            if tag.is_empty() {
                return Err(ParseError::Usage("hashtag <n> <#tag>"));
            }
            ShellCommand::Hashtag { index, tag }
        }
        "save" => ShellCommand::Save,
        "cancel" => ShellCommand::Cancel,
        "dashboard" | "home" => ShellCommand::Dashboard,
        "brainstorm" => {
            ShellCommand::Brainstorm(Some(rest.to_string()).filter(|topic| !topic.is_empty()))
        }
        "use" => ShellCommand::UseIdea(index(rest, "use <n>")?),
        "analyze" => ShellCommand::Analyze(required(rest, "analyze <text>")?.to_string()),
        "readiness" => ShellCommand::Readiness,
        "hashtags" => ShellCommand::Hashtags,
        "score" => ShellCommand::Score,
        "rephrase" => ShellCommand::Rephrase(index(rest, "rephrase <n>")?),
        "format" => ShellCommand::Format(index(rest, "format <n>")?),
        "theme" => ShellCommand::Theme,
        "quit" | "exit" | "q" => ShellCommand::Quit,
        other => return Err(ParseError::Unknown(other.to_string())),
    };

    Ok(Some(command))
}

fn invalid(err: impl std::fmt::Display) -> ParseError {
    ParseError::Invalid(err.to_string())
}

fn required<'a>(rest: &'a str, usage: &'static str) -> Result<&'a str, ParseError> {
    if rest.is_empty() {
        Err(ParseError::Usage(usage))
    } else {
        Ok(rest)
    }
}

/// 1-based position on input, 0-based index out.
fn index(raw: &str, usage: &'static str) -> Result<usize, ParseError> {
    match raw.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n - 1),
        _ => Err(ParseError::Usage(usage)),
    }
}

fn index_and_rest(rest: &str, usage: &'static str) -> Result<(usize, String), ParseError> {
    let (raw, tail) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
    Ok((index(raw, usage)?, tail.trim().to_string()))
}

/// RFC 3339, or `YYYY-MM-DD HH:MM` in local time.
fn parse_when(raw: &str) -> Result<DateTime<Utc>, ParseError> {
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Ok(at.with_timezone(&Utc));
    }

    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M"))
        .map_err(|_| ParseError::Invalid(format!("cannot read '{raw}' as a date and time")))?;

    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|at| at.with_timezone(&Utc))
        .ok_or_else(|| ParseError::Invalid(format!("'{raw}' does not exist in local time")))
}
