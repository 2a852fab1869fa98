use chrono::NaiveDate;

use crate::date::extract_date;

/// Keyword that opens a delete command.
pub const DELETE_KEYWORD: &str = "ลบ";

/// Keyword that requests a full export, matched case-insensitively
/// against the whole message.
pub const EXPORT_KEYWORD: &str = "export";

/// A fully parsed command, ready for its handler.
#[derive(Clone, Debug, PartialEq)]
pub enum Intent {
    Export,
    Delete {
        date: NaiveDate,
        item: Option<String>,
    },
    Summarize {
        start: NaiveDate,
        end: NaiveDate,
    },
    Record {
        date: Option<NaiveDate>,
        lines: Vec<String>,
    },
}

/// A message that matched a command shape but carried an unparsable
/// date phrase. These get a corrective reply instead of falling through
/// to the record handler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormatError {
    DeleteDate,
    Range,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Classified {
    Command(Intent),
    Malformed(FormatError),
}

/// Decide what a message asks for. Matchers run in fixed precedence
/// order — export, delete, summarize — and the record intent absorbs
/// everything that matched none of them.
pub fn classify(text: &str) -> Classified {
    let trimmed = text.trim();
    if trimmed.eq_ignore_ascii_case(EXPORT_KEYWORD) {
        return Classified::Command(Intent::Export);
    }
    if let Some(classified) = match_delete(trimmed) {
        return classified;
    }
    if let Some(classified) = match_summarize(trimmed) {
        return classified;
    }
    Classified::Command(match_record(trimmed))
}

/// Delete: the keyword, then a date phrase, then an optional item
/// filter kept verbatim. A matched keyword with a bad date phrase is
/// malformed, not a record.
fn match_delete(text: &str) -> Option<Classified> {
    let body = text.strip_prefix(DELETE_KEYWORD)?.trim_start();

    static BODY: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let pattern = BODY
        .get_or_init(|| regex::Regex::new(r"^(\S+\s+\S+\s+\S+)(?:\s+(\S.*))?$").unwrap());

    let Some(caps) = pattern.captures(body) else {
        return Some(Classified::Malformed(FormatError::DeleteDate));
    };
    let Some(date) = extract_date(&caps[1]) else {
        return Some(Classified::Malformed(FormatError::DeleteDate));
    };
    let item = caps.get(2).map(|m| m.as_str().trim_end().to_string());
    Some(Classified::Command(Intent::Delete { date, item }))
}

/// Summarize: a single line of exactly `<phrase> - <phrase>` with the
/// hyphen surrounded by whitespace. Interior hyphens without spacing
/// never trigger this matcher.
fn match_summarize(text: &str) -> Option<Classified> {
    if text.lines().count() != 1 {
        return None;
    }

    static RANGE: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let pattern = RANGE.get_or_init(|| regex::Regex::new(r"^(.+?)\s+-\s+(.+)$").unwrap());

    let caps = pattern.captures(text)?;
    match (extract_date(&caps[1]), extract_date(&caps[2])) {
        (Some(start), Some(end)) => Some(Classified::Command(Intent::Summarize { start, end })),
        _ => Some(Classified::Malformed(FormatError::Range)),
    }
}

/// Record fallback: a leading date line is consumed as the entry date;
/// otherwise every line is a candidate record and the date stays open
/// for the handler to fill with "today".
fn match_record(text: &str) -> Intent {
    let mut lines: Vec<&str> = text.lines().collect();
    let date = lines.first().and_then(|first| extract_date(first));
    if date.is_some() {
        lines.remove(0);
    }
    Intent::Record {
        date,
        lines: lines.into_iter().map(str::to_string).collect(),
    }
}
