//! General purpose filters registered by the core extension.
//!
//! - `date_format(pattern="dd/MM/yyyy")`: format a timestamp or a date string
//!   with an ICU-style pattern
//! - `nl2p`: turn blank-line separated text into `<p>` paragraphs, single
//!   newlines into `<br />`
//! - `human_file_size(precision=2)`: `1536` → `1.5 KB`
//! - `json_decode`: parse a JSON string into a value
//!
//! Month and day names are English; a `locale` argument is accepted for
//! compatibility and ignored.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use std::collections::HashMap;
use tera::{Error, Filter, Result, Tera, Value};

/// Pattern used by `date_format` when none is given.
pub const DEFAULT_DATE_PATTERN: &str = "dd/MM/yyyy";

const FILE_SIZE_UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

/// Register every filter of this module on `tera`.
pub fn register(tera: &mut Tera) {
    tera.register_filter("date_format", date_format);
    tera.register_filter("nl2p", Nl2pFilter);
    tera.register_filter("human_file_size", human_file_size);
    tera.register_filter("json_decode", json_decode);
}

/// Translate an ICU date pattern into a chrono format string.
///
/// Text between single quotes is literal, `''` is a quote.
pub fn icu_to_strftime(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c == '\'' {
            if chars.get(i + 1) == Some(&'\'') {
                out.push('\'');
                i += 2;
                continue;
            }
            i += 1;
            while i < chars.len() {
                if chars[i] == '\'' {
                    if chars.get(i + 1) == Some(&'\'') {
                        out.push('\'');
                        i += 2;
                        continue;
                    }
                    break;
                }
                push_literal(&mut out, chars[i]);
                i += 1;
            }
            i += 1;
            continue;
        }

        if !c.is_ascii_alphabetic() {
            push_literal(&mut out, c);
            i += 1;
            continue;
        }

        let mut run = 1;
        while chars.get(i + run) == Some(&c) {
            run += 1;
        }
        i += run;

        let directive = match (c, run) {
            ('y', 2) => "%y",
            ('y', _) => "%Y",
            ('M', 1) => "%-m",
            ('M', 2) => "%m",
            ('M', 3) => "%b",
            ('M', _) => "%B",
            ('d', 1) => "%-d",
            ('d', _) => "%d",
            ('E', 1..=3) => "%a",
            ('E', _) => "%A",
            ('H', 1) => "%-H",
            ('H', _) => "%H",
            ('h', 1) => "%-I",
            ('h', _) => "%I",
            ('m', 1) => "%-M",
            ('m', _) => "%M",
            ('s', 1) => "%-S",
            ('s', _) => "%S",
            ('a', _) => "%p",
            _ => {
                for _ in 0..run {
                    push_literal(&mut out, c);
                }
                continue;
            }
        };
        out.push_str(directive);
    }

    out
}

fn push_literal(out: &mut String, c: char) {
    if c == '%' {
        out.push_str("%%");
    } else {
        out.push(c);
    }
}

/// Parse a filter input into a UTC date.
fn to_datetime(value: &Value) -> Result<DateTime<Utc>> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .ok_or_else(|| Error::msg(format!("Filter `date_format` received an invalid timestamp: {n}"))),
        Value::String(s) => {
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Ok(dt.with_timezone(&Utc));
            }
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
                return Ok(dt.and_utc());
            }
            if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                return Ok(date.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc());
            }
            Err(Error::msg(format!("Filter `date_format` can't parse date \"{s}\"")))
        }
        other => Err(Error::msg(format!(
            "Filter `date_format` expects a timestamp or a date string, got {other}"
        ))),
    }
}

fn date_format(value: &Value, args: &HashMap<String, Value>) -> Result<Value> {
    let pattern = match args.get("pattern") {
        Some(Value::String(p)) => p.as_str(),
        Some(other) => {
            return Err(Error::msg(format!("Filter `date_format` expects a string pattern, got {other}")));
        }
        None => DEFAULT_DATE_PATTERN,
    };
    let datetime = to_datetime(value)?;
    Ok(Value::String(datetime.format(&icu_to_strftime(pattern)).to_string()))
}

/// `nl2p`: escapes its input, so the result is safe.
struct Nl2pFilter;

impl Filter for Nl2pFilter {
    fn filter(&self, value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
        let text = value
            .as_str()
            .ok_or_else(|| Error::msg(format!("Filter `nl2p` expects a string, got {value}")))?;
        Ok(Value::String(nl2p(text)))
    }

    fn is_safe(&self) -> bool {
        true
    }
}

/// Wrap paragraphs in `<p>`, turn remaining newlines into `<br />`.
pub fn nl2p(text: &str) -> String {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    let mut paragraphs = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in normalized.split('\n') {
        if line.trim().is_empty() {
            if !current.is_empty() {
                paragraphs.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line.trim_end());
        }
    }
    if !current.is_empty() {
        paragraphs.push(current);
    }

    paragraphs
        .into_iter()
        .map(|lines| {
            let body: Vec<String> = lines.into_iter().map(tera::escape_html).collect();
            format!("<p>{}</p>", body.join("<br />\n"))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a byte count with binary units.
pub fn format_file_size(bytes: f64, precision: usize) -> String {
    let mut size = bytes;
    let mut unit = 0;
    while size.abs() >= 1024.0 && unit < FILE_SIZE_UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    let mut number = format!("{size:.precision$}");
    if number.contains('.') {
        number = number.trim_end_matches('0').trim_end_matches('.').to_string();
    }
    format!("{number} {}", FILE_SIZE_UNITS[unit])
}

fn human_file_size(value: &Value, args: &HashMap<String, Value>) -> Result<Value> {
    let bytes = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .ok_or_else(|| Error::msg(format!("Filter `human_file_size` expects a number, got {value}")))?;

    let precision = match args.get("precision") {
        Some(p) => p
            .as_u64()
            .ok_or_else(|| Error::msg(format!("Filter `human_file_size` expects an integer precision, got {p}")))?
            as usize,
        None => 2,
    };

    Ok(Value::String(format_file_size(bytes, precision)))
}

fn json_decode(value: &Value, _args: &HashMap<String, Value>) -> Result<Value> {
    let text = value
        .as_str()
        .ok_or_else(|| Error::msg(format!("Filter `json_decode` expects a string, got {value}")))?;
    serde_json::from_str(text).map_err(|e| Error::chain("Filter `json_decode` received invalid JSON", e))
}
