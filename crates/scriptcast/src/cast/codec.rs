//! Reading and writing the asciicast v2 wire format.
//!
//! A cast file is UTF-8 text with one JSON record per line: the header
//! object on line 0, then one 3-element event record per line. Parsing is
//! all-or-nothing: the first malformed line fails the whole load.

use std::fs;
use std::io::{BufRead, Write};
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use super::event::Event;
use super::header::{FORMAT_VERSION, Header};
use super::stream::AsciiCast;
use crate::error::{FormatError, Result, ScriptcastError};

static RESIZE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]+)x([0-9]+)$").expect("resize pattern is valid"));

impl AsciiCast {
    /// Load a cast from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| ScriptcastError::io_context(format!("reading {}", path.display()), e))?;
        Self::parse_str(&content)
    }

    /// Parse a cast from its textual form.
    pub fn parse_str(content: &str) -> Result<Self> {
        parse_lines(content.lines())
    }

    /// Render to wire lines: the header record first, then one record per
    /// event in stream order.
    ///
    /// Fails with a contract error if any comment event is still present.
    pub fn to_lines(&self) -> Result<Vec<String>> {
        let mut lines = Vec::with_capacity(self.events.len() + 1);
        lines.push(self.header.to_record().to_string());
        for event in &self.events {
            let record = event.to_record()?;
            // Fixed-precision decimal times: no scientific notation, so
            // other tools never reinterpret the value.
            lines.push(format!(
                "[{:.6}, \"{}\", {}]",
                record.time,
                record.code,
                Value::String(record.data)
            ));
        }
        Ok(lines)
    }

    /// Save the cast to a file, one newline-terminated record per line.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let lines = self.to_lines()?;
        let mut content = String::new();
        for line in &lines {
            content.push_str(line);
            content.push('\n');
        }
        fs::write(path, content)
            .map_err(|e| ScriptcastError::io_context(format!("writing {}", path.display()), e))?;
        tracing::debug!(path = %path.display(), events = self.events.len(), "saved cast");
        Ok(())
    }
}

/// Read a cast from a buffered reader.
pub fn read_cast<R: BufRead>(reader: R) -> Result<AsciiCast> {
    let lines: Vec<String> = reader
        .lines()
        .collect::<std::io::Result<_>>()
        .map_err(|e| ScriptcastError::io_context("reading cast lines", e))?;
    parse_lines(lines.iter().map(String::as_str))
}

/// Write a cast to a writer in wire form.
pub fn write_cast<W: Write>(writer: &mut W, cast: &AsciiCast) -> Result<()> {
    for line in cast.to_lines()? {
        writeln!(writer, "{line}")
            .map_err(|e| ScriptcastError::io_context("writing cast record", e))?;
    }
    Ok(())
}

fn parse_lines<'a, I>(lines: I) -> Result<AsciiCast>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut lines = lines.into_iter();
    let header_line = lines.next().ok_or(FormatError::MissingHeader)?;
    let header = parse_header(header_line)?;

    let mut events = Vec::new();
    for (ix, line) in lines.enumerate() {
        events.push(parse_event(line, ix + 1)?);
    }

    tracing::debug!(events = events.len(), "parsed cast");
    Ok(AsciiCast::with_events(header, events))
}

fn parse_header(line: &str) -> Result<Header> {
    let value: Value = serde_json::from_str(line).map_err(|_| FormatError::MissingHeader)?;
    if !value.is_object() {
        return Err(FormatError::MissingHeader.into());
    }
    let header: Header = serde_json::from_value(value)
        .map_err(|e| FormatError::invalid_header(e.to_string()))?;
    if header.version != FORMAT_VERSION {
        return Err(FormatError::UnsupportedVersion {
            version: i64::from(header.version),
        }
        .into());
    }
    Ok(header)
}

fn parse_event(line: &str, line_no: usize) -> Result<Event> {
    let value: Value =
        serde_json::from_str(line).map_err(|_| FormatError::InvalidEvent { line: line_no })?;
    let Value::Array(items) = value else {
        return Err(FormatError::InvalidEvent { line: line_no }.into());
    };
    let [time, code, payload] = items.as_slice() else {
        return Err(FormatError::InvalidEvent { line: line_no }.into());
    };

    let time = time
        .as_f64()
        .filter(|t| t.is_finite() && *t >= 0.0)
        .ok_or(FormatError::InvalidEventTime { line: line_no })?;

    let code = code.as_str().ok_or_else(|| FormatError::InvalidEventKind {
        kind: code.to_string(),
        line: line_no,
    })?;

    match code {
        "o" | "i" | "m" => {
            let data = payload
                .as_str()
                .ok_or(FormatError::InvalidEvent { line: line_no })?;
            Ok(match code {
                "o" => Event::output(time, data),
                "i" => Event::input(time, data),
                _ => Event::marker(time, data),
            })
        }
        "r" => {
            let data = payload
                .as_str()
                .ok_or(FormatError::InvalidEvent { line: line_no })?;
            let (cols, rows) = parse_resize(data).ok_or_else(|| {
                FormatError::InvalidResizeData {
                    data: data.to_string(),
                    line: line_no,
                }
            })?;
            Ok(Event::resize(time, cols, rows))
        }
        other => Err(FormatError::InvalidEventKind {
            kind: other.to_string(),
            line: line_no,
        }
        .into()),
    }
}

fn parse_resize(data: &str) -> Option<(u16, u16)> {
    let captures = RESIZE_RE.captures(data)?;
    let cols = captures[1].parse().ok()?;
    let rows = captures[2].parse().ok()?;
    Some((cols, rows))
}
