//! # Command Output Module
//!
//! Writes transport commands to the command channel.
//!
//! This module handles:
//! - Plain text lines (`play`, `speed 0.500000`, ...)
//! - JSON lines with timestamps for machine consumers
//! - Flushing after every command so a reader sees it before the next input
//!
//! Diagnostics never go through a sink; they use `tracing`.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};

use crate::session::command::Command;

/// Format of the command channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Jsonl,
}

/// Destination for emitted commands.
#[cfg_attr(test, mockall::automock)]
pub trait CommandSink {
    /// Writes one command as one line and flushes it.
    fn emit(&mut self, command: &Command) -> io::Result<()>;
}

/// Writes each command as its text line.
pub struct TextSink<W: Write> {
    writer: W,
}

impl<W: Write> TextSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> CommandSink for TextSink<W> {
    fn emit(&mut self, command: &Command) -> io::Result<()> {
        writeln!(self.writer, "{}", command)?;
        self.writer.flush()
    }
}

/// One JSON line on the command channel.
#[derive(Debug, Serialize)]
struct CommandRecord<'a> {
    timestamp: String,
    command: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<f64>,
}

/// Writes each command as a JSON object on its own line.
pub struct JsonlSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonlSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> CommandSink for JsonlSink<W> {
    fn emit(&mut self, command: &Command) -> io::Result<()> {
        let record = CommandRecord {
            timestamp: Utc::now().to_rfc3339(),
            command: command.token(),
            value: command.value(),
        };
        serde_json::to_writer(&mut self.writer, &record)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()
    }
}

/// Builds the sink for `format` on top of `writer`.
pub fn sink_for<W: Write + 'static>(format: OutputFormat, writer: W) -> Box<dyn CommandSink> {
    match format {
        OutputFormat::Text => Box::new(TextSink::new(writer)),
        OutputFormat::Jsonl => Box::new(JsonlSink::new(writer)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::SemanticButton;

    #[test]
    fn test_text_sink_lines() {
        let mut sink = TextSink::new(Vec::new());
        sink.emit(&Command::Play).unwrap();
        sink.emit(&Command::Navigate(SemanticButton::Next)).unwrap();
        sink.emit(&Command::Speed(-0.25)).unwrap();

        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(out, "play\n# todo\nspeed -0.250000\n");
    }

    #[test]
    fn test_jsonl_sink_records() {
        let mut sink = JsonlSink::new(Vec::new());
        sink.emit(&Command::Record).unwrap();
        sink.emit(&Command::Speed(16.0)).unwrap();

        let out = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<serde_json::Value> = out
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["command"], "record");
        assert!(lines[0].get("value").is_none());
        assert!(lines[0]["timestamp"].as_str().is_some());
        assert_eq!(lines[1]["command"], "speed");
        assert_eq!(lines[1]["value"], 16.0);
    }

    #[test]
    fn test_output_format_names() {
        #[derive(Deserialize)]
        struct Wrapper {
            format: OutputFormat,
        }
        let text: Wrapper = toml::from_str(r#"format = "text""#).unwrap();
        let jsonl: Wrapper = toml::from_str(r#"format = "jsonl""#).unwrap();
        assert_eq!(text.format, OutputFormat::Text);
        assert_eq!(jsonl.format, OutputFormat::Jsonl);
        assert!(toml::from_str::<Wrapper>(r#"format = "csv""#).is_err());
    }

    #[test]
    fn test_write_failure_is_reported() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let mut sink = sink_for(OutputFormat::Text, Broken);
        let err = sink.emit(&Command::Quit).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }
}
