//! Console encoder that appends a record's key-value pairs to the formatted
//! line in logfmt style, e.g.
//! `12:00:01 DEBUG tmview::http RPC request completed path=/status status=200 elapsed=12ms`.
//!
//! Values that are empty or contain whitespace, `=` or `"` are quoted. A key
//! ending in `_ms` is printed without the suffix and with the unit appended
//! to its value, and an HTTP `status` of 400 or above is highlighted.

use log::{
    Record,
    kv::{Error, Key, Value, VisitSource},
};
use log4rs::encode::pattern::PatternEncoder;
use log4rs::encode::{Color, Encode, Style, Write};
use serde::Deserialize;
use std::io;

const DEFAULT_PATTERN: &str = "{d} {l} {t} {m}";
const MILLIS_SUFFIX: &str = "_ms";

#[derive(Debug, Deserialize)]
pub struct StructuredConsoleEncoderConfig {
    pub pattern: Option<String>,
}

#[derive(Debug)]
pub struct StructuredConsoleEncoder {
    delegate: PatternEncoder,
}

impl StructuredConsoleEncoder {
    pub fn new(pattern: &str) -> Self {
        Self {
            delegate: PatternEncoder::new(pattern),
        }
    }
}

impl Encode for StructuredConsoleEncoder {
    fn encode(&self, w: &mut dyn Write, record: &Record) -> anyhow::Result<()> {
        self.delegate.encode(w, record)?;

        let mut pairs = Pairs::default();
        let visited = record.key_values().visit(&mut pairs);
        for (key, value) in &pairs.0 {
            write_pair(w, key, value)?;
        }
        if let Err(kv_err) = visited {
            write!(w, " [KV Error: {}]", kv_err)?;
        }

        w.write_all(b"\n")?;
        Ok(())
    }
}

/// Pairs rendered to text in the order the record yields them.
#[derive(Default)]
struct Pairs(Vec<(String, String)>);

impl<'kvs> VisitSource<'kvs> for Pairs {
    fn visit_pair(&mut self, key: Key<'kvs>, value: Value<'kvs>) -> Result<(), Error> {
        self.0.push((key.as_str().to_string(), value.to_string()));
        Ok(())
    }
}

fn write_pair(w: &mut dyn Write, key: &str, value: &str) -> io::Result<()> {
    let (key, unit) = match key.strip_suffix(MILLIS_SUFFIX) {
        Some(base) if !base.is_empty() => (base, "ms"),
        _ => (key, ""),
    };

    w.set_style(Style::new().text(Color::Cyan))?;
    write!(w, " {key}=")?;

    w.set_style(&value_style(key, value))?;
    if needs_quotes(value) {
        write!(w, "{value:?}")?;
    } else {
        write!(w, "{value}{unit}")?;
    }
    w.set_style(&Style::default())
}

fn needs_quotes(value: &str) -> bool {
    value.is_empty() || value.chars().any(|c| c.is_whitespace() || c == '=' || c == '"')
}

fn value_style(key: &str, value: &str) -> Style {
    let mut style = Style::new();
    if key == "status" && value.parse::<u16>().is_ok_and(|status| status >= 400) {
        style.text(Color::Red);
    }
    style
}

pub struct StructuredConsoleEncoderDeserializer;

impl log4rs::config::Deserialize for StructuredConsoleEncoderDeserializer {
    type Trait = dyn Encode;
    type Config = StructuredConsoleEncoderConfig;

    fn deserialize(
        &self,
        config: StructuredConsoleEncoderConfig,
        _: &log4rs::config::Deserializers,
    ) -> anyhow::Result<Box<dyn Encode>> {
        let pattern = config.pattern.as_deref().unwrap_or(DEFAULT_PATTERN);
        Ok(Box::new(StructuredConsoleEncoder::new(pattern)))
    }
}
