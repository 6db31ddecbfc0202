//! Log redaction for formatted tracing output.
//!
//! Assessment inputs carry no identifiers, but snapshot paths and free-text
//! warnings can. Every formatted log line passes through [`redact`] before
//! reaching the sink:
//! - identifier-like tokens (UUIDs, MRNs, emails, phone numbers)
//! - dates of birth
//! - terminal control sequences, which could forge log lines
//!
//! Input is capped at `ADL_PROGNOSIS_REDACT_MAX_BYTES` (default 16 KiB).

use regex::{Regex, RegexSet};
use std::sync::OnceLock;
use tracing_subscriber::fmt::MakeWriter;

const DEFAULT_REDACT_MAX_BYTES: usize = 16 * 1024;

/// (pattern, replacement) pairs, applied in order.
const RULES: [(&str, &str); 6] = [
    (
        r"[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}",
        "[REDACTED-UUID]",
    ),
    (r"\bMRN[:\s]?\d{6,10}\b", "[REDACTED-MRN]"),
    (
        r"(?i)\b(?:dob|birth(?:_?date)?)\b\s*[:=]?\s*\d{4}-\d{2}-\d{2}\b",
        "[REDACTED-DOB]",
    ),
    (
        r"(?i)\b[a-z0-9](?:[a-z0-9._%+-]{0,62}[a-z0-9])?@(?:[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.)+[a-z]{2,}\b",
        "[REDACTED-EMAIL]",
    ),
    (
        r"\b(?:\+?\d{1,3}[-.\s]?)?\(?\d{2,4}\)?[-.\s]\d{3,4}[-.\s]\d{4}\b",
        "[REDACTED-PHONE]",
    ),
    // ANSI escapes and bare carriage returns
    (r"\x1b\[[0-9;?]*[A-Za-z]|\r", ""),
];

struct Rules {
    set: RegexSet,
    compiled: Vec<(Regex, &'static str)>,
}

static COMPILED: OnceLock<Option<Rules>> = OnceLock::new();

fn rules() -> Option<&'static Rules> {
    COMPILED
        .get_or_init(|| {
            let set = RegexSet::new(RULES.iter().map(|(p, _)| *p)).ok()?;
            let compiled = RULES
                .iter()
                .map(|&(p, r)| Regex::new(p).map(|re| (re, r)))
                .collect::<Result<Vec<_>, _>>()
                .ok()?;
            Some(Rules { set, compiled })
        })
        .as_ref()
}

fn max_bytes() -> usize {
    std::env::var("ADL_PROGNOSIS_REDACT_MAX_BYTES")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|&v| v > 0)
        .unwrap_or(DEFAULT_REDACT_MAX_BYTES)
}

fn truncate(input: &str, max: usize) -> (&str, bool) {
    if input.len() <= max {
        return (input, false);
    }
    let mut end = max;
    while end > 0 && !input.is_char_boundary(end) {
        end -= 1;
    }
    (&input[..end], true)
}

/// Redact identifiers and control sequences from `input`.
#[must_use]
pub fn redact(input: &str) -> String {
    redact_with_limit(input, max_bytes())
}

fn redact_with_limit(input: &str, max: usize) -> String {
    let (prefix, truncated) = truncate(input, max);

    let mut out = match rules() {
        Some(rules) => {
            let mut text = prefix.to_string();
            for idx in rules.set.matches(prefix).iter() {
                let (re, replacement) = &rules.compiled[idx];
                text = re.replace_all(&text, *replacement).into_owned();
            }
            text
        }
        // Patterns are static; failing to compile them means nothing can be trusted.
        None => "[REDACTION UNAVAILABLE]\n".to_string(),
    };

    if truncated {
        out.push_str(" [TRUNCATED]\n");
    }
    out
}

/// `MakeWriter` wrapper that redacts each formatted line.
#[derive(Debug, Clone)]
pub struct RedactingMakeWriter<M> {
    inner: M,
}

impl<M> RedactingMakeWriter<M> {
    #[must_use]
    pub fn new(inner: M) -> Self {
        Self { inner }
    }
}

/// Line-buffering writer produced by [`RedactingMakeWriter`].
pub struct RedactingWriter<W: std::io::Write> {
    inner: W,
    pending: Vec<u8>,
}

impl<W: std::io::Write> RedactingWriter<W> {
    fn emit(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        let text = String::from_utf8_lossy(bytes);
        self.inner.write_all(redact(&text).as_bytes())
    }
}

impl<W: std::io::Write> std::io::Write for RedactingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.pending.extend_from_slice(buf);

        while let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            self.emit(&line)?;
        }

        // A formatter that never writes a newline must not grow the buffer forever.
        if self.pending.len() > max_bytes().saturating_mul(2) {
            let rest = std::mem::take(&mut self.pending);
            self.emit(&rest)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        if !self.pending.is_empty() {
            let rest = std::mem::take(&mut self.pending);
            self.emit(&rest)?;
        }
        self.inner.flush()
    }
}

impl<W: std::io::Write> Drop for RedactingWriter<W> {
    fn drop(&mut self) {
        let _ = std::io::Write::flush(self);
    }
}

impl<'a, M> MakeWriter<'a> for RedactingMakeWriter<M>
where
    M: MakeWriter<'a>,
{
    type Writer = RedactingWriter<M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        RedactingWriter {
            inner: self.inner.make_writer(),
            pending: Vec::new(),
        }
    }
}
