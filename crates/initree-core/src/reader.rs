//! Line-oriented INI reader
//!
//! Streams through the input exactly once, populating an [`Options`] tree.
//! The grammar is forgiving of whitespace and case outside double quotes:
//!
//! ```text
//! [section.name]
//! key = value          ; trailing comment stripped
//! flagkey              ; equivalent to: flagkey = TRUE
//! quoted = "Mixed Case Preserved"
//! ```
//!
//! Comment delimiters `#` and `;` run to end of line and are deliberately not
//! quote-aware, while case folding is. Section lookup is always relative to
//! the document root, so the section namespace stays flat even though the
//! target store itself is a tree.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{Error, Result};
use crate::options::Options;

/// Characters trimmed from a normalized line
const WHITESPACE: [char; 4] = [' ', '\t', '\r', '\n'];

/// Characters trimmed from both sides of a key and a value
const KEY_VALUE_TRIM: [char; 5] = [' ', '\t', '\r', '\n', '"'];

/// Read an INI file into `options`
///
/// The file path doubles as the source identifier recorded on every entry.
/// Fails with `ConfigNotFound` if the file cannot be opened; the handle is
/// released on every exit path, including early failure.
pub fn read_file(options: &mut Options, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let source = path.display().to_string();
    let file = File::open(path)
        .map_err(|e| Error::config_not_found(&source).with_cause(e.to_string()))?;
    read(options, BufReader::new(file), &source)
}

/// Read INI text from any buffered input into `options`
///
/// `source` is pure provenance metadata: it is attached as the origin of
/// every entry created during this call and cited in error messages. Any
/// error aborts the read immediately; entries set before the failure are
/// kept.
pub fn read<R: BufRead>(options: &mut Options, input: R, source: &str) -> Result<()> {
    log::debug!("reading options from '{}'", source);

    // Current section for subsequent key/value lines; None means the root.
    let mut current: Option<String> = None;

    for raw in input.lines() {
        let raw = raw.map_err(|e| Error::config_not_found(source).with_cause(e.to_string()))?;
        let line = normalize(&raw);
        if line.is_empty() {
            continue;
        }

        if line.contains('[') {
            if !line.contains(']') {
                return Err(Error::malformed_section(source, &line));
            }
            // Only the brackets are trimmed here; the grammar does not allow
            // re-trimming whitespace inside them.
            let name = line.trim_matches(['[', ']']);
            if name.is_empty() {
                return Err(Error::missing_section_name(source, &line));
            }
            // Always relative to the root: sections never nest.
            options.section(name);
            log::trace!("entering section '{}'", name);
            current = Some(name.to_string());
        } else {
            let (key, value) = parse_key_value(&line)?;
            let target = match current.as_deref() {
                Some(name) => options.section(name),
                None => &mut *options,
            };
            target.set(key, value, source);
        }
    }

    Ok(())
}

/// Normalize a raw input line
///
/// Strips a trailing comment, trims surrounding whitespace, and lowercases
/// everything outside double-quoted spans. Each step is idempotent, so
/// re-normalizing a normalized line is a no-op.
fn normalize(line: &str) -> String {
    case_fold_unquoted(strip_comment(line).trim_matches(WHITESPACE))
}

/// Return the prefix of `line` up to the first `#` or `;`
///
/// Operates on the raw line and is not quote-aware: a delimiter inside a
/// quoted value still starts a comment. Observed grammar, kept as-is.
fn strip_comment(line: &str) -> &str {
    match line.find(['#', ';']) {
        Some(pos) => &line[..pos],
        None => line,
    }
}

/// Lowercase all characters outside double-quoted spans
///
/// Toggles on each unescaped `"`; characters inside quotes pass through
/// untouched so quoted values keep their case.
fn case_fold_unquoted(line: &str) -> String {
    let mut inside_quotes = false;
    let mut prev = '\0';
    let mut out = String::with_capacity(line.len());
    for c in line.chars() {
        if c == '"' && prev != '\\' {
            inside_quotes = !inside_quotes;
            out.push(c);
        } else if inside_quotes {
            out.push(c);
        } else {
            out.push(c.to_ascii_lowercase());
        }
        prev = c;
    }
    out
}

/// Split a normalized, non-empty, non-section line into (key, value)
///
/// The first `=` is the delimiter; later ones belong to the value. A line
/// with no `=` is a bare flag with the fixed value "TRUE".
fn parse_key_value(line: &str) -> Result<(String, String)> {
    match line.find('=') {
        None => Ok((line.to_string(), "TRUE".to_string())),
        Some(pos) => {
            let key = line[..pos].trim_matches(KEY_VALUE_TRIM);
            let value = line[pos + 1..].trim_matches(KEY_VALUE_TRIM);
            if key.is_empty() || value.is_empty() {
                return Err(Error::empty_key_or_value(line));
            }
            Ok((key.to_string(), value.to_string()))
        }
    }
}
