//! Hierarchical option store
//!
//! An [`Options`] node holds key -> (value, origin) entries plus named child
//! sections, in file order. The INI grammar keeps the section namespace flat:
//! the reader always creates sections as direct children of the document
//! root, so nesting never goes deeper than one level in practice.

use std::path::Path;

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::reader;

/// A single option value together with its recorded origin
///
/// The origin is the source identifier (usually a file path) that was active
/// when the value was set, kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    value: String,
    origin: String,
}

impl Entry {
    /// The stored value, as the raw (normalized) string from the input
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The source identifier this value came from
    pub fn origin(&self) -> &str {
        &self.origin
    }
}

/// A node in the options tree
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Options {
    entries: IndexMap<String, Entry>,
    sections: IndexMap<String, Options>,
}

impl Options {
    /// Create an empty options tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Load an options tree from an INI file
    ///
    /// Fails with `ConfigNotFound` if the file cannot be opened.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let mut options = Options::new();
        reader::read_file(&mut options, path)?;
        Ok(options)
    }

    /// Load an options tree from INI text
    ///
    /// `source` is recorded as the origin of every entry created.
    pub fn from_text(text: &str, source: &str) -> Result<Self> {
        let mut options = Options::new();
        reader::read(&mut options, text.as_bytes(), source)?;
        Ok(options)
    }

    /// Fetch-or-create a named child section
    ///
    /// Idempotent: calling twice with the same name returns the same section.
    pub fn section(&mut self, name: &str) -> &mut Options {
        self.sections.entry(name.to_string()).or_default()
    }

    /// Get a child section if it exists
    pub fn get_section(&self, name: &str) -> Option<&Options> {
        self.sections.get(name)
    }

    /// Set a key to a value, recording the origin
    ///
    /// Overwrites on conflict: last write wins.
    pub fn set(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
        origin: impl Into<String>,
    ) {
        self.entries.insert(
            key.into(),
            Entry {
                value: value.into(),
                origin: origin.into(),
            },
        );
    }

    /// Get a value by key in this section
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(|e| e.value.as_str())
    }

    /// Get the recorded origin of a key in this section
    pub fn origin(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(|e| e.origin.as_str())
    }

    /// Get a string value, failing if the key is not set
    pub fn get_string(&self, key: &str) -> Result<String> {
        self.entries
            .get(key)
            .map(|e| e.value.clone())
            .ok_or_else(|| Error::option_not_found(key))
    }

    /// Get an integer value, with coercion from the stored string
    pub fn get_i64(&self, key: &str) -> Result<i64> {
        let value = self.get_string(key)?;
        value
            .parse()
            .map_err(|_| Error::type_coercion(key, "integer", format!("string (\"{}\")", value)))
    }

    /// Get a float value, with coercion from the stored string
    pub fn get_f64(&self, key: &str) -> Result<f64> {
        let value = self.get_string(key)?;
        value
            .parse()
            .map_err(|_| Error::type_coercion(key, "float", format!("string (\"{}\")", value)))
    }

    /// Get a boolean value, with strict coercion
    ///
    /// Only "true" and "false" are accepted, case-insensitively. Bare flag
    /// entries are stored as "TRUE" by the reader and coerce to `true`.
    pub fn get_bool(&self, key: &str) -> Result<bool> {
        let value = self.get_string(key)?;
        match value.to_lowercase().as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(Error::type_coercion(
                key,
                "boolean",
                format!("string (\"{}\") - only \"true\" or \"false\" allowed", value),
            )),
        }
    }

    /// Look up an entry by dotted path (e.g. "solver.type")
    ///
    /// A path without a dot names an entry of this node. Otherwise everything
    /// before the last dot is the section name; section names themselves may
    /// contain dots, matching the flat namespace the reader builds.
    pub fn lookup(&self, path: &str) -> Option<&Entry> {
        match path.rsplit_once('.') {
            None => self.entries.get(path),
            Some((section, key)) => self.sections.get(section).and_then(|s| s.entries.get(key)),
        }
    }

    /// Iterate over the entries of this node, in insertion order
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.entries.iter().map(|(k, e)| (k.as_str(), e))
    }

    /// Iterate over the child sections of this node, in insertion order
    pub fn sections(&self) -> impl Iterator<Item = (&str, &Options)> {
        self.sections.iter().map(|(n, s)| (n.as_str(), s))
    }

    /// True if this node has no entries and no sections
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.sections.is_empty()
    }

    /// Collect every entry in the tree as (dotted path, entry)
    ///
    /// Useful for dumping which file each value came from.
    pub fn leaf_paths(&self) -> Vec<(String, &Entry)> {
        let mut out = Vec::new();
        self.collect_leaf_paths("", &mut out);
        out
    }

    fn collect_leaf_paths<'a>(&'a self, prefix: &str, out: &mut Vec<(String, &'a Entry)>) {
        for (key, entry) in &self.entries {
            let path = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{}.{}", prefix, key)
            };
            out.push((path, entry));
        }
        for (name, section) in &self.sections {
            let child_prefix = if prefix.is_empty() {
                name.clone()
            } else {
                format!("{}.{}", prefix, name)
            };
            section.collect_leaf_paths(&child_prefix, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_set_and_get() {
        let mut options = Options::new();
        options.set("nout", "100", "run.ini");

        assert_eq!(options.get("nout"), Some("100"));
        assert_eq!(options.origin("nout"), Some("run.ini"));
        assert_eq!(options.get("missing"), None);
    }

    #[test]
    fn test_last_write_wins() {
        let mut options = Options::new();
        options.set("nout", "100", "base.ini");
        options.set("nout", "200", "override.ini");

        assert_eq!(options.get("nout"), Some("200"));
        assert_eq!(options.origin("nout"), Some("override.ini"));
        assert_eq!(options.entries().count(), 1);
    }

    #[test]
    fn test_section_fetch_or_create() {
        let mut options = Options::new();
        options.section("solver").set("type", "rk4", "run.ini");
        // Second call must return the same section, not a fresh one
        assert_eq!(options.section("solver").get("type"), Some("rk4"));
        assert_eq!(options.sections().count(), 1);
    }

    #[test]
    fn test_get_string_missing_key() {
        let options = Options::new();
        let err = options.get_string("nout").unwrap_err();
        assert_eq!(err.kind, ErrorKind::OptionNotFound);
    }

    #[test]
    fn test_get_i64_coercion() {
        let mut options = Options::new();
        options.set("nx", "68", "mesh.ini");
        options.set("name", "grid", "mesh.ini");

        assert_eq!(options.get_i64("nx").unwrap(), 68);

        let err = options.get_i64("name").unwrap_err();
        assert_eq!(err.kind, ErrorKind::TypeCoercion);
        assert!(err.to_string().contains("grid"));
    }

    #[test]
    fn test_get_f64_coercion() {
        let mut options = Options::new();
        options.set("timestep", "1.5e-3", "run.ini");

        assert!((options.get_f64("timestep").unwrap() - 1.5e-3).abs() < 1e-12);
    }

    #[test]
    fn test_get_bool_strict() {
        let mut options = Options::new();
        options.set("restart", "TRUE", "cmdline");
        options.set("append", "false", "run.ini");
        options.set("level", "1", "run.ini");

        assert!(options.get_bool("restart").unwrap());
        assert!(!options.get_bool("append").unwrap());
        // "1" is not a boolean under strict coercion
        assert_eq!(
            options.get_bool("level").unwrap_err().kind,
            ErrorKind::TypeCoercion
        );
    }

    #[test]
    fn test_lookup_dotted_path() {
        let mut options = Options::new();
        options.set("nout", "100", "run.ini");
        options.section("solver").set("type", "rk4", "run.ini");
        options.section("mesh.ddx").set("first", "c2", "run.ini");

        assert_eq!(options.lookup("nout").map(Entry::value), Some("100"));
        assert_eq!(options.lookup("solver.type").map(Entry::value), Some("rk4"));
        // Flat namespace: a dotted section name is a single key at the root
        assert_eq!(
            options.lookup("mesh.ddx.first").map(Entry::value),
            Some("c2")
        );
        assert_eq!(options.lookup("solver.missing"), None);
    }

    #[test]
    fn test_leaf_paths_in_file_order() {
        let mut options = Options::new();
        options.set("nout", "100", "run.ini");
        options.section("solver").set("type", "rk4", "run.ini");
        options.section("mesh").set("nx", "68", "run.ini");

        let paths: Vec<String> = options.leaf_paths().into_iter().map(|(p, _)| p).collect();
        assert_eq!(paths, vec!["nout", "solver.type", "mesh.nx"]);
    }

    #[test]
    fn test_is_empty() {
        let mut options = Options::new();
        assert!(options.is_empty());

        options.section("solver");
        assert!(!options.is_empty());
    }
}
