//! Splice generated resource declarations into a module manifest.
//!
//! The manifest is split into the text before the first class declaration
//! (kept verbatim), the class header (`class <name> [(params)] [rest] {`),
//! and everything after the header's opening brace. The file is rebuilt as
//! prefix + header + freshly generated body + closing brace, so re-running
//! an export replaces the previous body instead of appending to it.
use std::path::{Path, PathBuf};

use crate::error::{ManifestError, StructureError};

/// Keyword that opens a class declaration.
pub const CLASS_KEYWORD: &str = "class";

/// Indentation added to every body line inside the class.
const BODY_INDENT: &str = "  ";

/// The parsed anchor of a manifest: everything the rebuild preserves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassManifest {
    /// Text before the class declaration line, verbatim.
    pub prefix: String,
    /// Leading whitespace of the class declaration line.
    pub indent: String,
    /// Class name.
    pub name: String,
    /// Existing parenthesised parameter list, including the parentheses.
    pub parameters: Option<String>,
    /// Header text between the parameter list and the brace (e.g. `inherits base`).
    pub tail: String,
}

impl ClassManifest {
    /// Locate the first class declaration in `text`.
    ///
    /// # Errors
    ///
    /// Returns [`StructureError::MissingClass`] if no line starts with a named
    /// class declaration, or [`StructureError::UnterminatedHeader`] if its
    /// header has no opening brace.
    pub fn parse(text: &str) -> Result<Self, StructureError> {
        let mut offset = 0;
        for line in text.split_inclusive('\n') {
            let trimmed = line.trim_start();
            let indent_len = line.len() - trimmed.len();
            if let Some(after_keyword) = class_name_start(trimmed) {
                let header_start = offset + indent_len + (trimmed.len() - after_keyword.len());
                let indent = line.get(..indent_len).unwrap_or_default().to_string();
                let prefix = text.get(..offset).unwrap_or_default().to_string();
                let header = text.get(header_start..).unwrap_or_default();
                return parse_header(header, prefix, indent);
            }
            offset += line.len();
        }
        Err(StructureError::MissingClass)
    }

    /// Rebuild the manifest text around a new body.
    ///
    /// Non-empty `parameters` replace any existing parameter list; otherwise
    /// the existing list is kept.
    #[must_use]
    pub fn rebuild(&self, blocks: &[String], parameters: &[String]) -> String {
        let mut out = String::with_capacity(self.prefix.len() + blocks.iter().map(String::len).sum::<usize>());
        out.push_str(&self.prefix);
        out.push_str(&self.indent);
        out.push_str(CLASS_KEYWORD);
        out.push(' ');
        out.push_str(&self.name);

        let parameters: Vec<&str> = parameters
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .collect();
        if !parameters.is_empty() {
            out.push_str(" (\n");
            for p in parameters {
                out.push_str(&self.indent);
                out.push_str(BODY_INDENT);
                out.push_str(p);
                out.push_str(",\n");
            }
            out.push_str(&self.indent);
            out.push(')');
        } else if let Some(existing) = &self.parameters {
            out.push(' ');
            out.push_str(existing);
        }
        if !self.tail.is_empty() {
            out.push(' ');
            out.push_str(&self.tail);
        }
        out.push_str(" {\n");

        let body_indent = format!("{}{BODY_INDENT}", self.indent);
        for (i, block) in blocks.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            for line in block.lines() {
                if !line.is_empty() {
                    out.push_str(&body_indent);
                    out.push_str(line);
                }
                out.push('\n');
            }
        }

        out.push_str(&self.indent);
        out.push_str("}\n");
        out
    }
}

/// Patches the manifest at a fixed path.
#[derive(Debug, Clone)]
pub struct ManifestPatcher {
    path: PathBuf,
}

impl ManifestPatcher {
    /// Create a patcher for the manifest at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The manifest location.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the class body with `blocks`, optionally setting the class
    /// parameter list.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::NotFound`] if the manifest does not exist,
    /// [`ManifestError::Structure`] if it has no usable class declaration,
    /// or [`ManifestError::Io`] if it cannot be read or written.
    pub fn patch(&self, blocks: &[String], parameters: &[String]) -> Result<(), ManifestError> {
        let text = std::fs::read_to_string(&self.path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ManifestError::NotFound {
                    path: self.path.clone(),
                }
            } else {
                ManifestError::Io {
                    path: self.path.clone(),
                    source,
                }
            }
        })?;

        let manifest = ClassManifest::parse(&text).map_err(|source| ManifestError::Structure {
            path: self.path.clone(),
            source,
        })?;

        std::fs::write(&self.path, manifest.rebuild(blocks, parameters)).map_err(|source| {
            ManifestError::Io {
                path: self.path.clone(),
                source,
            }
        })
    }
}

/// If `line` (already left-trimmed) opens a named class declaration, return
/// the text starting at the class name.
fn class_name_start(line: &str) -> Option<&str> {
    let rest = line.strip_prefix(CLASS_KEYWORD)?;
    let name = rest.trim_start();
    let separated = rest.len() > name.len();
    let named = name.chars().next().is_some_and(|c| c.is_alphanumeric() || c == '_' || c == ':');
    (separated && named).then_some(name)
}

/// Split a header starting at the class name into its parts.
fn parse_header(header: &str, prefix: String, indent: String) -> Result<ClassManifest, StructureError> {
    let name_len = header
        .find(|c: char| c.is_whitespace() || c == '(' || c == '{')
        .unwrap_or(header.len());
    let name = header.get(..name_len).unwrap_or_default().to_string();

    let mut depth = 0usize;
    let mut brace = None;
    for (i, c) in header.char_indices().skip(name.chars().count()) {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            '{' if depth == 0 => {
                brace = Some(i);
                break;
            }
            _ => {}
        }
    }
    let Some(brace) = brace else {
        return Err(StructureError::UnterminatedHeader(name));
    };

    let between = header.get(name_len..brace).unwrap_or_default().trim();
    let (parameters, tail) = split_parameters(between);
    Ok(ClassManifest {
        prefix,
        indent,
        name,
        parameters,
        tail: tail.to_string(),
    })
}

/// Separate a leading balanced `( ... )` group from the rest of the header.
fn split_parameters(between: &str) -> (Option<String>, &str) {
    if !between.starts_with('(') {
        return (None, between);
    }
    let mut depth = 0usize;
    for (i, c) in between.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    let end = i + c.len_utf8();
                    let params = between.get(..end).unwrap_or_default().to_string();
                    let tail = between.get(end..).unwrap_or_default().trim();
                    return (Some(params), tail);
                }
            }
            _ => {}
        }
    }
    (Some(between.to_string()), "")
}
