//! Builder for Puppet resource declarations.
use std::fmt::Write as _;

/// Attribute value: either a quoted string literal or a raw expression.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Value {
    Quoted(String),
    Expr(String),
}

/// One Puppet resource declaration, e.g. `file { 'title': ... }`.
///
/// # Examples
///
/// ```
/// use puppetize_cli::resources::dsl::ResourceBlock;
///
/// let block = ResourceBlock::new("file", "_etc_motd")
///     .quoted("ensure", "link")
///     .quoted("path", "/etc/motd")
///     .render();
/// assert_eq!(
///     block,
///     "file { '_etc_motd':\n  ensure => 'link',\n  path => '/etc/motd',\n}\n"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceBlock {
    resource_type: &'static str,
    title: String,
    attributes: Vec<(&'static str, Value)>,
}

impl ResourceBlock {
    /// Start a declaration of `resource_type` with the given title.
    #[must_use]
    pub fn new(resource_type: &'static str, title: impl Into<String>) -> Self {
        Self {
            resource_type,
            title: title.into(),
            attributes: Vec::new(),
        }
    }

    /// Add an attribute whose value is a single-quoted string.
    #[must_use]
    pub fn quoted(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.attributes.push((key, Value::Quoted(value.into())));
        self
    }

    /// Add an attribute whose value is emitted verbatim (a function call).
    #[must_use]
    pub fn expr(mut self, key: &'static str, expression: impl Into<String>) -> Self {
        self.attributes.push((key, Value::Expr(expression.into())));
        self
    }

    /// Render the declaration, one attribute per line, ending in a newline.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = format!("{} {{ {}:\n", self.resource_type, quote(&self.title));
        for (key, value) in &self.attributes {
            let rendered = match value {
                Value::Quoted(s) => quote(s),
                Value::Expr(e) => e.clone(),
            };
            let _ = writeln!(out, "  {key} => {rendered},");
        }
        out.push_str("}\n");
        out
    }
}

/// Quote `s` as a Puppet single-quoted string.
#[must_use]
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        if c == '\'' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('\'');
    out
}
