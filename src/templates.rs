//! Named templates and the placeholder renderer.
//!
//! Templates are plain text with `{{ key }}` placeholders. A placeholder is
//! replaced by the context value's rendering: text verbatim, flags as
//! `true`/`false`, lists joined with single spaces. Every placeholder must
//! resolve; rendering never produces partial output.
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use crate::error::TemplateError;

/// Template for the generated shell rc file.
pub const ZSHRC: &str = "zshrc";

/// Template for the personal file.
pub const PERSONAL: &str = "personal.zsh";

const EMBEDDED: &[(&str, &str)] = &[
    (
        ZSHRC,
        include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/assets/templates/zshrc.tmpl")),
    ),
    (
        PERSONAL,
        include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/assets/templates/personal.zsh.tmpl"
        )),
    ),
];

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// A value that can be substituted into a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextValue {
    /// Substituted verbatim.
    Text(String),
    /// Substituted as `true` or `false`.
    Flag(bool),
    /// Substituted as space-separated items.
    List(Vec<String>),
}

impl fmt::Display for ContextValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Flag(b) => write!(f, "{b}"),
            Self::List(items) => f.write_str(&items.join(" ")),
        }
    }
}

impl From<&str> for ContextValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ContextValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for ContextValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<Vec<String>> for ContextValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

/// Key/value mapping a template is rendered against.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateContext {
    values: BTreeMap<String, ContextValue>,
}

impl TemplateContext {
    /// Empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace `key`, builder style.
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<ContextValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Add or replace `key`.
    pub fn insert(&mut self, key: &str, value: impl Into<ContextValue>) {
        self.values.insert(key.to_string(), value.into());
    }

    /// Value for `key`, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ContextValue> {
        self.values.get(key)
    }
}

/// The set of named templates: an optional override directory searched
/// first, then the templates embedded in the binary.
#[derive(Debug, Clone, Default)]
pub struct TemplateSet {
    override_dir: Option<PathBuf>,
}

impl TemplateSet {
    /// Template set that looks in `override_dir` (if any) before the
    /// embedded templates.
    #[must_use]
    pub const fn new(override_dir: Option<PathBuf>) -> Self {
        Self { override_dir }
    }

    /// Source text of template `name`.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::NotFound`] if no such template exists, or
    /// [`TemplateError::Unreadable`] if an override file cannot be read.
    pub fn source(&self, name: &str) -> Result<Cow<'static, str>, TemplateError> {
        if let Some(dir) = &self.override_dir {
            let path = dir.join(format!("{name}.tmpl"));
            if path.is_file() {
                return std::fs::read_to_string(&path)
                    .map(Cow::Owned)
                    .map_err(|e| TemplateError::Unreadable {
                        name: name.to_string(),
                        message: e.to_string(),
                    });
            }
        }
        EMBEDDED
            .iter()
            .find(|(embedded, _)| *embedded == name)
            .map(|(_, text)| Cow::Borrowed(*text))
            .ok_or_else(|| TemplateError::NotFound(name.to_string()))
    }

    /// Look up template `name` and render it against `ctx`.
    ///
    /// # Errors
    ///
    /// Returns an error if the template cannot be found or references a key
    /// missing from `ctx`.
    pub fn render(&self, name: &str, ctx: &TemplateContext) -> Result<String, TemplateError> {
        let source = self.source(name)?;
        render_str(name, &source, ctx)
    }
}

/// Render template text `source` (named `name` for error messages).
///
/// # Errors
///
/// Returns an error for unknown keys or unterminated placeholders.
pub fn render_str(name: &str, source: &str, ctx: &TemplateContext) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(source.len());
    let mut rest = source;
    let mut consumed = 0;

    while let Some(start) = rest.find(OPEN) {
        out.push_str(&rest[..start]);
        let after_open = &rest[start + OPEN.len()..];
        let Some(end) = after_open.find(CLOSE) else {
            return Err(TemplateError::Unterminated {
                template: name.to_string(),
                offset: consumed + start,
            });
        };
        let key = after_open[..end].trim();
        let value = ctx.get(key).ok_or_else(|| TemplateError::MissingKey {
            template: name.to_string(),
            key: key.to_string(),
        })?;
        out.push_str(&value.to_string());

        let advance = start + OPEN.len() + end + CLOSE.len();
        consumed += advance;
        rest = &rest[advance..];
    }
    out.push_str(rest);
    Ok(out)
}
