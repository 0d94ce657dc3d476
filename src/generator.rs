//! Atomic, backed-up generation of shell configuration files.
//!
//! [`ConfigGenerator::generate`] renders the whole file in memory first, then
//! backs up any existing target to `<name>.bak.<unix-seconds>`, writes the new
//! content to a temporary file in the same directory, and renames it over
//! the target. Readers see either the old or the new file, never a mix.
use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use crate::error::GenerateError;
use crate::templates::{TemplateContext, TemplateSet};

/// Starter content for the custom file. Written once, never regenerated.
pub const CUSTOM_BOILERPLATE: &str = r#"# custom.zsh: your own shell customizations.
# omega-zsh creates this file once and never touches it again.
# It is sourced at the end of ~/.zshrc, so anything here wins.

alias zr='source ~/.zshrc'
alias zc='micro ~/.zshrc'

# Activate a project's virtualenv when entering its directory.
auto_venv() {
  if [[ -f .venv/bin/activate ]]; then
    source .venv/bin/activate
  fi
}
autoload -U add-zsh-hook
add-zsh-hook chpwd auto_venv
"#;

#[cfg(unix)]
const DEFAULT_MODE: u32 = 0o644;

/// Renders named templates to files.
#[derive(Debug, Clone, Default)]
pub struct ConfigGenerator {
    templates: TemplateSet,
}

impl ConfigGenerator {
    /// Generator drawing templates from `templates`.
    #[must_use]
    pub const fn new(templates: TemplateSet) -> Self {
        Self { templates }
    }

    /// Render `template` to `output`, backing up any previous file.
    ///
    /// Returns `false` (and logs why) on any lookup, render, or write
    /// failure; in that case `output` is untouched.
    pub fn generate(&self, template: &str, output: &Path, ctx: &TemplateContext) -> bool {
        match self.try_generate(template, output, ctx) {
            Ok(backup) => {
                if let Some(backup) = backup {
                    tracing::debug!("backed up {} to {}", output.display(), backup.display());
                }
                true
            }
            Err(e) => {
                tracing::warn!("could not generate {}: {e}", output.display());
                false
            }
        }
    }

    /// [`generate`](Self::generate), returning the backup path (if one was
    /// taken) or the error.
    ///
    /// # Errors
    ///
    /// Returns an error if the template cannot be rendered or any
    /// filesystem step fails.
    pub fn try_generate(
        &self,
        template: &str,
        output: &Path,
        ctx: &TemplateContext,
    ) -> Result<Option<PathBuf>, GenerateError> {
        let rendered = self.templates.render(template, ctx)?;

        let backup = if output.exists() {
            let backup = backup_path(output, chrono::Utc::now().timestamp());
            fs::copy(output, &backup).map_err(|source| GenerateError::Io {
                action: "backup",
                path: backup.clone(),
                source,
            })?;
            Some(backup)
        } else {
            None
        };

        write_atomic(output, &rendered)?;
        Ok(backup)
    }

    /// Like [`generate`](Self::generate), but succeeds without writing when
    /// `output` already exists. Used for files the user owns after the
    /// first write.
    pub fn generate_once(&self, template: &str, output: &Path, ctx: &TemplateContext) -> bool {
        if output.exists() {
            tracing::debug!("{} exists, leaving it alone", output.display());
            return true;
        }
        match self
            .templates
            .render(template, ctx)
            .map_err(GenerateError::from)
            .and_then(|rendered| write_atomic(output, &rendered))
        {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("could not generate {}: {e}", output.display());
                false
            }
        }
    }

    /// Create `path` with [`CUSTOM_BOILERPLATE`] unless it already exists.
    ///
    /// Returns `true` if the file was created by this call.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist and cannot be created.
    pub fn ensure_user_customization_file(&self, path: &Path) -> Result<bool, GenerateError> {
        ensure_parent_dir(path)?;
        let mut file = match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
        {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => return Ok(false),
            Err(source) => {
                return Err(GenerateError::Io {
                    action: "create",
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        file.write_all(CUSTOM_BOILERPLATE.as_bytes())
            .map_err(|source| GenerateError::Io {
                action: "write",
                path: path.to_path_buf(),
                source,
            })?;
        #[cfg(unix)]
        set_mode(path, DEFAULT_MODE)?;
        Ok(true)
    }

    /// The template set this generator renders from.
    #[must_use]
    pub const fn templates(&self) -> &TemplateSet {
        &self.templates
    }
}

/// Backup path for `output` taken at `timestamp`: `<name>.bak.<timestamp>`,
/// with a `.N` counter appended if that name is already taken.
#[must_use]
pub fn backup_path(output: &Path, timestamp: i64) -> PathBuf {
    let name = output
        .file_name()
        .map_or_else(|| "output".into(), |n| n.to_string_lossy().into_owned());
    let base = output.with_file_name(format!("{name}.bak.{timestamp}"));
    if !base.exists() {
        return base;
    }
    (1u32..)
        .map(|n| output.with_file_name(format!("{name}.bak.{timestamp}.{n}")))
        .find(|candidate| !candidate.exists())
        .unwrap_or(base)
}

/// Whether `path` looks like a backup produced by [`backup_path`] for
/// `output`.
#[must_use]
pub fn is_backup_of(path: &Path, output: &Path) -> bool {
    let (Some(name), Some(out)) = (path.file_name(), output.file_name()) else {
        return false;
    };
    let prefix = format!("{}.bak.", out.to_string_lossy());
    path.parent() == output.parent()
        && name
            .to_string_lossy()
            .strip_prefix(&prefix)
            .and_then(|rest| rest.split('.').next())
            .is_some_and(|ts| !ts.is_empty() && ts.bytes().all(|b| b.is_ascii_digit()))
}

fn ensure_parent_dir(path: &Path) -> Result<(), GenerateError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| GenerateError::Io {
            action: "create directory",
            path: parent.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

/// Write `content` to a temporary sibling of `output`, then rename it into
/// place.
fn write_atomic(output: &Path, content: &str) -> Result<(), GenerateError> {
    ensure_parent_dir(output)?;
    let dir = output
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut tmp = tempfile::Builder::new()
        .prefix(".omega-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(io_err("create temporary file in", dir))?;
    tmp.write_all(content.as_bytes())
        .map_err(io_err("write", tmp.path()))?;
    tmp.as_file()
        .sync_all()
        .map_err(io_err("sync", tmp.path()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt as _;
        let mode = fs::metadata(output).map_or(DEFAULT_MODE, |m| m.permissions().mode() & 0o7777);
        set_mode(tmp.path(), mode)?;
    }

    tmp.persist(output).map_err(|e| GenerateError::Io {
        action: "rename onto",
        path: output.to_path_buf(),
        source: e.error,
    })?;
    Ok(())
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> Result<(), GenerateError> {
    use std::os::unix::fs::PermissionsExt as _;
    fs::set_permissions(path, fs::Permissions::from_mode(mode)).map_err(|source| {
        GenerateError::Io {
            action: "chmod",
            path: path.to_path_buf(),
            source,
        }
    })
}

fn io_err(action: &'static str, path: &Path) -> impl FnOnce(std::io::Error) -> GenerateError {
    let path = path.to_path_buf();
    move |source| GenerateError::Io {
        action,
        path,
        source,
    }
}
