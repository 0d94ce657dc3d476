//! Step 6: render the shell configuration files.
use anyhow::{Context as _, Result};

use super::{Context, Task, TaskResult};
use crate::catalog;
use crate::config::{Paths, PersonalDefaults, Settings};
use crate::generator::ConfigGenerator;
use crate::header;
use crate::installer;
use crate::platform::EnvironmentDescriptor;
use crate::state::DesiredState;
use crate::templates::{PERSONAL, TemplateContext, TemplateSet, ZSHRC};

/// Generate the rc file, and create the personal and custom files once.
#[derive(Debug)]
pub struct GenerateConfiguration;

impl Task for GenerateConfiguration {
    fn name(&self) -> &'static str {
        "Generate configuration"
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let generator = generator_for(&ctx.settings, &ctx.paths);

        let personal = personal_context(&ctx.settings.personal, &user_name(&ctx.paths));
        if !generator.generate_once(PERSONAL, &ctx.paths.personal_file, &personal) {
            anyhow::bail!("could not create {}", ctx.paths.personal_file.display());
        }

        if generator
            .ensure_user_customization_file(&ctx.paths.custom_file)
            .context("creating custom file")?
        {
            ctx.log
                .info(&format!("created {}", ctx.paths.custom_file.display()));
        }

        let shell = shell_context(&ctx.env, &ctx.paths, &ctx.state);
        let backup = generator
            .try_generate(ZSHRC, &ctx.paths.zshrc, &shell)
            .with_context(|| format!("generating {}", ctx.paths.zshrc.display()))?;
        if let Some(backup) = backup {
            ctx.log
                .info(&format!("previous rc saved as {}", backup.display()));
        }
        ctx.log
            .info(&format!("wrote {}", ctx.paths.zshrc.display()));
        Ok(TaskResult::Ok)
    }
}

/// Generator honouring the template override directory in `settings`.
#[must_use]
pub fn generator_for(settings: &Settings, paths: &Paths) -> ConfigGenerator {
    ConfigGenerator::new(TemplateSet::new(settings.resolved_templates_dir(paths)))
}

/// Render context for the rc template.
#[must_use]
pub fn shell_context(
    env: &EnvironmentDescriptor,
    paths: &Paths,
    state: &DesiredState,
) -> TemplateContext {
    let header_cmd = header::resolve_header_command(state, &header::fonts_dir(env));
    let defaults = DesiredState::default();
    let plugins: Vec<String> = installer::activation_list(&state.selected_plugins)
        .into_iter()
        .filter(|id| {
            let valid = catalog::is_valid_id(id);
            if !valid {
                tracing::warn!("leaving plugin {id:?} out of the rc file: invalid name");
            }
            valid
        })
        .collect();
    TemplateContext::new()
        .with("version", crate::version())
        .with("is_termux", env.is_termux)
        .with("base_dir", paths.base_dir.display().to_string())
        .with("user_theme", theme_or(&state.selected_theme, &defaults.selected_theme))
        .with(
            "root_theme",
            theme_or(&state.selected_root_theme, &defaults.selected_root_theme),
        )
        .with("plugins", plugins)
        .with("active_tools", installer::active_tools(&state.selected_plugins))
        .with("personal_file", paths.personal_file.display().to_string())
        .with("custom_file", paths.custom_file.display().to_string())
        .with("header_cmd", header_cmd)
}

fn theme_or<'a>(id: &'a str, fallback: &'a str) -> &'a str {
    if catalog::is_valid_theme_id(id) {
        id
    } else {
        tracing::warn!("theme {id:?} is not a valid name; using {fallback}");
        fallback
    }
}

/// Render context for the personal file template.
#[must_use]
pub fn personal_context(defaults: &PersonalDefaults, user: &str) -> TemplateContext {
    let path_exports = defaults
        .extra_paths
        .iter()
        .map(|dir| format!("export PATH=\"{dir}:$PATH\""))
        .collect::<Vec<_>>()
        .join("\n");
    let env_exports = defaults
        .env_vars
        .iter()
        .map(|(key, value)| format!("export {key}={}", quote(value)))
        .collect::<Vec<_>>()
        .join("\n");
    let alias_lines = defaults
        .aliases
        .iter()
        .map(|(name, command)| format!("alias {name}={}", quote(command)))
        .collect::<Vec<_>>()
        .join("\n");
    TemplateContext::new()
        .with("user", user)
        .with("path_exports", path_exports)
        .with("env_exports", env_exports)
        .with("alias_lines", alias_lines)
}

fn quote(value: &str) -> String {
    shlex::try_quote(value).map_or_else(|_| "''".to_string(), std::borrow::Cow::into_owned)
}

/// Login name, or the home directory's name when `USER` is unset.
fn user_name(paths: &Paths) -> String {
    std::env::var("USER")
        .ok()
        .filter(|u| !u.is_empty())
        .or_else(|| {
            paths
                .home
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| "you".to_string())
}
