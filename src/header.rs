//! Resolution of the selected header style into a single shell command.
use std::borrow::Cow;
use std::path::{Path, PathBuf};

use crate::platform::EnvironmentDescriptor;
use crate::state::DesiredState;

/// Font used when the requested one is not installed.
pub const FALLBACK_FONT: &str = "standard";

/// Text shown when the header text is blank.
const FALLBACK_TEXT: &str = "Omega";

const FASTFETCH: &str = "fastfetch";
const COW: &str = "fortune | cowsay | lolcat";

/// Directory holding figlet `.flf` fonts for `env`.
#[must_use]
pub fn fonts_dir(env: &EnvironmentDescriptor) -> PathBuf {
    env.package_root().join("share").join("figlet")
}

/// The shell command that draws the header selected in `state`.
///
/// Unknown styles resolve to `fastfetch`; `none` resolves to an empty
/// command.
#[must_use]
pub fn resolve_header_command(state: &DesiredState, fonts_dir: &Path) -> String {
    match state.selected_header.as_str() {
        "none" => String::new(),
        "cow" => COW.to_string(),
        "figlet_slant" => figlet("slant", &state.header_text, fonts_dir),
        "figlet_standard" => figlet("standard", &state.header_text, fonts_dir),
        "figlet_custom" => figlet(&state.header_font, &state.header_text, fonts_dir),
        _ => FASTFETCH.to_string(),
    }
}

/// `font` if a matching `.flf` file exists in `fonts_dir`, else
/// [`FALLBACK_FONT`].
#[must_use]
pub fn validated_font<'a>(font: &'a str, fonts_dir: &Path) -> &'a str {
    let plain = !font.is_empty()
        && font
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ' '));
    if plain && fonts_dir.join(format!("{font}.flf")).is_file() {
        font
    } else {
        FALLBACK_FONT
    }
}

fn figlet(font: &str, text: &str, fonts_dir: &Path) -> String {
    let font = validated_font(font, fonts_dir);
    let text = if text.trim().is_empty() {
        FALLBACK_TEXT
    } else {
        text
    };
    format!("figlet -f {} -c {} | lolcat", quote(font), quote(text))
}

/// POSIX-quote `s`. Quoting only fails on NUL bytes, which are dropped.
fn quote(s: &str) -> Cow<'_, str> {
    shlex::try_quote(s).unwrap_or_else(|_| {
        let cleaned = s.replace('\0', "");
        Cow::Owned(shlex::try_quote(&cleaned).map_or_else(|_| "''".to_string(), Cow::into_owned))
    })
}
