//! Command: print version information.

/// Print the omega-zsh version to stdout.
#[allow(clippy::print_stdout)]
pub fn run() {
    println!("omega-zsh {}", crate::version());
}
