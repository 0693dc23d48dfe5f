//! Command: list tracked dotfiles and their link state.
use anyhow::Result;

use super::CommandSetup;
use crate::cli::{GlobalOpts, ListOpts};
use crate::dotfile::Dotfile;
use crate::logging::Logger;

/// Run the list command.
///
/// # Errors
///
/// Returns an error if setup fails or the repository cannot be read.
#[allow(clippy::print_stdout)]
pub fn run(global: &GlobalOpts, opts: &ListOpts, log: &Logger) -> Result<()> {
    let setup = CommandSetup::init(global, log)?;
    let contents = setup.repository.contents()?;
    if contents.is_empty() {
        log.info(&format!(
            "no dotfiles in {}",
            setup.repository.repo_root().display()
        ));
        return Ok(());
    }
    println!("{}", render(&contents, opts.targets));
    Ok(())
}

/// One line per dotfile: name, optionally target, then state.  Columns are
/// padded to the widest entry.
fn render(contents: &[Dotfile], targets: bool) -> String {
    let rows: Vec<(String, String, String)> = contents
        .iter()
        .map(|d| {
            (
                d.name.display().to_string(),
                d.target.display().to_string(),
                d.state().to_string(),
            )
        })
        .collect();
    let name_width = rows.iter().map(|r| r.0.chars().count()).max().unwrap_or(0);
    let target_width = rows.iter().map(|r| r.1.chars().count()).max().unwrap_or(0);

    rows.iter()
        .map(|(name, target, state)| {
            if targets {
                format!("{name:<name_width$}  {target:<target_width$}  {state}")
            } else {
                format!("{name:<name_width$}  {state}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
