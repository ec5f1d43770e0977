//! Shell completion generation

use clap::CommandFactory;
use clap_complete::Shell as ClapShell;

use crate::cli::args::{Cli, CompletionsArgs, Shell};

const fn clap_shell(shell: Shell) -> ClapShell {
    match shell {
        Shell::Bash => ClapShell::Bash,
        Shell::Zsh => ClapShell::Zsh,
        Shell::Fish => ClapShell::Fish,
        Shell::PowerShell => ClapShell::PowerShell,
        Shell::Elvish => ClapShell::Elvish,
    }
}

/// Generate and print a shell completion script to stdout.
pub fn run(args: &CompletionsArgs) {
    let mut cmd = Cli::command();
    clap_complete::generate(clap_shell(args.shell), &mut cmd, "parlor", &mut std::io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bash_script_names_subcommands() {
        let mut buf = Vec::new();
        clap_complete::generate(clap_shell(Shell::Bash), &mut Cli::command(), "parlor", &mut buf);
        let script = String::from_utf8(buf).unwrap();
        assert!(script.contains("hat-trick"));
        assert!(script.contains("find-character"));
    }
}
