// ABOUTME: Shell completion generation using clap_complete for all supported shells
// ABOUTME: Writes static completion scripts for the bl binary to any writer

use clap::{Command, ValueEnum};
use clap_complete::{generate, shells};
use std::fmt;
use std::io::Write;

const BIN_NAME: &str = "bl";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    #[allow(clippy::enum_variant_names)]
    #[value(name = "powershell", alias = "pwsh")]
    PowerShell,
}

impl fmt::Display for Shell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Shell::Bash => "bash",
            Shell::Zsh => "zsh",
            Shell::Fish => "fish",
            Shell::PowerShell => "powershell",
        };
        write!(f, "{}", name)
    }
}

/// Write the completion script for `shell` describing `cmd`
pub fn write_completions<W: Write>(shell: Shell, cmd: &mut Command, writer: &mut W) {
    match shell {
        Shell::Bash => generate(shells::Bash, cmd, BIN_NAME, writer),
        Shell::Zsh => generate(shells::Zsh, cmd, BIN_NAME, writer),
        Shell::Fish => generate(shells::Fish, cmd, BIN_NAME, writer),
        Shell::PowerShell => generate(shells::PowerShell, cmd, BIN_NAME, writer),
    }
}

/// Shown by `bl completions --help`
pub const INSTALLATION_INSTRUCTIONS: &str = r#"Shell Completion Installation

Bash:
  bl completions bash > ~/.local/share/bash-completion/completions/bl

Zsh:
  bl completions zsh > ~/.zfunc/_bl
  # fpath=(~/.zfunc $fpath) in ~/.zshrc

Fish:
  bl completions fish > ~/.config/fish/completions/bl.fish

PowerShell:
  bl completions powershell > bl_completions.ps1
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_shell_parsing() {
        assert_eq!(Shell::from_str("bash", false).unwrap(), Shell::Bash);
        assert_eq!(Shell::from_str("ZSH", true).unwrap(), Shell::Zsh);
        assert_eq!(Shell::from_str("fish", false).unwrap(), Shell::Fish);
        assert_eq!(Shell::from_str("pwsh", false).unwrap(), Shell::PowerShell);
        assert!(Shell::from_str("power-shell", false).is_err());
        assert!(Shell::from_str("tcsh", false).is_err());
    }

    #[test]
    fn test_shell_display_matches_value_name() {
        for shell in Shell::value_variants() {
            assert_eq!(Shell::from_str(&shell.to_string(), false).unwrap(), *shell);
        }
    }

    #[test]
    fn test_generates_for_every_shell() {
        use clap::{CommandFactory, Parser};

        #[derive(Parser)]
        #[command(name = "bl")]
        struct TestCli {
            #[arg(long)]
            verbose: bool,
        }

        for shell in Shell::value_variants() {
            let mut output = Cursor::new(Vec::new());
            write_completions(*shell, &mut TestCli::command(), &mut output);

            let script = String::from_utf8(output.into_inner()).unwrap();
            assert!(script.contains("bl"), "{} script names the binary", shell);
        }
    }

    #[test]
    fn test_installation_instructions() {
        for shell in Shell::value_variants() {
            assert!(INSTALLATION_INSTRUCTIONS.contains(&format!("bl completions {}", shell)));
        }
    }
}
