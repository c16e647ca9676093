//! Shell completion generation.

use std::io;

use clap::CommandFactory;
use clap_complete::{Generator, generate, shells};

use crate::{
    cli::{Cli, CompletionsArgs, Shell},
    error::CliResult,
};

const BIN_NAME: &str = "scafe";

pub fn execute(args: CompletionsArgs) -> CliResult<()> {
    write_completions(args.shell, &mut io::stdout());
    Ok(())
}

fn write_completions(shell: Shell, out: &mut dyn io::Write) {
    match shell {
        Shell::Bash => emit(shells::Bash, out),
        Shell::Zsh => emit(shells::Zsh, out),
        Shell::Fish => emit(shells::Fish, out),
        Shell::PowerShell => emit(shells::PowerShell, out),
        Shell::Elvish => emit(shells::Elvish, out),
    }
}

fn emit<G: Generator>(generator: G, out: &mut dyn io::Write) {
    generate(generator, &mut Cli::command(), BIN_NAME, out);
}
