use anyhow::Result;
use clap::Parser;
use sfc::CompileOption;

use std::fs;
use std::io::{self, Read};

use plats_compiler_cli::{absolute_path, cli::compile_to_stdout, CliInput, Emit, ShowOption};

/// A simple CLI app for compiling and debugging Plats pages.
#[derive(Parser)]
#[command(version, about)]
struct Opts {
    /// The file to compile. Stdin will be read as input if no file is provided.
    input_file_name: Option<String>,

    /// Add the live reload listener to the HTML shell.
    #[arg(long)]
    dev: bool,

    /// Reject unknown script statements.
    #[arg(long)]
    strict: bool,

    #[arg(long)]
    dump_sections: bool,

    #[arg(long)]
    dump_ast: bool,

    #[arg(long)]
    dump_script: bool,

    /// The artifact printed on success.
    #[arg(long, value_enum, default_value_t = Emit::Js)]
    emit: Emit,

    /// Report errors as colored diagnostics.
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let opts: Opts = Opts::parse();
    let (name, source) = if let Some(file_name) = opts.input_file_name {
        let ab_path = absolute_path(&file_name)?;
        (file_name, fs::read_to_string(ab_path)?)
    } else {
        let mut s = String::new();
        io::stdin().read_to_string(&mut s)?;
        ("page.plats".to_owned(), s)
    };

    let input = CliInput {
        name,
        source,
        option: CompileOption {
            dev: opts.dev,
            strict_script: opts.strict,
        },
        show: ShowOption {
            dump_sections: opts.dump_sections,
            dump_ast: opts.dump_ast,
            dump_script: opts.dump_script,
        },
        emit: opts.emit,
        pretty: opts.pretty,
    };
    compile_to_stdout(&input)
}
