use std::{
    env, io,
    path::{Path, PathBuf},
};

use clap::ValueEnum;
use path_clean::PathClean;
use sfc::CompileOption;

pub mod cli;
mod pretty_error;

pub use pretty_error::PrettyErrorReporter;

/// Which artifact to print after a successful compile.
#[derive(Clone, Copy, PartialEq, Eq, Debug, ValueEnum)]
pub enum Emit {
    Html,
    Js,
    Css,
    /// single document with style and script inlined
    Inline,
    All,
}

/// Intermediate results to dump as YAML.
#[derive(Default, Clone, Copy, Debug)]
pub struct ShowOption {
    pub dump_sections: bool,
    pub dump_ast: bool,
    pub dump_script: bool,
}

pub struct CliInput {
    pub name: String,
    pub source: String,
    pub option: CompileOption,
    pub show: ShowOption,
    pub emit: Emit,
    pub pretty: bool,
}

pub fn absolute_path(path: impl AsRef<Path>) -> io::Result<PathBuf> {
    let path = path.as_ref();

    let absolute_path = if path.is_absolute() {
        path.to_path_buf()
    } else {
        env::current_dir()?.join(path)
    }
    .clean();

    Ok(absolute_path)
}
