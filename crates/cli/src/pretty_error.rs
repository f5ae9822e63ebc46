use codespan_reporting::{
    diagnostic::{Diagnostic, Label},
    files::SimpleFiles,
    term::{
        self,
        termcolor::{ColorChoice, StandardStream},
    },
};
use compiler::error::CompilationError;
use std::ops::Range;

pub struct PrettyErrorReporter<'a> {
    name: &'a str,
    source: &'a str,
}

impl<'a> PrettyErrorReporter<'a> {
    pub fn new(name: &'a str, source: &'a str) -> Self {
        Self { name, source }
    }

    /// Prints a colored codespan diagnostic to stderr.
    pub fn report(&self, err: &CompilationError) {
        let mut files = SimpleFiles::new();
        let plats_file = files.add(self.name, self.source);
        let range = label_range(self.source, err.location.offset);
        let diagnostic = Diagnostic::error()
            .with_message(err.to_string())
            .with_labels(vec![Label::primary(plats_file, range)
                .with_message(format!("{}:{}", err.line(), err.column()))]);

        let writer = StandardStream::stderr(ColorChoice::Auto);
        let config = codespan_reporting::term::Config::default();

        term::emit(&mut writer.lock(), &config, &files, &diagnostic)
            .expect("unable to generate codespan diagnostic");
    }

    /// Prints the plain text diagnostic with its codeframe to stderr.
    pub fn report_plain(&self, err: &CompilationError) {
        eprintln!("{}", err.format(self.source, Some(self.name)));
    }
}

/// Byte range of the char at `offset`, empty at the end of the source.
fn label_range(source: &str, offset: usize) -> Range<usize> {
    let start = offset.min(source.len());
    let len = source
        .get(start..)
        .and_then(|rest| rest.chars().next())
        .map_or(0, char::len_utf8);
    start..start + len
}
