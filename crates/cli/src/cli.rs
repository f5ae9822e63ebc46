use super::{CliInput, Emit, PrettyErrorReporter};
use anyhow::{bail, Result};
use compiler::{
    codegen::generate,
    error::CompilationError,
    flags::RuntimeHelper,
    markup::parse_markup,
    script::{parse_script, ScriptModel},
};
use log::info;
use serde::Serialize;
use serde_yaml::to_writer;
use sfc::{parse_sfc, BuildOutput};
use std::io;

#[derive(Serialize)]
struct ScriptDump<'a> {
    model: &'a ScriptModel,
    runtime: RuntimeHelper,
}

fn dump<T: Serialize>(title: &str, value: &T) -> Result<()> {
    println!("============== {} =============", title);
    let stdout = io::stdout();
    to_writer(stdout.lock(), value)?;
    println!("=========== End of {} ===========", title);
    Ok(())
}

fn run_stages(input: &CliInput) -> Result<BuildOutput> {
    let (source, option, show) = (&input.source, &input.option, input.show);

    let sfc = parse_sfc(source)?;
    if show.dump_sections {
        dump("Sections", &sfc)?;
    }

    let nodes = parse_markup(sfc.pagina.text, sfc.pagina.start)?;
    if show.dump_ast {
        dump("AST", &nodes)?;
    }

    let script = parse_script(sfc.script.text, sfc.script.start, &option.script_parsing())?;
    if show.dump_script {
        let runtime = RuntimeHelper::collect(&script);
        dump(
            "Script",
            &ScriptDump {
                model: &script,
                runtime,
            },
        )?;
    }

    Ok(generate(&nodes, &script, sfc.stijl.text, &option.codegen())?)
}

fn emit(output: &BuildOutput, emit: Emit) {
    match emit {
        Emit::Html => print!("{}", output.html_shell),
        Emit::Js => print!("{}", output.script),
        Emit::Css => print!("{}", output.stylesheet),
        Emit::Inline => print!("{}", output.inline_html()),
        Emit::All => {
            for (name, text) in [
                ("index.html", &output.html_shell),
                ("app.js", &output.script),
                ("app.css", &output.stylesheet),
            ] {
                println!("=============== {} ==============", name);
                print!("{}", text);
            }
        }
    }
}

/// Compiles the input, printing dumps and the chosen artifact to stdout.
/// Compilation errors are reported on stderr.
pub fn compile_to_stdout(input: &CliInput) -> Result<()> {
    let err = match run_stages(input) {
        Ok(output) => {
            info!("compiled {}", input.name);
            emit(&output, input.emit);
            return Ok(());
        }
        Err(err) => err,
    };
    match err.downcast_ref::<CompilationError>() {
        Some(compile_error) => {
            let reporter = PrettyErrorReporter::new(&input.name, &input.source);
            if input.pretty {
                reporter.report(compile_error);
            } else {
                reporter.report_plain(compile_error);
            }
            bail!("failed to compile {}", input.name)
        }
        None => Err(err),
    }
}
