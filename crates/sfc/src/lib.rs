//! Compile a Plats single file component into a page: the SFC is split into
//! sections, each section is parsed and the code generator fuses the results.

pub mod parse_sfc;

use compiler::{
    codegen::{generate, CodeGenerateOption},
    markup::parse_markup,
    script::{parse_script, ScriptParseOption},
};
use log::debug;

// API
pub use parse_sfc::parse_sfc;

// Structs
pub use compiler::codegen::BuildOutput;
pub use compiler::error::{CompilationError, CompileResult};
pub use parse_sfc::{SfcDescriptor, SfcSection, SECTION_NAMES};

#[derive(Default, Clone, Debug)]
pub struct CompileOption {
    /// emit the live reload listener in the HTML shell
    pub dev: bool,
    /// reject unknown script statements instead of skipping them
    pub strict_script: bool,
}

impl CompileOption {
    pub fn script_parsing(&self) -> ScriptParseOption {
        ScriptParseOption {
            strict: self.strict_script,
        }
    }
    pub fn codegen(&self) -> CodeGenerateOption {
        CodeGenerateOption { dev: self.dev }
    }
}

pub fn compile_sfc(source: &str, option: &CompileOption) -> CompileResult<BuildOutput> {
    let sfc = parse_sfc(source)?;
    debug!(
        "split sfc: pagina at line {}, script at line {}, stijl at line {}",
        sfc.pagina.start.line, sfc.script.start.line, sfc.stijl.start.line
    );
    let nodes = parse_markup(sfc.pagina.text, sfc.pagina.start)?;
    debug!("parsed {} top level markup nodes", nodes.len());
    let script = parse_script(sfc.script.text, sfc.script.start, &option.script_parsing())?;
    debug!(
        "parsed script: {} state entries, {} functions, {} event bindings",
        script.initial_state.len(),
        script.functions.len(),
        script.event_bindings.len()
    );
    generate(&nodes, &script, sfc.stijl.text, &option.codegen())
}

/// Compiles with lenient script parsing.
pub fn build(source: &str, dev: bool) -> CompileResult<BuildOutput> {
    let option = CompileOption {
        dev,
        ..Default::default()
    };
    compile_sfc(source, &option)
}
