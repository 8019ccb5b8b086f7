// Pattern compiler: pattern bytes + Syntax + Encoding + Options -> Program.

mod ast;
mod classes;
mod codegen;
mod optimize;
mod parser;
mod program;

pub use classes::{CharClass, CharProp};
pub use program::{Inst, Program, StartAnchor};

use crate::encoding::Encoding;
use crate::error::CompileError;
use crate::options::Options;
use crate::syntax::{Syntax, behavior};

/// Compile a pattern. On error nothing usable is produced.
pub fn compile(
    pattern: &[u8],
    encoding: Encoding,
    options: Options,
    syntax: &Syntax,
) -> Result<Program, CompileError> {
    let options = effective_options(options, syntax);
    let parsed = parser::parse(pattern, syntax, encoding, options)?;
    let mut program = codegen::generate(
        &parsed,
        encoding,
        options,
        syntax.behavior(behavior::DIFFERENT_LEN_ALT_LOOK_BEHIND),
    )?;
    optimize::analyze(&mut program);
    Ok(program)
}

/// Merge the syntax's default options with the caller's, honoring
/// NEGATE_SINGLE_LINE.
fn effective_options(user: Options, syntax: &Syntax) -> Options {
    let mut merged = Options(user.0 | syntax.default_options().0);
    if merged.contains(Options::NEGATE_SINGLE_LINE) {
        merged = Options(merged.0 & !Options::SINGLE_LINE.0);
    }
    merged
}
