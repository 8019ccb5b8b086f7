// Process-wide default syntax and encoding, used when a caller does not
// pass them explicitly. Reads and writes go through one mutex since many
// compilations consult these concurrently.

use std::sync::{Mutex, MutexGuard, OnceLock};

use crate::encoding::Encoding;
use crate::syntax::Syntax;

struct EngineDefaults {
    syntax: Syntax,
    encoding: Encoding,
}

fn cell() -> &'static Mutex<EngineDefaults> {
    static CELL: OnceLock<Mutex<EngineDefaults>> = OnceLock::new();
    CELL.get_or_init(|| {
        Mutex::new(EngineDefaults {
            syntax: Syntax::standard(),
            encoding: Encoding::Utf8,
        })
    })
}

fn lock() -> MutexGuard<'static, EngineDefaults> {
    match cell().lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Snapshot of the process-wide default syntax.
pub fn default_syntax() -> Syntax {
    lock().syntax.clone()
}

pub fn set_default_syntax(syntax: Syntax) {
    lock().syntax = syntax;
}

pub fn default_encoding() -> Encoding {
    lock().encoding
}

pub fn set_default_encoding(encoding: Encoding) {
    lock().encoding = encoding;
}
