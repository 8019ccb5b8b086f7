// Start-position analysis feeding the search engine's candidate
// skipping. Everything here is a performance hint: search results are
// identical with or without it.

use super::program::{Inst, Program, StartAnchor};

pub(crate) fn analyze(program: &mut Program) {
    let mut i = 0;
    // capture boundaries at the head don't constrain the start position
    while matches!(program.insts.get(i), Some(Inst::MemStart { .. })) {
        i += 1;
    }

    program.start_anchor = match program.insts.get(i) {
        Some(Inst::BufBegin) => StartAnchor::Buf,
        Some(Inst::LineBegin) => StartAnchor::Line,
        _ => StartAnchor::None,
    };
    while matches!(
        program.insts.get(i),
        Some(Inst::BufBegin) | Some(Inst::LineBegin) | Some(Inst::MemStart { .. })
    ) {
        i += 1;
    }

    // required literal prefix: leading Str run
    let mut prefix = Vec::new();
    let mut j = i;
    while let Some(Inst::Str(bytes)) = program.insts.get(j) {
        prefix.extend_from_slice(bytes);
        j += 1;
    }
    if !prefix.is_empty() {
        program.prefix = Some(prefix);
    }

    // possible first bytes of any match
    program.first_bytes = match program.insts.get(i) {
        Some(Inst::Str(bytes)) if !bytes.is_empty() => {
            let mut set = Box::new([false; 256]);
            set[bytes[0] as usize] = true;
            Some(set)
        }
        Some(Inst::Class { idx, fold: false }) => {
            program.classes[*idx as usize].ascii_byte_set().map(|bytes| {
                let mut set = Box::new([false; 256]);
                for b in bytes {
                    set[b as usize] = true;
                }
                set
            })
        }
        _ => None,
    };
}
