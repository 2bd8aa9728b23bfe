#![no_main]

use libfuzzer_sys::fuzz_target;
use opj_model::NodeKind;

/// Projects past this size add nothing the framing code has not already seen.
const MAX_INPUT_BYTES: usize = 1 << 20;

fuzz_target!(|data: &[u8]| {
    if data.len() > MAX_INPUT_BYTES {
        return;
    }

    // Header rejection is a normal outcome; anything past the header must never panic.
    let Ok(result) = opj_import::import_opj_bytes(data) else {
        return;
    };

    // Every tree leaf must point at a record of its collection.
    let project = &result.project;
    for (id, _) in project.tree.walk() {
        let Some(node) = project.tree.get(id) else {
            continue;
        };
        let Some(index) = node.object else {
            continue;
        };
        let len = match node.kind {
            NodeKind::SpreadSheet => project.spreadsheets.len(),
            NodeKind::Matrix => project.matrices.len(),
            NodeKind::Excel => project.excels.len(),
            NodeKind::Graph => project.graphs.len(),
            NodeKind::Note => project.notes.len(),
            NodeKind::Folder => continue,
        };
        assert!(index < len, "{:?} leaf #{index} of {len}", node.kind);
    }
});
