mod common;

use common::opj_fixture_builder::{header_line, sample_project};
use opj_import::{import_opj_bytes, DiagnosticKind, FormatRevision, ImportError, ParseStatus};

fn next_u64(state: &mut u64) -> u64 {
    // Deterministic LCG (same parameters as PCG32 without the output permutation).
    *state = state
        .wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407);
    *state
}

#[test]
fn every_prefix_length_is_handled() {
    for revision in [FormatRevision::V500, FormatRevision::V704, FormatRevision::V941] {
        let full = sample_project(revision).build();
        let header_len = header_line(revision).len();
        let complete = import_opj_bytes(&full).unwrap();

        for len in 0..full.len() {
            let prefix = &full[..len];
            let outcome = std::panic::catch_unwind(|| import_opj_bytes(prefix));
            let Ok(result) = outcome else {
                panic!("{revision}: import panicked on a {len}-byte prefix");
            };

            if len < header_len {
                assert!(
                    matches!(result, Err(ImportError::Header(_))),
                    "{revision}: {len}-byte prefix"
                );
                continue;
            }

            let result = result.unwrap();
            let ParseStatus::Partial { errors } = &result.status else {
                panic!("{revision}: {len}-byte prefix parsed as complete");
            };
            // Framing stops at the first truncated section; only one error is recorded for it.
            assert!(errors.iter().any(|e| e.source.is_truncation()), "{revision}: {len}");
            assert!(result.log.count(DiagnosticKind::SectionSkipped) >= 1);

            // Whatever was recovered is never more than the whole file yields.
            let (p, c) = (&result.project, &complete.project);
            assert!(p.spreadsheets.len() <= c.spreadsheets.len());
            assert!(p.matrices.len() <= c.matrices.len());
            assert!(p.graphs.len() <= c.graphs.len());
            assert!(p.notes.len() <= c.notes.len());
            assert!(p.functions.len() <= c.functions.len());
        }
    }
}

#[test]
fn truncation_inside_the_parameter_list_keeps_windows() {
    let builder = sample_project(FormatRevision::V810);
    let full = builder.build();
    let cut = builder.parameters_offset() + 3;
    let result = import_opj_bytes(&full[..cut]).unwrap();

    let ParseStatus::Partial { errors } = &result.status else {
        panic!("expected a partial parse");
    };
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, opj_import::decode::SectionKind::Parameters);
    assert_eq!(result.project.spreadsheets.len(), 1);
    assert_eq!(result.project.graphs.len(), 1);
    assert_eq!(result.project.excels.len(), 1);
    assert_eq!(result.project.functions.len(), 1);
    assert!(result.project.notes.is_empty());
    assert!(result.project.parameters.is_empty());
    // Without a tree the windows are listed flat.
    let tree = &result.project.tree;
    assert_eq!(tree.children(tree.root()).len(), 4);
}

#[test]
fn pseudorandom_truncation_and_corruption_never_panics() {
    let mut state = 0x0123_4567_89ab_cdef;
    let originals: Vec<Vec<u8>> = FormatRevision::ALL
        .iter()
        .map(|&revision| sample_project(revision).build())
        .collect();

    for _ in 0..512 {
        let original = &originals[(next_u64(&mut state) as usize) % originals.len()];
        let mut buf = original.clone();
        let flips = (next_u64(&mut state) % 8) as usize;
        for _ in 0..flips {
            let at = (next_u64(&mut state) as usize) % buf.len();
            buf[at] = (next_u64(&mut state) >> 56) as u8;
        }
        let len = (next_u64(&mut state) as usize) % (buf.len() + 1);
        buf.truncate(len);

        assert!(
            std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                let _ = import_opj_bytes(&buf);
            }))
            .is_ok(),
            "import panicked on len={len}"
        );
    }
}
