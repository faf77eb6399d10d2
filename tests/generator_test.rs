//! Test bracket validation and generation through the public API.

use tapec::core::generate_with_stats;
use tapec::{compile_program, CompileError, CompileOptions, Op, ProgramBuilder};

fn is_balanced(source: &str) -> bool {
    let mut depth = 0i32;
    for c in source.chars() {
        match c {
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0
}

/// Every string over `[`, `]` and `+` up to the given length.
fn all_sources(max_len: usize) -> Vec<String> {
    let mut out = vec![String::new()];
    let mut frontier = vec![String::new()];
    for _ in 0..max_len {
        let mut next = Vec::new();
        for prefix in &frontier {
            for c in ['[', ']', '+'] {
                let mut s = prefix.clone();
                s.push(c);
                next.push(s);
            }
        }
        out.extend(next.iter().cloned());
        frontier = next;
    }
    out
}

#[test]
fn test_only_balanced_sources_compile() {
    for source in all_sources(7) {
        let result = compile_program(&source, CompileOptions::default());
        assert_eq!(result.is_ok(), is_balanced(&source), "source {source:?}");
    }
}

#[test]
fn test_every_jump_pairs_with_its_partner() {
    let program = compile_program("+[>[-]<[->+<]]", CompileOptions::default()).unwrap();
    let ops = program.ops();
    for (idx, op) in ops.iter().enumerate() {
        match *op {
            // `[` jumps just past its `]`, which jumps back just past the `[`.
            Op::JumpIfZero(target) => {
                assert_eq!(ops[target - 1], Op::JumpIfNonZero(idx + 1));
            }
            Op::JumpIfNonZero(target) => {
                assert!(matches!(ops[target - 1], Op::JumpIfZero(_)));
                assert!(target <= idx);
            }
            _ => {}
        }
    }
}

#[test]
fn test_comments_do_not_change_the_program() {
    let plain = compile_program("+[->+<]", CompileOptions::default()).unwrap();
    let commented = compile_program(
        "increment + then\nloop [ move - right > add + back < ]\n",
        CompileOptions::default(),
    )
    .unwrap();
    assert_eq!(plain.ops(), commented.ops());
}

#[test]
fn test_errors_point_at_the_offending_bracket() {
    let err = compile_program("[]\n\n  ]", CompileOptions::default()).unwrap_err();
    assert!(matches!(err, CompileError::UnmatchedClose { line: 3, column: 3 }));

    let err = compile_program("[\n[]", CompileOptions::default()).unwrap_err();
    assert!(matches!(err, CompileError::UnclosedLoop { line: 1, column: 1 }));
}

#[test]
fn test_stats_follow_the_source() {
    let (_, stats) = generate_with_stats("[[[]]][]", ProgramBuilder::default()).unwrap();
    assert_eq!(stats.loops, 4);
    assert_eq!(stats.max_depth, 3);
    assert_eq!(stats.operators(), 8);
}
