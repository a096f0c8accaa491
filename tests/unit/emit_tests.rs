//! Listing output tests

use std::path::Path;

use rust_macal::compiler::compile_program;
use rust_macal::emit::{default_output_path, render_listing, write_listing};
use rust_macal::parser::parse_script;
use rust_macal::MacalError;

fn compile(source: &str) -> Vec<rust_macal::compiler::Instruction> {
    let program = parse_script(source, "test.mcl").unwrap();
    compile_program(&program, &[], Vec::new()).unwrap()
}

#[test]
fn test_listing_header_lines() {
    let source = "x = 1;";
    let listing = render_listing(Path::new("demo.mcl"), source, &compile(source));
    let lines: Vec<&str> = listing.lines().collect();
    assert!(lines[0].starts_with("; rust-macal "));
    assert_eq!(lines[1], "; source: demo.mcl");
    assert!(lines[2].starts_with("; sha256: "));
    assert!(lines[3].starts_with("; compiled: "));
    assert_eq!(lines[4], "");
}

#[test]
fn test_digest_depends_only_on_source() {
    let a = render_listing(Path::new("a.mcl"), "x = 1;", &[]);
    let b = render_listing(Path::new("b.mcl"), "x = 1;", &[]);
    let digest = |listing: &str| {
        listing
            .lines()
            .find(|line| line.starts_with("; sha256: "))
            .map(str::to_string)
    };
    assert_eq!(digest(&a), digest(&b));
    let c = render_listing(Path::new("a.mcl"), "x = 2;", &[]);
    assert_ne!(digest(&a), digest(&c));
}

#[test]
fn test_listing_body_is_the_instruction_stream() {
    let source = "x = 1;";
    let instructions = compile(source);
    let rendered: String = instructions.iter().map(|i| i.to_string()).collect();
    let listing = render_listing(Path::new("demo.mcl"), source, &instructions);
    let (_, body) = listing.split_once("\n\n").expect("header separator");
    assert_eq!(body, rendered);
}

#[test]
fn test_explicit_output_path() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("custom.listing");
    let written = write_listing(Path::new("demo.mcl"), "x = 1;", &[], Some(&out)).unwrap();
    assert_eq!(written, out);
    assert!(out.exists());
}

#[test]
fn test_write_error_reports_path() {
    let missing = Path::new("/nonexistent-dir/out.mcb");
    let err = write_listing(Path::new("demo.mcl"), "x = 1;", &[], Some(missing)).unwrap_err();
    let MacalError::ListingWriteError { path, .. } = err else {
        panic!("expected listing write error, got {err}");
    };
    assert_eq!(path, missing);
}

#[test]
fn test_default_output_path_keeps_directory() {
    assert_eq!(
        default_output_path(Path::new("/opt/scripts/job.mcl")),
        Path::new("/opt/scripts/job.mcb")
    );
}
