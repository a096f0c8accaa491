//! Compiler front end for the Macal scripting language.
//!
//! Takes a `.mcl` script through lexing, parsing and instruction
//! generation, and writes the result as a `.mcb` text listing. The
//! pipeline is exposed both as a library ([`compile_script`]) and through
//! the `rust-macal` command line tool.

pub mod ast;
pub mod compiler;
pub mod emit;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod script;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rayon::prelude::*;
use walkdir::WalkDir;

pub use error::MacalError;

/// Minimum number of scripts to benefit from parallel compilation.
/// Below this threshold, sequential compilation is faster due to rayon overhead.
const PARALLEL_THRESHOLD: usize = 8;

/// Options for compiling a single script
pub struct CompileOptions {
    pub script_path: PathBuf,
    /// Listing destination; defaults to the script path with a `.mcb`
    /// extension
    pub output_path: Option<PathBuf>,
    /// Extra library search paths, tried before the defaults
    pub search_paths: Vec<PathBuf>,
    /// Variable names the runtime host provides
    pub reserved: Vec<String>,
    pub verbose: bool,
}

impl CompileOptions {
    pub fn new(script_path: impl Into<PathBuf>) -> Self {
        Self {
            script_path: script_path.into(),
            output_path: None,
            search_paths: Vec::new(),
            reserved: Vec::new(),
            verbose: false,
        }
    }
}

/// Compile a script to a listing file and return the path written
pub fn compile_script(options: &CompileOptions) -> Result<PathBuf> {
    let script_path = &options.script_path;
    if options.verbose {
        println!("Compiling {}", script_path.display());
    }

    let source = script::read_script(script_path)?;
    let tokens = lexer::tokenize(&source)?;
    if options.verbose {
        println!("  lexed {} tokens", tokens.len());
    }

    let file = script_path.display().to_string();
    let program = parser::Parser::new(tokens, file).parse()?;
    if options.verbose {
        println!("  parsed {} statements", program.statements.len());
    }

    let mut search_paths = options.search_paths.clone();
    search_paths.extend(script::default_search_paths(script_path));
    let instructions = compiler::compile_program(&program, &options.reserved, search_paths)?;
    if options.verbose {
        println!("  generated {} instructions", instructions.len());
    }

    let written = emit::write_listing(
        script_path,
        &source,
        &instructions,
        options.output_path.as_deref(),
    )
    .with_context(|| format!("writing listing for {}", script_path.display()))?;
    if options.verbose {
        println!("  wrote {}", written.display());
    }
    Ok(written)
}

/// Collect every `.mcl` script under a directory, sorted for stable output
pub fn collect_scripts(dir: &Path) -> Vec<PathBuf> {
    let mut scripts: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "mcl"))
        .collect();
    scripts.sort();
    scripts
}

/// Compile every script under a directory, using parallel compilation for
/// larger script sets. `base` supplies the search paths, reserved names and
/// verbosity; each script gets the default listing path next to it.
pub fn compile_directory(dir: &Path, base: &CompileOptions) -> Result<Vec<PathBuf>> {
    let scripts = collect_scripts(dir);
    let per_script = |script: &PathBuf| -> Result<PathBuf> {
        let options = CompileOptions {
            script_path: script.clone(),
            output_path: None,
            search_paths: base.search_paths.clone(),
            reserved: base.reserved.clone(),
            verbose: base.verbose,
        };
        compile_script(&options)
    };

    if scripts.len() >= PARALLEL_THRESHOLD {
        scripts.par_iter().map(per_script).collect()
    } else {
        scripts.iter().map(per_script).collect()
    }
}
