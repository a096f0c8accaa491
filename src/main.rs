use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use rust_macal::{compile_directory, compile_script, CompileOptions};

#[derive(Parser)]
#[command(name = "rust-macal")]
#[command(author, version, about = "Compiler for Macal scripts")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a .mcl script (or every script under a directory) to a .mcb listing
    Compile {
        /// Path to the script file or directory
        script: PathBuf,

        /// Output path for the listing (defaults to the script path with a .mcb extension)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Extra library search paths, tried before the defaults
        #[arg(short = 'L', long = "lib-path")]
        lib_paths: Vec<PathBuf>,

        /// Variable names the runtime host provides
        #[arg(long = "reserved")]
        reserved: Vec<String>,

        /// Enable verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Print the token stream of a script
    Tokens {
        /// Path to the script file
        script: PathBuf,
    },

    /// Print the parsed statement tree of a script
    Ast {
        /// Path to the script file
        script: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Compile {
            script,
            output,
            lib_paths,
            reserved,
            verbose,
        } => {
            let options = CompileOptions {
                script_path: script.clone(),
                output_path: output,
                search_paths: lib_paths,
                reserved,
                verbose,
            };

            if script.is_dir() {
                let written = compile_directory(&script, &options)?;
                println!("Compiled {} scripts", written.len());
            } else {
                let written = compile_script(&options)?;
                println!("Compiled {} -> {}", script.display(), written.display());
            }
        }
        Commands::Tokens { script } => {
            let source = rust_macal::script::read_script(&script)?;
            for token in rust_macal::lexer::tokenize(&source)? {
                println!(
                    "{}:{} {:?} {:?}",
                    token.line, token.column, token.kind, token.lexeme
                );
            }
        }
        Commands::Ast { script } => {
            let source = rust_macal::script::read_script(&script)?;
            let tokens = rust_macal::lexer::tokenize(&source)?;
            let file = script.display().to_string();
            let program = rust_macal::parser::Parser::new(tokens, file).parse()?;
            for statement in &program.statements {
                println!("{:#?}", statement);
            }
        }
    }

    Ok(())
}
