//! Listing output
//!
//! Renders a compiled instruction stream as a `.mcb` text listing with a
//! provenance header and writes it next to the source script (or to an
//! explicit output path).

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use sha2::{Digest, Sha256};

use crate::compiler::Instruction;
use crate::error::MacalError;

const LISTING_EXTENSION: &str = "mcb";

/// The output path used when none is given: the script path with the
/// listing extension.
pub fn default_output_path(script_path: &Path) -> PathBuf {
    script_path.with_extension(LISTING_EXTENSION)
}

/// Render the listing text: a comment header identifying the source,
/// followed by one entry per top level instruction.
pub fn render_listing(script_path: &Path, source: &str, instructions: &[Instruction]) -> String {
    let digest = hex::encode(Sha256::digest(source.as_bytes()));
    let mut listing = String::new();
    let _ = writeln!(
        listing,
        "; rust-macal {}",
        env!("CARGO_PKG_VERSION")
    );
    let _ = writeln!(listing, "; source: {}", script_path.display());
    let _ = writeln!(listing, "; sha256: {}", digest);
    let _ = writeln!(
        listing,
        "; compiled: {}",
        Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
    );
    listing.push('\n');
    for instruction in instructions {
        let _ = write!(listing, "{}", instruction);
    }
    listing
}

/// Write the listing for a compiled script and return the path written.
pub fn write_listing(
    script_path: &Path,
    source: &str,
    instructions: &[Instruction],
    output_path: Option<&Path>,
) -> Result<PathBuf, MacalError> {
    let output = match output_path {
        Some(path) => path.to_path_buf(),
        None => default_output_path(script_path),
    };
    let listing = render_listing(script_path, source, instructions);
    std::fs::write(&output, listing).map_err(|source| MacalError::ListingWriteError {
        path: output.clone(),
        source,
    })?;
    Ok(output)
}
