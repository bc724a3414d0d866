pub mod config;
pub mod error;
pub mod normalize;
pub mod sample;

use std::io::Write;

use error::WinchError;

/// Write an encoded document to stdout, newline-terminated.
pub(crate) fn emit(bytes: &[u8]) -> Result<(), WinchError> {
    let mut out = std::io::stdout().lock();
    out.write_all(bytes)?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}
