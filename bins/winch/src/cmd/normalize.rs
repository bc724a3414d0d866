use std::io::Read;

use winch::Kind;

use super::config::Effective;
use super::error::WinchError;

pub fn run(eff: &Effective, kind: Kind, input: Option<&str>) -> Result<(), WinchError> {
    let bytes = match input {
        Some(path) => std::fs::read(path)?,
        None => {
            let mut buf = Vec::new();
            std::io::stdin().lock().read_to_end(&mut buf)?;
            buf
        }
    };
    tracing::debug!(?kind, bytes = bytes.len(), strict = eff.options.strict, "normalizing");

    let cx = eff.context()?;
    let out = winch::normalize(&cx, kind, &bytes)?;
    super::emit(&out)
}
