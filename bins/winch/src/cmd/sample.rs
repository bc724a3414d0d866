use winch::Kind;

use super::config::Effective;
use super::error::WinchError;

pub fn run(eff: &Effective, kind: Kind) -> Result<(), WinchError> {
    let cx = eff.context()?;
    let out = winch::sample(&cx, kind)?;
    super::emit(&out)
}
