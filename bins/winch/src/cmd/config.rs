use clap::Args;
use mappings::{Context, Options};
use serde::Deserialize;

use super::error::WinchError;

// ═══════════════════════════════════════════════════════════════
//  Config file (TOML)
// ═══════════════════════════════════════════════════════════════

/// ```toml
/// [conversion]
/// strict = true
/// pretty = false
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub conversion: Options,
}

pub fn load_config(path: &str) -> Result<Config, WinchError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| WinchError::Config(format!("cannot read config {path}: {e}")))?;
    parse_config(&content).map_err(|e| WinchError::Config(format!("bad config {path}: {e}")))
}

fn parse_config(content: &str) -> Result<Config, toml::de::Error> {
    toml::from_str(content)
}

// ═══════════════════════════════════════════════════════════════
//  CLI args
// ═══════════════════════════════════════════════════════════════

#[derive(Args, Clone, Debug)]
pub struct GlobalArgs {
    /// Path to winch.toml
    #[arg(long, global = true, default_value = "winch.toml", env = "WINCH_CONFIG")]
    pub config: String,

    /// Fail on the first element or field that does not convert
    #[arg(long, global = true)]
    pub strict: bool,

    /// Indent JSON output
    #[arg(long, global = true)]
    pub pretty: bool,
}

// ═══════════════════════════════════════════════════════════════
//  Effective, merged config
// ═══════════════════════════════════════════════════════════════

/// Final settings: winch.toml < env/CLI.
pub struct Effective {
    pub options: Options,
}

impl Effective {
    pub fn new(args: &GlobalArgs) -> Result<Self, WinchError> {
        let cfg = match load_config(&args.config) {
            Ok(c) => c,
            Err(e) => {
                if std::path::Path::new(&args.config).exists() {
                    return Err(e);
                }
                tracing::debug!(config = %args.config, "no config file, using defaults");
                Config::default()
            }
        };
        Ok(Self::merge(args, cfg))
    }

    fn merge(args: &GlobalArgs, cfg: Config) -> Self {
        Self {
            options: Options {
                strict: args.strict || cfg.conversion.strict,
                pretty: args.pretty || cfg.conversion.pretty,
            },
        }
    }

    /// Context with the board service mappings and these options.
    pub fn context(&self) -> Result<Context, WinchError> {
        Ok(winch::context(self.options)?)
    }
}
