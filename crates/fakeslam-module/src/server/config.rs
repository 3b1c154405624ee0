use anyhow::bail;
use clap::{Parser, ValueEnum};
use fakeslam::{MAX_SOCKET_PATH_LEN, ModuleArgs};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Log output format.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Multi-line, human-readable output.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Command line of the `fakeslam-module` binary.
///
/// The host launches the module with the path of the socket it listens on.
/// Every option can also be supplied through the environment or a `.env`
/// file.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "fakeslam-module",
    version,
    about = "Module process hosting a fake SLAM service"
)]
pub struct CliArgs {
    /// Unix socket the host listens on.
    ///
    /// Environment variable: `SOCKET_PATH`
    #[arg(env = "SOCKET_PATH")]
    pub socket_path: PathBuf,

    /// Log filter directive, e.g. `info` or `fakeslam=debug`.
    ///
    /// `RUST_LOG` takes precedence when set.
    ///
    /// Environment variable: `LOG_LEVEL`
    #[arg(long, env = "LOG_LEVEL", default_value_t = String::from("info"))]
    pub log_level: String,

    /// Log output format.
    ///
    /// Environment variable: `LOG_FORMAT`
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

#[derive(Debug, Clone)]
pub struct ModuleConfig {
    pub socket_path: PathBuf,
    pub log_level: String,
    pub log_format: LogFormat,
}

impl ModuleConfig {
    pub fn module_args(&self) -> ModuleArgs {
        ModuleArgs::new(self.socket_path.clone())
    }
}

impl TryFrom<CliArgs> for ModuleConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let len = args.socket_path.as_os_str().len();
        if len == 0 {
            bail!("SOCKET_PATH must not be empty");
        }
        if len > MAX_SOCKET_PATH_LEN {
            bail!(
                "SOCKET_PATH is {} bytes, exceeding the {} byte limit",
                len,
                MAX_SOCKET_PATH_LEN
            );
        }

        if let Err(e) = EnvFilter::try_new(&args.log_level) {
            bail!("LOG_LEVEL ({}) is not a valid filter: {}", args.log_level, e);
        }

        Ok(Self {
            socket_path: args.socket_path,
            log_level: args.log_level,
            log_format: args.log_format,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> anyhow::Result<ModuleConfig> {
        let args = CliArgs::try_parse_from(argv)?;
        ModuleConfig::try_from(args)
    }

    #[test]
    fn defaults_apply() {
        let config = parse(&["fakeslam-module", "/tmp/host.sock"]).unwrap();
        assert_eq!(config.socket_path, PathBuf::from("/tmp/host.sock"));
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.module_args(), ModuleArgs::new("/tmp/host.sock"));
    }

    #[test]
    fn options_override_defaults() {
        let config = parse(&[
            "fakeslam-module",
            "/tmp/host.sock",
            "--log-level",
            "fakeslam=debug",
            "--log-format",
            "json",
        ])
        .unwrap();
        assert_eq!(config.log_level, "fakeslam=debug");
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn overlong_socket_path_is_rejected() {
        let path = format!("/{}", "s".repeat(MAX_SOCKET_PATH_LEN));
        let err = parse(&["fakeslam-module", &path]).unwrap_err();
        assert!(err.to_string().contains("SOCKET_PATH"), "{err}");
    }

    #[test]
    fn empty_socket_path_is_rejected() {
        assert!(parse(&["fakeslam-module", ""]).is_err());
    }

    #[test]
    fn unknown_log_format_is_rejected() {
        assert!(parse(&["fakeslam-module", "/tmp/host.sock", "--log-format", "xml"]).is_err());
    }
}
