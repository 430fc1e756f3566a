use std::net::SocketAddr;

use clap::Parser;
use reqwest::Client;

const DEFAULT_BIND: &str = "0.0.0.0:3000";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
const DEFAULT_USER_AGENT: &str = "menu-import/0.1";

#[derive(Debug, Clone, Parser)]
#[command(name = "menu-import", about = "Imports restaurant menus from PDF documents")]
pub struct Config {
    /// Address the HTTP server listens on.
    #[arg(long, env = "MENU_IMPORT_BIND", default_value = DEFAULT_BIND)]
    pub bind: SocketAddr,

    /// Largest accepted PDF upload, in bytes.
    #[arg(long, env = "MENU_IMPORT_MAX_UPLOAD_BYTES", default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    pub max_upload_bytes: usize,

    #[arg(long, env = "MENU_IMPORT_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 3000)),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl Config {
    /// Reads the environment only, for entry points that receive no arguments.
    pub fn from_env() -> Result<Self, clap::Error> {
        Self::try_parse_from(["menu-import"])
    }
}

pub fn build_client(config: &Config) -> anyhow::Result<Client> {
    let client = Client::builder()
        // Avoid macOS system proxy lookup that can panic in sandboxed contexts.
        .no_proxy()
        .user_agent(config.user_agent.as_str())
        .build()?;
    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_flags_override_defaults() {
        let config = Config::parse_from([
            "menu-import",
            "--bind",
            "127.0.0.1:8080",
            "--max-upload-bytes",
            "1024",
        ]);
        assert_eq!(config.bind, "127.0.0.1:8080".parse().unwrap());
        assert_eq!(config.max_upload_bytes, 1024);
    }

    #[test]
    fn from_env_reads_user_agent() {
        // Only this test touches the variable.
        unsafe { std::env::set_var("MENU_IMPORT_USER_AGENT", "trattoria-import/2.0") };
        let config = Config::from_env().unwrap();
        unsafe { std::env::remove_var("MENU_IMPORT_USER_AGENT") };
        assert_eq!(config.user_agent, "trattoria-import/2.0");
    }

    #[test]
    fn default_matches_flag_defaults() {
        let config = Config::default();
        assert_eq!(config.bind.to_string(), DEFAULT_BIND);
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
    }
}
