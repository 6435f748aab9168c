use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Runtime settings, taken from the command line.
#[derive(Debug, Clone, Parser)]
#[command(name = "user-registry")]
#[command(about = "HTTP service for user records kept in a JSON file")]
pub struct Config {
    /// Address the HTTP server listens on.
    #[arg(long, default_value = "127.0.0.1:3333")]
    pub bind: SocketAddr,

    /// JSON file holding the record set. Created on first use.
    #[arg(long, default_value = "users.json")]
    pub data_file: PathBuf,

    /// Per-request deadline in seconds.
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u64).range(1..))]
    pub request_timeout_secs: u64,
}

impl Config {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["user-registry"]).unwrap();

        assert_eq!(config.bind, "127.0.0.1:3333".parse::<SocketAddr>().unwrap());
        assert_eq!(config.data_file, PathBuf::from("users.json"));
        assert_eq!(config.request_timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_overrides() {
        let config = Config::try_parse_from([
            "user-registry",
            "--bind",
            "0.0.0.0:8080",
            "--data-file",
            "/var/lib/users/db.json",
            "--request-timeout-secs",
            "5",
        ])
        .unwrap();

        assert_eq!(config.bind.port(), 8080);
        assert_eq!(config.data_file, PathBuf::from("/var/lib/users/db.json"));
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_rejects_zero_timeout_and_bad_address() {
        assert!(Config::try_parse_from(["user-registry", "--request-timeout-secs", "0"]).is_err());
        assert!(Config::try_parse_from(["user-registry", "--bind", "localhost"]).is_err());
    }
}
