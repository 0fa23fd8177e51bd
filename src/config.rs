use std::path::PathBuf;

use chrono::Duration;

use crate::draw::DayMode;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_STORE_PATH: &str = "pdv_draw_store.json";
pub const DEFAULT_INPUT_TTL_SECS: i64 = 3600;
pub const DEFAULT_LISTS_CSV: &str = "data/lists.csv";

/// Runtime settings taken from the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// JSON file backing assignment memory and saved input lists
    pub store_path: PathBuf,
    /// How long saved input lists stay valid
    pub input_ttl: Duration,
    /// Fixed seed for reproducible draws
    pub seed: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            input_ttl: Duration::seconds(DEFAULT_INPUT_TTL_SECS),
            seed: None,
        }
    }
}

impl AppConfig {
    /// Reads `PDV_DRAW_STORE`, `PDV_DRAW_INPUT_TTL_SECS` and `PDV_DRAW_SEED`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any variable lookup. Unparseable values fall
    /// back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let store_path = lookup("PDV_DRAW_STORE")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.store_path);
        let input_ttl = lookup("PDV_DRAW_INPUT_TTL_SECS")
            .and_then(|v| v.trim().parse::<i64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::seconds)
            .unwrap_or(defaults.input_ttl);
        let seed = lookup("PDV_DRAW_SEED").and_then(|v| v.trim().parse::<u64>().ok());

        Self {
            store_path,
            input_ttl,
            seed,
        }
    }
}

/// Port argument of `web [port]`, defaulting to 8080
pub fn parse_port(arg: Option<&String>) -> u16 {
    arg.and_then(|p| p.parse::<u16>().ok()).unwrap_or(DEFAULT_PORT)
}

/// What the binary was asked to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Web { port: u16 },
    Clear,
    Draw { csv_path: PathBuf, mode: DayMode },
    Unknown(String),
}

impl Command {
    /// Parses `args` as given by `std::env::args` (program name first).
    /// No command draws the default CSV as a business day; `holiday` is
    /// only recognised after `draw <csv>`.
    pub fn parse(args: &[String]) -> Self {
        match args.get(1).map(String::as_str) {
            Some("web") => Command::Web {
                port: parse_port(args.get(2)),
            },
            Some("clear") => Command::Clear,
            Some("draw") => {
                let csv_path = args
                    .get(2)
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_LISTS_CSV));
                let mode = if args.iter().skip(3).any(|a| a == "holiday") {
                    DayMode::Holiday
                } else {
                    DayMode::BusinessDay
                };
                Command::Draw { csv_path, mode }
            }
            Some(other) => Command::Unknown(other.to_string()),
            None => Command::Draw {
                csv_path: PathBuf::from(DEFAULT_LISTS_CSV),
                mode: DayMode::BusinessDay,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        assert_eq!(AppConfig::from_lookup(lookup(&[])), AppConfig::default());
    }

    #[test]
    fn reads_all_variables() {
        let config = AppConfig::from_lookup(lookup(&[
            ("PDV_DRAW_STORE", "/tmp/draws.json"),
            ("PDV_DRAW_INPUT_TTL_SECS", "600"),
            ("PDV_DRAW_SEED", "42"),
        ]));
        assert_eq!(config.store_path, PathBuf::from("/tmp/draws.json"));
        assert_eq!(config.input_ttl, Duration::minutes(10));
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn invalid_values_fall_back() {
        let config = AppConfig::from_lookup(lookup(&[
            ("PDV_DRAW_INPUT_TTL_SECS", "-5"),
            ("PDV_DRAW_SEED", "abc"),
        ]));
        assert_eq!(config.input_ttl, Duration::seconds(DEFAULT_INPUT_TTL_SECS));
        assert_eq!(config.seed, None);
    }

    #[test]
    fn port_argument() {
        assert_eq!(parse_port(None), 8080);
        assert_eq!(parse_port(Some(&"9000".to_string())), 9000);
        assert_eq!(parse_port(Some(&"nope".to_string())), 8080);
    }

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("pdv-draw")
            .chain(list.iter().copied())
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn command_parsing() {
        assert_eq!(Command::parse(&args(&["web", "9000"])), Command::Web { port: 9000 });
        assert_eq!(Command::parse(&args(&["clear"])), Command::Clear);
        assert_eq!(
            Command::parse(&args(&["draw", "lists.csv", "holiday"])),
            Command::Draw {
                csv_path: PathBuf::from("lists.csv"),
                mode: DayMode::Holiday,
            }
        );
        assert_eq!(
            Command::parse(&args(&[])),
            Command::Draw {
                csv_path: PathBuf::from(DEFAULT_LISTS_CSV),
                mode: DayMode::BusinessDay,
            }
        );
    }

    #[test]
    fn holiday_is_only_read_after_draw() {
        assert_eq!(Command::parse(&args(&["holiday"])), Command::Unknown("holiday".to_string()));
        // The CSV path itself is never taken as the mode
        assert_eq!(
            Command::parse(&args(&["draw", "holiday"])),
            Command::Draw {
                csv_path: PathBuf::from("holiday"),
                mode: DayMode::BusinessDay,
            }
        );
    }
}
