use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, fs};

use serde::Deserialize;

use crate::display::Position;
use crate::leaderboard::Metric;
use crate::util::dates;
use crate::{fmt, str, Error};

pub const CONFIG_ENV_VAR: &str = "OMNIBOARD_CONFIG";
const CONFIG_FILE_NAME: &str = "omniboard.toml";

const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 300;
const DEFAULT_TOP_N: usize = 10;
const DEFAULT_WORLD: &str = "world";

#[derive(Debug, Deserialize, Clone)]
struct FileConfig {
    pub database_path: String,
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_seconds: u64,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    pub query_timeout_seconds: Option<u64>,
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
    #[serde(default = "default_loaded_worlds")]
    pub loaded_worlds: Vec<String>,
    pub log: FileLogConfig,
    #[serde(default)]
    pub boards: BTreeMap<String, FileBoardConfig>,
    #[serde(default)]
    pub block_points: BTreeMap<String, f64>,
}

#[derive(Debug, Deserialize, Clone)]
struct FileLogConfig {
    pub level: String,
    pub path: String,
    pub json_path: String,
    pub seq_endpoint: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
struct FileBoardConfig {
    pub title: Option<String>,
    #[serde(default = "default_metric")]
    pub metric: Metric,
    pub position: Option<Position>,
    #[serde(default = "default_world")]
    pub world: String,
}

fn default_refresh_interval() -> u64 {
    DEFAULT_REFRESH_INTERVAL_SECS
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

fn default_currency_symbol() -> String {
    str!("$")
}

fn default_loaded_worlds() -> Vec<String> {
    vec![str!(DEFAULT_WORLD)]
}

fn default_metric() -> Metric {
    Metric::Points
}

fn default_world() -> String {
    str!(DEFAULT_WORLD)
}

#[derive(Clone, Debug)]
pub struct LogConfig {
    pub level: String,
    pub path: PathBuf,
    pub json_path: PathBuf,
    pub seq_endpoint: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BoardConfig {
    pub title: String,
    pub metric: Metric,
    pub position: Option<Position>,
    pub world: String,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub database_path: PathBuf,
    pub refresh_interval: Duration,
    pub top_n: usize,
    pub query_timeout: Option<Duration>,
    pub currency_symbol: String,
    pub loaded_worlds: Vec<String>,
    pub log: LogConfig,
    pub boards: BTreeMap<String, BoardConfig>,
    pub block_points: BTreeMap<String, f64>,
}

fn expand_tilde(path: &str) -> Result<PathBuf, Error> {
    if path.starts_with("~/") {
        let home = env::var("HOME")?;
        Ok(PathBuf::from(path.replacen("~", &home, 1)))
    } else {
        Ok(PathBuf::from(path))
    }
}

fn config_path() -> Result<PathBuf, Error> {
    if let Ok(path) = env::var(CONFIG_ENV_VAR) {
        return expand_tilde(&path);
    }

    let exe_path = env::current_exe()?;
    match exe_path.parent() {
        Some(dir) => Ok(dir.join(CONFIG_FILE_NAME)),
        None => Err("failed to determine executable directory".into()),
    }
}

pub fn load_config() -> Result<AppConfig, Error> {
    let config_path = config_path()?;
    if !config_path.is_file() {
        return Err(fmt!(
            "Config file does not exist or is not a file: {}",
            config_path.display()
        )
        .into());
    }

    let s = fs::read_to_string(&config_path)?;
    let cfg = parse_config(&s)?;
    validate_log_paths(&cfg.log)?;
    Ok(cfg)
}

pub fn parse_config(s: &str) -> Result<AppConfig, Error> {
    let cfg: FileConfig = toml::from_str(s)?;

    if cfg.top_n == 0 {
        return Err("top_n must be at least 1".into());
    }

    for (block, points) in &cfg.block_points {
        if !points.is_finite() || *points < 0.0 {
            return Err(fmt!("block_points.{block} must be a non-negative number").into());
        }
    }

    let boards = cfg
        .boards
        .into_iter()
        .map(|(id, board)| {
            let title = board
                .title
                .unwrap_or_else(|| fmt!("§6§l★ §eTop {} Leaderboard §6§l★", capitalize(&id)));
            let board = BoardConfig {
                title,
                metric: board.metric,
                position: board.position,
                world: board.world,
            };
            (id, board)
        })
        .collect();

    Ok(AppConfig {
        database_path: expand_tilde(&cfg.database_path)?,
        refresh_interval: Duration::from_secs(cfg.refresh_interval_seconds.max(1)),
        top_n: cfg.top_n,
        query_timeout: cfg
            .query_timeout_seconds
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs),
        currency_symbol: cfg.currency_symbol,
        loaded_worlds: cfg.loaded_worlds,
        log: build_log_config(cfg.log)?,
        boards,
        block_points: cfg.block_points,
    })
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn build_log_config(file_log: FileLogConfig) -> Result<LogConfig, Error> {
    Ok(LogConfig {
        level: file_log.level,
        path: log_file_replacements(&file_log.path)?,
        json_path: log_file_replacements(&file_log.json_path)?,
        seq_endpoint: file_log.seq_endpoint,
    })
}

fn validate_log_paths(log: &LogConfig) -> Result<(), Error> {
    for path in [&log.path, &log.json_path] {
        validate_log_path(path)?;
    }
    Ok(())
}

fn validate_log_path(path: &Path) -> Result<(), Error> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.exists() {
            return Err(fmt!("Log file directory does not exist: {}", parent.display()).into());
        }
    }
    if path.exists() && !path.is_file() {
        return Err(fmt!("Log path exists but is not a file: {}", path.display()).into());
    }
    Ok(())
}

fn log_file_replacements(cfg_path: &str) -> Result<PathBuf, Error> {
    let date_str = dates::local_date_yyyy_mm_dd();
    let replaced = cfg_path.replace("{DATE}", &date_str);
    expand_tilde(&replaced)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        database_path = "/tmp/omniboard.db"

        [log]
        level = "info"
        path = "/tmp/omniboard-{DATE}.log"
        json_path = "/tmp/omniboard.json"
    "#;

    #[test]
    fn minimal_config_uses_defaults() {
        let cfg = parse_config(MINIMAL).unwrap();
        assert_eq!(cfg.refresh_interval, Duration::from_secs(300));
        assert_eq!(cfg.top_n, 10);
        assert_eq!(cfg.query_timeout, None);
        assert_eq!(cfg.currency_symbol, "$");
        assert_eq!(cfg.loaded_worlds, vec!["world".to_string()]);
        assert!(cfg.boards.is_empty());
        assert!(cfg.block_points.is_empty());
    }

    #[test]
    fn log_path_date_is_substituted() {
        let cfg = parse_config(MINIMAL).unwrap();
        let expected = fmt!("/tmp/omniboard-{}.log", dates::local_date_yyyy_mm_dd());
        assert_eq!(cfg.log.path, PathBuf::from(expected));
    }

    #[test]
    fn boards_parse_with_optional_position() {
        let s = fmt!(
            "{MINIMAL}\n{}",
            r#"
            [boards.island]
            position = [10.0, 64.5, -3.0]

            [boards.money]
            title = "Rich List"
            metric = "currency"
            world = "spawn"
            "#
        );
        let cfg = parse_config(&s).unwrap();

        let island = &cfg.boards["island"];
        assert_eq!(island.metric, Metric::Points);
        assert_eq!(island.world, "world");
        assert_eq!(island.position, Some(Position::new(10.0, 64.5, -3.0)));
        assert_eq!(island.title, "§6§l★ §eTop Island Leaderboard §6§l★");

        let money = &cfg.boards["money"];
        assert_eq!(money.title, "Rich List");
        assert_eq!(money.metric, Metric::Currency);
        assert_eq!(money.position, None);
        assert_eq!(money.world, "spawn");
    }

    #[test]
    fn zero_interval_is_clamped() {
        let s = MINIMAL.replace(
            "database_path",
            "refresh_interval_seconds = 0\nquery_timeout_seconds = 0\ndatabase_path",
        );
        let cfg = parse_config(&s).unwrap();
        assert_eq!(cfg.refresh_interval, Duration::from_secs(1));
        assert_eq!(cfg.query_timeout, None);
    }

    #[test]
    fn rejects_negative_block_points() {
        let s = fmt!("{MINIMAL}\n[block_points]\ndiamond_block = -1.0\n");
        assert!(parse_config(&s).is_err());
    }

    #[test]
    fn rejects_zero_top_n() {
        let s = MINIMAL.replace("database_path", "top_n = 0\ndatabase_path");
        assert!(parse_config(&s).is_err());
    }

    #[test]
    fn missing_log_directory_is_reported() {
        let log = LogConfig {
            level: "info".into(),
            path: PathBuf::from("/definitely/not/here/omniboard.log"),
            json_path: PathBuf::from("/tmp/omniboard.json"),
            seq_endpoint: None,
        };
        assert!(validate_log_paths(&log).is_err());
    }
}
