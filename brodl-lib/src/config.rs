//! Scan configuration: `config.toml` loading, validation and the commented
//! default file written on first run.

use std::path::Path;

use serde::Deserialize;

use brodl_core::{Difficulty, GameplayType, TimePeriod};

use crate::error::Error;

/// Template written when no config file exists yet.
const DEFAULT_CONFIG: &str = "\
# Workshop scan settings.
#
# page_count         how many listing pages to walk per filter combination
# maps_per_page      listing page size; the workshop only honors 9, 18 or 30
# time_period        recency filter in days: -1 (all time), 1, 7, 90, 180 or 365
# gameplay_types     digits, any subset of \"123456\":
#                    1 Standard, 2 Puzzle, 3 Story, 4 Experimental,
#                    5 Challenge, 6 Deathmatch
# difficulty_levels  digits, any subset of \"123\":
#                    1 Normal, 2 Challenging, 3 Brotal

[settings]
page_count = 1
maps_per_page = 30
time_period = -1
gameplay_types = \"123456\"
difficulty_levels = \"123\"
";

#[derive(Debug, Deserialize)]
struct RawConfig {
    settings: RawSettings,
}

#[derive(Debug, Deserialize)]
struct RawSettings {
    page_count: i64,
    maps_per_page: i64,
    time_period: i64,
    gameplay_types: String,
    difficulty_levels: String,
}

/// Validated scan settings.
#[derive(Debug, Clone)]
pub struct Config {
    pub page_count: u32,
    pub maps_per_page: u32,
    pub time_period: TimePeriod,
    pub gameplay_types: Vec<GameplayType>,
    pub difficulty_levels: Vec<Difficulty>,
}

impl Config {
    /// Load and validate `config.toml`. If the file does not exist yet, a
    /// commented default is written in its place and loaded.
    pub fn load_or_init(path: &Path) -> Result<Self, Error> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                write_default(path)?;
                log::info!("created default config at {}", path.display());
                DEFAULT_CONFIG.to_string()
            }
            Err(err) => return Err(err.into()),
        };
        Self::parse(&contents)
    }

    /// Parse and validate config text. Each field gets its own error message
    /// so a typo points straight at the offending line.
    pub fn parse(contents: &str) -> Result<Self, Error> {
        let raw: RawConfig = toml::from_str(contents)
            .map_err(|err| Error::config(format!("config.toml is not valid TOML: {err}")))?;
        let raw = raw.settings;

        if raw.page_count < 1 {
            return Err(Error::config(format!(
                "page_count must be a positive number, got {}",
                raw.page_count
            )));
        }
        if !matches!(raw.maps_per_page, 9 | 18 | 30) {
            return Err(Error::config(format!(
                "maps_per_page must be 9, 18 or 30, got {}",
                raw.maps_per_page
            )));
        }
        let time_period = i32::try_from(raw.time_period)
            .ok()
            .and_then(TimePeriod::from_days)
            .ok_or_else(|| {
                Error::config(format!(
                    "time_period must be -1, 1, 7, 90, 180 or 365, got {}",
                    raw.time_period
                ))
            })?;

        let gameplay_types = parse_selection(&raw.gameplay_types, GameplayType::from_code)
            .map_err(|code| {
                Error::config(format!(
                    "gameplay_types may only contain digits 1-6, got '{code}'"
                ))
            })?;
        if gameplay_types.is_empty() {
            return Err(Error::config("gameplay_types must not be empty"));
        }
        let difficulty_levels = parse_selection(&raw.difficulty_levels, Difficulty::from_code)
            .map_err(|code| {
                Error::config(format!(
                    "difficulty_levels may only contain digits 1-3, got '{code}'"
                ))
            })?;
        if difficulty_levels.is_empty() {
            return Err(Error::config("difficulty_levels must not be empty"));
        }

        Ok(Self {
            page_count: raw.page_count as u32,
            maps_per_page: raw.maps_per_page as u32,
            time_period,
            gameplay_types,
            difficulty_levels,
        })
    }

    /// Listing pages the scan will request in total.
    pub fn total_pages(&self) -> u32 {
        self.page_count * self.gameplay_types.len() as u32 * self.difficulty_levels.len() as u32
    }
}

/// Map a selection string of digit codes to filter values, ignoring
/// whitespace, deduplicated and in code order.
fn parse_selection<T, F>(codes: &str, from_code: F) -> Result<Vec<T>, char>
where
    T: Copy + Ord,
    F: Fn(char) -> Result<T, brodl_core::FilterParseError>,
{
    let mut out = Vec::new();
    for code in codes.chars().filter(|c| !c.is_whitespace()) {
        let value = from_code(code).map_err(|_| code)?;
        if !out.contains(&value) {
            out.push(value);
        }
    }
    out.sort();
    Ok(out)
}

fn write_default(path: &Path) -> Result<(), Error> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let tmp = path.with_extension("toml.tmp");
    std::fs::write(&tmp, DEFAULT_CONFIG)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}
