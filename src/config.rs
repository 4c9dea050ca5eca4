use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::client::ClientConfig;

pub(crate) const DEFAULT_URL: &str = "https://api.sec.or.th";
pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub(crate) const ENV_URL: &str = "SEC_API_URL";
pub(crate) const ENV_FACTSHEET_KEY: &str = "SEC_FUND_FACTSHEET_KEY";
pub(crate) const ENV_DAILY_INFO_KEY: &str = "SEC_FUND_DAILY_INFO_KEY";
pub(crate) const ENV_TIMEOUT: &str = "SEC_API_TIMEOUT_SECS";
pub(crate) const ENV_RC: &str = "SECFUND_RC";

const RC_FILE: &str = ".secfundrc";

/// Values supplied directly by the caller; they win over every other source.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub url: Option<String>,
    pub factsheet_key: Option<String>,
    pub daily_info_key: Option<String>,
    pub timeout: Option<Duration>,
}

#[derive(Debug, Default)]
struct RcConfig {
    url: Option<String>,
    factsheet_key: Option<String>,
    daily_info_key: Option<String>,
    timeout: Option<Duration>,
}

pub(crate) fn load_config(overrides: Overrides) -> Result<ClientConfig> {
    load_config_with(overrides, |name| std::env::var(name).ok(), rc_candidates())
}

/// Resolves configuration in order: overrides, environment, first rc file
/// found, built-in defaults.
pub(crate) fn load_config_with<F>(
    overrides: Overrides,
    env: F,
    rc_candidates: Vec<PathBuf>,
) -> Result<ClientConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let env = |name: &str| env(name).filter(|v| !v.trim().is_empty());

    let mut url = overrides.url.or_else(|| env(ENV_URL));
    let mut factsheet_key = overrides.factsheet_key.or_else(|| env(ENV_FACTSHEET_KEY));
    let mut daily_info_key = overrides.daily_info_key.or_else(|| env(ENV_DAILY_INFO_KEY));
    let mut timeout = match overrides.timeout {
        Some(t) => Some(t),
        None => match env(ENV_TIMEOUT) {
            Some(v) => Some(parse_timeout(&v).with_context(|| format!("invalid {}", ENV_TIMEOUT))?),
            None => None,
        },
    };

    if url.is_none() || factsheet_key.is_none() || daily_info_key.is_none() || timeout.is_none() {
        for rc_path in &rc_candidates {
            if rc_path.exists() {
                let cfg = read_rc(rc_path).with_context(|| {
                    format!("failed to read configuration file {}", rc_path.display())
                })?;

                url = url.or(cfg.url);
                factsheet_key = factsheet_key.or(cfg.factsheet_key);
                daily_info_key = daily_info_key.or(cfg.daily_info_key);
                timeout = timeout.or(cfg.timeout);
                break;
            }
        }
    }

    let factsheet_key = match factsheet_key {
        Some(v) => v,
        None => {
            if !rc_candidates.is_empty() {
                bail!(
                    "Missing configuration: {} not found (export it, put it in .env, or add `factsheet_key:` to one of: {})",
                    ENV_FACTSHEET_KEY,
                    rc_candidates
                        .iter()
                        .map(|p| p.display().to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                );
            }
            bail!(
                "Missing configuration: {} not found (export it or put it in .env)",
                ENV_FACTSHEET_KEY
            );
        }
    };

    Ok(ClientConfig {
        url: url.unwrap_or_else(|| DEFAULT_URL.to_string()),
        factsheet_key,
        daily_info_key,
        timeout: timeout.unwrap_or(DEFAULT_TIMEOUT),
    })
}

fn parse_timeout(v: &str) -> Result<Duration> {
    let secs: u64 = v
        .trim()
        .parse()
        .with_context(|| format!("timeout must be a whole number of seconds, got {:?}", v))?;
    Ok(Duration::from_secs(secs))
}

fn read_rc(path: &Path) -> Result<RcConfig> {
    let text = std::fs::read_to_string(path)?;
    let mut cfg = RcConfig::default();

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        // `url:` values contain a colon themselves, so only split on the first one.
        if let Some((k, v)) = line.split_once(':') {
            let v = strip_quotes(v.trim());
            if v.is_empty() {
                continue;
            }
            match k.trim() {
                "url" => cfg.url = Some(v.to_string()),
                "factsheet_key" => cfg.factsheet_key = Some(v.to_string()),
                "daily_info_key" => cfg.daily_info_key = Some(v.to_string()),
                "timeout" => cfg.timeout = Some(parse_timeout(v)?),
                _ => {}
            }
        }
    }

    Ok(cfg)
}

fn strip_quotes(s: &str) -> &str {
    let s = s.trim();
    if (s.starts_with('"') && s.ends_with('"') && s.len() >= 2)
        || (s.starts_with('\'') && s.ends_with('\'') && s.len() >= 2)
    {
        &s[1..s.len() - 1]
    } else {
        s
    }
}

fn rc_candidates() -> Vec<PathBuf> {
    // 1) SECFUND_RC (explicit)
    // 2) ./.secfundrc
    // 3) ~/.secfundrc
    if let Ok(p) = std::env::var(ENV_RC) {
        return vec![PathBuf::from(p)];
    }

    let mut v = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        v.push(cwd.join(RC_FILE));
    }
    if let Some(home) = dirs::home_dir() {
        v.push(home.join(RC_FILE));
    }
    v
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn environment_supplies_keys_and_defaults_fill_the_rest() {
        let cfg = load_config_with(
            Overrides::default(),
            env_of(&[(ENV_FACTSHEET_KEY, "fs-key")]),
            vec![],
        )
        .unwrap();

        assert_eq!(cfg.url, DEFAULT_URL);
        assert_eq!(cfg.factsheet_key, "fs-key");
        assert_eq!(cfg.daily_info_key, None);
        assert_eq!(cfg.timeout, Duration::from_secs(10));
    }

    #[test]
    fn overrides_win_over_environment() {
        let overrides = Overrides {
            url: Some("http://localhost:9000".to_string()),
            factsheet_key: Some("explicit".to_string()),
            ..Overrides::default()
        };
        let cfg = load_config_with(
            overrides,
            env_of(&[(ENV_FACTSHEET_KEY, "from-env"), (ENV_URL, "http://env")]),
            vec![],
        )
        .unwrap();

        assert_eq!(cfg.url, "http://localhost:9000");
        assert_eq!(cfg.factsheet_key, "explicit");
    }

    #[test]
    fn missing_factsheet_key_is_an_error() {
        let err = load_config_with(
            Overrides::default(),
            env_of(&[(ENV_DAILY_INFO_KEY, "daily"), (ENV_FACTSHEET_KEY, "  ")]),
            vec![],
        )
        .unwrap_err();
        assert!(err.to_string().contains(ENV_FACTSHEET_KEY));
    }

    #[test]
    fn rc_file_fills_gaps_left_by_environment() {
        let dir = tempfile::tempdir().unwrap();
        let rc = dir.path().join(RC_FILE);
        std::fs::write(
            &rc,
            "# sec api\nurl: \"http://127.0.0.1:8080\"\nfactsheet_key: rc-key\ndaily_info_key: 'rc-daily'\ntimeout: 3\n",
        )
        .unwrap();

        let cfg = load_config_with(
            Overrides::default(),
            env_of(&[(ENV_DAILY_INFO_KEY, "env-daily")]),
            vec![dir.path().join("missing"), rc],
        )
        .unwrap();

        assert_eq!(cfg.url, "http://127.0.0.1:8080");
        assert_eq!(cfg.factsheet_key, "rc-key");
        assert_eq!(cfg.daily_info_key.as_deref(), Some("env-daily"));
        assert_eq!(cfg.timeout, Duration::from_secs(3));
    }

    #[test]
    fn bad_timeout_is_reported() {
        let err = load_config_with(
            Overrides::default(),
            env_of(&[(ENV_FACTSHEET_KEY, "k"), (ENV_TIMEOUT, "soon")]),
            vec![],
        )
        .unwrap_err();
        assert!(format!("{:#}", err).contains(ENV_TIMEOUT));
    }
}
