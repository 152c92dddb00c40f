//! Engine tuning knobs.

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Transparent optimistic-commit retries before a conflict surfaces to
    /// the caller.
    pub max_commit_retries: u32,

    /// Journal the opening balance as a movement at account creation.
    ///
    /// Off by default: a fresh account starts with an empty journal and the
    /// balance-equals-journal invariant holds relative to the opening
    /// balance. Turned on, the journal derives the balance from zero.
    pub journal_opening_balance: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_commit_retries: 3,
            journal_opening_balance: false,
        }
    }
}

impl EngineConfig {
    /// Read overrides from `PASSBOOK_MAX_COMMIT_RETRIES` and
    /// `PASSBOOK_JOURNAL_OPENING_BALANCE`.
    ///
    /// Unparsable values fall back to the defaults with a logged warning.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_commit_retries: parse_retries(
                std::env::var("PASSBOOK_MAX_COMMIT_RETRIES").ok(),
                defaults.max_commit_retries,
            ),
            journal_opening_balance: parse_flag(
                std::env::var("PASSBOOK_JOURNAL_OPENING_BALANCE").ok(),
                defaults.journal_opening_balance,
            ),
        }
    }
}

fn parse_retries(raw: Option<String>, default: u32) -> u32 {
    let Some(raw) = raw else {
        return default;
    };
    match raw.trim().parse() {
        Ok(value) => value,
        Err(_) => {
            tracing::warn!(value = %raw, "unparsable PASSBOOK_MAX_COMMIT_RETRIES; using default");
            default
        }
    }
}

fn parse_flag(raw: Option<String>, default: bool) -> bool {
    let Some(raw) = raw else {
        return default;
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => {
            tracing::warn!(value = %raw, "unparsable PASSBOOK_JOURNAL_OPENING_BALANCE; using default");
            default
        }
    }
}
