//! Property-test run profile read from the environment.
//!
//! CI raises case counts for nightly jobs and can switch on forking; local
//! runs fall back to each suite's defaults.

use std::env;

/// Environment variable overriding the number of proptest cases.
pub const CASES_ENV_KEY: &str = "GENOCLUST_PBT_CASES";
/// Environment variable toggling forked proptest execution.
pub const FORK_ENV_KEY: &str = "GENOCLUST_PBT_FORK";

/// Case count and fork mode for one property suite.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProptestRunProfile {
    cases: u32,
    fork: bool,
}

impl ProptestRunProfile {
    /// Loads the profile from the process environment.
    ///
    /// Invalid overrides are logged and replaced by the defaults.
    ///
    /// # Examples
    /// ```
    /// use genoclust_test_support::ci::property_test_profile::ProptestRunProfile;
    ///
    /// let profile = ProptestRunProfile::load(64, false);
    /// assert!(profile.cases() > 0);
    /// ```
    #[must_use]
    pub fn load(default_cases: u32, default_fork: bool) -> Self {
        Self::from_lookup(default_cases, default_fork, |key| env::var(key).ok())
    }

    /// Builds the profile from an arbitrary variable lookup.
    #[must_use]
    pub fn from_lookup<F>(default_cases: u32, default_fork: bool, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let cases = override_or(CASES_ENV_KEY, default_cases, &lookup, parse_cases);
        let fork = override_or(FORK_ENV_KEY, default_fork, &lookup, parse_flag);
        Self { cases, fork }
    }

    /// Number of cases to run per property.
    #[must_use]
    pub fn cases(&self) -> u32 {
        self.cases
    }

    /// Whether cases run in forked subprocesses.
    #[must_use]
    pub fn fork(&self) -> bool {
        self.fork
    }
}

fn override_or<T, L, P>(key: &'static str, default: T, lookup: &L, parse: P) -> T
where
    L: Fn(&str) -> Option<String>,
    P: Fn(&str) -> Option<T>,
{
    let Some(raw) = lookup(key) else {
        return default;
    };
    parse(&raw).unwrap_or_else(|| {
        tracing::warn!(env = key, raw = %raw, "ignoring invalid property-test override");
        default
    })
}

fn parse_cases(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok().filter(|cases| *cases > 0)
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;

    use rstest::rstest;

    fn profile(vars: &[(&str, &str)]) -> ProptestRunProfile {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect();
        ProptestRunProfile::from_lookup(64, false, |key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_without_overrides() {
        assert_eq!(profile(&[]), ProptestRunProfile { cases: 64, fork: false });
    }

    #[rstest]
    #[case("1", 1)]
    #[case(" 2500 ", 2500)]
    #[case("0", 64)]
    #[case("-5", 64)]
    #[case("many", 64)]
    fn case_overrides_must_be_positive(#[case] raw: &str, #[case] expected: u32) {
        assert_eq!(profile(&[(CASES_ENV_KEY, raw)]).cases(), expected);
    }

    #[rstest]
    #[case("YES", true)]
    #[case("on", true)]
    #[case("0", false)]
    #[case("maybe", false)]
    fn fork_overrides_accept_common_spellings(#[case] raw: &str, #[case] expected: bool) {
        assert_eq!(profile(&[(FORK_ENV_KEY, raw)]).fork(), expected);
    }
}
