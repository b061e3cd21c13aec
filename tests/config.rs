use std::collections::HashMap;

use fantasmas::{
    config::{Settings, LOG_FILTER_VAR, MUTE_VAR, SEED_VAR},
    error::ConfigError,
};
use pretty_assertions::assert_eq;
use speculoos::prelude::*;

fn load(vars: &[(&str, &str)]) -> Result<Settings, ConfigError> {
    let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    Settings::from_lookup(|var| vars.get(var).cloned())
}

#[test]
fn test_defaults_when_nothing_is_set() {
    assert_eq!(load(&[]), Ok(Settings::default()));
    let settings = Settings::default();
    assert_that(&settings.seed).is_none();
    assert_that(&settings.muted).is_false();
    assert_eq!(settings.log_filter, "info");
}

#[test]
fn test_reads_every_variable() {
    let settings = load(&[(SEED_VAR, "1234"), (MUTE_VAR, "yes"), (LOG_FILTER_VAR, "fantasmas=debug")]);

    assert_eq!(
        settings,
        Ok(Settings {
            seed: Some(1234),
            muted: true,
            log_filter: "fantasmas=debug".to_string(),
        })
    );
}

#[test]
fn test_flags_are_case_insensitive() {
    for value in ["1", "true", "TRUE", "Yes", "on"] {
        assert_that(&load(&[(MUTE_VAR, value)]).map(|s| s.muted)).is_equal_to(Ok(true));
    }
    for value in ["0", "false", "No", "OFF"] {
        assert_that(&load(&[(MUTE_VAR, value)]).map(|s| s.muted)).is_equal_to(Ok(false));
    }
}

#[test]
fn test_blank_values_are_unset() {
    let settings = load(&[(SEED_VAR, "  "), (MUTE_VAR, ""), (LOG_FILTER_VAR, " ")]);
    assert_eq!(settings, Ok(Settings::default()));
}

#[test]
fn test_values_are_trimmed() {
    let settings = load(&[(SEED_VAR, " 42\n")]);
    assert_eq!(settings.map(|s| s.seed), Ok(Some(42)));
}

#[test]
fn test_bad_seed_is_an_error() {
    assert_eq!(
        load(&[(SEED_VAR, "-3")]),
        Err(ConfigError::InvalidSeed {
            var: SEED_VAR,
            value: "-3".to_string(),
        })
    );
}

#[test]
fn test_bad_flag_is_an_error() {
    let result = load(&[(MUTE_VAR, "loud")]);
    assert_eq!(
        result,
        Err(ConfigError::InvalidFlag {
            var: MUTE_VAR,
            value: "loud".to_string(),
        })
    );
    let message = result.err().map(|e| e.to_string()).unwrap_or_default();
    assert_that(&message.as_str()).contains("FANTASMAS_MUTE");
}
