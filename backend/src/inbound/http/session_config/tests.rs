//! Unit tests for session configuration parsing.

use super::*;
use mockable::MockEnv;
use rstest::rstest;
use std::collections::HashMap;
use tempfile::NamedTempFile;

fn key_file(len: usize) -> NamedTempFile {
    let file = NamedTempFile::new().expect("temporary key file");
    std::fs::write(file.path(), vec![b'a'; len]).expect("write key bytes");
    file
}

fn path_str(file: &NamedTempFile) -> String {
    file.path()
        .to_str()
        .expect("temporary path should be valid UTF-8")
        .to_owned()
}

fn mock_env(vars: HashMap<&'static str, String>) -> MockEnv {
    let mut env = MockEnv::new();
    env.expect_string()
        .times(0..)
        .returning(move |key| vars.get(key).cloned());
    env
}

fn production_vars(key_path: String) -> HashMap<&'static str, String> {
    HashMap::from([
        (KEY_FILE_ENV, key_path),
        (SAMESITE_ENV, "Strict".to_owned()),
    ])
}

fn expect_error(
    result: Result<SessionSettings, SessionConfigError>,
    label: &str,
) -> SessionConfigError {
    match result {
        Ok(_) => panic!("{label}"),
        Err(error) => error,
    }
}

#[rstest]
fn production_missing_key_file_is_rejected() {
    let env = mock_env(HashMap::from([(
        KEY_FILE_ENV,
        "/nonexistent/roomdesk/session_key".to_owned(),
    )]));
    let err = expect_error(
        session_settings_from_env(&env, SessionMode::Production),
        "expected missing key file to fail",
    );
    assert!(matches!(err, SessionConfigError::KeyRead { .. }));
}

#[rstest]
fn production_short_key_is_rejected() {
    let file = key_file(32);
    let env = mock_env(production_vars(path_str(&file)));
    let err = expect_error(
        session_settings_from_env(&env, SessionMode::Production),
        "expected short key to fail",
    );
    assert!(matches!(
        err,
        SessionConfigError::KeyTooShort {
            length: 32,
            min_len: SESSION_KEY_MIN_LEN,
            ..
        }
    ));
}

#[rstest]
#[case("sideways")]
#[case("")]
fn production_invalid_same_site_is_rejected(#[case] value: &str) {
    let file = key_file(SESSION_KEY_MIN_LEN);
    let mut vars = production_vars(path_str(&file));
    vars.insert(SAMESITE_ENV, value.to_owned());
    let env = mock_env(vars);
    let err = expect_error(
        session_settings_from_env(&env, SessionMode::Production),
        "expected invalid SameSite to fail",
    );
    assert!(matches!(
        err,
        SessionConfigError::InvalidEnv {
            name: SAMESITE_ENV,
            ..
        }
    ));
}

#[rstest]
fn production_valid_settings_succeed() {
    let file = key_file(SESSION_KEY_MIN_LEN);
    let env = mock_env(production_vars(path_str(&file)));
    let settings = session_settings_from_env(&env, SessionMode::Production)
        .expect("expected valid settings");
    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Strict);
}

#[rstest]
fn production_key_is_derived_from_file() {
    let file = key_file(SESSION_KEY_MIN_LEN);
    let env = mock_env(production_vars(path_str(&file)));
    let first = session_settings_from_env(&env, SessionMode::Production).expect("settings");
    let second = session_settings_from_env(&env, SessionMode::Production).expect("settings");
    assert_eq!(
        fingerprint::key_fingerprint(&first.key),
        fingerprint::key_fingerprint(&second.key)
    );
}

#[rstest]
fn development_defaults_allow_ephemeral_key() {
    let env = mock_env(HashMap::from([(
        KEY_FILE_ENV,
        "/nonexistent/roomdesk/session_key".to_owned(),
    )]));
    let settings = session_settings_from_env(&env, SessionMode::Development)
        .expect("development defaults should succeed");
    assert!(!settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Lax);
}

#[rstest]
#[case("unexpected", SameSite::Lax)]
#[case("none", SameSite::None)]
#[case("STRICT", SameSite::Strict)]
fn development_same_site_parsing(#[case] value: &str, #[case] expected: SameSite) {
    let file = key_file(SESSION_KEY_MIN_LEN);
    let env = mock_env(HashMap::from([
        (KEY_FILE_ENV, path_str(&file)),
        (SAMESITE_ENV, value.to_owned()),
    ]));
    let settings = session_settings_from_env(&env, SessionMode::Development)
        .expect("development should fall back to defaults");
    assert_eq!(settings.same_site, expected);
}

#[rstest]
fn development_short_key_falls_back_to_temporary_key() {
    let file = key_file(8);
    let env = mock_env(HashMap::from([(KEY_FILE_ENV, path_str(&file))]));
    assert!(session_settings_from_env(&env, SessionMode::Development).is_ok());
}

#[rstest]
fn process_environment_supplies_the_key_file() {
    let key = key_file(SESSION_KEY_MIN_LEN);
    let _guard = env_lock::lock_env([
        (KEY_FILE_ENV, Some(path_str(&key))),
        (SAMESITE_ENV, Some("Strict".to_owned())),
    ]);

    let settings = session_settings_from_process(SessionMode::Production)
        .expect("key file from the process environment");
    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Strict);
    assert_eq!(
        fingerprint::key_fingerprint(&settings.key),
        fingerprint::key_fingerprint(&Key::derive_from(&[b'a'; SESSION_KEY_MIN_LEN]))
    );
}
