//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::DocveilConfig;
use crate::domain::errors::DocveilError;
use crate::domain::result::Result;
use crate::session::FallbackEncoding;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into DocveilConfig
/// 4. Applies environment variable overrides (DOCVEIL_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns [`DocveilError::Configuration`] if the file is missing or
/// unreadable, a referenced variable is unset, parsing fails, or validation
/// fails.
///
/// # Examples
///
/// ```no_run
/// use docveil::config::loader::load_config;
///
/// let config = load_config("docveil.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<DocveilConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(DocveilError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        DocveilError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;
    let config: DocveilConfig = toml::from_str(&contents)?;

    finish(config)
}

/// Loads configuration, falling back to defaults when the file is absent
///
/// Environment overrides and validation still apply to the defaults.
pub fn load_or_default(path: impl AsRef<Path>) -> Result<DocveilConfig> {
    let path = path.as_ref();
    if path.exists() {
        return load_config(path);
    }

    tracing::debug!(path = %path.display(), "No configuration file, using defaults");
    finish(DocveilConfig::default())
}

fn finish(mut config: DocveilConfig) -> Result<DocveilConfig> {
    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        DocveilError::Configuration(format!("Configuration validation failed: {e:#}"))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are copied untouched.
///
/// # Errors
///
/// Returns an error listing every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| DocveilError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut lines = Vec::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            lines.push(line.to_string());
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        lines.push(processed_line);
    }

    if !missing_vars.is_empty() {
        return Err(DocveilError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(lines.join("\n"))
}

/// Applies environment variable overrides using DOCVEIL_* prefix
///
/// Variables follow the pattern DOCVEIL_<SECTION>_<KEY>, for example
/// DOCVEIL_REDACTION_DEFAULT_LEVEL or DOCVEIL_DOCUMENT_FALLBACK_ENCODING.
fn apply_env_overrides(config: &mut DocveilConfig) -> Result<()> {
    let invalid = |e: anyhow::Error| DocveilError::Configuration(format!("{e:#}"));

    if let Ok(val) = std::env::var("DOCVEIL_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    config.redaction.apply_env_overrides().map_err(invalid)?;
    config.detector.apply_env_overrides().map_err(invalid)?;
    config.audit.apply_env_overrides().map_err(invalid)?;

    if let Ok(val) = std::env::var("DOCVEIL_DOCUMENT_FALLBACK_ENCODING") {
        config.document.fallback_encoding = match val.to_lowercase().as_str() {
            "latin1" => FallbackEncoding::Latin1,
            "none" => FallbackEncoding::None,
            _ => {
                return Err(DocveilError::Configuration(format!(
                    "Invalid DOCVEIL_DOCUMENT_FALLBACK_ENCODING: {val}"
                )))
            }
        };
    }
    if let Ok(val) = std::env::var("DOCVEIL_DOCUMENT_MAX_UPLOAD_BYTES") {
        config.document.max_upload_bytes = val.parse().map_err(|_| {
            DocveilError::Configuration(format!("Invalid DOCVEIL_DOCUMENT_MAX_UPLOAD_BYTES: {val}"))
        })?;
    }

    if let Ok(val) = std::env::var("DOCVEIL_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("DOCVEIL_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Ok(val) = std::env::var("DOCVEIL_LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::NamedTempFile;

    // Tests below mutate process environment
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn write_config(content: &str) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(content.as_bytes()).unwrap();
        temp_file.flush().unwrap();
        temp_file
    }

    #[test]
    fn test_substitute_env_vars() {
        let _guard = ENV_MUTEX.lock().unwrap();
        std::env::set_var("DOCVEIL_TEST_MARKER", "[HIDDEN]");
        let input = "marker = \"${DOCVEIL_TEST_MARKER}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "marker = \"[HIDDEN]\"");
        std::env::remove_var("DOCVEIL_TEST_MARKER");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        let _guard = ENV_MUTEX.lock().unwrap();
        std::env::remove_var("DOCVEIL_TEST_MISSING");
        let input = "marker = \"${DOCVEIL_TEST_MISSING}\"";
        let err = substitute_env_vars(input).unwrap_err();
        assert!(err.to_string().contains("DOCVEIL_TEST_MISSING"));
    }

    #[test]
    fn test_substitute_env_vars_skips_comments() {
        let _guard = ENV_MUTEX.lock().unwrap();
        std::env::remove_var("DOCVEIL_TEST_COMMENTED");
        let input = "# marker = \"${DOCVEIL_TEST_COMMENTED}\"\nlog_level = \"info\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, input);
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent-docveil.toml");
        assert!(matches!(result, Err(DocveilError::Configuration(_))));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let config = load_or_default("nonexistent-docveil.toml").unwrap();
        assert_eq!(config.redaction.default_level, 3);
    }

    #[test]
    fn test_load_config_valid() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let temp_file = write_config(
            r#"
[application]
log_level = "warn"

[redaction]
default_level = 4
reconciliation = "primary_only"

[document]
fallback_encoding = "none"
"#,
        );

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.application.log_level, "warn");
        assert_eq!(config.redaction.default_level, 4);
        assert_eq!(config.document.fallback_encoding, FallbackEncoding::None);
    }

    #[test]
    fn test_load_config_invalid_values() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let temp_file = write_config("[redaction]\ndefault_level = 0\n");
        let err = load_config(temp_file.path()).unwrap_err();
        assert!(err.to_string().contains("validation failed"));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_load_config_bad_toml() {
        let temp_file = write_config("[redaction\ndefault_level = 3\n");
        assert!(matches!(
            load_config(temp_file.path()),
            Err(DocveilError::Configuration(_))
        ));
    }
}
