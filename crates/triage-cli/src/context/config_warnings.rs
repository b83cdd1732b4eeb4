use triage_config::TriageConfig;

/// Emit warnings for likely mistyped env var keys that silently fell back to defaults.
pub fn warn_unconfigured(config: &TriageConfig) {
    for warning in collect_unconfigured_warnings(config, std::env::vars()) {
        tracing::warn!("{warning}");
    }
}

fn collect_unconfigured_warnings<I>(config: &TriageConfig, env: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let env_keys = env.into_iter().map(|(key, _)| key).collect::<Vec<_>>();

    let mut warnings = Vec::new();

    if !config.chat.is_configured() && has_env_prefix(&env_keys, "TRIAGE_CHAT") {
        warnings.push(
            "Chat config appears default while TRIAGE_CHAT* env vars exist. Use double underscores (example: TRIAGE_CHAT__BASE_URL)."
                .to_string(),
        );
    }

    if !config.rca.is_configured() && has_env_prefix(&env_keys, "TRIAGE_RCA") {
        warnings.push(
            "RCA config appears default while TRIAGE_RCA* env vars exist. Use double underscores (example: TRIAGE_RCA__SUBMIT_URL)."
                .to_string(),
        );
    }

    warnings
}

fn has_env_prefix(keys: &[String], prefix: &str) -> bool {
    keys.iter().any(|key| key.starts_with(prefix))
}
