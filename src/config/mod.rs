mod types;

pub use types::*;

use crate::Result;
use regex::{Captures, Regex};
use std::{env, path::Path, sync::OnceLock};
use tracing::debug;

pub async fn load() -> Result<Config> {
    let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.yaml".to_string());
    load_from_path(&config_path).await
}

pub async fn load_from_path(config_path: impl AsRef<Path>) -> Result<Config> {
    let config_path = config_path.as_ref();
    debug!("Loading configuration from: {}", config_path.display());

    let config_str = tokio::fs::read_to_string(config_path).await?;
    from_yaml_str(&config_str)
}

/// Parses configuration YAML after expanding `${VAR}` placeholders from the process environment.
pub fn from_yaml_str(config_str: &str) -> Result<Config> {
    let resolved = substitute_env_with(config_str, |name| env::var(name).ok());
    let config: Config = serde_yaml::from_str(&resolved)?;
    Ok(config)
}

/// Replaces every `${NAME}` with `lookup(NAME)`; unknown names become empty strings.
pub fn substitute_env_with<F>(input: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    let placeholder = PLACEHOLDER
        .get_or_init(|| Regex::new(r"\$\{(.*?)\}").expect("placeholder pattern is valid"));

    placeholder
        .replace_all(input, |caps: &Captures| {
            let name = caps[1].trim();
            lookup(name).unwrap_or_default()
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn substitutes_known_and_blanks_unknown_placeholders() {
        let input = "token: ${CHUTES_API_TOKEN}\nother: ${MISSING}\n";
        let out = substitute_env_with(input, lookup_from(&[("CHUTES_API_TOKEN", "cpk_123")]));
        assert_eq!(out, "token: cpk_123\nother: \n");
    }

    #[test]
    fn leaves_text_without_placeholders_untouched() {
        let input = "price: $5 {not a placeholder}";
        assert_eq!(substitute_env_with(input, |_| None), input);
    }

    #[test]
    fn minimal_config_gets_defaults() {
        let config: Config = serde_yaml::from_str("chutes: {}\n").unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.server.logs.level, "info");
        assert!(!config.server.logs.file_enabled);
        assert_eq!(config.server.logs.dir, "logs");
        assert_eq!(config.chutes.timeout_secs, 600);
        assert_eq!(config.chutes.models.llm, "deepseek-ai/DeepSeek-R1-0528");
        assert!(!config.chutes.has_token());
        assert!(config.storage.output_dir().is_none());
        for kind in EndpointKind::ALL {
            assert!(config.chutes.endpoints.get(kind).is_none());
        }
    }

    #[test]
    fn blank_endpoint_after_substitution_counts_as_unconfigured() {
        let yaml = substitute_env_with(
            "chutes:\n  endpoints:\n    llm: \"${LLM_URL}\"\n    text_to_image: https://image.chutes.ai/generate\n",
            |_| None,
        );
        let config: Config = serde_yaml::from_str(&yaml).unwrap();
        assert!(config.chutes.endpoints.get(EndpointKind::Llm).is_none());
        assert_eq!(
            config.chutes.endpoints.get(EndpointKind::TextToImage),
            Some("https://image.chutes.ai/generate")
        );
    }

    #[test]
    fn vision_model_falls_back_to_llm_model() {
        let mut models = ModelsConfig::default();
        assert_eq!(models.vision_llm(), "deepseek-ai/DeepSeek-R1-0528");
        models.vision_llm = Some("Qwen/Qwen2.5-VL-32B-Instruct".to_string());
        assert_eq!(models.vision_llm(), "Qwen/Qwen2.5-VL-32B-Instruct");
    }
}
