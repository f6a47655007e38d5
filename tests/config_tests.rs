//! Integration tests for research.toml loading

use deep_research::research::{NotificationPolicy, ResearchManager};
use deep_research::{ConfigError, ResearchConfig, Stage};
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use tempfile::NamedTempFile;

const MINIMAL: &str = r#"
[providers.local]
type = "ollama"

[models.default]
provider = "local"
model = "llama3.2"

[stages]
planner = "default"
searcher = "default"
writer = "default"
"#;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn repo_config() -> ResearchConfig {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("research.toml");
    ResearchConfig::load(path).unwrap()
}

#[test]
fn test_shipped_config_loads() {
    let config = repo_config();

    assert_eq!(config.stages.model_for(Stage::Notifier), config.stages.writer);
    assert_eq!(config.search.searches_per_plan, 5);
    assert_eq!(
        config.pipeline.notification_policy,
        NotificationPolicy::BestEffort
    );
    assert!(config.email.is_none());
}

#[test]
fn test_shipped_domains() {
    let registry = repo_config().domain_registry();
    assert_eq!(registry.names(), vec!["cruise", "job"]);

    let cruise = registry.require("cruise").unwrap();
    assert_eq!(cruise.title(), "Cruise Finder");
    assert_eq!(cruise.ui.examples.len(), 4);
    let planner = cruise.instructions_for(Stage::Planner).unwrap();
    assert!(planner.starts_with("You are a cruise travel specialist"));
    assert!(!planner.contains('\n'));
    assert!(cruise.instructions_for(Stage::Notifier).is_none());

    let job = registry.require("job").unwrap();
    assert!(job
        .instructions_for(Stage::Writer)
        .unwrap()
        .contains("Job search strategy tips"));
}

#[cfg(feature = "ollama")]
#[test]
fn test_shipped_config_builds_manager() {
    // every stage runs on the local provider, so no credentials are needed
    let config = repo_config();
    let manager = ResearchManager::from_config(&config).unwrap();
    assert_eq!(manager.options(), config.pipeline_options());
}

#[test]
fn test_load_minimal_from_file() {
    let file = write_config(MINIMAL);
    let config = ResearchConfig::load(file.path()).unwrap();

    assert!(config.domains.is_empty());
    assert_eq!(config.search.results_per_search, 5);
    assert_eq!(config.search.max_concurrency, None);
    assert_eq!(config.search.timeout_secs, 60);
    assert!(config.domain_registry().is_empty());
}

#[test]
fn test_missing_file() {
    let result = ResearchConfig::load("/definitely/not/here/research.toml");
    assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
}

#[test]
fn test_invalid_toml() {
    let file = write_config("[stages\nplanner = ");
    assert!(matches!(
        ResearchConfig::load(file.path()),
        Err(ConfigError::ParseError(_))
    ));
}

#[test]
fn test_unknown_stage_model_rejected() {
    let file = write_config(&MINIMAL.replace("writer = \"default\"", "writer = \"huge\""));
    match ResearchConfig::load(file.path()) {
        Err(ConfigError::MissingModel(model, stage)) => {
            assert_eq!(model, "huge");
            assert_eq!(stage, "writer");
        }
        other => panic!("Expected missing model, got {:?}", other),
    }
}

#[test]
fn test_openai_stage_needs_key_only_when_built() {
    let content = format!(
        "{}\n{}",
        MINIMAL.replace("provider = \"local\"", "provider = \"remote\""),
        r#"
[providers.remote]
type = "openai"
api_key_env = "DEEP_RESEARCH_CONFIG_TEST_UNSET_KEY"
"#
    );
    let file = write_config(&content);

    let config = ResearchConfig::load(file.path()).unwrap();
    assert!(matches!(
        config.provider_for(Stage::Planner),
        Err(ConfigError::MissingEnvVar(name)) if name == "DEEP_RESEARCH_CONFIG_TEST_UNSET_KEY"
    ));
    assert!(ResearchManager::from_config(&config).is_err());
}

#[test]
fn test_domain_with_notifier_override_rejected() {
    let content = format!(
        "{}\n{}",
        MINIMAL,
        r#"
[domains.bad.instructions]
notifier = "send it differently"
"#
    );
    let file = write_config(&content);
    assert!(matches!(
        ResearchConfig::load(file.path()),
        Err(ConfigError::ValidationError(_))
    ));
}

#[test]
fn test_required_policy_and_concurrency() {
    let content = format!(
        "{}\n{}",
        MINIMAL,
        r#"
[search]
max_concurrency = 2
timeout_secs = 15

[pipeline]
notification_policy = "required"
"#
    );
    let file = write_config(&content);
    let options = ResearchConfig::load(file.path()).unwrap().pipeline_options();

    assert_eq!(options.notification_policy, NotificationPolicy::Required);
    assert_eq!(options.max_concurrency, Some(2));
    assert_eq!(options.search_timeout, Some(Duration::from_secs(15)));
}
