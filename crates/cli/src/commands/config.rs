use std::env;
use std::fs;
use std::path::Path;

use linkwise_core::config::{resolve_config_path, AppConfig, LoadOptions};
use linkwise_core::errors::ApplicationError;
use toml::Value;

use crate::commands::CommandResult;

pub fn run(options: LoadOptions) -> CommandResult {
    let config_file_path = resolve_config_path(options.config_path.as_deref());
    let config = match AppConfig::load(options) {
        Ok(config) => config,
        Err(error) => {
            let error = ApplicationError::from(error);
            return CommandResult::failure(
                "config",
                error.error_class(),
                format!("config validation failed: {error}"),
                2,
            );
        }
    };

    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let source = |key_path: &str, env_keys: &[&str]| {
        field_source(key_path, env_keys, config_file_doc.as_ref(), config_file_path.as_deref())
    };

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];

    lines.push(render_line(
        "catalog.items_path",
        &display_path(config.catalog.items_path.as_deref()),
        source("catalog.items_path", &["LINKWISE_CATALOG_ITEMS_PATH"]),
    ));
    lines.push(render_line(
        "catalog.relationships_path",
        &display_path(config.catalog.relationships_path.as_deref()),
        source("catalog.relationships_path", &["LINKWISE_CATALOG_RELATIONSHIPS_PATH"]),
    ));
    lines.push(render_line(
        "catalog.editorial_path",
        &display_path(config.catalog.editorial_path.as_deref()),
        source("catalog.editorial_path", &["LINKWISE_CATALOG_EDITORIAL_PATH"]),
    ));

    let linking = &config.linking;
    lines.push(render_line(
        "linking.related_tools_per_page",
        &linking.related_tools_per_page.to_string(),
        source("linking.related_tools_per_page", &["LINKWISE_RELATED_TOOLS_PER_PAGE"]),
    ));
    lines.push(render_line(
        "linking.min_links_per_tool",
        &linking.min_links_per_tool.to_string(),
        source("linking.min_links_per_tool", &["LINKWISE_MIN_LINKS_PER_TOOL"]),
    ));
    lines.push(render_line(
        "linking.max_links_per_tool",
        &linking.max_links_per_tool.to_string(),
        source("linking.max_links_per_tool", &["LINKWISE_MAX_LINKS_PER_TOOL"]),
    ));
    lines.push(render_line(
        "linking.variance_warning",
        &linking.variance_warning.to_string(),
        source("linking.variance_warning", &[]),
    ));
    lines.push(render_line(
        "linking.tie_break",
        linking.tie_break.as_str(),
        source("linking.tie_break", &["LINKWISE_TIE_BREAK"]),
    ));

    for (name, weight) in linking.weights.named() {
        let key_path = format!("linking.weights.{name}");
        lines.push(render_line(&key_path, &weight.to_string(), source(&key_path, &[])));
    }

    let thresholds = [
        ("orphan", linking.thresholds.orphan),
        ("underlinked", linking.thresholds.underlinked),
        ("well_linked", linking.thresholds.well_linked),
        ("overlinked", linking.thresholds.overlinked),
    ];
    for (name, value) in thresholds {
        let key_path = format!("linking.thresholds.{name}");
        lines.push(render_line(&key_path, &value.to_string(), source(&key_path, &[])));
    }

    lines.push(render_line(
        "logging.level",
        &config.logging.level,
        source("logging.level", &["LINKWISE_LOGGING_LEVEL", "LINKWISE_LOG_LEVEL"]),
    ));
    lines.push(render_line(
        "logging.format",
        &format!("{:?}", config.logging.format),
        source("logging.format", &["LINKWISE_LOGGING_FORMAT", "LINKWISE_LOG_FORMAT"]),
    ));

    CommandResult::rendered(0, lines.join("\n"))
}

fn display_path(path: Option<&Path>) -> String {
    path.map(|path| path.display().to_string()).unwrap_or_else(|| "<built-in demo>".to_string())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}
