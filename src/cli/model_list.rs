use crate::core::models::MODEL_CATALOG;

/// Catalog rows for `coders models`, with the configured default marked.
pub fn model_list_lines(default_model: &str) -> Vec<String> {
    let mut lines = vec!["Available models:".to_string()];
    for option in MODEL_CATALOG {
        let marker = if option.id == default_model { "*" } else { " " };
        lines.push(format!(
            "{marker} {:<30} {}",
            option.id, option.display_name
        ));
    }

    if !MODEL_CATALOG.iter().any(|option| option.id == default_model) {
        lines.push(format!("* {default_model:<30} (configured default)"));
    }
    lines
}

pub fn list_models(default_model: &str) {
    for line in model_list_lines(default_model) {
        println!("{line}");
    }
}
