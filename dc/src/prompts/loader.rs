//! Prompt Loader
//!
//! Loads the decision template from an override file or falls back to the
//! embedded default.

use std::path::PathBuf;

use eyre::{Result, eyre};
use handlebars::Handlebars;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::embedded;

/// Context for rendering the decision template
#[derive(Debug, Clone, Serialize)]
pub struct PromptContext {
    /// Category label, e.g. "Eat"
    pub category: String,
    /// Pool joined with ", "
    pub options: String,
    /// Mood label, when one is active
    pub mood: Option<String>,
}

impl PromptContext {
    pub fn new(category: impl Into<String>, pool: &[String], mood: Option<String>) -> Self {
        Self {
            category: category.into(),
            options: pool.join(", "),
            mood,
        }
    }
}

/// Loads and renders prompt templates
pub struct PromptLoader {
    /// Handlebars template engine
    hbs: Handlebars<'static>,
    /// User override for the decision template
    override_path: Option<PathBuf>,
}

impl PromptLoader {
    /// Create a loader with an optional override template file
    pub fn new(override_path: Option<PathBuf>) -> Self {
        debug!(?override_path, "PromptLoader::new: called");
        Self {
            hbs: Self::engine(),
            override_path,
        }
    }

    /// Create a loader that only uses embedded prompts
    pub fn embedded_only() -> Self {
        Self {
            hbs: Self::engine(),
            override_path: None,
        }
    }

    fn engine() -> Handlebars<'static> {
        let mut hbs = Handlebars::new();
        // Prompts are plain text; "Soup & bread" must not become "Soup &amp; bread"
        hbs.register_escape_fn(handlebars::no_escape);
        hbs
    }

    /// Load a template by name
    ///
    /// Checks in order:
    /// 1. Configured override file (decision template only)
    /// 2. Embedded fallback
    fn load_template(&self, name: &str) -> Result<String> {
        if name == "decision"
            && let Some(ref path) = self.override_path
        {
            if path.exists() {
                debug!("Loading prompt from override: {:?}", path);
                return std::fs::read_to_string(path)
                    .map_err(|e| eyre!("Failed to read prompt override {}: {}", path.display(), e));
            }
            warn!("Prompt override {} not found, using embedded template", path.display());
        }

        if let Some(content) = embedded::get_embedded(name) {
            debug!("Using embedded prompt: {}", name);
            return Ok(content.to_string());
        }

        Err(eyre!("Prompt template not found: {}", name))
    }

    /// Render a template with the given context
    pub fn render(&self, template_name: &str, context: &PromptContext) -> Result<String> {
        let template = self.load_template(template_name)?;
        info!("Rendering template '{}' for category {}", template_name, context.category);

        self.hbs
            .render_template(&template, context)
            .map_err(|e| eyre!("Failed to render template {}: {}", template_name, e))
    }

    /// Render the decision request prompt
    pub fn decision_prompt(&self, context: &PromptContext) -> Result<String> {
        self.render("decision", context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn pool() -> Vec<String> {
        vec!["Tacos".to_string(), "Soup & bread".to_string()]
    }

    #[test]
    fn test_prompt_context_joins_pool() {
        let ctx = PromptContext::new("Eat", &pool(), None);
        assert_eq!(ctx.options, "Tacos, Soup & bread");
        assert!(ctx.mood.is_none());
    }

    #[test]
    fn test_decision_prompt_without_mood() {
        let loader = PromptLoader::embedded_only();
        let prompt = loader.decision_prompt(&PromptContext::new("Eat", &pool(), None)).unwrap();

        assert!(prompt.contains("Category: Eat"));
        assert!(prompt.contains("Options: Tacos, Soup & bread"));
        assert!(prompt.contains(r#"{"choice": "...", "reasoning": "..."}"#));
        assert!(!prompt.contains("mood/energy"));
    }

    #[test]
    fn test_decision_prompt_with_mood() {
        let loader = PromptLoader::embedded_only();
        let ctx = PromptContext::new("Focus", &pool(), Some("😴 Tired".to_string()));
        let prompt = loader.decision_prompt(&ctx).unwrap();

        assert!(prompt.contains("User's current mood/energy: 😴 Tired"));
    }

    #[test]
    fn test_override_template_is_used() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "Choose for {{{{category}}}} from {{{{options}}}}").unwrap();

        let loader = PromptLoader::new(Some(file.path().to_path_buf()));
        let prompt = loader.decision_prompt(&PromptContext::new("Eat", &pool(), None)).unwrap();
        assert_eq!(prompt, "Choose for Eat from Tacos, Soup & bread");
    }

    #[test]
    fn test_missing_override_falls_back() {
        let loader = PromptLoader::new(Some(PathBuf::from("/nonexistent/decision.hbs")));
        let prompt = loader.decision_prompt(&PromptContext::new("Eat", &pool(), None)).unwrap();
        assert!(prompt.contains("Category: Eat"));
    }

    #[test]
    fn test_broken_override_fails_to_render() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{{{#if category}}}}unterminated").unwrap();

        let loader = PromptLoader::new(Some(file.path().to_path_buf()));
        assert!(loader.decision_prompt(&PromptContext::new("Eat", &pool(), None)).is_err());
    }

    #[test]
    fn test_unknown_template() {
        let loader = PromptLoader::embedded_only();
        assert!(loader.load_template("nonexistent-template").is_err());
    }
}
