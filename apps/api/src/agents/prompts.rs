// Prompt templates for LLM interactions
//
// Prompts are versioned so a response can be traced back to the template that
// produced it.

use std::collections::HashMap;

/// Prompt template structure
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    pub name: String,
    pub version: String,
    pub system: String,
    pub user_template: String,
}

impl PromptTemplate {
    /// Render the user template, replacing every `{{key}}` with its value
    ///
    /// Placeholders without a matching variable are left untouched. The
    /// template is scanned once, so substituted values are never rescanned
    /// for placeholders of their own.
    pub fn render(&self, variables: &HashMap<String, String>) -> String {
        let mut rendered = String::with_capacity(self.user_template.len());
        let mut rest = self.user_template.as_str();

        while let Some(start) = rest.find("{{") {
            rendered.push_str(&rest[..start]);
            let after = &rest[start + 2..];

            let value = after
                .find("}}")
                .and_then(|end| variables.get(&after[..end]).map(|v| (v, end)));
            match value {
                Some((value, end)) => {
                    rendered.push_str(value);
                    rest = &after[end + 2..];
                }
                None => {
                    rendered.push_str("{{");
                    rest = after;
                }
            }
        }

        rendered.push_str(rest);
        rendered
    }

    /// Convenience wrapper around [`render`](Self::render) for literal pairs
    pub fn render_with(&self, pairs: &[(&str, &str)]) -> String {
        let variables = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self.render(&variables)
    }
}

pub mod library {
    use super::PromptTemplate;

    pub fn chat() -> PromptTemplate {
        PromptTemplate {
            name: "chat".to_string(),
            version: "1.0.0".to_string(),
            system: "You are a friendly assistant for a professional photography studio. \
                     Answer questions about sessions, pricing, scheduling and photography \
                     in general. Be concise and warm."
                .to_string(),
            user_template: "{{message}}".to_string(),
        }
    }

    /// Directive the gateway sends to the search agent
    pub fn search_directive() -> PromptTemplate {
        PromptTemplate {
            name: "search_directive".to_string(),
            version: "1.0.0".to_string(),
            system: String::new(),
            user_template: "Search for information about: {{query}}. \
                            Provide a comprehensive summary with key findings."
                .to_string(),
        }
    }

    pub fn search_summary() -> PromptTemplate {
        PromptTemplate {
            name: "search_summary".to_string(),
            version: "1.0.0".to_string(),
            system: "You are a research assistant. Summarise the provided sources \
                     accurately and cite them by number. Do not invent facts that are \
                     not supported by the sources."
                .to_string(),
            user_template: "{{message}}\n\nSources:\n{{sources}}".to_string(),
        }
    }

    pub fn image_generation() -> PromptTemplate {
        PromptTemplate {
            name: "image_generation".to_string(),
            version: "1.0.0".to_string(),
            system: String::new(),
            user_template: "{{prompt}}".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_substitutes_variables() {
        let prompt = library::search_directive();
        let rendered = prompt.render_with(&[("query", "film cameras")]);

        assert_eq!(
            rendered,
            "Search for information about: film cameras. \
             Provide a comprehensive summary with key findings."
        );
    }

    #[test]
    fn render_leaves_unknown_placeholders() {
        let prompt = library::search_summary();
        let rendered = prompt.render_with(&[("message", "hello")]);

        assert!(rendered.starts_with("hello"));
        assert!(rendered.contains("{{sources}}"));
    }

    #[test]
    fn render_replaces_repeated_placeholders() {
        let prompt = PromptTemplate {
            name: "t".to_string(),
            version: "1".to_string(),
            system: String::new(),
            user_template: "{{a}} and {{a}}".to_string(),
        };

        assert_eq!(prompt.render_with(&[("a", "x")]), "x and x");
    }

    #[test]
    fn render_does_not_expand_placeholders_inside_values() {
        let prompt = library::search_summary();

        for _ in 0..32 {
            let rendered = prompt.render_with(&[
                ("message", "about {{sources}}"),
                ("sources", "[1] SRC {{message}}"),
            ]);
            assert_eq!(
                rendered,
                "about {{sources}}\n\nSources:\n[1] SRC {{message}}"
            );
        }
    }

    #[test]
    fn render_handles_unterminated_and_nested_braces() {
        let prompt = PromptTemplate {
            name: "t".to_string(),
            version: "1".to_string(),
            system: String::new(),
            user_template: "{{ {{a}} {{b".to_string(),
        };

        assert_eq!(prompt.render_with(&[("a", "x")]), "{{ x {{b");
    }
}
