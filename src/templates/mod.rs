mod template;

pub use self::template::Template;

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_template_compile() {
        let template = Template::simple(
            "Current datetime is: {{datetime}}. User input: {{user_input}}.",
        );

        let mut data = HashMap::new();
        data.insert("datetime".to_string(), "2023-10-01T12:00:00".to_string());
        data.insert("user_input".to_string(), "Hello, world!".to_string());

        let compiled_template = template.compile(&data);
        assert_eq!(
            compiled_template,
            "Current datetime is: 2023-10-01T12:00:00. User input: Hello, world!."
        );
    }

    #[test]
    fn test_template_compile_leaves_unknown_placeholders() {
        let template = Template::simple("Topic: {{topic}}, again {{topic}}. {{other}}");
        let mut data = HashMap::new();
        data.insert("topic".to_string(), "rust".to_string());
        assert_eq!(template.compile(&data), "Topic: rust, again rust. {{other}}");
    }

    #[test]
    fn test_template_variables() {
        let template = Template::simple("{{a}} {{b}} {{a}} {{}} {{unclosed");
        assert_eq!(template.variables(), vec!["a".to_string(), "b".to_string()]);
        assert!(Template::simple("plain").variables().is_empty());
    }
}
