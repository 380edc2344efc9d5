//! Fixed prompts used by the graph nodes.

use crate::templates::Template;

/// Prompt asking for subjects related to `{{topic}}`.
pub const RELATED_TOPICS_PROMPT: &str = "\
You are assisting a researcher who wants background on a subject raised in a conversation.
Identify closely related subjects worth reading about: neighbouring concepts, important \
sub-areas and subjects that are often compared with this one.

List as many relevant subjects as you can, most relevant first. Keep each entry short, \
a few words naming the subject.

Topic of interest: {{topic}}";

/// Name of the variable [`RELATED_TOPICS_PROMPT`] is rendered with.
pub const TOPIC_VARIABLE: &str = "topic";

pub fn related_topics_prompt() -> Template {
    Template::simple(RELATED_TOPICS_PROMPT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn related_topics_prompt_has_only_the_topic_variable() {
        assert_eq!(
            related_topics_prompt().variables(),
            vec![TOPIC_VARIABLE.to_string()]
        );
    }
}
