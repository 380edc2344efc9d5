use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::{
    config::RunConfig,
    services::llm::{
        parse_structured, ChatModel, ChatRequest, InferenceClientError, Message, SchemaSpec,
    },
    NotificationHandler,
};

/// Sends `prompt` as a single user message and parses the reply into `O`.
///
/// The JSON Schema of `O` is attached to the request in the model's provider
/// format. Prompt request/result notifications go to `run`'s channel. Any
/// failure of the model call is returned as is; a reply that does not conform
/// to the schema is `InferenceClientError::StructuredOutput`.
#[instrument(level = "debug", skip_all, fields(model = %model.model(), run_name = %run.run_name))]
pub async fn invoke_structured<O>(
    model: &dyn ChatModel,
    prompt: String,
    run: &RunConfig,
) -> Result<O, InferenceClientError>
where
    O: DeserializeOwned + JsonSchema,
{
    let spec = SchemaSpec::from_type::<O>()?.strict(true);
    let mut request = ChatRequest::new(model.model(), vec![Message::user(prompt)]);
    request.base.format = Some(model.structured_format(&spec));

    run.notify_prompt_request(request.clone()).await;

    let response = match model.chat(request).await {
        Ok(resp) => resp,
        Err(e) => {
            warn!(error = %e, "model call failed");
            run.notify_prompt_error(e.to_string()).await;
            return Err(e);
        }
    };

    run.notify_prompt_success(response.clone()).await;
    debug!(done_reason = ?response.done_reason, "model replied");

    let Some(content) = response.message.content else {
        return Err(InferenceClientError::StructuredOutput(
            "Model did not produce content in response".into(),
        ));
    };
    parse_structured(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::llm::{MockChatModel, Role};
    use crate::NotificationContent;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, JsonSchema, PartialEq)]
    struct Answer {
        value: u32,
    }

    #[tokio::test]
    async fn attaches_schema_and_parses_reply() {
        let model = MockChatModel::with_content("{\"value\": 42}");
        let out: Answer = invoke_structured(&model, "question".into(), &RunConfig::default())
            .await
            .unwrap();
        assert_eq!(out, Answer { value: 42 });

        let req = &model.requests()[0];
        assert_eq!(req.messages.len(), 1);
        assert_eq!(req.messages[0].role, Role::User);
        assert_eq!(req.messages[0].text(), "question");
        let format = req.base.format.as_ref().unwrap();
        assert!(format["properties"].get("value").is_some());
    }

    #[tokio::test]
    async fn reports_request_and_error_notifications() {
        let model = MockChatModel::with_error(InferenceClientError::Api("down".into()));
        let mut run = RunConfig::default();
        let mut rx = run.new_notification_channel();

        let err = invoke_structured::<Answer>(&model, "q".into(), &run)
            .await
            .unwrap_err();
        assert_eq!(err, InferenceClientError::Api("down".into()));

        assert!(matches!(
            rx.recv().await.unwrap().content,
            NotificationContent::PromptRequest(_)
        ));
        assert_eq!(
            rx.recv().await.unwrap().content,
            NotificationContent::PromptErrorResult("API Error: down".into())
        );
    }

    #[tokio::test]
    async fn non_conforming_reply_is_a_structured_output_error() {
        let model = MockChatModel::with_content("{\"value\": \"many\"}");
        let err = invoke_structured::<Answer>(&model, "q".into(), &RunConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, InferenceClientError::StructuredOutput(_)));
    }
}
