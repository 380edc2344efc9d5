use std::error::Error;

use topic_expander::{
    init_default_tracing,
    observability::{langfuse, LangfuseOptions},
    Configuration, ConversationState, Message, NotificationContent, RunConfig, TopicExpander,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();

    // Langfuse export when keys are present, console only otherwise.
    let public_key = std::env::var("LANGFUSE_PUBLIC_KEY").ok();
    let secret_key = std::env::var("LANGFUSE_SECRET_KEY").ok();
    let host = std::env::var("LANGFUSE_HOST").ok();
    let provider = match (&public_key, &secret_key) {
        (Some(pk), Some(sk)) => Some(
            langfuse::init(LangfuseOptions {
                public_key: Some(pk.as_str()),
                secret_key: Some(sk.as_str()),
                host: host.as_deref(),
            })
            .map_err(|e| e as Box<dyn Error>)?,
        ),
        _ => {
            init_default_tracing();
            None
        }
    };

    let question = std::env::args()
        .skip(1)
        .collect::<Vec<_>>()
        .join(" ");
    let question = if question.is_empty() {
        "How do Rust async runtimes schedule tasks?".to_string()
    } else {
        question
    };

    let mut config = RunConfig::new(Configuration::resolve(None)?).with_tag("demo");
    let mut notifications = config.new_notification_channel();
    tokio::spawn(async move {
        while let Some(n) = notifications.recv().await {
            if let NotificationContent::PromptRequest(req) = &n.content {
                println!("-> [{}] prompting {}", n.node, req.base.model);
            }
        }
    });

    let state = ConversationState::new(vec![
        Message::system("You are a research assistant."),
        Message::user(question),
    ]);

    let update = TopicExpander::from_env()
        .expand_topics(&state, &config)
        .await?;

    println!("\nRelated topics:");
    for (i, topic) in update.related_topics.topics.iter().enumerate() {
        println!("{:>3}. {topic}", i + 1);
    }

    if let Some(provider) = provider {
        provider.shutdown()?;
    }
    Ok(())
}
