pub mod client;
pub mod client_config;
pub mod invocation;
pub mod loader;
pub mod mock;
pub mod models;
pub mod providers;

pub use client::{ChatModel, InferenceClient, LoadedModel, Provider};
pub use client_config::{ClientBuilder, ClientConfig};
pub use invocation::invoke_structured;
pub use loader::{load_chat_model, ModelIdentifier, ModelLoader, ProviderModelLoader};
pub use mock::{MockChatModel, MockModelLoader};
pub use models::*;
