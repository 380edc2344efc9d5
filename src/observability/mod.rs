pub mod langfuse;
mod logging;

pub use langfuse::LangfuseOptions;
pub use logging::{init_default_tracing, DEFAULT_DIRECTIVES};
