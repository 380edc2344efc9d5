mod configuration;
mod run_config;

pub use self::{
    configuration::{ConfigError, Configuration, DEFAULT_FAST_LLM_MODEL, DEFAULT_MODEL},
    run_config::{RunConfig, DEFAULT_RUN_NAME},
};
