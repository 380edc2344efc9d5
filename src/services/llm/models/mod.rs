pub mod base;
pub mod chat;
pub mod errors;
pub mod structured_output;

pub use base::*;
pub use chat::*;
pub use errors::*;
pub use structured_output::*;
