//! blog-gen 固有のドメイン型（型と不変条件）

pub mod command;
pub mod generation;
pub mod handler_error;
pub mod invocation;
pub mod object_key;
pub mod prompt;
pub mod response;
pub mod settings;
pub mod topic;

pub use command::BlogCommand;
pub use generation::Generation;
pub use handler_error::HandlerError;
pub use invocation::{Invocation, RuntimeError};
pub use object_key::{blog_object_key, KeySuffix};
pub use prompt::{CompletionParams, NativeRequest, Prompt};
pub use response::InvocationResponse;
pub use settings::{InferenceKind, Settings, SettingsOverrides};
pub use topic::BlogTopic;
