//! Outbound ポートの実装

pub mod bedrock;
pub mod echo_inference;
pub mod lambda_runtime;
pub mod s3;
pub mod stubs;

pub use bedrock::BedrockRuntime;
pub use echo_inference::EchoInference;
pub use lambda_runtime::{LambdaRuntimeClient, RUNTIME_API_VAR};
pub use s3::S3Store;
