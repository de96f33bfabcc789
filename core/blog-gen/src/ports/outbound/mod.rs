//! Outbound ポート: アプリが外界（推論・ストレージ・Runtime API）を使うための trait

pub mod inference_endpoint;
pub mod object_store;
pub mod runtime_api;

pub use inference_endpoint::InferenceEndpoint;
pub use object_store::{ObjectStore, BUCKET_ALREADY_EXISTS, BUCKET_ALREADY_OWNED_BY_YOU};
pub use runtime_api::RuntimeApi;
