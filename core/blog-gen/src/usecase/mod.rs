pub mod completion;
pub mod decode;
pub mod handler;
pub mod publish;
pub mod runtime_loop;
