pub mod connect_ctx;

pub use connect_ctx::{ConnectCtx, ConnectCtxExtractor};
