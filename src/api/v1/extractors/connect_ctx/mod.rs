/*!
 * Connect context extractor
 *
 * Responsibility:
 * - 検証済みリクエストのコンテキスト（ConnectCtx）を handler に提供する
 * - HTTP / axum 依存は core に閉じ込め、型定義は types に分離する
 *
 * Public API:
 * - ConnectCtx
 * - ConnectCtxExtractor
 */

mod core;
mod types;

pub use core::ConnectCtxExtractor;
pub use types::ConnectCtx;
