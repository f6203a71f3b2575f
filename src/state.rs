/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 * - Clone 前提で持つ (内部は Arc)
 */
use std::sync::Arc;

use crate::services::connect::ConnectStrategy;

#[derive(Clone, Debug)]
pub struct AppState {
    pub connect: Arc<ConnectStrategy>,
}

impl AppState {
    pub fn new(connect: Arc<ConnectStrategy>) -> Self {
        Self { connect }
    }
}
