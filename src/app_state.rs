use crate::config::Config;
use crate::store::BoardService;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub board: Arc<BoardService>,
    pub config: Config,
}
