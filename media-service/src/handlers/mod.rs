pub mod media_handlers;

use std::sync::Arc;

use crate::config::MediaConfig;

/// State shared by every media handler.
pub struct MediaState<P: ?Sized> {
    pub config: MediaConfig,
    pub provider: Arc<P>,
}
