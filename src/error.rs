use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("terminal i/o failed: {0}")]
    Io(#[from] io::Error),

    #[error("event stream closed unexpectedly")]
    EventStreamClosed,
}
