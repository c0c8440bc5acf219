/// Core error type for the moderation bot.
///
/// Adapter crates map their specific errors into this type so handlers can
/// turn platform failures into user-facing replies consistently.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    /// The platform rejected the request (unknown member, missing rights, bad id).
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("external error: {0}")]
    External(String),
}

pub type Result<T> = std::result::Result<T, Error>;
