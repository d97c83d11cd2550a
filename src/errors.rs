use thiserror::Error as ThisError;

#[derive(ThisError, Debug, PartialEq, Eq, Clone)]
pub enum Error {
    #[error("invalid URL escape {0:?}")]
    InvalidEscape(String),
    #[error("invalid character {0:?} in host name")]
    InvalidHost(String),
    #[error("missing protocol scheme")]
    MissingProtocolScheme,
    #[error("invalid control character in URL")]
    InvalidControlCharacter,
    #[error("invalid port {0:?} after host")]
    InvalidPort(String),
    #[error("invalid userinfo")]
    InvalidUserInfo,
    #[error("first path segment in URL cannot contain colon")]
    FirstPathSegmentColon,
}
