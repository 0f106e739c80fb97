// Adapters layer: concrete implementations for the outside world (file storage, mail, http)

pub mod http;
pub mod mailer;
pub mod storage;
