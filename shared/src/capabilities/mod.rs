mod delay;
mod http;
mod kv;
mod navigate;

pub use self::delay::{Delay, DelayOperation};
pub use self::http::{bearer_header, decode_http, post_graphql, HttpError};
pub use self::kv::{clear_token, persist_token, KvError, StorageKey};
pub use self::navigate::{Navigate, NavigationOperation};

pub use crux_core::render::Render;
pub use crux_http::Http;
pub use crux_kv::KeyValue;

use crate::event::Event;

pub type AppHttp = Http<Event>;
pub type AppKv = KeyValue<Event>;

#[derive(Debug, thiserror::Error)]
pub enum CapabilityError {
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    #[error("Storage error: {0}")]
    Kv(#[from] KvError),
}

#[derive(crux_core::macros::Effect)]
pub struct Capabilities {
    pub render: Render<Event>,
    pub http: Http<Event>,
    pub kv: KeyValue<Event>,
    pub delay: Delay<Event>,
    pub navigate: Navigate<Event>,
}
