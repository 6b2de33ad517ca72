mod api;
mod cors;
mod response;

pub use api::*;
