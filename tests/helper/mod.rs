#![allow(dead_code)]

pub mod docs;
pub mod http;

pub use docs::*;
pub use http::*;
