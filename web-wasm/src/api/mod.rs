pub mod http;

pub use http::{FetchApi, TimeoutSleeper};
