//! HTTP transport shared by every client operation.

mod http;

pub use http::{HttpTransport, AGGREGATOR_HEADER, API_KEY_HEADER, REQUEST_ID_HEADER};
