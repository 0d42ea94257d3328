//! Callback Adapter - HTTP 回调实现

mod http_result_reporter;

pub use http_result_reporter::{HttpResultReporter, HttpResultReporterConfig};
