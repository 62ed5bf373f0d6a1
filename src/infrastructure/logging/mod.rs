mod tracing_logger;

pub use tracing_logger::TracingErrorLogger;
