// Library surface for headless/integration tests and reuse.
pub mod app;
pub mod db;
pub mod metrics;
pub mod runtime;
pub mod scramble;
pub mod session;
pub mod ui;
