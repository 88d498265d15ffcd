pub mod audit_log;
pub mod config_io;
pub mod lock;
pub mod task_store;
pub mod watcher;
