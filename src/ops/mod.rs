pub mod app_state;
pub mod countdown;
pub mod lifecycle;
pub mod selector;
pub mod session;
