mod backend;
mod manager;

pub use backend::SessionBackend;
pub use manager::SessionManager;
