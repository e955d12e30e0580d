pub mod model;
pub mod server;

pub use model::StatusModel;
pub use server::StatusBridge;
