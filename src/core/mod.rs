pub mod confirm;
pub mod input;
pub mod slot;
pub mod store;
pub mod task;
