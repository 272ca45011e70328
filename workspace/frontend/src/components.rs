pub mod dashboard;
pub mod layout;
pub mod predict;
pub mod settings;
pub mod train;
