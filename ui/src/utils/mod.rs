pub mod colors;
pub mod drop_handler;
pub mod export_sink;
pub mod file_picker;
