pub mod cli;
pub mod compare_ui;
pub mod panorama_ui;
pub mod ui;
