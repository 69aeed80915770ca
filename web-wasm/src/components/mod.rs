pub mod file_upload;
pub mod header;
pub mod progress_bar;
pub mod results_table;
pub mod tabs;
pub mod text_match;
