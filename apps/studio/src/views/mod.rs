pub mod settings;
pub mod studio;
pub mod style_viewer;
