pub mod app;
pub mod graphics;
pub mod media;
pub mod pixels_renderer;
pub mod preload;
pub mod regression;
pub mod surface;
pub mod ui;
pub mod view_tree;
