pub mod ambient;
pub mod api;
pub mod assets;
pub mod compose;
pub mod controller;
pub mod layout;
pub mod media_io;
pub mod preload_plan;
pub mod remote;
pub mod room;
pub mod settings;
pub mod state;
