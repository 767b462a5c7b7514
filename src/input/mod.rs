pub mod handler;
pub mod mouse;

pub use handler::handle_key;
pub use mouse::handle_mouse;
