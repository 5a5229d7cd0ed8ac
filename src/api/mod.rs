// API module
//
// HTTP surface of the node: handlers plus the route table

pub mod handlers;
pub mod routes;

// Re-export main components for easier access
pub use routes::configure_routes;
