pub mod bridge;
pub mod model;
