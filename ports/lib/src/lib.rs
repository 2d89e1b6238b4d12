mod functions;
mod models;

pub use functions::*;
pub use models::*;
