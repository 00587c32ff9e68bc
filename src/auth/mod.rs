// Authentication and authorization

pub mod errors;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;
pub mod policy;
pub mod service;

pub use errors::*;
pub use jwt::*;
pub use middleware::*;
pub use models::*;
pub use password::*;
pub use policy::*;
pub use service::*;
