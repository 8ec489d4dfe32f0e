pub mod handlers;
pub mod middleware;
pub mod token;

pub use middleware::{AuthContext, optional_auth_middleware};
pub use token::{Claims, TokenService};
