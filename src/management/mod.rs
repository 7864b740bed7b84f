mod auth;
mod gate;

pub use auth::TokenManager;
pub use gate::Gate;
pub use gate::check;
