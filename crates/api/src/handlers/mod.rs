pub mod protocols;
pub mod scopes;
