mod broker;
mod store;

pub use broker::CredentialBroker;
pub use store::TokenStore;
