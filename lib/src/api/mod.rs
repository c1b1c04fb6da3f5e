pub mod credentials;
pub mod proto;
pub mod server;
