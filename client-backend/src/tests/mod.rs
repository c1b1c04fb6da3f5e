mod credentials;
pub mod utils;
