pub mod database;
pub mod groups;
pub mod manager;
pub mod net;
#[cfg(test)]
pub mod tests;
