pub mod add;
pub mod list;
pub mod serve;
pub mod user;
