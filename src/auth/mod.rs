pub mod authorizor;
mod collection;
mod session;
mod user;

pub use collection::Collection;
pub use session::Session;
pub use user::User;
