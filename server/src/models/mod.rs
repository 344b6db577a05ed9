pub mod club;
pub mod event;
pub mod user;

pub use club::Club;
pub use event::{CreateEventRequest, Event};
pub use user::User;
