//! Domain types serialized on the wire.

pub mod car;
pub mod make;
pub mod user;

pub use car::Car;
pub use make::Make;
pub use user::User;
