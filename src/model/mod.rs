pub mod attendance;
pub mod geolocation;
pub mod notification;
pub mod role;
pub mod session;
