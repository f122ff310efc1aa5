pub mod auth;
pub mod cart_cookie;
