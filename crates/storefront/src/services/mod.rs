//! Service layer: auth rules and outbound provider clients.

pub mod auth;
pub mod cloudinary;
pub mod paymongo;

pub use auth::AuthService;
pub use cloudinary::CloudinaryClient;
pub use paymongo::PaymongoClient;
