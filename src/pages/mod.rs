pub mod auth_callback;
pub mod dashboard;
pub mod history;
pub mod landing;
