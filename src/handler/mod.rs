pub mod article;
pub mod auth;
pub mod feed;
pub mod friend;
pub mod health;
