pub mod auth;
pub mod docs;
pub mod group;
pub mod model;
pub mod post;
pub mod profile;
