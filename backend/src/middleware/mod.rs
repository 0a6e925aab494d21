//! HTTP middleware for the PharmTrack platform

pub mod auth;

pub use auth::{auth_middleware, AuthUser, CurrentUser};
