//! Request and response data transfer objects.

pub mod auth_dto;

pub use auth_dto::{
    LoginRequest, LoginResponse, LogoutRequest, RefreshRequest, RefreshResponse, UserDto,
};
