//! Application services for identity management.

mod directory;

pub use directory::{
    DirectoryError, DirectoryResult, DirectoryService, RegisterUserRequest, UpdateProfileRequest,
};
