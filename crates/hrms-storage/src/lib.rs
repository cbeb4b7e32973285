//! # hrms-storage
//!
//! Storage abstraction layer for the HRMS server.
//!
//! This crate defines the traits that all storage backends must implement.
//! It does not contain any implementations - those are provided by separate
//! crates (PostgreSQL lives in `hrms-postgres`).
//!
//! ## Overview
//!
//! Each entity gets its own trait ([`UserStorage`], [`SessionStorage`],
//! [`CompanyStorage`], [`EmployeeStorage`], [`DepartmentStorage`],
//! [`LeaveRequestStorage`]); [`HrmsStorage`] bundles them for backends that
//! implement the whole data model.
//!
//! ## Example
//!
//! ```ignore
//! use hrms_storage::{StorageError, UserStorage};
//! use uuid::Uuid;
//!
//! async fn load_user(
//!     storage: &dyn UserStorage,
//!     id: Uuid,
//! ) -> Result<hrms_core::User, StorageError> {
//!     storage
//!         .get_user(id)
//!         .await?
//!         .ok_or_else(|| StorageError::not_found("User", id))
//! }
//! ```

mod error;
mod traits;

pub use error::{ErrorCategory, StorageError};
pub use traits::{
    CompanyStorage, DepartmentStorage, EmployeeStorage, HrmsStorage, LeaveRequestStorage,
    SessionStorage, UserStorage,
};

/// Type alias for a storage result.
pub type StorageResult<T> = Result<T, StorageError>;

/// Type alias for a boxed full-model storage trait object.
pub type DynStorage = std::sync::Arc<dyn HrmsStorage>;
