//! Entities shared by the employee management services
//!
//! ```rust,ignore
//! use employee_db::entities::user;
//!
//! let everyone = user::Entity::find().all(&db).await?;
//! ```

pub mod entities;
pub mod migrations;

pub use entities::user::{self, Entity as User};
