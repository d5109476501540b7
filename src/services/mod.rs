//! Service layer for commitments-cli
//!
//! Business logic on top of the storage layer: validation, sequence
//! integrity, the records workspace, authentication, user management and
//! activity tracking.

pub mod activity;
pub mod auth;
pub mod password;
pub mod sequence;
pub mod users;
pub mod validation;
pub mod workspace;

pub use activity::{ActivityService, ActivitySink, Dashboard, NoActivity, UserActivityLog};
pub use auth::AuthService;
pub use password::{check_password_strength, generate_password};
pub use users::{CreatedUser, LogNotifier, NewUser, UserService, WelcomeNotifier};
pub use validation::{validate_all, validate_header, validate_record, ValidationError};
pub use workspace::{page, BulkTarget, Page, SequenceReport, Workspace};
