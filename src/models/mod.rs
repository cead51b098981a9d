pub mod from_row;
pub mod program;
pub mod user;

pub use from_row::FromSqliteRow;
pub use program::{Day, Exercise, ProgramDocument, TargetReps, Week};
pub use user::{BackendUser, LoginCredentials, SignUpForm};
