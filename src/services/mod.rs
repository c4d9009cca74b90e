//! Business logic between the UI shell and the company tree. Each
//! function takes [`crate::state::AppState`], mutates the open database
//! through its lock helpers, and leaves persistence to the explicit save
//! flow — editing never touches the disk by itself.

pub mod entities;
pub mod reports;
pub mod rosters;
pub mod summary;
pub mod weeks;
