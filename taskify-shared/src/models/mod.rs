/// Database models
///
/// Typed representations of the Taskify tables, each wired into the
/// generic repository through the `Entity`/`Insert`/`Update` traits.
///
/// - `user`: identity principal
/// - `priority`: fixed reference lookup
/// - `category`: user-owned or default label
/// - `todo`: task rows and the todo/category join table

pub mod category;
pub mod priority;
pub mod todo;
pub mod user;
