//! CLI command implementations.
//!
//! | Module   | Commands handled |
//! |----------|------------------|
//! | `sync`   | `Sync` (default) |
//! | `delete` | `Delete`         |
//! | `list`   | `List`           |

pub mod delete;
pub mod list;
pub mod sync;

pub use delete::cmd_delete;
pub use list::cmd_list;
pub use sync::cmd_sync;
