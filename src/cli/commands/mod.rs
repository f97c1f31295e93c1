//! CLI command implementations

pub mod create;
pub mod delete;
pub mod list;
pub mod mount;
pub mod run;
pub mod unmount;

pub use create::execute as create;
pub use delete::execute as delete;
pub use list::execute as list;
pub use mount::execute as mount;
pub use run::execute as run;
pub use unmount::execute as unmount;
