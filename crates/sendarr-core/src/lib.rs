pub mod dispatch;
pub mod error;
pub mod list_add;
pub mod picker;
pub mod submit;

pub use dispatch::Dispatcher;
pub use error::AddError;
pub use list_add::ListAddResult;
pub use picker::pick_best_by_year;
