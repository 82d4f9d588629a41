pub mod dispatcher;
pub mod format;

pub use dispatcher::AlertDispatcher;
