//! No ports module: the dispatcher's only collaborators are
//! `hn-registry`'s own port-typed entries and the concrete event bus,
//! neither of which this crate needs to abstract further.

pub mod dispatcher;

pub use dispatcher::IndexingDispatcher;
