//! Accepting connections and handing them to the dispatcher.

pub mod listener;
