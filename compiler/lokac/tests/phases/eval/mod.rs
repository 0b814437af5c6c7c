//! Runtime tests.

mod events;
mod loading;
mod runtime;
