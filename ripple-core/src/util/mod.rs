//! Reactive-state utilities and small helpers.

pub mod math;
mod signals;

pub use signals::{
    array_length, debounce, filter_array, persistent_signal, Counter, Toggle,
    DEFAULT_DEBOUNCE_DELAY,
};
