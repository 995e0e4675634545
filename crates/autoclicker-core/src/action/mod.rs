#[allow(clippy::module_inception)]
mod action;
mod sequence;

pub use {
    action::{Action, ScrollDirection},
    sequence::ActionSequence,
};
