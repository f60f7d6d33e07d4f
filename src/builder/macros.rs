//! Setter generators shared by the state builders.
//!
//! Each macro expands inside an `impl` block and assumes the builder has
//! fields of the same name as the generated setters.

/// `comment`, `input_path` and `output_path`.
macro_rules! common_setters {
    () => {
        /// Human-readable description, passed through unchanged.
        pub fn comment(mut self, comment: impl Into<String>) -> Self {
            self.comment = Some(comment.into());
            self
        }

        /// Selects the part of the raw input handed to the state.
        pub fn input_path(mut self, path: impl Into<$crate::path::PathSelector>) -> Self {
            self.input_path = Some(path.into());
            self
        }

        /// Selects the part of the state output passed on.
        pub fn output_path(mut self, path: impl Into<$crate::path::PathSelector>) -> Self {
            self.output_path = Some(path.into());
            self
        }
    };
}

/// `result_path` and `transition`.
macro_rules! flow_setters {
    () => {
        /// Where the state result is placed in its input. Must be a
        /// reference path, or [`PathSelector::Discard`](crate::path::PathSelector::Discard).
        pub fn result_path(mut self, path: impl Into<$crate::path::PathSelector>) -> Self {
            self.result_path = Some(path.into());
            self
        }

        /// `next(name)` or `end()`.
        pub fn transition(mut self, transition: $crate::builder::TransitionBuilder) -> Self {
            self.transition = Some(transition);
            self
        }
    };
}

/// `retrier`, `retriers`, `catcher` and `catchers`.
macro_rules! policy_setters {
    () => {
        pub fn retrier(mut self, retrier: $crate::builder::RetrierBuilder) -> Self {
            self.retriers.push(retrier);
            self
        }

        pub fn retriers(
            mut self,
            retriers: impl IntoIterator<Item = $crate::builder::RetrierBuilder>,
        ) -> Self {
            self.retriers.extend(retriers);
            self
        }

        pub fn catcher(mut self, catcher: $crate::builder::CatcherBuilder) -> Self {
            self.catchers.push(catcher);
            self
        }

        pub fn catchers(
            mut self,
            catchers: impl IntoIterator<Item = $crate::builder::CatcherBuilder>,
        ) -> Self {
            self.catchers.extend(catchers);
            self
        }
    };
}

pub(crate) use common_setters;
pub(crate) use flow_setters;
pub(crate) use policy_setters;
