//! Presentation state of every screen.
//!
//! Views keep their own loading and error flags and talk to the API clients
//! directly. They know nothing about the terminal: the UI reads their state
//! to draw and feeds them input.

use std::time::Duration;

mod dashboard;
mod forgot_password;
mod login;
mod register;
mod sandwich_list;
mod toast;
#[cfg(test)]
mod tests;

pub use dashboard::Dashboard;
pub use forgot_password::{ForgotPassword, RESET_DELAY};
pub use login::{Login, LoginField};
pub use register::{REGISTER_REDIRECT_DELAY, Register, RegisterField, Strength};
pub use sandwich_list::SandwichList;
pub use toast::{DEFAULT_DURATION, Toast, ToastKind};

/// Screens the user can navigate to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Sandwiches,
    Dashboard,
    Builder,
    Edit(i64),
    Login,
    Register,
    ForgotPassword,
}

/// A navigation that happens after a delay, such as the return to the list
/// once a sandwich is saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Redirect {
    pub to: Route,
    pub after: Duration,
}

/// Text entry shared by the forms: one focused field receives the typing.
pub trait FormInput {
    /// The field receiving input.
    fn focused_mut(&mut self) -> &mut String;

    /// Moves the focus to the next field, wrapping around.
    fn focus_next(&mut self);

    fn push_char(&mut self, c: char) {
        self.focused_mut().push(c);
    }

    fn pop_char(&mut self) {
        self.focused_mut().pop();
    }
}
