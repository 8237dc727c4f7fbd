//! Turns view state into terminal [`Screen`]s.

use super::data::BuilderField;
use crate::{
    api::{OptionKind, Sandwich},
    app::{
        builder::{BuilderForm, Mode},
        views::{Dashboard, ForgotPassword, Login, LoginField, Register, RegisterField, SandwichList, Toast, ToastKind},
    },
    terminal::{Banner, Item, Screen, Section, Tone},
};

const LIST_HINTS: &str =
    "↑↓ move  enter edit  n new  d delete  r reload  m mine  l login  g register  f forgot password  o logout  q quit";
const FORM_HINTS: &str = "tab next field  enter submit  esc back";
const STEP_HINTS: &str =
    "←→ step  ↑↓ move  space toggle  n none  t toasted  r retry  R retry all  enter next  s save  esc cancel";
const NAME_HINTS: &str = "tab next field  space toggles toasted  ←→ step  enter save  esc cancel";

/// The banner for a visible toast.
pub fn toast(toast: &Toast) -> Option<Banner> {
    let tone = match toast.kind() {
        ToastKind::Success => Tone::Success,
        ToastKind::Error => Tone::Error,
    };
    toast.message().map(|message| Banner::new(tone, message))
}

fn notice(tone: Tone, text: impl Into<crate::ArcStr>) -> Section {
    Section::Notice(Banner::new(tone, text))
}

fn field(label: &str, value: &str, focused: bool, masked: bool) -> Section {
    Section::Field {
        label: label.into(),
        value: value.into(),
        focused,
        masked,
    }
}

fn sandwich_item(sandwich: &Sandwich, owned: bool) -> Item {
    let mut notes = Vec::new();
    if let Some(price) = sandwich.price {
        notes.push(format!("${price:.2}"));
    }
    if sandwich.toasted == Some(true) {
        notes.push("toasted".to_string());
    }
    if owned {
        notes.push("yours".to_string());
    }
    let item = Item::new(sandwich.name.as_str());
    if notes.is_empty() {
        item
    } else {
        item.note(notes.join(", "))
    }
}

fn sandwich_list(title: String, sandwiches: &[Sandwich], cursor: usize, owned: impl Fn(i64) -> bool) -> Section {
    Section::List {
        title: title.into(),
        items: sandwiches
            .iter()
            .map(|sandwich| sandwich_item(sandwich, owned(sandwich.id)))
            .collect(),
        cursor: (!sandwiches.is_empty()).then_some(cursor),
    }
}

/// The sandwich list, marking the sandwiches built here.
pub fn sandwiches(list: &SandwichList) -> Screen {
    let mut screen = Screen::new("Sandwiches");
    if list.loading {
        screen.push(notice(Tone::Info, "Loading sandwiches..."));
    }
    if let Some(error) = &list.error {
        screen.push(notice(Tone::Error, error.clone()));
    }
    if list.sandwiches.is_empty() && !list.loading && list.error.is_none() {
        screen.push(Section::Text("No sandwiches yet. Press n to build one.".into()));
    } else {
        screen.push(sandwich_list(
            format!("{} sandwiches", list.sandwiches.len()),
            &list.sandwiches,
            list.cursor,
            |id| list.owned(id),
        ));
    }
    if let Some(sandwich) = list.selected() {
        if !sandwich.description().is_empty() {
            screen.push(Section::Text(sandwich.description().into()));
        }
    }
    screen.hints = LIST_HINTS.into();
    screen
}

/// The user's own sandwiches, or a login prompt.
pub fn dashboard(dashboard: &Dashboard, cursor: usize) -> Screen {
    let mut screen = Screen::new("My sandwiches");
    if !dashboard.logged_in() {
        screen.push(Section::Text("Log in to see your sandwiches.".into()));
        screen.hints = "l login  esc back".into();
        return screen;
    }
    if dashboard.loading {
        screen.push(notice(Tone::Info, "Loading your sandwiches..."));
    } else if dashboard.sandwiches.is_empty() {
        screen.push(Section::Text("You have no sandwiches yet.".into()));
    } else {
        screen.push(sandwich_list(
            format!("{} sandwiches", dashboard.sandwiches.len()),
            &dashboard.sandwiches,
            cursor,
            |_| true,
        ));
    }
    screen.hints = "↑↓ move  enter edit  r refresh  esc back".into();
    screen
}

pub fn login(login: &Login) -> Screen {
    let mut screen = Screen::new("Login");
    if let Some(error) = &login.error {
        screen.push(notice(Tone::Error, error.clone()));
    }
    if login.requires_mfa {
        screen
            .push(Section::Text("Enter the code from your authenticator app.".into()))
            .push(field("Code", &login.mfa_code, true, false));
    } else {
        screen
            .push(field("Email", &login.email, login.focus == LoginField::Email, false))
            .push(field("Password", &login.password, login.focus == LoginField::Password, true));
    }
    if login.show_register_suggestion {
        screen.push(Section::Text("No account yet? Press esc, then g to register.".into()));
    }
    if login.submitting {
        screen.push(notice(Tone::Info, "Signing in..."));
    }
    screen.hints = FORM_HINTS.into();
    screen
}

pub fn register(register: &Register) -> Screen {
    let mut screen = Screen::new("Register");
    if let Some(error) = &register.error {
        screen.push(notice(Tone::Error, error.clone()));
    }
    if let Some(success) = &register.success {
        screen.push(notice(Tone::Success, success.clone()));
    }
    screen
        .push(field("Email", &register.email, register.focus == RegisterField::Email, false))
        .push(field(
            "Password",
            &register.password,
            register.focus == RegisterField::Password,
            true,
        ))
        .push(field(
            "Confirm password",
            &register.confirm,
            register.focus == RegisterField::Confirm,
            true,
        ));
    if !register.password.is_empty() {
        screen.push(Section::Text(
            format!("Password strength: {}", register.password_strength()).into(),
        ));
    }
    screen.hints = FORM_HINTS.into();
    screen
}

pub fn forgot_password(forgot: &ForgotPassword) -> Screen {
    let mut screen = Screen::new("Forgot password");
    if let Some(error) = &forgot.error {
        screen.push(notice(Tone::Error, error.clone()));
    }
    if let Some(success) = &forgot.success {
        screen.push(notice(Tone::Success, success.clone()));
    }
    screen.push(field("Email", &forgot.email, true, false));
    screen.toast = toast(&forgot.toast);
    screen.hints = "enter send  esc back".into();
    screen
}

fn stepper(form: &BuilderForm) -> String {
    form.state
        .steps
        .iter()
        .enumerate()
        .map(|(i, step)| {
            if i == form.state.step {
                format!("[{step}]")
            } else {
                step.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" > ")
}

fn option_list(form: &BuilderForm, kind: OptionKind) -> Section {
    let selected = &form.state.selected;
    let mut items: Vec<Item> = form
        .state
        .list(kind)
        .iter()
        .map(|option| Item::new(option.label.as_str()).checked(selected.is_selected(kind, option.id)))
        .collect();
    if kind != OptionKind::Breads {
        items.push(Item::new(format!("No {}", kind.title().to_lowercase())).checked(selected.none(kind)));
    }
    let cursor = (!items.is_empty()).then_some(form.state.cursor);
    Section::List {
        title: kind.title().into(),
        items,
        cursor,
    }
}

/// The builder page: stepper, current step, banners and the selection so
/// far.
pub fn builder(form: &BuilderForm, focus: BuilderField) -> Screen {
    let state = &form.state;
    let title = match state.mode {
        Mode::Create => "Build a sandwich".to_string(),
        Mode::Edit(id) => format!("Edit sandwich #{id}"),
    };
    let mut screen = Screen::new(title);
    screen.push(Section::Text(stepper(form).into()));

    if state.loading {
        screen.push(notice(Tone::Info, "Loading options..."));
    }
    if state.submitting {
        screen.push(notice(Tone::Info, "Saving..."));
    }
    if let Some(error) = &state.error {
        screen.push(notice(Tone::Error, error.clone()));
    }
    if let Some(success) = &state.success {
        screen.push(notice(Tone::Success, success.clone()));
    }

    match state.current_step().kind() {
        Some(kind) => {
            if let Some(error) = state.list_errors.get(&kind) {
                screen.push(notice(Tone::Error, format!("{error} (press r to retry)")));
            }
            if let Some(error) = state.field_errors.get(&kind) {
                screen.push(notice(Tone::Error, error.clone()));
            }
            let toasted = if state.selected.toasted { "yes" } else { "no" };
            screen
                .push(option_list(form, kind))
                .push(Section::Text(format!("Toasted: {toasted}").into()));
            screen.hints = STEP_HINTS.into();
        }
        None => {
            screen.push(field("Name", &state.selected.name, focus == BuilderField::Name, false));
            if let Some(error) = &state.name_error {
                screen.push(notice(Tone::Error, error.clone()));
            }
            screen
                .push(field("Price", &state.price_text, focus == BuilderField::Price, false))
                .push(field(
                    "Toasted",
                    if state.selected.toasted { "[x]" } else { "[ ]" },
                    focus == BuilderField::Toasted,
                    false,
                ));
            screen.hints = NAME_HINTS.into();
        }
    }

    let rows = form
        .selection_summary()
        .into_iter()
        .map(|row| (row.name.into(), row.values.join(", ").into()))
        .collect();
    screen.push(Section::Rows {
        title: "Your sandwich".into(),
        rows,
    });
    if !form.can_submit() {
        screen.push(Section::Text("Complete every step to save.".into()));
    }
    screen
}
