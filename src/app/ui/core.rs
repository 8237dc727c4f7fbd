use std::time::{Duration, Instant};

use tokio::{sync::mpsc, task::JoinHandle, time::MissedTickBehavior};

use super::{Ui, data::BuilderField, message::Message, screens};
use crate::{
    api::OptionKind,
    app::{
        Services,
        builder::{BuilderForm, SubmitOutcome, SubmitResult},
        views::{
            Dashboard, ForgotPassword, FormInput, Login, Register, Route, SandwichList, Toast,
            ToastKind,
        },
    },
    terminal::{Banner, Screen, Section, Terminal, Tone, UiEvent},
};

const SCOPE: &str = "app.ui";
const TICK: Duration = Duration::from_millis(100);

pub struct Core {
    services: Services,
    terminal: Terminal,
    route: Route,
    list: SandwichList,
    dashboard: Dashboard,
    dashboard_cursor: usize,
    login: Login,
    register: Register,
    forgot: ForgotPassword,
    /// Only present on the builder and edit routes
    builder: Option<BuilderForm>,
    /// Bumped each time a builder is mounted
    builder_generation: u64,
    builder_field: BuilderField,
    toast: Toast,
    redirect: Option<(Route, Instant)>,
    /// A request is being awaited inline
    busy: bool,
    /// Save results, stamped with the generation of the builder that sent them
    submit_tx: Option<mpsc::Sender<(u64, SubmitResult)>>,
}

impl Core {
    pub fn new(services: Services, terminal: Terminal) -> Self {
        let s = &services;
        Self {
            list: SandwichList::new(s.sandwiches.clone(), s.storage.clone(), s.log.clone()),
            dashboard: Dashboard::new(s.sandwiches.clone(), s.auth.clone(), s.log.clone()),
            dashboard_cursor: 0,
            login: Login::new(s.auth.clone(), s.log.clone()),
            register: Register::new(s.auth.clone(), s.log.clone()),
            forgot: ForgotPassword::new(s.auth.clone(), s.log.clone()),
            builder: None,
            builder_generation: 0,
            builder_field: BuilderField::default(),
            toast: Toast::default(),
            redirect: None,
            busy: false,
            submit_tx: None,
            route: Route::default(),
            terminal,
            services,
        }
    }

    pub fn spawn(mut self) -> (Ui, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::channel(crate::BUFFER_SIZE);
        let (submit_tx, mut submit_rx) = mpsc::channel(1);
        self.submit_tx = Some(submit_tx);

        let handle = tokio::spawn(async move {
            let mut core = self;
            core.enter(Route::Sandwiches).await;
            core.redraw().await;

            let mut ticker = tokio::time::interval(TICK);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    msg = rx.recv() => {
                        let Some(msg) = msg else {
                            break;
                        };
                        match msg {
                            Message::Event { event, tx } => {
                                let running = core.handle_event(event).await;
                                core.redraw().await;
                                let _ = tx.send(running);
                            }
                            Message::Navigate { route, tx } => {
                                core.enter(route).await;
                                core.redraw().await;
                                let _ = tx.send(());
                            }
                            Message::GetRoute { tx } => {
                                let _ = tx.send(core.route);
                            }
                        }
                    }
                    Some((generation, result)) = submit_rx.recv() => {
                        core.finish_submit(generation, result).await;
                        core.redraw().await;
                    }
                    _ = ticker.tick() => {
                        if core.tick(Instant::now()).await {
                            core.redraw().await;
                        }
                    }
                }
            }
        });
        (Ui::Actual(tx), handle)
    }

    fn screen(&self) -> Screen {
        let mut screen = match self.route {
            Route::Sandwiches => screens::sandwiches(&self.list),
            Route::Dashboard => screens::dashboard(&self.dashboard, self.dashboard_cursor),
            Route::Builder | Route::Edit(_) => match &self.builder {
                Some(builder) => screens::builder(builder, self.builder_field),
                None => Screen::new("Build a sandwich"),
            },
            Route::Login => screens::login(&self.login),
            Route::Register => screens::register(&self.register),
            Route::ForgotPassword => screens::forgot_password(&self.forgot),
        };
        if self.busy {
            screen.push(Section::Notice(Banner::new(Tone::Info, "Please wait...")));
        }
        if screen.toast.is_none() {
            screen.toast = screens::toast(&self.toast);
        }
        screen
    }

    async fn redraw(&self) {
        let res = self.terminal.draw(self.screen()).await;
        let _ = self.services.log.warn_on_error(SCOPE, res);
    }

    /// Marks the screen as waiting and draws it before a request is awaited.
    async fn working(&mut self) {
        self.busy = true;
        self.redraw().await;
    }

    fn show_toast(&mut self, message: &str, kind: ToastKind) {
        self.toast.show(message, kind, Instant::now());
    }

    /// Switches to `route` and loads what it shows.
    async fn enter(&mut self, route: Route) {
        self.services.log.info(SCOPE, format!("Entering {route:?}"));
        self.route = route;
        self.redirect = None;
        if !matches!(route, Route::Builder | Route::Edit(_)) {
            self.builder = None;
        }

        let s = &self.services;
        match route {
            Route::Sandwiches => {
                self.working().await;
                self.list.load().await;
            }
            Route::Dashboard => {
                self.dashboard_cursor = 0;
                self.working().await;
                self.dashboard.refresh().await;
            }
            Route::Builder => self.mount_builder(),
            Route::Edit(id) => {
                self.mount_builder();
                self.working().await;
                if let Some(builder) = self.builder.as_mut() {
                    // The error is shown on the form
                    let _ = builder.load_for_edit(id).await;
                }
            }
            Route::Login => self.login = Login::new(s.auth.clone(), s.log.clone()),
            Route::Register => self.register = Register::new(s.auth.clone(), s.log.clone()),
            Route::ForgotPassword => {
                self.forgot = ForgotPassword::new(s.auth.clone(), s.log.clone());
            }
        }
        self.busy = false;
    }

    fn mount_builder(&mut self) {
        let mut builder = self.services.builder();
        builder.init();
        self.builder = Some(builder);
        self.builder_generation += 1;
        self.builder_field = BuilderField::default();
    }

    /// Advances timers and option lists. Returns whether the screen changed.
    async fn tick(&mut self, now: Instant) -> bool {
        let mut changed = false;
        if let Some(builder) = self.builder.as_mut() {
            changed |= builder.sync_from_facade();
        }
        changed |= self.toast.tick(now);

        let showing = |forgot: &ForgotPassword| forgot.toast.message().is_some() || forgot.success.is_some();
        let before = showing(&self.forgot);
        self.forgot.tick(now);
        changed |= before != showing(&self.forgot);

        if let Some((route, at)) = self.redirect {
            if now >= at {
                self.enter(route).await;
                changed = true;
            }
        }
        changed
    }

    /// Returns `false` when the user asked to quit.
    async fn handle_event(&mut self, event: UiEvent) -> bool {
        if event == UiEvent::Quit {
            return false;
        }
        match self.route {
            Route::Sandwiches => return self.on_list(event).await,
            Route::Dashboard => self.on_dashboard(event).await,
            Route::Builder | Route::Edit(_) => self.on_builder(event).await,
            Route::Login => self.on_login(event).await,
            Route::Register => self.on_register(event).await,
            Route::ForgotPassword => self.on_forgot(event).await,
        }
        true
    }

    async fn on_list(&mut self, event: UiEvent) -> bool {
        match event {
            UiEvent::Esc | UiEvent::Char('q') => return false,
            UiEvent::Up => self.list.select_prev(),
            UiEvent::Down => self.list.select_next(),
            UiEvent::Char('r') => self.enter(Route::Sandwiches).await,
            UiEvent::Char('n') => self.enter(Route::Builder).await,
            UiEvent::Char('m') => self.enter(Route::Dashboard).await,
            UiEvent::Char('l') => self.enter(Route::Login).await,
            UiEvent::Char('g') => self.enter(Route::Register).await,
            UiEvent::Char('f') => self.enter(Route::ForgotPassword).await,
            UiEvent::Char('o') => match self.services.auth.logout().await {
                Ok(()) => self.show_toast("Logged out", ToastKind::Success),
                Err(err) => self.show_toast(&format!("Logout failed: {err}"), ToastKind::Error),
            },
            UiEvent::Enter | UiEvent::Char('e') => {
                let Some(id) = self.list.selected().map(|s| s.id) else {
                    return true;
                };
                if self.list.owned(id) {
                    self.enter(Route::Edit(id)).await;
                } else {
                    self.show_toast("Only sandwiches built here can be edited", ToastKind::Error);
                }
            }
            UiEvent::Char('d') => self.delete_selected().await,
            _ => {}
        }
        true
    }

    async fn delete_selected(&mut self) {
        let Some(id) = self.list.selected().map(|s| s.id) else {
            return;
        };
        if !self.list.owned(id) {
            self.show_toast("Only sandwiches built here can be deleted", ToastKind::Error);
            return;
        }
        self.working().await;
        if self.list.delete(id).await.is_ok() {
            self.show_toast("Sandwich deleted", ToastKind::Success);
        }
        self.busy = false;
    }

    async fn on_dashboard(&mut self, event: UiEvent) {
        let len = self.dashboard.sandwiches.len();
        match event {
            UiEvent::Esc => self.enter(Route::Sandwiches).await,
            UiEvent::Up => self.dashboard_cursor = self.dashboard_cursor.saturating_sub(1),
            UiEvent::Down if self.dashboard_cursor + 1 < len => self.dashboard_cursor += 1,
            UiEvent::Char('r') => self.enter(Route::Dashboard).await,
            UiEvent::Char('l') if !self.dashboard.logged_in() => self.enter(Route::Login).await,
            UiEvent::Enter => {
                let id = self.dashboard.sandwiches.get(self.dashboard_cursor).map(|s| s.id);
                match id {
                    Some(id) => self.enter(Route::Edit(id)).await,
                    None if !self.dashboard.logged_in() => self.enter(Route::Login).await,
                    None => {}
                }
            }
            _ => {}
        }
    }

    async fn on_login(&mut self, event: UiEvent) {
        match event {
            UiEvent::Esc => self.enter(Route::Sandwiches).await,
            UiEvent::Tab | UiEvent::Up | UiEvent::Down => self.login.focus_next(),
            UiEvent::Backspace => self.login.pop_char(),
            UiEvent::Char(c) => self.login.push_char(c),
            UiEvent::Enter => {
                self.working().await;
                let route = if self.login.requires_mfa {
                    self.login.verify_mfa().await
                } else {
                    self.login.submit().await
                };
                self.busy = false;
                if let Some(route) = route {
                    self.show_toast("Logged in", ToastKind::Success);
                    self.enter(route).await;
                }
            }
            _ => {}
        }
    }

    async fn on_register(&mut self, event: UiEvent) {
        match event {
            UiEvent::Esc => self.enter(Route::Sandwiches).await,
            UiEvent::Tab | UiEvent::Up | UiEvent::Down => self.register.focus_next(),
            UiEvent::Backspace => self.register.pop_char(),
            UiEvent::Char(c) => self.register.push_char(c),
            UiEvent::Enter => {
                self.working().await;
                let redirect = self.register.submit().await;
                self.busy = false;
                if let Some(redirect) = redirect {
                    self.redirect = Some((redirect.to, Instant::now() + redirect.after));
                }
            }
            _ => {}
        }
    }

    async fn on_forgot(&mut self, event: UiEvent) {
        match event {
            UiEvent::Esc => self.enter(Route::Sandwiches).await,
            UiEvent::Backspace => self.forgot.pop_char(),
            UiEvent::Char(c) => self.forgot.push_char(c),
            UiEvent::Enter => {
                self.working().await;
                self.forgot.submit(Instant::now()).await;
                self.busy = false;
            }
            _ => {}
        }
    }

    async fn on_builder(&mut self, event: UiEvent) {
        if event == UiEvent::Esc {
            return self.enter(Route::Sandwiches).await;
        }
        let Some(builder) = self.builder.as_mut() else {
            return;
        };
        let kind = builder.state.current_step().kind();
        let last_step = builder.state.step + 1 >= builder.state.steps.len();
        match (event, kind) {
            (UiEvent::Left, _) => builder.prev_step(),
            (UiEvent::Right, _) => builder.next_step(),
            (UiEvent::Enter, _) if !last_step => builder.next_step(),
            (UiEvent::Enter, _) | (UiEvent::Char('s'), Some(_)) => self.submit(),
            (event, Some(kind)) => on_option_step(builder, kind, event),
            (event, None) => on_name_step(builder, &mut self.builder_field, event),
        }
    }

    /// Sends the builder's save in the background. The result comes back
    /// through the submit channel.
    fn submit(&mut self) {
        let Some(builder) = self.builder.as_mut() else {
            return;
        };
        let Some(request) = builder.begin_submit() else {
            return;
        };
        let Some(tx) = self.submit_tx.clone() else {
            return;
        };
        let generation = self.builder_generation;
        tokio::spawn(async move {
            let _ = tx.send((generation, request.run().await)).await;
        });
    }

    /// Applies a save result to the builder that sent it. When that builder
    /// is gone only the new id is remembered.
    async fn finish_submit(&mut self, generation: u64, result: SubmitResult) {
        let current = generation == self.builder_generation;
        let Some(builder) = self.builder.as_mut().filter(|_| current) else {
            if let Ok(Some(id)) = result {
                let res = self.services.storage.remember_sandwich(id).await;
                let _ = self.services.log.warn_on_error(SCOPE, res);
            }
            return;
        };
        if let SubmitOutcome::Saved { redirect_after, .. } = builder.finish_submit(result).await {
            self.show_toast("Sandwich saved!", ToastKind::Success);
            self.redirect = Some((Route::Sandwiches, Instant::now() + redirect_after));
        }
    }
}

/// Number of rows on an option step: the options plus "no X" when the kind
/// allows it.
fn option_rows(builder: &BuilderForm, kind: OptionKind) -> usize {
    builder.state.list(kind).len() + usize::from(kind != OptionKind::Breads)
}

fn on_option_step(builder: &mut BuilderForm, kind: OptionKind, event: UiEvent) {
    let selected = &builder.state.selected;
    match event {
        UiEvent::Up => builder.state.cursor = builder.state.cursor.saturating_sub(1),
        UiEvent::Down => {
            if builder.state.cursor + 1 < option_rows(builder, kind) {
                builder.state.cursor += 1;
            }
        }
        UiEvent::Char(' ') => {
            let option = builder.state.list(kind).get(builder.state.cursor).map(|o| o.id);
            match option {
                Some(id) => {
                    let checked = !selected.is_selected(kind, id);
                    builder.toggle(kind, id, checked);
                }
                None if kind != OptionKind::Breads => {
                    let on = !selected.none(kind);
                    builder.toggle_none(kind, on);
                }
                None => {}
            }
        }
        UiEvent::Char('n') if kind != OptionKind::Breads => {
            let on = !selected.none(kind);
            builder.toggle_none(kind, on);
        }
        UiEvent::Char('t') => {
            let toasted = !selected.toasted;
            builder.set_toasted(toasted);
        }
        UiEvent::Char('r') => builder.retry_list(kind),
        UiEvent::Char('R') => builder.retry_all(),
        _ => {}
    }
}

fn on_name_step(builder: &mut BuilderForm, focus: &mut BuilderField, event: UiEvent) {
    let edit = |text: &str, event: UiEvent| -> Option<String> {
        let mut text = text.to_string();
        match event {
            UiEvent::Char(c) => text.push(c),
            UiEvent::Backspace => {
                text.pop();
            }
            _ => return None,
        }
        Some(text)
    };

    match (event, *focus) {
        (UiEvent::Tab | UiEvent::Down, _) => *focus = focus.next(),
        (UiEvent::Char(' '), BuilderField::Toasted) => {
            let toasted = !builder.state.selected.toasted;
            builder.set_toasted(toasted);
        }
        (event, BuilderField::Name) => {
            if let Some(name) = edit(&builder.state.selected.name, event) {
                builder.set_name(name);
            }
        }
        (event, BuilderField::Price) => {
            if let Some(text) = edit(&builder.state.price_text, event) {
                builder.set_price_text(text);
            }
        }
        _ => {}
    }
}
