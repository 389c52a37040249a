//! Arith Drill entry point
//!
//! Wires the settings page and game screen to the state machine on web.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::{Rc, Weak};

    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlInputElement, HtmlSelectElement};

    use arith_drill::consts::TICK_MS;
    use arith_drill::persistence::SettingsStore;
    use arith_drill::platform::web::{Interval, set_timeout};
    use arith_drill::platform::{SessionBackend, session_backend};
    use arith_drill::settings::{Direction, OperandRange, OperationKind};
    use arith_drill::sim::{DrillEvent, Effect, GameState, Snapshot, request_start, step};
    use arith_drill::SetupForm;

    /// Everything the page callbacks share
    struct App {
        state: GameState,
        form: SetupForm,
        settings: SettingsStore<SessionBackend>,
        ticker: Option<Interval>,
    }

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn input_by_name(doc: &Document, name: &str) -> Option<HtmlInputElement> {
        doc.query_selector(&format!("input[name=\"{}\"]", name))
            .ok()
            .flatten()?
            .dyn_into()
            .ok()
    }

    fn checkbox(doc: &Document, name: &str, value: &str) -> Option<HtmlInputElement> {
        doc.query_selector(&format!("input[name=\"{}\"][value=\"{}\"]", name, value))
            .ok()
            .flatten()?
            .dyn_into()
            .ok()
    }

    fn answer_input(doc: &Document) -> Option<HtmlInputElement> {
        doc.get_element_by_id("answerInput")?.dyn_into().ok()
    }

    fn read_number(doc: &Document, name: &str) -> Option<i64> {
        input_by_name(doc, name)?.value().trim().parse().ok()
    }

    fn set_number(doc: &Document, name: &str, value: i64) {
        if let Some(input) = input_by_name(doc, name) {
            input.set_value(&value.to_string());
        }
    }

    fn set_hidden(doc: &Document, id: &str, hidden: bool) {
        if let Some(el) = doc.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", hidden);
        }
    }

    fn set_text(doc: &Document, id: &str, text: &str) {
        if let Some(el) = doc.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    /// Field-name prefix of a range group
    fn range_prefix(kind: OperationKind) -> &'static str {
        match kind {
            OperationKind::Addition | OperationKind::Subtraction => "addition",
            OperationKind::Multiplication | OperationKind::Division => "multiplication",
        }
    }

    fn read_range(doc: &Document, prefix: &str, current: OperandRange) -> OperandRange {
        let field = |suffix: &str, fallback: i64| {
            read_number(doc, &format!("{}{}", prefix, suffix)).unwrap_or(fallback)
        };
        OperandRange::new(
            field("Min1", current.min1),
            field("Max1", current.max1),
            field("Min2", current.min2),
            field("Max2", current.max2),
        )
    }

    fn write_range(doc: &Document, prefix: &str, range: OperandRange) {
        set_number(doc, &format!("{}Min1", prefix), range.min1);
        set_number(doc, &format!("{}Max1", prefix), range.max1);
        set_number(doc, &format!("{}Min2", prefix), range.min2);
        set_number(doc, &format!("{}Max2", prefix), range.max2);
    }

    /// Pull the free-form fields of the settings page into the model
    fn read_form(doc: &Document, form: &mut SetupForm) {
        if let Some(select) = doc
            .get_element_by_id("duration")
            .and_then(|el| el.dyn_into::<HtmlSelectElement>().ok())
        {
            // Unparsable duration reads as zero and fails validation
            form.duration_secs = select.value().trim().parse().unwrap_or(0);
        }
        form.addition_range = read_range(doc, range_prefix(OperationKind::Addition), form.addition_range);
        form.multiplication_range = read_range(
            doc,
            range_prefix(OperationKind::Multiplication),
            form.multiplication_range,
        );
        if let Some(number) = doc
            .get_element_by_id("timesTableNumber")
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
            .and_then(|input| input.value().trim().parse().ok())
        {
            form.times_table_number = number;
        }
        if let Some(range) = read_number(doc, "timesTableRange") {
            form.times_table_range = range;
        }
    }

    /// Push the model back into every settings field
    fn write_form(doc: &Document, form: &SetupForm) {
        if let Some(select) = doc
            .get_element_by_id("duration")
            .and_then(|el| el.dyn_into::<HtmlSelectElement>().ok())
        {
            select.set_value(&form.duration_secs.to_string());
        }
        write_range(doc, range_prefix(OperationKind::Addition), form.addition_range);
        write_range(doc, range_prefix(OperationKind::Multiplication), form.multiplication_range);
        if let Some(input) = doc
            .get_element_by_id("timesTableNumber")
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        {
            input.set_value(&form.times_table_number.to_string());
        }
        set_number(doc, "timesTableRange", form.times_table_range);
        write_checkboxes(doc, form);
    }

    fn write_checkboxes(doc: &Document, form: &SetupForm) {
        for kind in OperationKind::ALL {
            if let Some(cb) = checkbox(doc, "operations", kind.as_str()) {
                cb.set_checked(form.is_checked(kind));
            }
        }
        if let Some(cb) = checkbox(doc, "operations", "timesTable") {
            cb.set_checked(form.is_times_table());
        }
        for direction in Direction::ALL {
            if let Some(cb) = checkbox(doc, "timesTableDirection", direction.as_str()) {
                cb.set_checked(form.has_direction(direction));
            }
        }
        set_hidden(doc, "timesTableControls", !form.is_times_table());
    }

    fn render(doc: &Document, snap: &Snapshot) {
        use arith_drill::sim::GamePhase;

        let in_game = snap.phase != GamePhase::Setup;
        set_hidden(doc, "setupScreen", in_game);
        set_hidden(doc, "gameScreen", !in_game);
        if !in_game {
            return;
        }

        set_text(doc, "score", &snap.score.to_string());
        set_text(doc, "timeLeft", &snap.time_left.to_string());
        set_text(doc, "problem", &snap.problem_text);

        if let Some(input) = answer_input(doc) {
            if input.value() != snap.input {
                input.set_value(&snap.input);
            }
            input.set_disabled(snap.game_over);
        }

        set_hidden(doc, "gameOver", !snap.game_over);
        if let Some(score) = snap.final_score {
            set_text(doc, "finalScore", &score.to_string());
        }
    }

    /// Run one event through the state machine, carry out its effects, re-render
    fn dispatch(app: &Rc<RefCell<App>>, event: DrillEvent) {
        let effects = step(&mut app.borrow_mut().state, event);
        apply_effects(app, effects);
    }

    fn apply_effects(app: &Rc<RefCell<App>>, effects: Vec<Effect>) {
        let weak = Rc::downgrade(app);
        {
            let mut a = app.borrow_mut();
            for effect in effects {
                match effect {
                    Effect::SaveSettings(config) => a.settings.save(&config),
                    Effect::StartTicker => {
                        let weak = weak.clone();
                        // Replacing the old interval clears it
                        a.ticker = Interval::start(TICK_MS, move || {
                            if let Some(app) = weak.upgrade() {
                                dispatch(&app, DrillEvent::Tick);
                            }
                        });
                        if a.ticker.is_none() {
                            log::warn!("Could not start countdown timer");
                        }
                    }
                    Effect::StopTicker => a.ticker = None,
                    Effect::ScheduleAdvance { round, delay_ms } => {
                        let weak: Weak<RefCell<App>> = weak.clone();
                        set_timeout(delay_ms, move || {
                            if let Some(app) = weak.upgrade() {
                                dispatch(&app, DrillEvent::Advance { round });
                            }
                        });
                    }
                }
            }
        }

        if let Some(doc) = document() {
            render(&doc, &app.borrow().state.snapshot());
        }
    }

    fn on(target: &web_sys::EventTarget, kind: &str, handler: impl FnMut(web_sys::Event) + 'static) {
        let closure = Closure::<dyn FnMut(web_sys::Event)>::new(handler);
        let _ = target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_form_handlers(doc: &Document, app: Rc<RefCell<App>>) {
        // Operation checkboxes (exclusivity lives in the model)
        for kind in OperationKind::ALL {
            if let Some(cb) = checkbox(doc, "operations", kind.as_str()) {
                let app = app.clone();
                let target = cb.clone();
                on(&cb, "change", move |_e: web_sys::Event| {
                    let mut a = app.borrow_mut();
                    a.form.set_operation(kind, target.checked());
                    if let Some(doc) = document() {
                        write_checkboxes(&doc, &a.form);
                    }
                });
            }
        }

        if let Some(cb) = checkbox(doc, "operations", "timesTable") {
            let app = app.clone();
            let target = cb.clone();
            on(&cb, "change", move |_e: web_sys::Event| {
                let mut a = app.borrow_mut();
                a.form.set_times_table(target.checked());
                if let Some(doc) = document() {
                    write_checkboxes(&doc, &a.form);
                }
            });
        }

        for direction in Direction::ALL {
            if let Some(cb) = checkbox(doc, "timesTableDirection", direction.as_str()) {
                let app = app.clone();
                let target = cb.clone();
                on(&cb, "change", move |_e: web_sys::Event| {
                    app.borrow_mut().form.set_direction(direction, target.checked());
                });
            }
        }

        // Start
        if let Some(form_el) = doc.get_element_by_id("gameSetup") {
            on(&form_el, "submit", move |e: web_sys::Event| {
                e.prevent_default();
                let Some(doc) = document() else {
                    return;
                };

                let result = {
                    let mut a = app.borrow_mut();
                    let App { state, form, .. } = &mut *a;
                    read_form(&doc, form);
                    request_start(state, form)
                };

                match result {
                    Ok(effects) => {
                        apply_effects(&app, effects);
                        if let Some(input) = answer_input(&doc) {
                            let _ = input.focus();
                        }
                    }
                    Err(err) => {
                        log::info!("Start rejected: {}", err);
                        if let Some(window) = web_sys::window() {
                            let _ = window.alert_with_message(&err.to_string());
                        }
                    }
                }
            });
        }
    }

    fn setup_game_handlers(doc: &Document, app: Rc<RefCell<App>>) {
        if let Some(input) = answer_input(doc) {
            let app_input = app.clone();
            let target = input.clone();
            on(&input, "input", move |_e: web_sys::Event| {
                dispatch(&app_input, DrillEvent::Input(target.value()));
            });

            let app_key = app.clone();
            on(&input, "keypress", move |e: web_sys::Event| {
                let key = e.dyn_ref::<web_sys::KeyboardEvent>().map(|k| k.key());
                if key.as_deref() == Some("Enter") {
                    dispatch(&app_key, DrillEvent::Submit);
                }
            });
        }

        if let Some(btn) = doc.get_element_by_id("exitBtn") {
            let app = app.clone();
            on(&btn, "click", move |_e: web_sys::Event| {
                let confirmed = web_sys::window()
                    .and_then(|w| {
                        w.confirm_with_message("Are you sure you want to exit? Your current game will end.")
                            .ok()
                    })
                    .unwrap_or(false);
                if confirmed {
                    dispatch(&app, DrillEvent::Exit);
                }
            });
        }

        if let Some(btn) = doc.get_element_by_id("tryAgainBtn") {
            let app = app.clone();
            on(&btn, "click", move |_e: web_sys::Event| {
                dispatch(&app, DrillEvent::Retry);
                if let Some(input) = document().and_then(|d| answer_input(&d)) {
                    let _ = input.focus();
                }
            });
        }

        if let Some(btn) = doc.get_element_by_id("changeSettingsBtn") {
            on(&btn, "click", move |_e: web_sys::Event| {
                dispatch(&app, DrillEvent::ChangeSettings);
                // Show the settings the last game ran with
                if let Some(doc) = document() {
                    write_form(&doc, &app.borrow().form);
                }
            });
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Arith Drill starting...");

        let Some(doc) = document() else {
            log::error!("No document");
            return;
        };

        let seed = js_sys::Date::now() as u64;
        let settings = SettingsStore::new(session_backend());
        let mut form = SetupForm::default();
        if let Some(saved) = settings.load() {
            form.apply(&saved);
        }
        write_form(&doc, &form);

        let app = Rc::new(RefCell::new(App {
            state: GameState::new(seed),
            form,
            settings,
            ticker: None,
        }));
        log::info!("Game initialized with seed: {}", seed);

        setup_form_handlers(&doc, app.clone());
        setup_game_handlers(&doc, app.clone());
        render(&doc, &app.borrow().state.snapshot());

        log::info!("Arith Drill running!");
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use arith_drill::SetupForm;
    use arith_drill::persistence::SettingsStore;
    use arith_drill::platform::session_backend;
    use arith_drill::sim::{DrillEvent, GameState, step};

    env_logger::init();
    log::info!("Arith Drill (native) starting...");
    log::info!("Native mode has no UI - run with `trunk serve` for the web version");

    let mut settings = SettingsStore::new(session_backend());
    let config = match settings.load_config() {
        Some(config) => config,
        None => match SetupForm::default().collect() {
            Ok(config) => config,
            Err(e) => {
                log::error!("Default settings rejected: {}", e);
                return;
            }
        },
    };
    settings.save(&config);

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default();
    let mut state = GameState::new(seed);
    step(&mut state, DrillEvent::Start(config));

    println!("\nSample problems:");
    for _ in 0..5 {
        let Some(session) = state.session.as_ref() else {
            break;
        };
        let Some(problem) = session.problem.clone() else {
            break;
        };
        println!("  {} {}", problem, problem.answer);

        let round = session.round;
        step(&mut state, DrillEvent::Input(problem.answer.to_string()));
        step(&mut state, DrillEvent::Advance { round });
    }
    println!("Score: {}", state.snapshot().score);
}
