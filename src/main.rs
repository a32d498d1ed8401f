//! Splatter FX entry point
//!
//! Web: drives the selected effect on `#effectCanvas`, switched by `#effectSelector`.
//! Native: runs every effect headless on a virtual clock and logs a summary.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, HtmlSelectElement};

    use splatter_fx::platform::CallbackSlots;
    use splatter_fx::platform::web::{Request, WebCanvas, WebScheduler};
    use splatter_fx::runtime::{FrameToken, TimerToken};
    use splatter_fx::{Effect, EffectController, EffectKind, Runtime, Settings};

    struct App {
        canvas: WebCanvas,
        scheduler: WebScheduler,
        controller: EffectController,
        /// Pending requestAnimationFrame callbacks
        frames: CallbackSlots<FrameToken, Closure<dyn FnMut(f64)>>,
        /// Running setInterval callbacks
        timers: CallbackSlots<TimerToken, Closure<dyn FnMut()>>,
    }

    impl App {
        /// Run `f` with a runtime over this app's canvas and scheduler
        fn with_runtime(&mut self, f: impl FnOnce(&mut EffectController, &mut Runtime<'_>)) {
            let App {
                canvas,
                scheduler,
                controller,
                ..
            } = self;
            let mut rt = Runtime::new(canvas, scheduler);
            f(controller, &mut rt);
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Splatter FX starting...");

        let Some(element) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("effectCanvas"))
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("no #effectCanvas canvas element");
            return;
        };

        // Match the backing store to the laid-out size
        let width = element.client_width().max(1) as u32;
        let height = element.client_height().max(1) as u32;
        element.set_width(width);
        element.set_height(height);

        let Some(canvas) = WebCanvas::new(element) else {
            log::error!("canvas has no 2d context");
            return;
        };

        let settings = Settings::load();
        let seed = settings.seed.unwrap_or_else(|| js_sys::Date::now() as u64);
        log::info!("Canvas {}x{}, seed {}", width, height, seed);

        let app = Rc::new(RefCell::new(App {
            canvas,
            scheduler: WebScheduler::default(),
            controller: EffectController::new(settings, seed),
            frames: CallbackSlots::default(),
            timers: CallbackSlots::default(),
        }));

        setup_selector(app.clone());

        app.borrow_mut().with_runtime(|controller, rt| {
            if let Err(e) = controller.start(EffectKind::Heal, rt) {
                log::error!("Failed to start heal: {}", e);
            }
        });
        flush(&app);

        log::info!("Splatter FX running!");
    }

    fn setup_selector(app: Rc<RefCell<App>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let Some(select) = document
            .get_element_by_id("effectSelector")
            .and_then(|el| el.dyn_into::<HtmlSelectElement>().ok())
        else {
            log::warn!("no #effectSelector, effect switching disabled");
            return;
        };

        let target = select.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let name = target.value();
            app.borrow_mut().with_runtime(|controller, rt| {
                if let Err(e) = controller.start_by_name(&name, rt) {
                    log::warn!("{}", e);
                }
            });
            flush(&app);
        });
        let _ = select.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Hand queued scheduler requests to the browser
    fn flush(app: &Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let requests = {
            let mut a = app.borrow_mut();
            a.frames.sweep();
            a.timers.sweep();
            a.scheduler.drain()
        };

        for request in requests {
            match request {
                Request::Frame(token) => {
                    let app_cb = app.clone();
                    let closure: Closure<dyn FnMut(f64)> =
                        Closure::once(move |time: f64| on_frame(app_cb, token, time));
                    match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
                        Ok(id) => app.borrow_mut().frames.insert(token, id, closure),
                        Err(e) => log::warn!("requestAnimationFrame failed: {:?}", e),
                    }
                }
                Request::CancelFrame(token) => {
                    let handle = app.borrow_mut().frames.cancel(&token);
                    if let Some(id) = handle {
                        let _ = window.cancel_animation_frame(id);
                    }
                }
                Request::Periodic { token, interval_ms } => {
                    let app_cb = app.clone();
                    let closure = Closure::<dyn FnMut()>::new(move || on_timer(&app_cb, token));
                    match window.set_interval_with_callback_and_timeout_and_arguments_0(
                        closure.as_ref().unchecked_ref(),
                        interval_ms.min(i32::MAX as u32) as i32,
                    ) {
                        Ok(id) => app.borrow_mut().timers.insert(token, id, closure),
                        Err(e) => log::warn!("setInterval failed: {:?}", e),
                    }
                }
                Request::CancelPeriodic(token) => {
                    let handle = app.borrow_mut().timers.cancel(&token);
                    if let Some(id) = handle {
                        window.clear_interval_with_handle(id);
                    }
                }
            }
        }
    }

    fn on_frame(app: Rc<RefCell<App>>, token: FrameToken, time: f64) {
        {
            let mut a = app.borrow_mut();
            a.frames.fire(&token);
            a.with_runtime(|controller, rt| controller.on_frame(token, time, rt));
        }
        flush(&app);
    }

    fn on_timer(app: &Rc<RefCell<App>>, token: TimerToken) {
        app.borrow_mut()
            .with_runtime(|controller, rt| controller.on_timer(token, rt));
        flush(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_app::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Splatter FX (native) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => match splatter_fx::Settings::from_file(&path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path);
                settings
            }
            Err(e) => {
                log::error!("Failed to load settings from {}: {}", path, e);
                splatter_fx::Settings::default()
            }
        },
        None => splatter_fx::Settings::load(),
    };

    run_headless(settings);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Run each effect to completion on a virtual 800x600 surface
#[cfg(not(target_arch = "wasm32"))]
fn run_headless(mut settings: splatter_fx::Settings) {
    use splatter_fx::canvas::DrawCommand;
    use splatter_fx::platform::VirtualHost;
    use splatter_fx::{EffectController, EffectKind};

    // Unbounded heal never settles; give it a finite run
    if settings.heal.duration_ms == 0 {
        settings.heal.duration_ms = 200;
    }
    match settings.to_json() {
        Ok(json) => log::debug!("effective settings: {}", json),
        Err(e) => log::warn!("settings not serializable: {}", e),
    }
    let seed = settings.seed.unwrap_or(0x5eed);
    let mut controller = EffectController::new(settings, seed);

    for kind in EffectKind::ALL {
        let mut host = VirtualHost::new(800, 600);
        if let Err(e) = controller.start(kind, &mut host.runtime()) {
            log::error!("{} failed to start: {}", kind.as_str(), e);
            continue;
        }
        let settled = host.run_until_idle(&mut controller, 10_000.0);

        let (paths, circles) = host
            .canvas
            .commands()
            .iter()
            .fold((0, 0), |(p, c), cmd| match cmd {
                DrawCommand::FillPath { .. } => (p + 1, c),
                DrawCommand::FillCircle { .. } => (p, c + 1),
                DrawCommand::ClearRect { .. } => (p, c),
            });
        log::info!(
            "{}: {} frames over {:.0}ms, {} clears, {} paths, {} circles{}",
            kind.as_str(),
            host.frames_delivered(),
            host.now_ms(),
            host.canvas.clear_count(),
            paths,
            circles,
            if settled { "" } else { " (still running at limit)" }
        );
        controller.stop(&mut host.runtime());
    }
}
