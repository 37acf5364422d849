use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use metaball_field::prelude::*;
use metaball_field_examples::init_tracing;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Target {
    Window,
    Document,
}

#[derive(Debug)]
enum PageEvent {
    Resize { width: u32, height: u32 },
    Loaded,
}

type PageScope = Scope<LocalEventBus<Target, PageEvent>, ManualTimers>;

fn main() -> anyhow::Result<()> {
    init_tracing();
    let bus = LocalEventBus::new();
    let clock = ManualTimers::new();
    let scope: PageScope = Scope::new(bus.clone(), clock.clone());

    let resizes = Rc::new(Cell::new(0u32));
    let r = Rc::clone(&resizes);
    let on_resize = Listener::new(move |e: &PageEvent| {
        if let PageEvent::Resize { width, height } = e {
            r.set(r.get() + 1);
            info!("Resized to {}x{}.", width, height);
        }
    });
    scope.listeners().add(&Target::Window, "resize", &on_resize);
    // Registering the same listener twice is a no-op.
    scope.listeners().add(&Target::Window, "resize", &on_resize);

    let on_load = Listener::new(|_: &PageEvent| info!("Document loaded."));
    scope
        .listeners()
        .add(&Target::Document, "DOMContentLoaded", &on_load);

    // Debounced work and a timer the page cancels before it fires.
    scope.timers().schedule(Duration::from_millis(250), || {
        info!("Intro animation finished.");
    });
    let hint = scope.timers().schedule(Duration::from_secs(5), || {
        info!("Showing idle hint.");
    });

    bus.dispatch(&Target::Document, "DOMContentLoaded", &PageEvent::Loaded);
    bus.dispatch(
        &Target::Window,
        "resize",
        &PageEvent::Resize {
            width: 1280,
            height: 720,
        },
    );
    clock.advance(Duration::from_millis(300));
    scope.timers().cancel(hint);

    info!(
        "Before teardown: {} listeners on the bus, {} timers pending.",
        bus.listener_count(),
        clock.pending()
    );
    let released = scope.teardown();
    info!("Teardown released {} subscriptions.", released);

    // Nothing reaches the page after teardown.
    bus.dispatch(
        &Target::Window,
        "resize",
        &PageEvent::Resize {
            width: 800,
            height: 600,
        },
    );
    clock.advance(Duration::from_secs(10));
    anyhow::ensure!(resizes.get() == 1, "listener survived teardown");
    anyhow::ensure!(scope.is_empty() && bus.listener_count() == 0);
    Ok(())
}
