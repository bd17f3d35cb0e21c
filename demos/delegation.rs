//! # Example: delegation
//!
//! Two emitters wired into a forwarding chain with event renaming, plus the
//! `"newListener"` control event observing registrations as they happen.
//!
//! ## Flow
//! ```text
//! ui.emit("submit", form)
//!     └─► ui registry: Delegate(app), filed under "submit", alias "form:submitted"
//!            └─► app.emit("form:submitted", form)
//!                   └─► app listeners run with the same argument snapshot
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example delegation
//! ```

use evoke::{Args, Emitter, EventName, NEW_LISTENER};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_target(false).init();

    let ui = Emitter::new();
    let app = Emitter::new();

    // Watch registrations on the app emitter as they happen.
    app.on(NEW_LISTENER, |_receiver, args| {
        let name = args.get::<EventName>(0).cloned().expect("event name");
        println!("[app] listener registered for '{name}'");
        Ok(())
    })?;

    app.on("form:submitted", |_receiver, args| {
        let form = args.get::<&'static str>(0).copied().unwrap_or("<empty>");
        println!("[app] handling submitted form: {form}");
        Ok(())
    })?;

    // The ui forwards its "submit" event to the app under a renamed topic.
    ui.delegate_as("submit", "form:submitted", &app)?;

    println!("-- ui.emit(\"submit\") --");
    ui.emit("submit", &Args::new().with("name=ada"))?;

    // Plain delegation keeps the original name.
    let audit = Emitter::new();
    audit.on("submit", |_receiver, _args| {
        println!("[audit] submit observed unchanged");
        Ok(())
    })?;
    ui.delegate("submit", &audit)?;

    println!("-- ui.emit(\"submit\") with two delegates --");
    ui.emit("submit", &Args::new().with("name=grace"))?;

    Ok(())
}
