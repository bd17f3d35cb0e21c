//! # Example: basic
//!
//! Minimal tour of a single emitter: ordinary listeners, a once-listener,
//! a cooperative stop, and the fatal unobserved-`error` protocol.
//!
//! ## Flow
//! ```text
//! register("tick", log)            ──► fires on every emit
//! register_once("tick", primer)    ──► fires on the first emit only
//! register("tick", stopper)        ──► halts the second emission early
//! register("tick", never_reached)  ──► skipped while the stop is in effect
//! emit("error", ..) without listeners ──► EmitError::Unhandled
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example basic
//! ```

use evoke::{Args, Emitter};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_target(false).init();

    let emitter = Emitter::new();

    // 1. An ordinary listener: fires on every emission, in insertion order.
    emitter.on("tick", |_receiver, args| {
        let n = args.get::<u32>(0).copied().unwrap_or(0);
        println!("[log] tick {n}");
        Ok(())
    })?;

    // 2. A once-listener: removed before its first invocation runs.
    emitter.once("tick", |_receiver, _args| {
        println!("[primer] first tick only");
        Ok(())
    })?;

    // 3. A listener that stops the second emission after itself.
    let stopper = emitter.clone();
    emitter.on("tick", move |_receiver, args| {
        if args.get::<u32>(0) == Some(&2) {
            println!("[stopper] halting this emission");
            stopper.stop_emit();
        }
        Ok(())
    })?;

    emitter.on("tick", |_receiver, _args| {
        println!("[tail] still running");
        Ok(())
    })?;

    println!("-- first emission --");
    emitter.emit("tick", &Args::new().with(1u32))?;

    println!("-- second emission (stopped early) --");
    emitter.emit("tick", &Args::new().with(2u32))?;

    // 4. Unobserved error events are fatal.
    match emitter.emit("error", &Args::new().with(String::from("nobody listened"))) {
        Err(err) => println!("-- emit(\"error\") failed as designed: {err}"),
        Ok(_) => unreachable!("no error listener is registered"),
    }

    Ok(())
}
