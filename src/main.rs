//! sc-storage demo
//!
//! Walks through the store against in-memory backends and logs each step.
//! In the browser the library is used through the `ScStorage` JS class.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("sc-storage (native) demo starting...");

    if let Err(e) = run() {
        log::error!("Demo failed: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is sc_storage::wasm::start, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn run() -> sc_storage::Result<()> {
    use chrono::{Months, Utc};
    use sc_storage::{Backends, MemoryArea, MemoryCookieJar, Store};
    use serde_json::json;

    let durable = MemoryArea::new();
    let volatile = MemoryArea::new();
    let mut store = Store::new(
        Backends::with_areas(durable.clone(), volatile).with_cookies(MemoryCookieJar::new()),
    );

    store.set_config(&json!({"ttl": 3600, "prefix": "et_", "version": 2.5, "wrongProp": false}));
    log::info!("New configuration: {:?}", store.config());

    let until = Utc::now().checked_add_months(Months::new(1));
    store.set("foo", &json!({"point": "yes", "other": 3}), Some(true), until)?;
    log::info!("Stored record: {}", durable.raw("et_foo").unwrap_or_default());
    log::info!("get(foo) = {:?}", store.get("foo")?);
    store.remove("foo", false)?;
    log::info!("get(foo) after remove = {:?}", store.get("foo")?);

    log::info!("Setting globals");
    store.set_global("foo", 3, None);
    store.set_global("bar", 5, None);
    store.set_global("bar", 7, Some("customNameSpace"));

    log::info!("getGlobal(foo) = {:?}", store.get_global("foo", None));
    log::info!("getGlobal(foo, nonsens) = {:?}", store.get_global("foo", Some("nonsens")));
    log::info!("getGlobal(bar) = {:?}", store.get_global("bar", None));
    log::info!(
        "getGlobal(bar, customNameSpace) = {:?}",
        store.get_global("bar", Some("customNameSpace"))
    );
    log::info!("All globals: {}", serde_json::to_string(store.get_all_globals())?);

    log::info!("Removing globals");
    for (key, namespace) in [
        ("bar", None),
        ("notThere", None),
        ("hip", Some("hop")),
        ("bar", Some("customNameSpace")),
    ] {
        let removed = store.remove_global(key, namespace);
        log::info!("removeGlobal({}, {:?}) = {}", key, namespace, removed);
    }
    log::info!("All globals: {}", serde_json::to_string(store.get_all_globals())?);

    Ok(())
}
