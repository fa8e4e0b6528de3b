/// Text resolution integration tests — fallback precedence and substitution.

use world_text::core::resolver::{LoadError, MemoryPackLoader, TextResolver, TextVars};
use world_text::core::settings::Settings;
use world_text::schema::language_pack::LanguagePack;

fn scenario_loader() -> MemoryPackLoader {
    let primary = LanguagePack::builder("de")
        .entry("greet", "Hi {name}")
        .build()
        .unwrap();
    let fallback = LanguagePack::builder("en")
        .entry("greet", "Hello {name}")
        .entry("farewell", "Bye")
        .build()
        .unwrap();
    MemoryPackLoader::new().with_pack(primary).with_pack(fallback)
}

#[test]
fn greet_farewell_missing_scenario() {
    let resolver = TextResolver::new("de", &scenario_loader()).unwrap();

    assert_eq!(
        resolver.resolve_with("greet", &TextVars::new().with("name", "Ada")),
        "Hi Ada"
    );
    assert_eq!(resolver.resolve("farewell"), "Bye");
    assert_eq!(resolver.resolve("missing.key"), "missing.key");
}

#[test]
fn primary_wins_over_fallback_for_every_shared_key() {
    let resolver = TextResolver::new("de", &scenario_loader()).unwrap();
    for key in resolver.primary().keys() {
        assert_eq!(
            Some(resolver.resolve(key).as_str()),
            resolver.primary().get(key),
            "key {}",
            key
        );
    }
}

#[test]
fn fallback_fills_every_key_absent_from_primary() {
    let resolver = TextResolver::new("de", &scenario_loader()).unwrap();
    for key in resolver.fallback().keys() {
        if resolver.primary().contains(key) {
            continue;
        }
        assert_eq!(Some(resolver.resolve(key).as_str()), resolver.fallback().get(key));
    }
}

#[test]
fn non_matching_vars_leave_text_unchanged() {
    let resolver = TextResolver::new("de", &scenario_loader()).unwrap();
    let vars = TextVars::new().with("unused", 42);
    assert_eq!(resolver.resolve_with("farewell", &vars), "Bye");
    assert_eq!(resolver.resolve_with("greet", &vars), "Hi {name}");
}

#[test]
fn arabic_pack_is_rtl() {
    let loader = MemoryPackLoader::new()
        .with_pack(LanguagePack::builder("ar").rtl(true).build().unwrap())
        .with_pack(LanguagePack::builder("en").build().unwrap());
    let resolver = TextResolver::new("ar", &loader).unwrap();
    assert!(resolver.is_rtl());
    assert_eq!(resolver.resolve("meta.lang"), "ar");
}

#[test]
fn settings_drive_construction() {
    let settings = Settings::load(std::path::Path::new("tests/fixtures/settings.ron")).unwrap();
    let loader = MemoryPackLoader::new()
        .with_pack(LanguagePack::builder("ar").rtl(true).build().unwrap())
        .with_pack(LanguagePack::builder("en").entry("ok", "OK").build().unwrap());
    let resolver = TextResolver::from_settings(&settings, &loader).unwrap();
    assert_eq!(resolver.current_language(), "ar");
    assert!(resolver.is_rtl());
    assert_eq!(resolver.resolve("ok"), "OK");
}

#[test]
fn failed_fallback_load_propagates() {
    let loader = MemoryPackLoader::new().with_pack(LanguagePack::builder("de").build().unwrap());
    let result = TextResolver::new("de", &loader);
    assert!(matches!(result, Err(LoadError::UnknownLanguage(code)) if code == "en"));
}

#[test]
fn resolver_is_shareable_across_threads() {
    let resolver = std::sync::Arc::new(TextResolver::new("de", &scenario_loader()).unwrap());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let resolver = std::sync::Arc::clone(&resolver);
            std::thread::spawn(move || {
                resolver.resolve_with("greet", &TextVars::new().with("name", i))
            })
        })
        .collect();
    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap(), format!("Hi {}", i));
    }
}
