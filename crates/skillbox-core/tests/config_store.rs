use tempfile::TempDir;

use skillbox_core::config::{Settings, SettingsStore};

#[test]
fn load_missing_returns_defaults() {
    let temp = TempDir::new().unwrap();
    let store = SettingsStore::from_dir(&temp.path().join("config"));

    let settings = store.load().unwrap();

    assert_eq!(settings.search.debounce_ms, 300);
    assert_eq!(settings.cli.program, "npx");
    assert_eq!(settings.cli.args, vec!["-y", "skills"]);
    assert!(settings.companies.is_empty());
}

#[test]
fn save_then_load_roundtrip() {
    let temp = TempDir::new().unwrap();
    let store = SettingsStore::from_dir(&temp.path().join("nested").join("config"));

    let mut settings = Settings::default();
    settings.search.debounce_ms = 150;
    settings.cli.timeout_secs = 30;
    settings
        .companies
        .insert("vercel-labs".to_string(), "Vercel".to_string());

    store.save(&settings).unwrap();
    let loaded = store.load().unwrap();

    assert!(store.settings_path().exists());
    assert_eq!(loaded.search.debounce_ms, 150);
    assert_eq!(loaded.cli.timeout_secs, 30);
    assert_eq!(
        loaded.companies.get("vercel-labs").map(String::as_str),
        Some("Vercel")
    );
}

#[test]
fn partial_file_keeps_other_defaults() {
    let temp = TempDir::new().unwrap();
    let store = SettingsStore::from_dir(temp.path());
    std::fs::write(
        store.settings_path(),
        "[search]\ndebounce_ms = 500\n\n[companies]\nanthropics = \"Anthropic\"\n",
    )
    .unwrap();

    let settings = store.load().unwrap();

    assert_eq!(settings.search.debounce_ms, 500);
    assert_eq!(settings.registry.timeout_secs, 30);
    assert_eq!(settings.companies.len(), 1);
}

#[test]
fn invalid_file_reports_path_and_line() {
    let temp = TempDir::new().unwrap();
    let store = SettingsStore::from_dir(temp.path());
    std::fs::write(store.settings_path(), "[search]\ndebounce_ms = \"soon\"\n").unwrap();

    let err = store.load().unwrap_err();
    let message = format!("{err:#}");

    assert!(message.contains("config.toml"));
    assert!(message.contains("line 2"));
}

#[test]
fn invalid_registry_url_is_rejected() {
    let temp = TempDir::new().unwrap();
    let store = SettingsStore::from_dir(temp.path());
    std::fs::write(
        store.settings_path(),
        "[registry]\nbase_url = \"not a url\"\n",
    )
    .unwrap();

    let err = store.load().unwrap_err();

    assert!(format!("{err:#}").contains("registry.base_url"));
}
