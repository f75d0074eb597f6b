// tests/crawler_config.rs
use hot_list_aggregator::ingest::config::{
    load_config_default, load_config_from, CrawlerConfig, ENV_CONFIG_PATH, ENV_INTERVAL_SECS,
    ENV_SNAPSHOT_PATH,
};
use std::path::PathBuf;
use std::time::Duration;
use std::{env, fs};

fn clear_env() {
    env::remove_var(ENV_CONFIG_PATH);
    env::remove_var(ENV_INTERVAL_SECS);
    env::remove_var(ENV_SNAPSHOT_PATH);
}

#[test]
fn parse_toml_and_json_paths() {
    let dir = tempfile::tempdir().unwrap();

    let p_toml = dir.path().join("crawler.toml");
    fs::write(
        &p_toml,
        r#"
interval_secs = 300
[sources.github]
timeout_secs = 15
"#,
    )
    .unwrap();
    let c = load_config_from(&p_toml).unwrap();
    assert_eq!(c.interval(), Duration::from_secs(300));
    assert_eq!(c.timeout_for("github", None), Duration::from_secs(15));

    let p_json = dir.path().join("crawler.json");
    fs::write(&p_json, r#"{"sources":{"weibo":{"enabled":false}}}"#).unwrap();
    let cj = load_config_from(&p_json).unwrap();
    assert!(!cj.is_enabled("weibo"));
    assert_eq!(cj.interval_secs, 600);

    let bad = dir.path().join("broken.toml");
    fs::write(&bad, "interval_secs = \"soon\"").unwrap();
    assert!(load_config_from(&bad).is_err());
}

#[serial_test::serial]
#[test]
fn default_uses_env_then_fallbacks() {
    // Isolate CWD so the repo's own config/ is not picked up
    let old = env::current_dir().unwrap();
    let tmp = tempfile::tempdir().unwrap();
    env::set_current_dir(tmp.path()).unwrap();
    clear_env();

    // 1) Nothing anywhere -> defaults
    let c = load_config_default().unwrap();
    assert_eq!(c, CrawlerConfig::default());

    // 2) Fallback TOML in ./config/
    let cfg_dir = tmp.path().join("config");
    fs::create_dir_all(&cfg_dir).unwrap();
    fs::write(cfg_dir.join("crawler.toml"), "interval_secs = 120").unwrap();
    assert_eq!(load_config_default().unwrap().interval_secs, 120);

    // 3) Env path wins
    let p_env = tmp.path().join("elsewhere.json");
    fs::write(&p_env, r#"{"interval_secs": 45}"#).unwrap();
    env::set_var(ENV_CONFIG_PATH, p_env.display().to_string());
    assert_eq!(load_config_default().unwrap().interval_secs, 45);

    // 4) Env path to nowhere is an error, not a silent default
    env::set_var(ENV_CONFIG_PATH, tmp.path().join("missing.toml").display().to_string());
    assert!(load_config_default().is_err());

    clear_env();
    env::set_current_dir(&old).unwrap();
}

#[serial_test::serial]
#[test]
fn env_overrides_apply_on_top_of_file() {
    let dir = tempfile::tempdir().unwrap();
    let p = dir.path().join("crawler.toml");
    fs::write(&p, "interval_secs = 120\nsnapshot_path = \"a.json\"").unwrap();

    clear_env();
    env::set_var(ENV_CONFIG_PATH, p.display().to_string());
    env::set_var(ENV_INTERVAL_SECS, "30");
    env::set_var(ENV_SNAPSHOT_PATH, "/var/lib/hot/result.json");
    let c = load_config_default().unwrap();
    assert_eq!(c.interval_secs, 30);
    assert_eq!(c.snapshot_path, PathBuf::from("/var/lib/hot/result.json"));

    env::set_var(ENV_INTERVAL_SECS, "0");
    env::set_var(ENV_SNAPSHOT_PATH, "  ");
    let c = load_config_default().unwrap();
    assert_eq!(c.interval_secs, 120);
    assert_eq!(c.snapshot_path, PathBuf::from("a.json"));

    clear_env();
}
