use figment::Jail;
use storyqa_core::config::{expand_path, Config, Settings};

#[test]
fn defaults_without_any_files() {
    Jail::expect_with(|_jail| {
        let settings = Config::load().expect("load").settings().expect("settings");
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.retrieval.group_size, 3);
        assert_eq!(settings.retrieval.max_evidence, 4);
        assert_eq!(settings.prompt.max_chars, 3000);
        Ok(())
    });
}

#[test]
fn files_then_env_override() {
    Jail::expect_with(|jail| {
        jail.create_file("config.toml", "[retrieval]\ngroup_size = 5\n\n[cache]\ncapacity = 10\n")?;
        jail.create_file("config.test.toml", "[cache]\ncapacity = 20\n")?;
        jail.set_env("RUST_ENV", "test");
        jail.set_env("APP_PROMPT__MAX_CHARS", "1200");
        let settings = Config::load().expect("load").settings().expect("settings");
        assert_eq!(settings.retrieval.group_size, 5);
        assert_eq!(settings.retrieval.max_evidence, 4);
        assert_eq!(settings.cache.capacity, 20);
        assert_eq!(settings.prompt.max_chars, 1200);
        Ok(())
    });
}

#[test]
fn invalid_values_are_rejected() {
    Jail::expect_with(|jail| {
        jail.create_file("config.toml", "[retrieval]\ngroup_size = 0\n")?;
        assert!(Config::load().is_err());
        Ok(())
    });

    let mut settings = Settings::default();
    settings.text.overlap = settings.text.chunk_size;
    assert!(settings.validate().is_err());
}

#[test]
fn expand_path_expands_env_vars() {
    Jail::expect_with(|jail| {
        jail.set_env("STORYQA_TEST_DIR", "/tmp/stories");
        assert_eq!(expand_path("${STORYQA_TEST_DIR}/a.xml"), std::path::PathBuf::from("/tmp/stories/a.xml"));
        Ok(())
    });
}
