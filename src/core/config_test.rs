//! 配置管理系统单元测试
//!
//! 测试 AppConfig 的默认值、验证、读写以及到 ControllerSettings 的转换

#[cfg(test)]
mod tests {
    use super::super::config::{AppConfig, ControllerSettings};
    use std::time::Duration;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_creation() {
        let config = AppConfig::default();

        assert_eq!(config.endpoint.base_url, "http://127.0.0.1:5000");
        assert_eq!(config.endpoint.path, "/download");
        assert_eq!(config.endpoint.field_name, "video_url");
        assert_eq!(config.page.form, "downloadForm");
        assert_eq!(config.page.input, "videoUrl");
        assert_eq!(config.page.control, "downloadBtn");
        assert_eq!(config.timing.notification_ttl_ms, 5_000);
        assert_eq!(config.timing.paste_delay_ms, 100);
        assert_eq!(config.timing.revoke_delay_ms, 100);
        assert_eq!(config.capability.mobile_markers.len(), 8);
        assert_eq!(config.save.filename_prefix, "tiktok_video_");
        assert_eq!(config.save.extension, "mp4");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_config_validation() {
        let mut config = AppConfig::default();
        config.endpoint.base_url = "not a url".to_string();
        assert!(config.validate().is_err());

        config = AppConfig::default();
        config.endpoint.field_name = " ".to_string();
        assert!(config.validate().is_err());

        config = AppConfig::default();
        config.page.control = String::new();
        assert!(config.validate().is_err());

        config = AppConfig::default();
        config.timing.notification_ttl_ms = 0;
        assert!(config.validate().is_err());

        config = AppConfig::default();
        config.capability.mobile_markers.push("  ".to_string());
        assert!(config.validate().is_err());

        config = AppConfig::default();
        config.save.extension = "mp4;rm".to_string();
        assert!(config.validate().is_err());

        config = AppConfig::default();
        config.save.filename_prefix = "../escape".to_string();
        assert!(config.validate().is_err());

        config = AppConfig::default();
        config.log_level = Some("verbose".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = AppConfig::default();
        config.endpoint.base_url = "https://dl.example.com".to_string();
        config.save.downloads_dir = Some("/tmp/videos".to_string());
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.endpoint.base_url, "https://dl.example.com");
        assert_eq!(
            loaded.downloads_dir().unwrap(),
            std::path::PathBuf::from("/tmp/videos")
        );
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config = AppConfig::import(r#"{ "timing": { "paste_delay_ms": 250 } }"#).unwrap();

        assert_eq!(config.timing.paste_delay_ms, 250);
        assert_eq!(config.timing.notification_ttl_ms, 5_000);
        assert_eq!(config.endpoint.path, "/download");
    }

    #[test]
    fn test_import_rejects_invalid_values() {
        assert!(AppConfig::import(r#"{ "timing": { "notification_ttl_ms": 0 } }"#).is_err());
        assert!(AppConfig::import("{ not json").is_err());
    }

    #[test]
    fn test_load_or_default_falls_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "save": { "extension": "" } }"#).unwrap();

        let config = AppConfig::load_or_default(Some(&path));
        assert_eq!(config.save.extension, "mp4");

        let missing = dir.path().join("missing.json");
        let config = AppConfig::load_or_default(Some(&missing));
        assert_eq!(config.endpoint.field_name, "video_url");
    }

    #[test]
    fn test_missing_file_yields_defaults_without_writing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("client").join("config.json");

        let config = AppConfig::load_at(&path).unwrap();

        assert_eq!(config.endpoint.path, "/download");
        assert!(!path.exists());
        assert!(!dir.path().join("client").exists());
    }

    #[test]
    fn test_controller_settings_from_config() {
        let mut config = AppConfig::default();
        config.timing.notification_ttl_ms = 3_000;
        config.endpoint.path = "/api/download".to_string();

        let settings = ControllerSettings::from(&config);
        assert_eq!(settings.notification_ttl, Duration::from_secs(3));
        assert_eq!(settings.paste_delay, Duration::from_millis(100));
        assert_eq!(settings.revoke_delay, Duration::from_millis(100));
        assert_eq!(settings.form_action, "/api/download");
        assert_eq!(settings.field_name, "video_url");
        assert_eq!(settings.ids, config.page);
    }
}
