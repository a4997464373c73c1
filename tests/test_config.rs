//! Tests for network configuration parsing
//!
//! This file tests the config module including:
//! - Loading the bundled JSON config files
//! - Defaults for optional fields
//! - Handling invalid JSON, missing files and invalid values

use mlp_autoencoder::config::{load_config, NetworkKind};
use mlp_autoencoder::NetworkError;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_temp_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("failed to create temp config");
    file.write_all(contents.as_bytes())
        .expect("failed to write temp config");
    file
}

// ============================================================================
// Valid Config Loading Tests
// ============================================================================

mod valid_config_tests {
    use super::*;

    #[test]
    fn test_load_autoencoder_config() {
        let config = load_config("config/mlp_autoencoder.json")
            .expect("Failed to load autoencoder config");

        assert_eq!(config.kind, NetworkKind::Autoencoder);
        assert_eq!(config.x_dim, 784);
        assert_eq!(config.h_dims, "32-16");
        assert_eq!(config.rep_dim, 8);
        assert!(!config.bias);
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn test_load_encoder_config() {
        let config = load_config("config/mlp_encoder.json").expect("Failed to load encoder config");

        assert_eq!(config.kind, NetworkKind::Encoder);
        assert_eq!(config.h_dims, "128-64");
        assert_eq!(config.rep_dim, 32);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_load_decoder_config() {
        let config = load_config("config/mlp_decoder.json").expect("Failed to load decoder config");

        assert_eq!(config.kind, NetworkKind::Decoder);
        assert!(config.bias);
        assert!((config.momentum - 0.9).abs() < 1e-6);
        assert!((config.negative_slope - 0.01).abs() < 1e-6);
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let temp = write_temp_config(r#"{ "kind": "encoder", "x_dim": 100 }"#);
        let config = load_config(temp.path()).unwrap();

        assert_eq!(config.h_dims, "32-16");
        assert_eq!(config.rep_dim, 8);
        assert!(!config.bias);
        assert!((config.eps - 1e-4).abs() < 1e-9);

        let spec = config.spec().unwrap();
        assert_eq!(spec.h_dims(), &[32, 16]);
    }
}

// ============================================================================
// Invalid Config Tests
// ============================================================================

mod invalid_config_tests {
    use super::*;

    #[test]
    fn test_missing_file() {
        let result = load_config("config/does_not_exist.json");
        assert!(matches!(result, Err(NetworkError::Io(_))));
    }

    #[test]
    fn test_invalid_json() {
        let temp = write_temp_config("{ kind: encoder");
        assert!(matches!(load_config(temp.path()), Err(NetworkError::Json(_))));
    }

    #[test]
    fn test_missing_required_field() {
        let temp = write_temp_config(r#"{ "kind": "encoder" }"#);
        assert!(matches!(load_config(temp.path()), Err(NetworkError::Json(_))));
    }

    #[test]
    fn test_malformed_h_dims() {
        for h_dims in ["32-", "abc", "", "16--8"] {
            let json = format!(
                r#"{{ "kind": "autoencoder", "x_dim": 10, "h_dims": "{}" }}"#,
                h_dims
            );
            let temp = write_temp_config(&json);
            assert!(
                matches!(load_config(temp.path()), Err(NetworkError::Format { .. })),
                "h_dims {:?} should be rejected",
                h_dims
            );
        }
    }

    #[test]
    fn test_zero_dimensions() {
        let temp = write_temp_config(r#"{ "kind": "encoder", "x_dim": 0 }"#);
        assert!(matches!(
            load_config(temp.path()),
            Err(NetworkError::InvalidConfig(_))
        ));

        let temp = write_temp_config(r#"{ "kind": "encoder", "x_dim": 10, "rep_dim": 0 }"#);
        assert!(matches!(
            load_config(temp.path()),
            Err(NetworkError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_out_of_range_hyperparameters() {
        for extra in [
            r#""eps": 0.0"#,
            r#""eps": -1e-5"#,
            r#""momentum": 1.5"#,
            r#""negative_slope": -0.2"#,
        ] {
            let json = format!(r#"{{ "kind": "encoder", "x_dim": 10, {} }}"#, extra);
            let temp = write_temp_config(&json);
            assert!(
                matches!(load_config(temp.path()), Err(NetworkError::InvalidConfig(_))),
                "{} should be rejected",
                extra
            );
        }
    }

    #[test]
    fn test_negative_width_is_not_a_usize() {
        let temp = write_temp_config(r#"{ "kind": "encoder", "x_dim": -5 }"#);
        assert!(matches!(load_config(temp.path()), Err(NetworkError::Json(_))));
    }
}
