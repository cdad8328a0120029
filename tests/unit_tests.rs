use tap_activecampaign_verify::orchestrator::{ExitStatus, Inclusion, MetadataEntry};
use tap_activecampaign_verify::verify::selected_fields_from_metadata;
use tap_activecampaign_verify::{ConfigError, TapConfig};

#[test]
fn test_config_from_lookup() {
    let config = TapConfig::from_lookup(|var| match var {
        "TAP_ACTIVECAMPAIGN_API_URL" => Some("https://account.api-us1.com".to_string()),
        "TAP_ACTIVECAMPAIGN_API_TOKEN" => Some("secret".to_string()),
        _ => None,
    })
    .unwrap();

    assert_eq!(config.api_url, "https://account.api-us1.com");
    assert_eq!(config.api_token, "secret");
    assert_eq!(config.start_date, "2021-12-01T00:00:00Z");
}

#[test]
fn test_missing_credentials_lists_every_variable() {
    let result = TapConfig::from_lookup(|_| None);

    match result {
        Err(ConfigError::MissingCredentials(vars)) => {
            assert_eq!(vars.len(), 2);
            assert!(vars.contains(&"TAP_ACTIVECAMPAIGN_API_URL".to_string()));
            assert!(vars.contains(&"TAP_ACTIVECAMPAIGN_API_TOKEN".to_string()));
        }
        other => panic!("expected MissingCredentials, got {other:?}"),
    }
}

#[test]
fn test_empty_credential_counts_as_missing() {
    let result = TapConfig::from_lookup(|var| match var {
        "TAP_ACTIVECAMPAIGN_API_URL" => Some(String::new()),
        "TAP_ACTIVECAMPAIGN_API_TOKEN" => Some("secret".to_string()),
        _ => None,
    });

    match result {
        Err(ConfigError::MissingCredentials(vars)) => {
            assert_eq!(vars, vec!["TAP_ACTIVECAMPAIGN_API_URL".to_string()]);
        }
        other => panic!("expected MissingCredentials, got {other:?}"),
    }
}

#[test]
fn test_with_start_date_override() {
    let config = TapConfig::from_lookup(|_| Some("value".to_string()))
        .unwrap()
        .with_start_date("2022-03-01T00:00:00Z");

    assert_eq!(config.start_date, "2022-03-01T00:00:00Z");
}

#[test]
fn test_default_start_date_is_canonical() {
    let config = TapConfig::from_lookup(|_| Some("value".to_string())).unwrap();

    // The default must be shiftable as-is.
    let shifted = bookmark::shift_start_date(&config.start_date, 0).unwrap();
    assert_eq!(shifted, config.start_date);
}

#[test]
fn test_exit_status_check_succeeded() {
    let status = ExitStatus {
        discovery_exit_code: Some(0),
        ..Default::default()
    };
    assert!(status.check_succeeded());
    assert!(!status.sync_succeeded());

    let failed = ExitStatus {
        discovery_exit_code: Some(1),
        ..Default::default()
    };
    assert!(!failed.check_succeeded());
}

#[test]
fn test_exit_status_sync_requires_both_processes() {
    let status = ExitStatus {
        tap_exit_code: Some(0),
        target_exit_code: Some(0),
        ..Default::default()
    };
    assert!(status.sync_succeeded());

    let target_failed = ExitStatus {
        tap_exit_code: Some(0),
        target_exit_code: Some(2),
        ..Default::default()
    };
    assert!(!target_failed.sync_succeeded());
}

#[test]
fn test_selected_fields_from_metadata() {
    let metadata = vec![
        // Stream-level entry is skipped
        MetadataEntry {
            breadcrumb: vec![],
            selected: Some(true),
            inclusion: None,
        },
        // Explicitly selected field
        MetadataEntry {
            breadcrumb: vec!["properties".to_string(), "created_by".to_string()],
            selected: Some(true),
            inclusion: Some(Inclusion::Available),
        },
        // Deselected, but automatic inclusion keeps it
        MetadataEntry {
            breadcrumb: vec!["properties".to_string(), "id".to_string()],
            selected: Some(false),
            inclusion: Some(Inclusion::Automatic),
        },
        // Deselected and available: dropped
        MetadataEntry {
            breadcrumb: vec!["properties".to_string(), "links".to_string()],
            selected: Some(false),
            inclusion: Some(Inclusion::Available),
        },
    ];

    let selected = selected_fields_from_metadata(&metadata);

    assert_eq!(selected.len(), 2);
    assert!(selected.contains("created_by"));
    assert!(selected.contains("id"));
    assert!(!selected.contains("links"));
}
