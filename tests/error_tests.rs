//! Tests for the error system.

use colloquy::error::*;

#[test]
fn error_api_creation() {
    let err = ColloquyError::api(404, "Not found");
    assert!(matches!(&err, ColloquyError::Api { status: 404, .. }));
    assert_eq!(err.to_string(), "API error (status 404): Not found");
}

#[test]
fn error_helper_mappings_are_stable_for_major_variants() {
    struct Case {
        error: ColloquyError,
        expected_category: ErrorCategory,
        expected_retryable: bool,
    }

    let network_error = reqwest::Client::new()
        .get("http://[::1")
        .build()
        .unwrap_err();
    let io_error = std::io::Error::new(std::io::ErrorKind::Other, "disk");

    let cases = vec![
        Case {
            error: ColloquyError::Validation("prompt is required".to_string()),
            expected_category: ErrorCategory::Validation,
            expected_retryable: false,
        },
        Case {
            error: ColloquyError::InvalidArgument("get_weather: missing location".to_string()),
            expected_category: ErrorCategory::Validation,
            expected_retryable: false,
        },
        Case {
            error: ColloquyError::RateLimited {
                retry_after_ms: Some(1000),
            },
            expected_category: ErrorCategory::RateLimit,
            expected_retryable: true,
        },
        Case {
            error: ColloquyError::Timeout(5000),
            expected_category: ErrorCategory::Timeout,
            expected_retryable: true,
        },
        Case {
            error: ColloquyError::Network(network_error),
            expected_category: ErrorCategory::Network,
            expected_retryable: true,
        },
        Case {
            error: ColloquyError::api(401, "Unauthorized"),
            expected_category: ErrorCategory::Authentication,
            expected_retryable: false,
        },
        Case {
            error: ColloquyError::api(503, "Server unavailable"),
            expected_category: ErrorCategory::Provider,
            expected_retryable: true,
        },
        Case {
            error: ColloquyError::api(418, "Teapot"),
            expected_category: ErrorCategory::Provider,
            expected_retryable: false,
        },
        Case {
            error: ColloquyError::ToolNotFound("launch_rockets".to_string()),
            expected_category: ErrorCategory::ToolDispatch,
            expected_retryable: false,
        },
        Case {
            error: ColloquyError::ToolResolutionLimitExceeded { limit: 10 },
            expected_category: ErrorCategory::ToolDispatch,
            expected_retryable: false,
        },
        Case {
            error: ColloquyError::repository("s1", "disk full"),
            expected_category: ErrorCategory::Persistence,
            expected_retryable: false,
        },
        Case {
            error: ColloquyError::Retrieval("unreadable pdf".to_string()),
            expected_category: ErrorCategory::Retrieval,
            expected_retryable: false,
        },
        Case {
            error: ColloquyError::Canceled,
            expected_category: ErrorCategory::Canceled,
            expected_retryable: false,
        },
        Case {
            error: ColloquyError::Io(io_error),
            expected_category: ErrorCategory::Unknown,
            expected_retryable: false,
        },
    ];

    for case in cases {
        assert_eq!(case.error.category(), case.expected_category, "{}", case.error);
        assert_eq!(case.error.is_retryable(), case.expected_retryable, "{}", case.error);
    }
}

#[test]
fn repository_error_names_the_session() {
    let err = ColloquyError::repository("user-42", "permission denied");
    assert_eq!(
        err.to_string(),
        "Session repository error for 'user-42': permission denied"
    );
}

#[test]
fn limit_error_reports_the_bound() {
    let err = ColloquyError::ToolResolutionLimitExceeded { limit: 3 };
    assert_eq!(err.to_string(), "Tool resolution limit exceeded after 3 rounds");
}
