// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::http::StatusCode;
use axum::response::IntoResponse;
use vitals_tracker::error::AppError;

#[test]
fn test_error_status_codes() {
    let cases = [
        (AppError::Unauthorized, StatusCode::UNAUTHORIZED),
        (AppError::InvalidToken, StatusCode::UNAUTHORIZED),
        (AppError::NotFound("user".into()), StatusCode::NOT_FOUND),
        (AppError::BadRequest("steps".into()), StatusCode::BAD_REQUEST),
        (AppError::Advisor("down".into()), StatusCode::BAD_GATEWAY),
        (AppError::Database("offline".into()), StatusCode::INTERNAL_SERVER_ERROR),
        (AppError::Mirror("disk full".into()), StatusCode::INTERNAL_SERVER_ERROR),
    ];

    for (err, expected) in cases {
        assert_eq!(err.into_response().status(), expected);
    }
}

#[test]
fn test_validation_errors_become_bad_request() {
    let mut errors = validator::ValidationErrors::new();
    errors.add("hours", validator::ValidationError::new("range"));

    let err: AppError = errors.into();
    match err {
        AppError::BadRequest(msg) => assert!(msg.contains("hours")),
        other => panic!("unexpected error: {other:?}"),
    }
}
