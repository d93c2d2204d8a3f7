use axum::http::StatusCode;
use once_cell::sync::Lazy;
use prometheus::{register_int_counter, Encoder, IntCounter, TextEncoder};

// Prometheus metrics (default registry)
pub static SIGNUPS_ACCEPTED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("beta_signup_accepted_total", "Signups written to the store")
        .expect("register accepted_total")
});

pub static SIGNUPS_REJECTED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "beta_signup_rejected_total",
        "Signups refused for invalid input or a duplicate email"
    )
    .expect("register rejected_total")
});

pub static SIGNUPS_FAILED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "beta_signup_failed_total",
        "Signups that hit an internal error"
    )
    .expect("register failed_total")
});

/// Touch every counter so they are exported before the first signup.
pub fn init() {
    Lazy::force(&SIGNUPS_ACCEPTED_TOTAL);
    Lazy::force(&SIGNUPS_REJECTED_TOTAL);
    Lazy::force(&SIGNUPS_FAILED_TOTAL);
}

pub fn encode_metrics() -> (StatusCode, String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("metrics encode error: {e}"),
        );
    }
    (StatusCode::OK, String::from_utf8(buffer).unwrap_or_default())
}
