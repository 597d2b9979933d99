//! Per-client rate limiting.
//!
//! Clients are keyed by IP address, taken from `X-Forwarded-For`/`X-Real-IP`
//! when present and from the peer address otherwise, so the server must be
//! started with `into_make_service_with_connect_info`.

/// Seconds between replenished requests for ordinary endpoints.
pub const GENERAL_REPLENISH_SECONDS: u64 = 1;
pub const GENERAL_BURST_SIZE: u32 = 30;

/// The stateless grading endpoint is cheap to call and easy to hammer.
pub const GRADE_REPLENISH_SECONDS: u64 = 1;
pub const GRADE_BURST_SIZE: u32 = 10;

/// Build a `GovernorLayer` keyed on the client IP.
///
/// One request is replenished every `$replenish_seconds`, up to `$burst_size`.
///
/// ```ignore
/// Router::new()
///     .route("/grade", post(grade))
///     .layer(make_rate_limit_layer!(
///         rate_limit::GRADE_REPLENISH_SECONDS,
///         rate_limit::GRADE_BURST_SIZE
///     ));
/// ```
#[macro_export]
macro_rules! make_rate_limit_layer {
    ($replenish_seconds:expr, $burst_size:expr) => {{
        let config = ::tower_governor::governor::GovernorConfigBuilder::default()
            .per_second($replenish_seconds)
            .burst_size($burst_size)
            .key_extractor(::tower_governor::key_extractor::SmartIpKeyExtractor)
            .use_headers()
            .finish()
            .expect("rate limit period and burst size must be non-zero");

        ::tower_governor::GovernorLayer::new(config)
    }};
}
