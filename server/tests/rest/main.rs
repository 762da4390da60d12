//! Integration tests for the REST API.
//!
//! Each test builds a full router against a fresh SQLite database with
//! migrations applied, then drives it with `tower::ServiceExt::oneshot`.

mod auth;
mod content;
mod init;

#[ctor::ctor]
fn global_test_setup() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .init();
}
