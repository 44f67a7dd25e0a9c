pub mod builders;
pub mod fake_subscriber;
pub mod recorder;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use ghostwriter::logging::LOG_ENV;
use tracing_subscriber::{fmt, EnvFilter};

pub use builders::{mock_session, tree_session, ConfigFileBuilder, RuleBuilder};
pub use fake_subscriber::FakeSubscriber;
pub use recorder::CallRecorder;

static INIT: Once = Once::new();

/// Install a test-writer subscriber once per test binary.
///
/// Output is captured by the harness and only shown for failing tests (or
/// with `--nocapture`). The filter comes from `GHOSTWRITER_LOG`, as in the
/// binary, defaulting to `warn` so passing runs stay quiet.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = std::env::var(LOG_ENV)
            .ok()
            .and_then(|s| EnvFilter::try_new(s).ok())
            .unwrap_or_else(|| EnvFilter::new("warn"));

        // Something else may already have installed a global subscriber.
        let _ = fmt().with_env_filter(filter).with_test_writer().try_init();
    });
}

/// Await `f`, failing the test if it takes longer than five seconds.
///
/// Watch loops that never see their shutdown condition would otherwise hang
/// the whole test run.
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: Future<Output = T>,
{
    tokio::time::timeout(Duration::from_secs(5), f)
        .await
        .expect("test timed out after 5 seconds")
}
