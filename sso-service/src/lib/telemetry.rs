use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::Env;

/// Install the global tracing subscriber for the given environment.
///
/// `local` logs human-readable lines, `dev` and `prod` log JSON.
/// `RUST_LOG` takes precedence over the per-environment default level.
pub fn init(env: Env) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_directives(env).into());

    let registry = tracing_subscriber::registry().with(filter);

    match env {
        Env::Local => registry
            .with(tracing_subscriber::fmt::layer().pretty())
            .init(),
        Env::Dev | Env::Prod => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}

fn default_directives(env: Env) -> &'static str {
    match env {
        Env::Local | Env::Dev => "sso_service=debug,migrator=debug",
        Env::Prod => "sso_service=info,migrator=info",
    }
}
