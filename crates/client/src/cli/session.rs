//! Session CLI arguments.

use clap::Args;

/// Arguments for `login`.
#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Owner id the session belongs to.
    #[arg(long)]
    pub owner: String,
    /// Opaque credential issued by the auth service.
    #[arg(long, env = "DAYBOOK_TOKEN", hide_env_values = true)]
    pub token: String,
}
