//! Mint an admin bearer token for the dashboard endpoints.
//!
//! Usage: `issue-token <subject> [hours]`

use anyhow::{Context, bail};
use tea_storefront_api::middleware::auth::{ADMIN_ROLE, issue_token};

const DEFAULT_TTL_HOURS: i64 = 12;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let secret = std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?;

    let mut args = std::env::args().skip(1);
    let Some(subject) = args.next() else {
        bail!("usage: issue-token <subject> [hours]");
    };
    let hours = match args.next() {
        Some(raw) => raw
            .parse::<i64>()
            .with_context(|| format!("invalid hour count '{raw}'"))?,
        None => DEFAULT_TTL_HOURS,
    };
    if hours <= 0 {
        bail!("hours must be positive");
    }

    let token = issue_token(&secret, &subject, ADMIN_ROLE, chrono::Duration::hours(hours))?;
    println!("{token}");
    Ok(())
}
