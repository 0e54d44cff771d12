// Entrypoint for the smoke run.
// - Keeps `main` small: create an API client and hand it to the scenario.
// - Returns `anyhow::Result` so a transport failure aborts with a non-zero
//   exit code.

use quickdesk_smoke::{api::ApiClient, scenario, ui::Reporter};
use std::io::IsTerminal;

fn main() -> anyhow::Result<()> {
    // Base URL comes from `QUICKDESK_API_URL` or defaults to
    // http://localhost:5000. See `api::ApiClient::from_env`.
    let api = ApiClient::from_env()?;

    let stdout = std::io::stdout();
    let color = stdout.is_terminal();
    let mut reporter = Reporter::new(stdout.lock())
        .with_color(color)
        .with_progress(true);

    scenario::run(&api, &mut reporter)?;
    Ok(())
}
