use anyhow::{anyhow, Context, Result};

/// Fetches the target list for this host. Called once at startup.
pub fn fetch_targets(url: &str) -> Result<Vec<String>> {
    log::info!("retrieving targets from {url}");

    let body = ureq::get(url)
        .call()
        .map_err(|err| anyhow!("failed to fetch targets from {url}: {err}"))?
        .into_string()
        .with_context(|| format!("failed to read target list from {url}"))?;

    let targets = parse_targets(&body)?;
    log::info!("retrieved {} targets", targets.len());
    Ok(targets)
}

/// Parses the registry response, a JSON array of address strings.
pub fn parse_targets(body: &str) -> Result<Vec<String>> {
    serde_json::from_str(body).context("target list is not a JSON array of strings")
}
