use anyhow::{anyhow, Result};

/// Thread count from "auto" or a number; `0` lets the pools use every core.
pub fn resolve_threads(spec: &str) -> usize {
    if spec.eq_ignore_ascii_case("auto") {
        num_cpus::get()
    } else {
        spec.trim().parse().unwrap_or_else(|_| num_cpus::get())
    }
}

/// Split a comma-separated list of positive volumes.
pub fn parse_volumes(spec: &str) -> Result<Vec<f64>> {
    let volumes = spec
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<f64>()
                .map_err(|_| anyhow!("invalid volume '{s}' in --volumes"))
        })
        .collect::<Result<Vec<_>>>()?;
    if volumes.is_empty() {
        return Err(anyhow!("--volumes lists no volume"));
    }
    Ok(volumes)
}
