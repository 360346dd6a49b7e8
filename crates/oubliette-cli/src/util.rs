use anyhow::{bail, Result};

/// Parse the leading "major.minor.patch" out of a version string,
/// tolerating a leading `v` and trailing text (pre-release tags, build
/// info).
pub fn parse_semver(version: &str) -> Result<(u32, u32, u32)> {
    let trimmed = version.trim().trim_start_matches(['v', 'V']);

    let mut parts = trimmed.splitn(3, '.');
    let major = parse_component(parts.next(), version, "major")?;
    let minor = parse_component(parts.next(), version, "minor")?;

    // The patch component may be followed by junk ("0-rc1", "0 (abc)").
    let patch_text = parts.next().unwrap_or("");
    let digits: String = patch_text.chars().take_while(char::is_ascii_digit).collect();
    if digits.is_empty() {
        bail!("Failed to parse the patch version number from: {version}");
    }
    let patch = digits
        .parse()
        .map_err(|_| anyhow::anyhow!("Failed to parse the patch version number from: {version}"))?;

    Ok((major, minor, patch))
}

fn parse_component(part: Option<&str>, version: &str, which: &str) -> Result<u32> {
    let Some(text) = part else {
        bail!("Failed to parse the {which} version number from: {version}");
    };
    match text.parse() {
        Ok(value) => Ok(value),
        Err(_) => bail!("Failed to parse the {which} version number from: {version}"),
    }
}

/// Current wall-clock time, e.g. "1:23:45 AM". Used for build-finished
/// messages.
pub fn time_now() -> String {
    chrono::Local::now().format("%-I:%M:%S %p").to_string()
}
