use exec_signals::config::ProfileConfig;
use exec_signals::error::AppError;
use std::io::Write;

pub(crate) fn profile_listing(config: &ProfileConfig) -> Vec<String> {
    let mut lines = Vec::new();
    for company in &config.companies {
        lines.push(format!("Company: {}", company.name));
        for profile in &company.profiles {
            if profile.title.is_empty() {
                lines.push(format!("  - {}: {}", profile.name, profile.linkedin_url));
            } else {
                lines.push(format!(
                    "  - {} ({}): {}",
                    profile.name, profile.title, profile.linkedin_url
                ));
            }
        }
    }
    lines
}

pub(crate) fn run_list_profiles(config: &ProfileConfig) -> Result<(), AppError> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for line in profile_listing(config) {
        writeln!(out, "{line}")?;
    }
    out.flush()?;
    Ok(())
}
