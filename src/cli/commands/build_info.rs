use crate::build_info::BuildInfo;
use crate::cli::{utils, OutputFormat};

pub fn handle(output_format: OutputFormat) -> anyhow::Result<()> {
    let info = BuildInfo::from_build_env();
    let text = format!(
        "{} {} (commit {}, build {}, {})",
        info.name,
        info.version,
        display(&info.commit_hash),
        display(&info.build_number),
        info.build_date
    );
    utils::output(output_format, &info, &text)
}

fn display(value: &str) -> &str {
    if value.is_empty() {
        "unknown"
    } else {
        value
    }
}
