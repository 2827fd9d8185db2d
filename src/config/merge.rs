//! CLI override layer.

use crate::domain::Config;
use std::path::PathBuf;

/// Values given explicitly on the command line. `None` keeps the lower layer.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub skill_name: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub max_file_count: Option<usize>,
    pub max_doc_size: Option<usize>,
    pub clone_depth: Option<u32>,
    pub mirror_enabled: Option<bool>,
    pub mirror_base: Option<String>,
    pub skip_patterns: Option<Vec<String>>,
    pub template_path: Option<PathBuf>,
    pub include_timestamp: Option<bool>,
}

pub fn merge_cli_with_config(mut config: Config, cli: CliOverrides) -> Config {
    if let Some(name) = cli.skill_name {
        config.skill_name = Some(name);
    }
    if let Some(dir) = cli.output_dir {
        config.output_dir = dir;
    }
    if let Some(limit) = cli.max_file_count {
        config.max_file_count = limit;
    }
    if let Some(size) = cli.max_doc_size {
        config.max_doc_size = size;
    }
    if let Some(depth) = cli.clone_depth {
        config.clone_depth = depth;
    }
    if let Some(enabled) = cli.mirror_enabled {
        config.mirror_enabled = enabled;
    }
    if let Some(base) = cli.mirror_base {
        config.mirror_base = base;
    }
    if let Some(patterns) = cli.skip_patterns {
        for pattern in patterns {
            if !config.skip_patterns.contains(&pattern) {
                config.skip_patterns.push(pattern);
            }
        }
    }
    if let Some(path) = cli.template_path {
        config.template_path = Some(path);
    }
    if let Some(stamp) = cli.include_timestamp {
        config.include_timestamp = stamp;
    }
    config
}
