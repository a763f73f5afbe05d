use crate::sweep::Run;
use std::path::Path;
use tracing::debug;

/// How every run of a script is invoked
#[derive(Debug, Clone, Copy)]
pub struct ScriptOptions<'a> {
    pub binary: &'a Path,
    /// seconds per invocation
    pub runtime: f64,
    pub repeats: usize,
    /// `(pool dir, pool size)` when allocating from NVRAM
    pub nvram: Option<(&'a str, &'a str)>,
    pub dram_prefix: &'a str,
    pub nvram_prefix: &'a str,
    pub numa_prefix: &'a str,
}

/// benchmark command line for a single run
pub fn invocation(run: &Run, options: &ScriptOptions) -> String {
    format!(
        "{} --ds {} --version {} --persist {} --update {} --size {} --threads {} --runtime {}",
        options.binary.display(),
        run.datastructure.as_str(),
        run.version.as_str(),
        run.persist.as_str(),
        run.update,
        run.size,
        run.threads,
        options.runtime
    )
}

/// Render the bash script executing all runs in order
pub fn render_script(runs: &[Run], options: &ScriptOptions) -> String {
    let mut script = String::new();

    let (banner, prefixes) = match options.nvram {
        Some((pool_dir, pool_size)) => {
            script.push_str(&format!("export VMMALLOC_POOL_DIR={pool_dir}\n"));
            script.push_str(&format!("export VMMALLOC_POOL_SIZE={pool_size}\n"));
            ("NVM", [options.nvram_prefix, options.numa_prefix])
        }
        None => ("DRAM", [options.dram_prefix, ""]),
    };

    let prefix: String = prefixes
        .iter()
        .filter(|prefix| !prefix.is_empty())
        .map(|prefix| format!("{prefix} "))
        .collect();

    for run in runs {
        let command = format!(
            "echo 'running on {banner}'\n{prefix}{}\n",
            invocation(run, options)
        );
        debug!("{}", command.trim_end());

        for _ in 0..options.repeats {
            script.push_str(&command);
        }
    }

    script
}
