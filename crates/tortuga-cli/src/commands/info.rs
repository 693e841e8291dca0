//! `tortuga info`: Display configuration and environment.

use tortuga_resolve::RESOLVING_EXTENSIONS;
use tortuga_runner::{ConsoleTestRunner, MsTestRunner};

use super::{Context, Outcome};

pub fn execute(ctx: &mut Context) -> anyhow::Result<Outcome> {
    let config = &ctx.config.config;
    let runner = MsTestRunner::new(config.runner.clone());
    let located = runner.locate_executable();

    if ctx.json {
        let report = serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
            "platform": { "os": std::env::consts::OS, "arch": std::env::consts::ARCH },
            "config": ctx.config.source,
            "resolver": {
                "probe_dirs": config.resolver.probe_dirs,
                "extensions": RESOLVING_EXTENSIONS,
            },
            "runner": {
                "executable": config.runner.executable,
                "located": located,
                "search_dirs": runner.search_path(),
            },
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(Outcome::Success);
    }

    let out = &mut ctx.out;
    out.bold(&format!("Tortuga v{}", env!("CARGO_PKG_VERSION")));
    out.newline();
    out.newline();

    out.plain(&format!(
        "Platform:     {} ({})",
        std::env::consts::OS,
        std::env::consts::ARCH
    ));
    out.newline();
    match &ctx.config.source {
        Some(path) => out.plain(&format!("Config:       {}", path.display())),
        None => out.plain("Config:       (defaults)"),
    }
    out.newline();

    out.newline();
    out.plain("Resolver:");
    out.newline();
    out.plain(&format!("  Extensions: {}", RESOLVING_EXTENSIONS.join(", ")));
    out.newline();
    if config.resolver.probe_dirs.is_empty() {
        out.dim("  No probe directories");
        out.newline();
    }
    for dir in &config.resolver.probe_dirs {
        out.plain("  Probe:      ");
        out.info(&dir.display().to_string());
        out.newline();
    }

    out.newline();
    out.plain("Runner:");
    out.newline();
    out.plain(&format!("  Executable: {}", config.runner.executable));
    out.newline();
    match located {
        Some(path) => {
            out.plain("  Located:    ");
            out.info(&path.display().to_string());
        }
        None => out.warning("  Located:    not found"),
    }
    out.newline();

    out.newline();
    out.plain("Environment:");
    out.newline();
    print_env(out, "  TORTUGA_LOG", "TORTUGA_LOG");
    print_env(out, "  NO_COLOR", "NO_COLOR");

    Ok(Outcome::Success)
}

fn print_env(out: &mut crate::output::StyledOutput, label: &str, var: &str) {
    match std::env::var(var) {
        Ok(val) => out.plain(&format!("{} = {}", label, val)),
        Err(_) => out.dim(&format!("{} = (unset)", label)),
    }
    out.newline();
}
