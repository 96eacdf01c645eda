use anyhow::{Context, Result, bail};
use clap::Parser;
use lumen_demos::routes::{self, DemoKind, Route};
use lumen_demos::{CityDemo, CubeDemo, GalaxyDemo, TextDemo};
use lumen_engine::device::GpuInit;
use lumen_engine::headless::HeadlessMount;
use lumen_engine::lifecycle::{
    Content, DEFAULT_DRAG_SENSITIVITY, FrameOutcome, MountOutcome, Stage, StageSettings, apply_options,
};
use lumen_engine::logging::{LoggingConfig, init_logging};
use lumen_engine::time::FixedClock;
use lumen_engine::window::{Runtime, RuntimeConfig};

/// Opens one of the lumen demo scenes.
#[derive(Debug, Parser)]
#[command(name = "lumen-studio", version)]
struct Cli {
    /// Route to open (`/cube`, `/galaxy`, `/city`, ...).
    #[arg(default_value = "/")]
    route: String,

    /// Print the route table and exit.
    #[arg(long)]
    list: bool,

    /// Allow routes that are not linked from navigation.
    #[arg(long)]
    include_hidden: bool,

    /// Scene option, applied in order (e.g. `--set color=#ff0066`).
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_option)]
    options: Vec<(String, String)>,

    #[arg(long, default_value_t = 1280.0)]
    width: f64,

    #[arg(long, default_value_t = 720.0)]
    height: f64,

    /// Run without a window against the recording mount point.
    #[arg(long)]
    headless: bool,

    /// Frames to run in headless mode.
    #[arg(long, default_value_t = 120)]
    frames: u64,

    /// Drag rotation in radians per logical pixel.
    #[arg(long, default_value_t = DEFAULT_DRAG_SENSITIVITY)]
    sensitivity: f32,

    /// Request the low-power adapter.
    #[arg(long)]
    low_power: bool,

    /// Log filter in `env_logger` syntax; overrides `RUST_LOG`.
    #[arg(long, value_name = "FILTER")]
    log: Option<String>,
}

fn parse_option(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got `{s}`")),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(match &cli.log {
        Some(filter) => LoggingConfig::with_filter(filter),
        None => LoggingConfig::default(),
    });

    if cli.list {
        print_routes(cli.include_hidden);
        return Ok(());
    }

    let route = routes::resolve(&cli.route, cli.include_hidden)?;
    match route.demo {
        DemoKind::Index => {
            print_routes(cli.include_hidden);
            Ok(())
        }
        DemoKind::Cube => run_demo(&cli, route, CubeDemo),
        DemoKind::Galaxy => run_demo(&cli, route, GalaxyDemo),
        DemoKind::Text => run_demo(&cli, route, TextDemo),
        DemoKind::City => run_demo(&cli, route, CityDemo),
    }
}

fn print_routes(include_hidden: bool) {
    println!();
    for route in routes::listed(include_hidden) {
        let note = if route.reachable { "" } else { "  (hidden)" };
        println!("  {:<10} {}{note}", route.path, route.title);
    }
    println!();
}

fn run_demo<C>(cli: &Cli, route: &Route, content: C) -> Result<()>
where
    C: Content + 'static,
    C::Config: Default,
{
    let mut config = C::Config::default();
    apply_options(&mut config, &cli.options)
        .with_context(|| format!("invalid option for {}", route.path))?;

    let settings = StageSettings { drag_sensitivity: cli.sensitivity };

    if cli.headless {
        return run_headless(cli, content, config, settings);
    }

    let runtime = RuntimeConfig {
        title: format!("lumen · {}", route.title),
        initial_size: winit::dpi::LogicalSize::new(cli.width, cli.height),
        ..RuntimeConfig::default()
    };
    let gpu_init = GpuInit {
        power_preference: if cli.low_power {
            wgpu::PowerPreference::LowPower
        } else {
            wgpu::PowerPreference::HighPerformance
        },
        ..GpuInit::default()
    };

    Runtime::run(runtime, gpu_init, settings, content, config)
}

fn run_headless<C: Content>(
    cli: &Cli,
    content: C,
    config: C::Config,
    settings: StageSettings,
) -> Result<()> {
    let name = content.name();
    let mount = HeadlessMount::new(cli.width as f32, cli.height as f32);
    let mut stage = Stage::with_settings(mount, content, settings);

    if let MountOutcome::Fallback(err) = stage.mount(config) {
        bail!("{name}: could not mount: {err}");
    }

    let mut clock = FixedClock::new(1.0 / 60.0);
    let (mut drawn, mut skipped) = (0u64, 0u64);
    for _ in 0..cli.frames {
        match stage.step(clock.tick()) {
            Some(FrameOutcome::Drawn) => drawn += 1,
            Some(FrameOutcome::Skipped) => skipped += 1,
            Some(FrameOutcome::Stopped) => {
                log::warn!("{name}: driver stopped early");
                break;
            }
            Some(FrameOutcome::Ignored) | None => break,
        }
    }

    let objects = stage.world().map_or(0, |w| w.len());
    let points = stage.world().map_or(0, |w| w.point_count());
    let report = stage.unmount().context("scene was not mounted")?;

    log::info!("{name}: {drawn} frames drawn, {skipped} skipped");
    println!();
    println!("  {name}: {objects} objects, {points} points");
    println!("  frames    {drawn} drawn, {skipped} skipped, {} draw calls", stage.mount_point().draws());
    let steps: Vec<String> = report.steps.iter().map(ToString::to_string).collect();
    println!("  teardown  {}", steps.join(" -> "));
    println!(
        "            {} listeners removed, {} resources released",
        report.listeners_removed, report.resources_released
    );
    println!();

    if !report.is_complete() {
        bail!("{name}: teardown incomplete");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_set_options() {
        let cli = Cli::try_parse_from([
            "lumen-studio",
            "/cube",
            "--set",
            "color=#ff0066",
            "--set",
            "size=2",
            "--headless",
        ])
        .unwrap();
        assert_eq!(cli.route, "/cube");
        assert!(cli.headless);
        assert_eq!(
            cli.options,
            vec![
                ("color".to_string(), "#ff0066".to_string()),
                ("size".to_string(), "2".to_string()),
            ]
        );
    }

    #[test]
    fn rejects_options_without_a_key() {
        assert!(parse_option("=3").is_err());
        assert!(parse_option("size").is_err());
        assert_eq!(parse_option("text=A=B"), Ok(("text".into(), "A=B".into())));
    }

    #[test]
    fn headless_cube_runs_and_tears_down() {
        let cli = Cli::try_parse_from(["lumen-studio", "/cube", "--headless", "--frames", "10"]).unwrap();
        let route = routes::resolve(&cli.route, false).unwrap();
        run_demo(&cli, route, CubeDemo).unwrap();
    }

    #[test]
    fn bad_option_values_fail_before_mounting() {
        let cli =
            Cli::try_parse_from(["lumen-studio", "/cube", "--headless", "--set", "size=99"]).unwrap();
        let route = routes::resolve(&cli.route, false).unwrap();
        assert!(run_demo(&cli, route, CubeDemo).is_err());
    }
}
