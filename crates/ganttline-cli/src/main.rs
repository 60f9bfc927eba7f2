//! ganttline CLI - Gantt chart layout engine
//!
//! Command-line interface for rendering task documents and replaying
//! pointer events through the interaction router.

mod config;
mod document;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use ganttline_core::{ChannelHost, ChartInput, DedupPolicy, HostCommand, LegendPosition, Point, UiState};
use ganttline_render::{
    route, rows::group_label, ChartEvent, ChartScene, GanttChart, Renderer, Row, SvgRenderer, Tooltip,
};
use std::io::Write;
use std::path::PathBuf;
use std::sync::mpsc;
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use config::{parse_zoom, ChartConfig};

#[derive(Parser)]
#[command(name = "ganttline")]
#[command(author, version, about = "Gantt chart layout engine", long_about = None)]
struct Cli {
    /// Verbose output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a task document to SVG
    Render {
        #[command(flatten)]
        chart: ChartArgs,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the flattened rows and the temporal domain
    Rows {
        #[command(flatten)]
        chart: ChartArgs,
    },

    /// Print legend entries
    Legend {
        #[command(flatten)]
        chart: ChartArgs,
    },

    /// Print the tooltip of a task
    Tooltip {
        #[command(flatten)]
        chart: ChartArgs,

        /// Task id
        #[arg(long)]
        task: String,

        /// Print the HTML fragment instead of plain text
        #[arg(long)]
        html: bool,
    },

    /// Click a body-space point and print the resulting host commands
    Click {
        #[command(flatten)]
        chart: ChartArgs,

        #[arg(long, allow_hyphen_values = true)]
        x: f64,

        #[arg(long, allow_hyphen_values = true)]
        y: f64,

        /// Secondary (context-menu) click
        #[arg(long)]
        context: bool,
    },
}

/// Options shared by every subcommand
#[derive(Args)]
struct ChartArgs {
    /// Task document (JSON)
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Chart options file (TOML); flags take precedence
    #[arg(short, long, env = "GANTTLINE_CONFIG")]
    config: Option<PathBuf>,

    /// Viewport width in pixels
    #[arg(long)]
    width: Option<f64>,

    /// Viewport height in pixels
    #[arg(long)]
    height: Option<f64>,

    /// Zoom slider handles as START:END percent
    #[arg(long, value_parser = parse_zoom)]
    zoom: Option<(u8, u8)>,

    /// Collapse a group (repeatable)
    #[arg(long = "collapse", value_name = "GROUP")]
    collapsed: Vec<String>,

    /// Legend position (top, bottom, left, right)
    #[arg(long)]
    legend_position: Option<LegendPosition>,

    #[arg(long)]
    legend_font_size: Option<f64>,

    /// Keep duplicate task ids instead of deduplicating by id
    #[arg(long)]
    raw: bool,

    /// Pin the clock (RFC 3339) for the today marker
    #[arg(long)]
    now: Option<DateTime<Utc>>,
}

impl ChartArgs {
    fn flag_config(&self) -> ChartConfig {
        ChartConfig {
            width: self.width,
            height: self.height,
            legend_position: self.legend_position,
            legend_font_size: self.legend_font_size,
            dedup: self.raw.then_some(DedupPolicy::Raw),
            zoom: self.zoom,
            collapsed: self.collapsed.clone(),
            now: self.now,
        }
    }

    /// Load the document and resolve options into layout input and UI state
    fn prepare(&self) -> Result<(ChartInput, UiState)> {
        let file_config = match &self.config {
            Some(path) => ChartConfig::load(path)?,
            None => ChartConfig::default(),
        };
        let config = file_config.merge(self.flag_config());
        let document = document::load(&self.file)?;
        let ui = config.ui_state()?;
        Ok((config.chart_input(document), ui))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing; RUST_LOG wins over -v
    let default_level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    match cli.command {
        Commands::Render { chart, output } => cmd_render(&chart, output),
        Commands::Rows { chart } => cmd_rows(&chart),
        Commands::Legend { chart } => cmd_legend(&chart),
        Commands::Tooltip { chart, task, html } => cmd_tooltip(&chart, &task, html),
        Commands::Click { chart, x, y, context } => cmd_click(&chart, Point::new(x, y), context),
    }
}

fn cmd_render(chart: &ChartArgs, output: Option<PathBuf>) -> Result<()> {
    let (input, ui) = chart.prepare()?;
    let scene = GanttChart::new().layout(&input, &ui);
    let svg = SvgRenderer::default()
        .render(&scene)
        .context("failed to render SVG")?;

    match output {
        Some(path) => {
            std::fs::write(&path, svg).with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), "wrote chart");
        }
        None => print!("{}", svg),
    }
    Ok(())
}

fn cmd_rows(chart: &ChartArgs) -> Result<()> {
    let (input, ui) = chart.prepare()?;
    let scene = GanttChart::new().layout(&input, &ui);
    let mut out = std::io::stdout().lock();
    write_rows(&mut out, &scene)?;
    Ok(())
}

fn write_rows(out: &mut impl Write, scene: &ChartScene) -> std::io::Result<()> {
    let domain = &scene.domain;
    if domain.has_valid_tasks {
        writeln!(
            out,
            "domain: {} - {}",
            ganttline_render::short_date(domain.min),
            ganttline_render::short_date(domain.max)
        )?;
    } else {
        writeln!(out, "domain: empty")?;
    }
    writeln!(out, "visible: {} - {}", scene.axis.start_label, scene.axis.end_label)?;

    for (index, row) in scene.rows.iter().enumerate() {
        match row {
            Row::Group { key, collapsed } => {
                let marker = if *collapsed { "+" } else { "-" };
                writeln!(out, "[{}] {}", marker, group_label(key))?;
            }
            Row::Item { task, .. } => {
                let task = &scene.tasks[*task];
                match scene.bar_on_row(index) {
                    Some(bar) => writeln!(out, "    {} ({}) {}", task.name, task.id, bar.progress_label)?,
                    None => writeln!(out, "    {} ({}) no dates", task.name, task.id)?,
                }
            }
        }
    }
    Ok(())
}

fn cmd_legend(chart: &ChartArgs) -> Result<()> {
    let (input, ui) = chart.prepare()?;
    let scene = GanttChart::new().layout(&input, &ui);
    for item in &scene.legend.items {
        println!("{}\t{}", item.entry.value, item.entry.color);
    }
    Ok(())
}

fn cmd_tooltip(chart: &ChartArgs, task_id: &str, html: bool) -> Result<()> {
    let (input, ui) = chart.prepare()?;
    let scene = GanttChart::new().layout(&input, &ui);
    let (index, task) = scene
        .tasks
        .iter()
        .enumerate()
        .find(|(_, task)| task.id == task_id)
        .ok_or_else(|| anyhow!("no task with id '{}'", task_id))?;

    let tooltip = Tooltip::new(index, task, &input, Point::default());
    if html {
        println!("{}", tooltip.to_html());
    } else {
        println!("{}", tooltip.to_text());
    }
    Ok(())
}

fn cmd_click(chart: &ChartArgs, point: Point, context: bool) -> Result<()> {
    let (input, mut ui) = chart.prepare()?;
    let layout = GanttChart::new();
    let scene = layout.layout(&input, &ui);

    let Some(target) = scene.hit_test(point) else {
        println!("no target at ({}, {})", point.x, point.y);
        return Ok(());
    };
    debug!(?target, "hit");

    let Some(event) = ChartEvent::for_click(&target, context.then_some(point)) else {
        println!("nothing to do for {:?}", target);
        return Ok(());
    };

    let (sender, receiver) = mpsc::channel();
    let host = ChannelHost::new(sender);
    let outcome = route(&event, &scene, &mut ui, Some(&host));
    drop(host);

    for command in receiver.iter() {
        match command {
            HostCommand::Select { identity, additive } => {
                println!("select {} additive={}", identity, additive);
            }
            HostCommand::LaunchContextMenu { selection_id, position } => {
                println!("context-menu {} at ({}, {})", selection_id, position.x, position.y);
            }
        }
    }

    if outcome.suppress_default_menu {
        println!("default menu suppressed");
    }
    if outcome.needs_layout {
        let next = layout.layout(&input, &ui);
        let mut out = std::io::stdout().lock();
        write_rows(&mut out, &next)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use ganttline_core::Task;

    #[test]
    fn rows_listing() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 1, 20, 0, 0, 0).unwrap();
        let input = ChartInput::new(1000.0, 600.0)
            .now(start)
            .task(Task::new("1").name("Design").group("A").span(start, end).progress(0.5))
            .task(Task::new("2").name("Review").group(""));
        let scene = GanttChart::new().layout(&input, &UiState::new());

        let mut out = Vec::new();
        write_rows(&mut out, &scene).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "domain: 1/1/2024 - 1/20/2024\nvisible: 1/1/2024 - 1/20/2024\n[-] A\n    Design (1) 50%\n[-] Not Assigned\n    Review (2) no dates\n"
        );
    }

    #[test]
    fn cli_parses_click() {
        let cli = Cli::try_parse_from(["ganttline", "click", "tasks.json", "--x", "300", "--y", "40", "--context"]).unwrap();
        match cli.command {
            Commands::Click { x, y, context, .. } => {
                assert_eq!((x, y, context), (300.0, 40.0, true));
            }
            _ => panic!("expected click"),
        }
    }

    #[test]
    fn cli_parses_chart_flags() {
        let cli = Cli::try_parse_from([
            "ganttline",
            "render",
            "tasks.json",
            "--zoom",
            "10:90",
            "--collapse",
            "A",
            "--collapse",
            "B",
            "--legend-position",
            "right",
            "--raw",
        ])
        .unwrap();
        let Commands::Render { chart, output } = cli.command else {
            panic!("expected render");
        };
        let flags = chart.flag_config();
        assert_eq!(output, None);
        assert_eq!(flags.zoom, Some((10, 90)));
        assert_eq!(flags.collapsed, vec!["A", "B"]);
        assert_eq!(flags.legend_position, Some(LegendPosition::Right));
        assert_eq!(flags.dedup, Some(DedupPolicy::Raw));
    }
}
