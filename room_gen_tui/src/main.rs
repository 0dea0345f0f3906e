use anyhow::{Context, Result, bail};
use clap::Parser;
use rand::{SeedableRng, rngs::StdRng};
use ratatui::{
    crossterm::{
        self,
        event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
        execute,
        terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
    },
    prelude::*,
    widgets::*,
};
use room_gen_core::{
    builder::{Branch, GenerationReport, RoomBuilder},
    camera::{CameraFrame, CameraTarget},
    config::RoomConfig,
    layout::{RoomLayoutAsset, load_layout_from_json, load_layout_from_map},
    map::Grid,
    placement::Prototypes,
};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::{
    fs::File,
    io::{self, Stdout},
    ops::Range,
    path::{Path, PathBuf},
    time::Duration,
};

/// Largest room side the viewer will rasterize.
const MAX_ROOM_SIDE: i32 = 1024;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Layout file to replay (`.json`, or a token map otherwise)
    #[arg(short, long, value_name = "LAYOUT_FILE")]
    layout: Option<PathBuf>,

    /// Room width for procedural generation
    #[arg(long, default_value_t = RoomConfig::default().room_width)]
    width: i32,

    /// Room height for procedural generation
    #[arg(long, default_value_t = RoomConfig::default().room_height)]
    height: i32,

    /// Number of random obstacles
    #[arg(long, default_value_t = RoomConfig::default().obstacle_count)]
    obstacles: usize,

    /// Number of random items
    #[arg(long, default_value_t = RoomConfig::default().item_count)]
    items: usize,

    /// Do not place random obstacles
    #[arg(long)]
    no_obstacles: bool,

    /// Do not place random items
    #[arg(long)]
    no_items: bool,

    /// Seed for the random placement
    #[arg(short, long)]
    seed: Option<u64>,

    /// Print the room as text instead of opening the viewer
    #[arg(short, long)]
    print: bool,

    /// Write log output to this file
    #[arg(long, value_name = "LOG_FILE")]
    log_file: Option<PathBuf>,

    /// Log debug messages
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn room_config(&self) -> RoomConfig {
        RoomConfig {
            room_width: self.width,
            room_height: self.height,
            generate_random_obstacles: !self.no_obstacles,
            obstacle_count: self.obstacles,
            generate_random_items: !self.no_items,
            item_count: self.items,
            frame_camera: true,
        }
    }
}

/// How a placed cell is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Glyph {
    symbol: &'static str,
    color: Color,
}

fn glyphs() -> Prototypes<Glyph> {
    Prototypes::new(
        Glyph {
            symbol: "#",
            color: Color::DarkGray,
        },
        Glyph {
            symbol: "O",
            color: Color::Red,
        },
        Glyph {
            symbol: "*",
            color: Color::Yellow,
        },
    )
}

/// The terminal view. Its frame center picks which part of a large room is drawn.
#[derive(Debug, Default)]
struct Viewport {
    frame: Option<CameraFrame>,
}

impl CameraTarget for Viewport {
    fn aspect(&self) -> f32 {
        // Terminal cells are roughly twice as tall as they are wide.
        2.0
    }

    fn apply(&mut self, frame: CameraFrame) {
        self.frame = Some(frame);
    }
}

/// A generated room ready for display.
struct Room {
    grid: Grid<Option<Glyph>>,
    report: GenerationReport,
    seed: u64,
}

/// Runs one generation pass into a fresh grid.
fn generate_room(
    config: &RoomConfig,
    layout: Option<&RoomLayoutAsset>,
    seed: u64,
    viewport: &mut Viewport,
) -> Result<Room> {
    let (width, height) = match layout {
        Some(layout) => (layout.width, layout.height),
        None => (config.room_width, config.room_height),
    };
    check_room_size(width, height)?;
    let mut grid = Grid::new(width, height);
    let resolver = glyphs();
    let mut rng = StdRng::seed_from_u64(seed);
    let report = RoomBuilder::new(config.clone(), &resolver)
        .with_layout(layout)
        .with_camera(viewport)
        .build(&mut rng, &mut grid)
        .context("Failed to generate room")?;
    Ok(Room { grid, report, seed })
}

fn load_layout(path: &Path) -> Result<RoomLayoutAsset> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read layout file {}", path.display()))?;
    let layout = if path.extension().is_some_and(|ext| ext == "json") {
        load_layout_from_json(&contents)
    } else {
        load_layout_from_map(&contents)
    };
    let layout = layout.with_context(|| format!("Failed to load layout {}", path.display()))?;
    check_room_size(layout.width, layout.height)
        .with_context(|| format!("Failed to load layout {}", path.display()))?;
    log::info!(
        "Loaded {}x{} layout from {} ({} objects)",
        layout.width,
        layout.height,
        path.display(),
        layout.objects.len()
    );
    Ok(layout)
}

struct App {
    config: RoomConfig,
    layout: Option<RoomLayoutAsset>,
    viewport: Viewport,
    room: Room,
    /// Last regeneration error, shown in the status bar.
    error: Option<String>,
    /// Flag to control the main loop.
    should_quit: bool,
}

impl App {
    fn new(config: RoomConfig, layout: Option<RoomLayoutAsset>, seed: u64) -> Result<Self> {
        let mut viewport = Viewport::default();
        let room = generate_room(&config, layout.as_ref(), seed, &mut viewport)?;
        Ok(App {
            config,
            layout,
            viewport,
            room,
            error: None,
            should_quit: false,
        })
    }

    /// Generates a new room with a fresh seed. Layout rooms always replay the same way.
    fn regenerate(&mut self) {
        if self.layout.is_some() {
            return;
        }
        let seed = rand::random();
        match generate_room(&self.config, None, seed, &mut self.viewport) {
            Ok(room) => {
                self.room = room;
                self.error = None;
            }
            Err(err) => self.error = Some(format!("{err:#}")),
        }
    }

    /// Sets the quit flag.
    fn quit(&mut self) {
        self.should_quit = true;
    }
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();
    init_logging(&args)?;

    let layout = args.layout.as_deref().map(load_layout).transpose()?;
    let seed = args.seed.unwrap_or_else(rand::random);
    let mut app = App::new(args.room_config(), layout, seed)?;

    if args.print {
        print_room(&app.room);
        return Ok(());
    }

    // Set up the terminal
    let mut terminal = setup_terminal()?;

    // Run the main application loop
    let result = run_app(&mut terminal, &mut app);

    // Restore the terminal state
    restore_terminal(&mut terminal)?;

    result
}

/// Installs the logger: the log file when given, stderr in print mode, nothing otherwise.
fn init_logging(args: &Args) -> Result<()> {
    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let config = ConfigBuilder::new()
        .set_target_level(LevelFilter::Off)
        .set_location_level(LevelFilter::Off)
        .build();

    if let Some(path) = &args.log_file {
        let file = File::create(path)
            .with_context(|| format!("Failed to create log file {}", path.display()))?;
        WriteLogger::init(level, config, file)?;
    } else if args.print {
        WriteLogger::init(level, config, io::stderr())?;
    }
    Ok(())
}

/// Writes the room to stdout, top row first.
fn print_room(room: &Room) {
    for row in room.grid.rows_top_down() {
        let line: String = row
            .iter()
            .map(|cell| cell.map_or(".", |glyph| glyph.symbol))
            .collect();
        println!("{line}");
    }
    println!("{}", summary(room));
}

fn summary(room: &Room) -> String {
    let report = &room.report;
    let source = match report.branch {
        Branch::Layout => "layout".to_string(),
        Branch::Procedural => format!("seed {}", room.seed),
    };
    format!(
        "{}x{} room ({}): {} walls, {} obstacles, {} items, {} cells occupied",
        report.width,
        report.height,
        source,
        report.tally.walls,
        report.tally.obstacles,
        report.tally.items,
        report.occupied
    )
}

/// Configures the terminal for TUI interaction.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    let mut stdout = io::stdout();
    enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(Into::into)
}

/// Restores the terminal to its original state.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}

/// Runs the main loop of the TUI application.
fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    let poll_rate = Duration::from_millis(250);

    loop {
        terminal.draw(|f| ui(f, app))?;

        if crossterm::event::poll(poll_rate)? {
            if let Event::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => app.quit(),
                    KeyCode::Char('r') => app.regenerate(),
                    _ => {}
                }
            }
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

/// Renders the user interface.
fn ui(frame: &mut Frame, app: &App) {
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(75), // Area for the room
            Constraint::Percentage(15), // Area for the report
            Constraint::Percentage(10), // Area for status/help
        ])
        .split(frame.area());

    render_room(frame, main_layout[0], &app.room, app.viewport.frame);
    render_report(frame, main_layout[1], app);

    let help = match &app.error {
        Some(err) => Line::styled(err.clone(), Style::default().fg(Color::Red)),
        None if app.layout.is_some() => Line::from("Press 'q' or 'Esc' to quit."),
        None => Line::from("Press 'r' to regenerate, 'q' or 'Esc' to quit."),
    };
    let help_text = Paragraph::new(help)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(help_text, main_layout[2]);
}

/// Renders the generation report and camera frame.
fn render_report(frame: &mut Frame, area: Rect, app: &App) {
    let mut lines = vec![Line::from(summary(&app.room))];
    if app.room.report.tally.skipped > 0 {
        lines.push(Line::from(format!(
            "{} placement(s) had no glyph",
            app.room.report.tally.skipped
        )));
    }
    if let Some(camera) = app.viewport.frame {
        lines.push(Line::from(format!(
            "Camera: center ({:.1}, {:.1}), half height {:.1}",
            camera.center_x, camera.center_y, camera.half_height
        )));
    }
    let report =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Report"));
    frame.render_widget(report, area);
}

/// Renders the part of the room grid around the camera center, top row first.
fn render_room(frame: &mut Frame, area: Rect, room: &Room, camera: Option<CameraFrame>) {
    let width = room.grid.width();
    let height = room.grid.height();
    let (center_x, center_y) = match camera {
        Some(camera) => (camera.center_x, camera.center_y),
        None => ((width as f32 - 1.0) / 2.0, (height as f32 - 1.0) / 2.0),
    };
    let inner_width = area.width.saturating_sub(2) as usize;
    let inner_height = area.height.saturating_sub(2) as usize;
    let columns = visible_window(center_x, width, inner_width);
    // Rows are drawn top-down while `y` grows upwards.
    let rows = visible_window(height as f32 - 1.0 - center_y, height, inner_height);

    let lines: Vec<Line> = room
        .grid
        .rows_top_down()
        .skip(rows.start)
        .take(rows.len())
        .map(|row| {
            let spans: Vec<Span> = row[columns.clone()]
                .iter()
                .map(|cell| match cell {
                    Some(glyph) => Span::styled(glyph.symbol, Style::default().fg(glyph.color)),
                    None => Span::raw("."),
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    let room_paragraph = Paragraph::new(lines)
        .block(Block::default().title("Room").borders(Borders::ALL))
        .alignment(Alignment::Center);

    frame.render_widget(room_paragraph, area);
}

/// Range of `len` cells to show in a view `span` cells wide, centered on `center`.
///
/// Clamped so the window never runs past either edge of the room.
fn visible_window(center: f32, len: usize, span: usize) -> Range<usize> {
    if span >= len {
        return 0..len;
    }
    let start = (center - span as f32 / 2.0 + 0.5).floor().max(0.0) as usize;
    let start = start.min(len - span);
    start..start + span
}

/// Refuses layouts too large to rasterize in a terminal.
fn check_room_size(width: i32, height: i32) -> Result<()> {
    if width > MAX_ROOM_SIDE || height > MAX_ROOM_SIDE {
        bail!("Room size ({width}, {height}) exceeds the viewer limit of {MAX_ROOM_SIDE} cells per side");
    }
    Ok(())
}
