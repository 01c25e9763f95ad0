use std::fs::{self, File};
use std::io::{self, Write};
use std::panic;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum, ValueHint};
use phyto::decay::{compute_series, conclusion, table_rows, CalcInput, Series};
use phyto::manifest::{icon_links, manifest_link, IconAsset, ManifestConfig, WebManifest};
use phyto::scene::{DrawOp, Point, Rgb, Scene, TextAlign};
use phyto::{layout_chart, leaf_icon, ChartStyle, Locale, ICON_SIZES};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontDesc, FontFamily, FontStyle};
use plotters_backend::{
    text_anchor, BackendColor, BackendCoord, BackendStyle, BackendTextStyle, DrawingBackend,
    DrawingErrorKind,
};
use rayon::prelude::*;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// Maximum distance in pixels between a flattened curve and the true curve.
const FLATTEN_TOLERANCE: f64 = 0.2;
const MANIFEST_FILE: &str = "manifest.webmanifest";

#[derive(Parser, Debug)]
#[command(author, version, about = "Phytospore page calculator and asset generator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute the decay series and export the table and chart
    Calc(CalcArgs),
    /// Render the leaf icons and the web app manifest
    Icons(IconsArgs),
}

#[derive(Parser, Debug)]
struct CalcArgs {
    /// Initial level V0 (clamped to [0, 1e9])
    #[arg(long = "v0", allow_hyphen_values = true)]
    v0: String,

    /// Coefficient K (clamped to [-0.99, 1e6])
    #[arg(long = "k", allow_hyphen_values = true)]
    k: String,

    /// Number of treatments N (clamped to [0, 20])
    #[arg(long = "n", allow_hyphen_values = true)]
    n: String,

    /// Output CSV path (`-` for stdout)
    #[arg(short, long, default_value = "series.csv", value_hint = ValueHint::FilePath)]
    output: PathBuf,

    /// Output PNG chart path (defaults next to CSV)
    #[arg(long, value_hint = ValueHint::FilePath)]
    png: Option<PathBuf>,

    /// Output SVG chart path
    #[arg(long, value_hint = ValueHint::FilePath)]
    svg: Option<PathBuf>,

    /// Also dump the clamped input and raw series as JSON
    #[arg(long, value_hint = ValueHint::FilePath)]
    json: Option<PathBuf>,

    /// Disable chart generation
    #[arg(long, action = ArgAction::SetTrue)]
    no_plot: bool,

    /// Chart width in pixels
    #[arg(long, default_value_t = 640)]
    width: u32,

    /// Chart height in pixels
    #[arg(long, default_value_t = 320)]
    height: u32,

    /// Language of the conclusion sentence
    #[arg(long, value_enum, default_value_t = LangOpt::Ru)]
    lang: LangOpt,

    /// Verbose logging
    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,
}

#[derive(Parser, Debug)]
struct IconsArgs {
    /// Directory receiving the PNG icons and the manifest
    #[arg(long, default_value = ".", value_hint = ValueHint::DirPath)]
    out_dir: PathBuf,

    /// Icon sizes in pixels (comma separated)
    #[arg(long)]
    sizes: Option<String>,

    /// Manifest overrides (JSON object with any of name, short_name,
    /// start_url, display, background_color, theme_color)
    #[arg(long, value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LangOpt {
    Ru,
    En,
}

impl From<LangOpt> for Locale {
    fn from(value: LangOpt) -> Self {
        match value {
            LangOpt::Ru => Locale::Ru,
            LangOpt::En => Locale::En,
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum ChartKind {
    Png,
    Svg,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let verbose = match &cli.command {
        Command::Calc(args) => args.verbose,
        Command::Icons(args) => args.verbose,
    };
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    match cli.command {
        Command::Calc(args) => handle_calc(args),
        Command::Icons(args) => handle_icons(args),
    }
}

fn handle_calc(args: CalcArgs) -> Result<()> {
    let input = CalcInput::from_fields(&args.v0, &args.k, &args.n)
        .context("calculator input rejected")?;
    debug!(v0 = input.v0, k = input.k, n = input.n, "clamped input");
    let series = compute_series(&input).context("series computation failed")?;

    let to_stdout = args.output.as_os_str() == "-";
    if to_stdout {
        write_series_stdout(&series)?;
    } else {
        write_series_csv(&series, &args.output)?;
        info!("Wrote series CSV: {}", args.output.display());
    }
    if let Some(path) = args.json.as_deref() {
        write_series_json(&series, path)?;
        info!("Wrote series JSON: {}", path.display());
    }

    let sentence = conclusion(&series, args.lang.into());
    if to_stdout {
        info!("{sentence}");
    } else {
        println!("{sentence}");
    }

    if args.no_plot {
        return Ok(());
    }
    let scene = layout_chart(&series.points, args.width, args.height, &ChartStyle::default())
        .context("chart layout failed")?;

    let png_path = match (&args.png, to_stdout) {
        (Some(path), _) => Some(path.clone()),
        (None, false) => Some(args.output.with_extension("png")),
        (None, true) => None,
    };
    if let Some(path) = png_path {
        match render_scene_guard(&scene, &path, ChartKind::Png) {
            Ok(()) => info!("Wrote chart: {}", path.display()),
            Err(err) => warn!("Skipping PNG render ({}): {}", path.display(), err),
        }
    }
    if let Some(path) = args.svg.as_ref() {
        match render_scene_guard(&scene, path, ChartKind::Svg) {
            Ok(()) => info!("Wrote chart: {}", path.display()),
            Err(err) => warn!("Skipping SVG render ({}): {}", path.display(), err),
        }
    }
    Ok(())
}

fn handle_icons(args: IconsArgs) -> Result<()> {
    let sizes = match args.sizes.as_deref() {
        Some(text) => parse_size_list(text)?,
        None => ICON_SIZES.to_vec(),
    };
    if sizes.is_empty() {
        return Err(anyhow!("no icon sizes requested"));
    }
    let config = match args.config.as_deref() {
        Some(path) => load_manifest_config(path)?,
        None => ManifestConfig::default(),
    };
    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("failed to create {}", args.out_dir.display()))?;

    let icons: Vec<IconAsset> = sizes
        .par_iter()
        .map(|&size| -> Result<IconAsset> {
            let file_name = format!("icon-{size}.png");
            let path = args.out_dir.join(&file_name);
            let scene = leaf_icon(size, size)?;
            render_scene_guard(&scene, &path, ChartKind::Png)
                .map_err(|err| anyhow!("failed to render {}: {}", path.display(), err))?;
            debug!("Rendered {}", path.display());
            Ok(IconAsset {
                size,
                href: file_name,
            })
        })
        .collect::<Result<_>>()?;
    info!("Wrote {} icons to {}", icons.len(), args.out_dir.display());

    let manifest = WebManifest::build(&config, &icons);
    let manifest_path = args.out_dir.join(MANIFEST_FILE);
    fs::write(&manifest_path, manifest.to_json_pretty()?)
        .with_context(|| format!("failed to write {}", manifest_path.display()))?;
    info!("Wrote manifest: {}", manifest_path.display());

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for link in icon_links(&icons) {
        writeln!(out, "{}", link.to_html())?;
    }
    writeln!(out, "{}", manifest_link(MANIFEST_FILE).to_html())?;
    Ok(())
}

fn parse_size_list(input: &str) -> Result<Vec<u32>> {
    let mut out = Vec::new();
    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            continue;
        }
        let value: u32 = trimmed
            .parse()
            .with_context(|| format!("invalid size '{}': expected integer pixels", trimmed))?;
        if value == 0 {
            return Err(anyhow!("icon sizes must be > 0"));
        }
        if !out.contains(&value) {
            out.push(value);
        }
    }
    Ok(out)
}

fn load_manifest_config(path: &Path) -> Result<ManifestConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read manifest config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("{} is not valid JSON", path.display()))
}

fn write_series_stdout(series: &Series) -> Result<()> {
    let stdout = io::stdout();
    let handle = stdout.lock();
    let mut writer = csv::Writer::from_writer(handle);
    write_series_rows(series, &mut writer)
}

fn write_series_csv(series: &Series, path: &Path) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = csv::Writer::from_writer(file);
    write_series_rows(series, &mut writer)
}

fn write_series_json(series: &Series, path: &Path) -> Result<()> {
    let text = serde_json::to_string_pretty(series)?;
    fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

fn write_series_rows<W: Write>(series: &Series, writer: &mut csv::Writer<W>) -> Result<()> {
    writer.write_record(["i", "Vi"])?;
    for row in table_rows(series) {
        writer.write_record([row.index, row.value])?;
    }
    writer.flush()?;
    Ok(())
}

fn render_scene_guard(scene: &Scene, path: &Path, kind: ChartKind) -> Result<(), String> {
    let render = || -> Result<()> {
        let size = (scene.width, scene.height);
        match kind {
            ChartKind::Png => {
                let backend = BitMapBackend::new(path, size);
                draw_scene(FontSafeBackend::new(backend).into_drawing_area(), scene)
            }
            ChartKind::Svg => {
                let backend = SVGBackend::new(path, size);
                draw_scene(FontSafeBackend::new(backend).into_drawing_area(), scene)
            }
        }
    };

    panic::catch_unwind(panic::AssertUnwindSafe(render))
        .map_err(|_| "plotting backend panicked".to_string())?
        .map_err(|err| format!("plotting error: {err}"))
}

fn rgb(color: Rgb) -> RGBColor {
    RGBColor(color.r, color.g, color.b)
}

fn px(p: Point) -> (i32, i32) {
    (p.x.round() as i32, p.y.round() as i32)
}

fn draw_scene<DB>(area: DrawingArea<DB, plotters::coord::Shift>, scene: &Scene) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    for op in scene.ops() {
        match op {
            // Raster output has no alpha channel; an unpainted surface is white.
            DrawOp::Clear { color } => area.fill(&rgb(color.unwrap_or(Rgb::WHITE)))?,
            DrawOp::FillRect { x, y, w, h, color } => {
                let corners = [
                    px(Point::new(*x, *y)),
                    px(Point::new(x + w, y + h)),
                ];
                area.draw(&Rectangle::new(corners, rgb(*color).filled()))?;
            }
            DrawOp::FillCircle {
                center,
                radius,
                color,
            } => {
                let r = radius.round().max(1.0) as u32;
                area.draw(&Circle::new(px(*center), r, rgb(*color).filled()))?;
            }
            DrawOp::FillPath { path, color } => {
                for outline in path.flatten(FLATTEN_TOLERANCE) {
                    let pts: Vec<(i32, i32)> = outline.into_iter().map(px).collect();
                    area.draw(&Polygon::new(pts, rgb(*color).filled()))?;
                }
            }
            DrawOp::StrokePath { path, color, width } => {
                let stroke = width.round().max(1.0) as u32;
                for line in path.flatten(FLATTEN_TOLERANCE) {
                    let pts: Vec<(i32, i32)> = line.into_iter().map(px).collect();
                    area.draw(&PathElement::new(pts, plotters::style::Color::stroke_width(&rgb(*color), stroke)))?;
                }
            }
            DrawOp::Text {
                text,
                pos,
                color,
                font,
                align,
            } => {
                let h_pos = match align {
                    TextAlign::Left => HPos::Left,
                    TextAlign::Center => HPos::Center,
                    TextAlign::Right => HPos::Right,
                };
                let style = FontDesc::new(FontFamily::SansSerif, font.size_px, FontStyle::Normal)
                    .color(&rgb(*color))
                    .pos(Pos::new(h_pos, VPos::Bottom));
                area.draw(&Text::new(text.clone(), px(*pos), style))?;
            }
        }
    }
    area.present()?;
    Ok(())
}

/// Delegates to `inner`, but draws text with built-in bitmap glyphs when the
/// system has no usable font.
struct FontSafeBackend<DB> {
    inner: DB,
}

impl<DB> FontSafeBackend<DB> {
    fn new(inner: DB) -> Self {
        Self { inner }
    }
}

impl<DB: DrawingBackend> DrawingBackend for FontSafeBackend<DB> {
    type ErrorType = DB::ErrorType;

    fn get_size(&self) -> (u32, u32) {
        self.inner.get_size()
    }

    fn ensure_prepared(&mut self) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.ensure_prepared()
    }

    fn present(&mut self) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.present()
    }

    fn draw_pixel(
        &mut self,
        point: BackendCoord,
        color: BackendColor,
    ) -> Result<(), DrawingErrorKind<DB::ErrorType>> {
        self.inner.draw_pixel(point, color)
    }

    fn draw_line<S: BackendStyle>(
        &mut self,
        from: BackendCoord,
        to: BackendCoord,
        style: &S,
    ) -> Result<(), DrawingErrorKind<DB::ErrorType>> {
        self.inner.draw_line(from, to, style)
    }

    fn draw_rect<S: BackendStyle>(
        &mut self,
        upper_left: BackendCoord,
        bottom_right: BackendCoord,
        style: &S,
        fill: bool,
    ) -> Result<(), DrawingErrorKind<DB::ErrorType>> {
        self.inner.draw_rect(upper_left, bottom_right, style, fill)
    }

    fn draw_path<S: BackendStyle, I: IntoIterator<Item = BackendCoord>>(
        &mut self,
        path: I,
        style: &S,
    ) -> Result<(), DrawingErrorKind<DB::ErrorType>> {
        self.inner.draw_path(path, style)
    }

    fn fill_polygon<S: BackendStyle, I: IntoIterator<Item = BackendCoord>>(
        &mut self,
        vert: I,
        style: &S,
    ) -> Result<(), DrawingErrorKind<DB::ErrorType>> {
        self.inner.fill_polygon(vert, style)
    }

    fn draw_circle<S: BackendStyle>(
        &mut self,
        center: BackendCoord,
        radius: u32,
        style: &S,
        fill: bool,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.draw_circle(center, radius, style, fill)
    }

    fn blit_bitmap(
        &mut self,
        pos: BackendCoord,
        (iw, ih): (u32, u32),
        src: &[u8],
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.blit_bitmap(pos, (iw, ih), src)
    }

    fn draw_text<TStyle: BackendTextStyle>(
        &mut self,
        text: &str,
        style: &TStyle,
        pos: BackendCoord,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        match panic::catch_unwind(panic::AssertUnwindSafe(|| {
            self.inner.draw_text(text, style, pos)
        })) {
            Ok(Ok(())) => Ok(()),
            Ok(Err(DrawingErrorKind::FontError(_))) | Err(_) => {
                self.draw_text_fallback(text, style, pos)
            }
            Ok(Err(err)) => Err(err),
        }
    }

    fn estimate_text_size<TStyle: BackendTextStyle>(
        &self,
        text: &str,
        style: &TStyle,
    ) -> Result<(u32, u32), DrawingErrorKind<Self::ErrorType>> {
        self.inner
            .estimate_text_size(text, style)
            .or_else(|_| Ok(fallback_text_size(text, style.size())))
    }
}

fn fallback_scale(font_size: f64) -> i32 {
    (font_size / FALLBACK_FONT_HEIGHT as f64).round().max(1.0) as i32
}

fn fallback_text_size(text: &str, font_size: f64) -> (u32, u32) {
    let scale = fallback_scale(font_size);
    let width: i32 = text
        .chars()
        .map(|ch| fallback_advance(ch) * scale)
        .sum();
    (width.max(0) as u32, (FALLBACK_FONT_HEIGHT as i32 * scale) as u32)
}

fn fallback_advance(ch: char) -> i32 {
    fallback_glyph(ch)
        .map(|g| g.width as i32 + 1)
        .unwrap_or(FALLBACK_SPACE_WIDTH as i32)
}

impl<DB: DrawingBackend> FontSafeBackend<DB> {
    fn draw_text_fallback<TStyle: BackendTextStyle>(
        &mut self,
        text: &str,
        style: &TStyle,
        pos: BackendCoord,
    ) -> Result<(), DrawingErrorKind<DB::ErrorType>> {
        let color = style.color();
        if color.alpha == 0.0 || text.trim().is_empty() {
            return Ok(());
        }

        let scale = fallback_scale(style.size());
        let (width, height) = fallback_text_size(text, style.size());
        let (width, height) = (width as i32, height as i32);
        let dx = match style.anchor().h_pos {
            text_anchor::HPos::Left => 0,
            text_anchor::HPos::Right => -width,
            text_anchor::HPos::Center => -width / 2,
        };
        let dy = match style.anchor().v_pos {
            text_anchor::VPos::Top => 0,
            text_anchor::VPos::Center => -(height / 2),
            text_anchor::VPos::Bottom => -height,
        };

        let mut cursor_x = pos.0 + dx;
        let top_y = pos.1 + dy;
        for ch in text.chars() {
            if let Some(glyph) = fallback_glyph(ch) {
                for (row, pattern) in glyph.rows.iter().enumerate() {
                    for col in 0..glyph.width {
                        if pattern & (1 << (glyph.width - 1 - col)) != 0 {
                            self.draw_scaled_pixel_block(
                                cursor_x + col as i32 * scale,
                                top_y + row as i32 * scale,
                                scale,
                                color,
                            )?;
                        }
                    }
                }
            }
            cursor_x += fallback_advance(ch) * scale;
        }
        Ok(())
    }

    fn draw_scaled_pixel_block(
        &mut self,
        x: i32,
        y: i32,
        scale: i32,
        color: BackendColor,
    ) -> Result<(), DrawingErrorKind<DB::ErrorType>> {
        for dx in 0..scale {
            for dy in 0..scale {
                self.inner.draw_pixel((x + dx, y + dy), color)?;
            }
        }
        Ok(())
    }
}

#[derive(Clone, Copy)]
struct Glyph {
    width: u8,
    rows: [u8; FALLBACK_FONT_HEIGHT],
}

const FALLBACK_FONT_HEIGHT: usize = 7;
const FALLBACK_SPACE_WIDTH: usize = 3;

// Only the axis labels are ever drawn, so the table covers "Vi" and "i".
fn fallback_glyph(ch: char) -> Option<Glyph> {
    Some(match ch {
        'V' => Glyph {
            width: 5,
            rows: [
                0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100,
            ],
        },
        'i' => Glyph {
            width: 1,
            rows: [0b1, 0b0, 0b1, 0b1, 0b1, 0b1, 0b1],
        },
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_list_parses_and_dedups() {
        assert_eq!(parse_size_list("16, 32,16,,512").unwrap(), vec![16, 32, 512]);
        assert!(parse_size_list("0").is_err());
        assert!(parse_size_list("big").is_err());
        assert!(parse_size_list("").unwrap().is_empty());
    }

    #[test]
    fn fallback_metrics_scale_with_font_size() {
        assert_eq!(fallback_scale(7.0), 1);
        assert_eq!(fallback_scale(12.0), 2);
        assert_eq!(fallback_scale(1.0), 1);
        // 'V' is 5 wide, 'i' is 1 wide, each followed by one column of spacing
        assert_eq!(fallback_text_size("Vi", 12.0), (16, 14));
        assert_eq!(fallback_text_size("?", 7.0), (3, 7));
    }

    #[test]
    fn series_csv_matches_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("series.csv");
        let series = compute_series(&CalcInput::new(100.0, 0.1, 3).unwrap()).unwrap();
        write_series_csv(&series, &path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(
            text,
            "i,Vi\n0,100.0000\n1,90.9091\n2,82.6446\n3,75.1315\n"
        );
    }

    #[test]
    fn manifest_config_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("manifest.json");
        fs::write(&path, r##"{"theme_color": "#000000"}"##).unwrap();
        let config = load_manifest_config(&path).unwrap();
        assert_eq!(config.theme_color, "#000000");
        assert_eq!(config.display, "standalone");

        fs::write(&path, "not json").unwrap();
        assert!(load_manifest_config(&path).is_err());
    }

    #[test]
    fn svg_chart_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.svg");
        let series = compute_series(&CalcInput::new(100.0, 0.1, 3).unwrap()).unwrap();
        let scene = layout_chart(&series.points, 640, 320, &ChartStyle::default()).unwrap();
        render_scene_guard(&scene, &path, ChartKind::Svg).unwrap();
        let svg = fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("<circle"));
    }

    #[test]
    fn icons_command_writes_pngs_and_manifest() {
        let dir = tempfile::tempdir().unwrap();
        handle_icons(IconsArgs {
            out_dir: dir.path().to_path_buf(),
            sizes: Some("16,32".to_string()),
            config: None,
            verbose: false,
        })
        .unwrap();

        for name in ["icon-16.png", "icon-32.png"] {
            let bytes = fs::read(dir.path().join(name)).unwrap();
            assert_eq!(&bytes[1..4], b"PNG");
        }
        let manifest: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join(MANIFEST_FILE)).unwrap())
                .unwrap();
        let icons = manifest["icons"].as_array().unwrap();
        assert_eq!(icons.len(), 2);
        assert_eq!(icons[1]["src"], "icon-32.png");
        assert_eq!(icons[1]["sizes"], "32x32");
    }

    #[test]
    fn calc_rejects_non_numeric_input() {
        let dir = tempfile::tempdir().unwrap();
        let err = handle_calc(CalcArgs {
            v0: "NaN".to_string(),
            k: "0.1".to_string(),
            n: "3".to_string(),
            output: dir.path().join("series.csv"),
            png: None,
            svg: None,
            json: Some(dir.path().join("series.json")),
            no_plot: true,
            width: 640,
            height: 320,
            lang: LangOpt::En,
            verbose: false,
        });
        assert!(err.is_err());
        assert!(!dir.path().join("series.csv").exists());
        assert!(!dir.path().join("series.json").exists());
    }

    #[test]
    fn calc_dumps_series_json() {
        let dir = tempfile::tempdir().unwrap();
        let json_path = dir.path().join("series.json");
        handle_calc(CalcArgs {
            v0: "-5".to_string(),
            k: "1".to_string(),
            n: "25".to_string(),
            output: dir.path().join("series.csv"),
            png: None,
            svg: None,
            json: Some(json_path.clone()),
            no_plot: true,
            width: 640,
            height: 320,
            lang: LangOpt::Ru,
            verbose: false,
        })
        .unwrap();
        let text = fs::read_to_string(&json_path).unwrap();
        let series: Series = serde_json::from_str(&text).unwrap();
        assert_eq!(series.input, CalcInput::new(0.0, 1.0, 20).unwrap());
        assert_eq!(series.points.len(), 21);
        assert_eq!(series.points[20].i, 20);
        assert!(series.points.iter().all(|p| p.vi == 0.0));
    }
}
