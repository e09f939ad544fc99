/*!
QuickPlot command line renderer

Loads a CSV file, validates one plot request and writes the chart as PNG.
*/

use anyhow::Context;
use clap::Parser;
use quickplot::charts::{requirements, ColorScheme, ColumnRole, PlotRequest, PlotType, Theme};
use quickplot::data::{DataLoader, Dataset};
use quickplot::pipeline::{self, ErrorKind, PlotError};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "quickplot-render")]
#[command(about = "Render a statistical chart from a CSV file to PNG")]
#[command(version)]
struct Cli {
    /// CSV file with a header row
    csv: PathBuf,

    /// Plot type (line, bar, scatter, histogram, box, correlation)
    #[arg(long, default_value = "line")]
    plot: PlotType,

    /// X-axis column (line, bar, scatter)
    #[arg(long)]
    x: Option<String>,

    /// Y-axis column (line, bar, scatter)
    #[arg(long)]
    y: Option<String>,

    /// Column to bin (histogram)
    #[arg(long)]
    column: Option<String>,

    /// Grouping column (box)
    #[arg(long)]
    group: Option<String>,

    /// Value column (box)
    #[arg(long)]
    value: Option<String>,

    /// Number of histogram bins, 5 to 50
    #[arg(long)]
    bins: Option<usize>,

    /// Color scheme (viridis, magma, plasma, inferno, cividis)
    #[arg(long, default_value = "viridis")]
    scheme: ColorScheme,

    /// JSON theme overriding the default styling
    #[arg(long)]
    theme: Option<PathBuf>,

    /// Output file path
    #[arg(long, short, default_value = "plot.png")]
    output: PathBuf,

    /// Open the written image with the system viewer
    #[arg(long)]
    open: bool,

    /// List columns with their detected kind and exit
    #[arg(long)]
    list_columns: bool,
}

impl Cli {
    fn selection(&self, role: ColumnRole) -> Option<String> {
        match role {
            ColumnRole::X => self.x.clone(),
            ColumnRole::Y => self.y.clone(),
            ColumnRole::Group => self.group.clone(),
            ColumnRole::Value => self.value.clone().or_else(|| self.column.clone()),
        }
    }

    fn request(&self) -> PlotRequest {
        let columns = requirements(self.plot)
            .iter()
            .filter_map(|r| self.selection(r.role))
            .collect();
        let mut request = PlotRequest::new(self.plot, columns).with_color_scheme(self.scheme);
        request.bin_count = self.bins;
        request
    }
}

fn list_columns(dataset: &Dataset) {
    println!("{} rows", dataset.row_count());
    for column in dataset.columns() {
        println!("  {:<24} {}", column.name(), column.kind());
    }
}

fn run(cli: &Cli) -> anyhow::Result<Result<(), PlotError>> {
    let theme = match &cli.theme {
        Some(path) => Theme::from_json_file(path)
            .with_context(|| format!("loading theme {}", path.display()))?,
        None => Theme::default(),
    };

    let dataset = match DataLoader::load_csv(&cli.csv) {
        Ok(dataset) => dataset,
        Err(e) => return Ok(Err(e.into())),
    };
    if cli.list_columns {
        list_columns(&dataset);
        return Ok(Ok(()));
    }

    let image = match pipeline::plot(&dataset, &cli.request(), &theme) {
        Ok(image) => image,
        Err(e) => return Ok(Err(e)),
    };
    image
        .save(&cli.output)
        .with_context(|| format!("writing {}", cli.output.display()))?;
    println!(
        "Wrote {} ({}x{} px, {} dpi)",
        cli.output.display(),
        image.width,
        image.height,
        image.dpi
    );

    if cli.open {
        open::that(&cli.output).with_context(|| format!("opening {}", cli.output.display()))?;
    }
    Ok(Ok(()))
}

fn main() -> ExitCode {
    quickplot::logging::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(Ok(())) => ExitCode::SUCCESS,
        Ok(Err(e)) => {
            eprintln!("{}", e.user_message());
            match e.kind() {
                ErrorKind::Validation => ExitCode::from(2),
                ErrorKind::Unexpected => ExitCode::from(1),
            }
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(1)
        }
    }
}
