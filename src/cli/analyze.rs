use anyhow::{Context, Result};
use log::info;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

use dpvcal::ingest::load_batch;
use dpvcal::pipeline::AnalysisPipeline;
use dpvcal::report::BatchReport;

use super::config::{parse_delimiter, Config};
use super::OutputFormat;

pub struct AnalyzeArgs {
    pub paths: Vec<PathBuf>,
    pub config: Option<PathBuf>,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub delimiter: Option<String>,
}

/// Run the batch analysis and print or save the report
pub fn run(args: AnalyzeArgs) -> Result<()> {
    let config = Config::load(args.config.as_deref())?;
    let mut options = config.ingest_options()?;
    // Command line wins over the config file
    if let Some(delimiter) = &args.delimiter {
        options.delimiter = parse_delimiter(delimiter)?;
    }

    let start = Instant::now();
    let batch = load_batch(&args.paths, &options).context("Failed to collect input files")?;
    info!("Loaded {} file(s)", batch.len());

    let pipeline = AnalysisPipeline::new(config.pipeline_config());
    let result = pipeline.run(batch);
    info!("Analysis finished in {:.2?}", start.elapsed());

    let report = BatchReport::new(&result, &pipeline.config().channels);

    let mut writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    };

    match args.format {
        OutputFormat::Table => {
            #[cfg(feature = "colorized_output")]
            {
                if args.output.is_none() {
                    write!(writer, "{}", report.format_colored())?;
                } else {
                    write!(writer, "{}", report)?;
                }
            }

            #[cfg(not(feature = "colorized_output"))]
            {
                write!(writer, "{}", report)?;
            }
        }
        OutputFormat::Csv => report
            .write_csv(&mut writer)
            .context("Failed to write CSV report")?,
        OutputFormat::Json => {
            let json = report.to_json().context("Failed to serialize report")?;
            writeln!(writer, "{}", json)?;
        }
    }
    writer.flush()?;

    if let Some(path) = &args.output {
        info!("Report written to {}", path.display());
    }

    Ok(())
}
