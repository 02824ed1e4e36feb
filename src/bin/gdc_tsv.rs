use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use gdc_metadata_tool::app::App;
use gdc_metadata_tool::config::{ConfigLoader, DEFAULT_PREFIX, FieldSelection, RunConfig};
use gdc_metadata_tool::domain::{Endpoint, InputKind};
use gdc_metadata_tool::error::GdcError;
use gdc_metadata_tool::gdc::GdcHttpClient;
use gdc_metadata_tool::output::{HumanOutput, JsonOutput, OutputMode};

#[derive(Parser)]
#[command(name = "gdc-tsv")]
#[command(about = "----GDC Metadata TSV Download Tool----")]
#[command(version, author)]
struct Cli {
    #[arg(help = "Path to manifest file (or UUID list with -u)")]
    manifest_file: PathBuf,

    #[arg(short = 'o', long = "output", value_name = "FILE_PREFIX", default_value = DEFAULT_PREFIX, help = "Designates a prefix for output files")]
    output: String,

    #[arg(short = 'c', long, help = "Only outputs clinical metadata")]
    clinical: bool,

    #[arg(short = 'b', long, help = "Only outputs biospecimen metadata")]
    biospecimen: bool,

    #[arg(short = 'u', long, help = "Pass a plain text list of UUIDs (one UUID per line) instead of a manifest")]
    uuid_list: bool,

    #[arg(short = 'l', long, help = "Manifest from GDC Legacy Archive")]
    legacy: bool,

    #[arg(short = 's', long, help = "Output a simple set of fields (file name, file id, project id, case barcode, sample type)")]
    simple: bool,

    #[arg(short = 'x', long, help = "Output separate metadata file for MAF or XLSX files (warning: messy)")]
    mafout: bool,

    #[arg(short = 'a', long, help = "Empty or datetime columns are not removed from the output file")]
    allop: bool,

    #[arg(long, help = "JSON settings file (API URLs, result size, timeout)")]
    config: Option<PathBuf>,

    #[arg(long, help = "Print a JSON run summary instead of progress lines")]
    json: bool,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{}", error_message(&report));
        if let Some(gdc) = report.downcast_ref::<GdcError>() {
            return ExitCode::from(map_exit_code(gdc));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn error_message(report: &miette::Report) -> String {
    match report.help() {
        Some(help) => format!("ERROR : {report}\n\t{help}"),
        None => format!("ERROR : {report}"),
    }
}

fn map_exit_code(error: &GdcError) -> u8 {
    match error {
        GdcError::BadManifest | GdcError::ManifestLine { .. } | GdcError::NoResults => 2,
        GdcError::GdcHttp(_) | GdcError::GdcStatus { .. } => 3,
        _ => 1,
    }
}

fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output_mode = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Human
    };

    let api = ConfigLoader::resolve(cli.config.as_deref())?;
    let config = RunConfig {
        input: cli.manifest_file,
        input_kind: if cli.uuid_list {
            InputKind::UuidList
        } else {
            InputKind::Manifest
        },
        output_prefix: cli.output,
        endpoint: if cli.legacy {
            Endpoint::Legacy
        } else {
            Endpoint::Current
        },
        fields: FieldSelection::from_flags(cli.clinical, cli.biospecimen, cli.simple),
        include_maf: cli.mafout,
        keep_all_columns: cli.allop,
        api,
    };

    let client = GdcHttpClient::new(config.api.clone())?;
    let app = App::new(client);
    match output_mode {
        OutputMode::Human => {
            app.run(&config, &HumanOutput)?;
        }
        OutputMode::Json => {
            let summary = app.run(&config, &JsonOutput)?;
            JsonOutput::print_summary(&summary).into_diagnostic()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_by_error_kind() {
        assert_eq!(map_exit_code(&GdcError::BadManifest), 2);
        assert_eq!(map_exit_code(&GdcError::ManifestLine { line: 3 }), 2);
        assert_eq!(map_exit_code(&GdcError::NoResults), 2);
        assert_eq!(map_exit_code(&GdcError::GdcHttp("timed out".to_string())), 3);
        assert_eq!(
            map_exit_code(&GdcError::GdcStatus {
                status: 500,
                message: "boom".to_string(),
            }),
            3
        );
        assert_eq!(
            map_exit_code(&GdcError::ConfigRead(PathBuf::from("gdc-tsv.json"))),
            1
        );
    }

    #[test]
    fn error_message_has_prefix_and_help() {
        let report = miette::Report::new(GdcError::BadManifest);
        assert_eq!(
            error_message(&report),
            "ERROR : Input must be valid GDC Manifest.\n\tGo to https://portal.gdc.cancer.gov/ to download a manifest"
        );

        let report = miette::Report::new(GdcError::NoResults);
        assert_eq!(
            error_message(&report),
            "ERROR : Query produced no results, are these files from the Legacy Archive? (use -l)"
        );
        assert_eq!(map_exit_code(report.downcast_ref::<GdcError>().unwrap()), 2);
    }
}
