use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use testrail_reporter::reporter::{self, DuplicatePolicy, ResultPlan};
use testrail_reporter::screenshot::{
    resolver::DEFAULT_SCREENSHOT_DIR, ImageHost, ImgBbHost, ScreenshotPublisher,
    ScreenshotResolver,
};
use testrail_reporter::testrail::TestRailClient;
use testrail_reporter::utils::config::StatusCodes;
use testrail_reporter::{load_report, report, Config, Reporter};

#[derive(Parser)]
#[command(name = "testrail-reporter")]
#[command(version)]
#[command(about = "Push end-to-end test results to TestRail", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Verbose logging (overridden by RUST_LOG)
    #[arg(short, long, global = true, default_value = "false")]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a TestRail run and upload every tagged result (default)
    Upload(UploadArgs),

    /// List the case references found in a report
    Cases {
        /// Path to the JSON report
        #[arg(long, default_value_os_t = report::default_report_path())]
        report: PathBuf,
    },
}

#[derive(Args)]
struct UploadArgs {
    /// Path to the JSON report
    #[arg(long, default_value_os_t = report::default_report_path())]
    report: PathBuf,

    /// Directory holding failure screenshots
    #[arg(long, default_value = DEFAULT_SCREENSHOT_DIR)]
    screenshots: PathBuf,

    /// Run name (defaults to "Automated Run - <timestamp>")
    #[arg(long)]
    run_name: Option<String>,

    /// What to do with repeated case ids
    #[arg(long, value_enum, default_value_t = DuplicatePolicy::SubmitAll)]
    duplicates: DuplicatePolicy,

    /// Show what would be submitted without calling TestRail
    #[arg(long, default_value = "false")]
    dry_run: bool,
}

impl Default for UploadArgs {
    fn default() -> Self {
        Self {
            report: report::default_report_path(),
            screenshots: PathBuf::from(DEFAULT_SCREENSHOT_DIR),
            run_name: None,
            duplicates: DuplicatePolicy::default(),
            dry_run: false,
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // .env may carry RUST_LOG, so it has to be loaded before the logger
    dotenvy::dotenv().ok();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let code = match run(cli.command.unwrap_or(Commands::Upload(UploadArgs::default()))).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", "❌".red(), e);
            1
        }
    };

    std::process::exit(code);
}

async fn run(command: Commands) -> anyhow::Result<i32> {
    match command {
        Commands::Upload(args) => upload(args).await,
        Commands::Cases { report } => {
            let test_report = load_report(&report)?;
            println!(
                "{} Case references in: {}",
                "🔍".to_string().blue(),
                report.display()
            );
            let plan = ResultPlan::from_report(&test_report, DuplicatePolicy::SubmitAll);
            let resolver = ScreenshotResolver::new(DEFAULT_SCREENSHOT_DIR);
            let status = StatusCodes::from_env().context("Invalid TestRail status codes")?;
            reporter::print_plan(&plan, &resolver, &status);
            Ok(0)
        }
    }
}

async fn upload(args: UploadArgs) -> anyhow::Result<i32> {
    let test_report = load_report(&args.report)?;
    let resolver = ScreenshotResolver::new(&args.screenshots);

    if args.dry_run {
        println!(
            "{} Dry run for: {}",
            "▶".yellow().bold(),
            args.report.display()
        );
        let status = StatusCodes::from_env().context("Invalid TestRail status codes")?;
        let plan = ResultPlan::from_report(&test_report, args.duplicates);
        reporter::print_plan(&plan, &resolver, &status);
        return Ok(0);
    }

    let config = Config::from_env().context("Invalid TestRail configuration")?;

    let host: Option<Box<dyn ImageHost>> = match config.imgbb_api_key.as_deref() {
        Some(key) => Some(Box::new(ImgBbHost::new(key))),
        None => None,
    };
    let publisher = ScreenshotPublisher::new(config.ci.clone(), host);
    let client = TestRailClient::new(config.testrail.clone());

    let run_name = args
        .run_name
        .unwrap_or_else(|| reporter::default_run_name(chrono::Local::now()));

    let summary = Reporter::new(&client, &resolver, &publisher, config.status)
        .with_duplicate_policy(args.duplicates)
        .run(&test_report, &run_name)
        .await
        .context("Failed to create TestRail run")?;

    summary.print();
    Ok(summary.exit_code())
}
