use clap::Parser;
use ibutton_mzone::config::{BatchArgs, Command, ConvertArgs};
use ibutton_mzone::utils::logger;
use ibutton_mzone::{
    convert, BatchPipeline, CliConfig, ConversionEngine, ConverterError, Exporter, LocalStorage,
};
use tokio::io::AsyncReadExt;

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.log_json {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }
    tracing::debug!("CLI config: {:?}", config);

    let result = match &config.command {
        Command::Convert(args) => run_convert(args),
        Command::Batch(args) => run_batch(args).await,
    };

    if let Err(e) = result {
        tracing::error!("❌ {} (Category: {:?})", e, e.category());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code());
    }
}

fn run_convert(args: &ConvertArgs) -> Result<(), ConverterError> {
    let raw = args.raw_code();
    let code = convert(&raw)?;
    tracing::debug!("{} → {}", ibutton_mzone::format(&raw), code);
    println!("{}", code);
    Ok(())
}

async fn run_batch(args: &BatchArgs) -> Result<(), ConverterError> {
    let settings = args.resolve()?;
    let exporter = Exporter::new(&settings.export.sheet_name, &settings.export.placeholder);

    let mut pipeline = BatchPipeline::new(LocalStorage::new("."), settings.clone());
    if settings.reads_stdin() {
        let mut text = String::new();
        tokio::io::stdin().read_to_string(&mut text).await?;
        pipeline = pipeline.with_input_text(text);
    }

    let engine = ConversionEngine::new(pipeline).with_export(!args.no_export);
    let outcome = engine.run().await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome.report.summaries())?);
    } else {
        println!("{}", exporter.clipboard_text(&outcome.report));
    }

    eprintln!("{}", outcome.report.summary_line());
    if let Some(path) = outcome.output_path {
        eprintln!("📁 Export saved to: {}", path);
    }

    Ok(())
}
