use clap::Parser;
use present_doc::utils::{logger, validation::Validate};
use present_doc::{
    build_backends, CliConfig, DocError, DocumentPipeline, PresentDocumentArgs, Result, TomlConfig,
};

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting present-doc CLI");

    if let Err(e) = run(config).await {
        tracing::error!(
            "❌ present-doc failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        exit_with(&e);
    }
}

async fn run(mut config: CliConfig) -> Result<()> {
    if let Some(path) = config.config.clone() {
        config.merge_file(TomlConfig::from_file(&path)?);
    }
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    config.validate()?;

    let markdown = config.read_markdown().await?;

    let backends = build_backends(&config)?;
    tracing::debug!("Backends: {:?}", backends);

    let pipeline = DocumentPipeline::new(backends);
    let args = PresentDocumentArgs {
        title: config.document_title(),
        markdown,
    };

    let result = pipeline.present(args).await?;
    config.write_result(&result).await?;
    tracing::info!("✅ {}", result.message);

    Ok(())
}

fn exit_with(e: &DocError) -> ! {
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
    std::process::exit(e.exit_code());
}
