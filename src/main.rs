use clap::Parser;
use placer::config::{CliConfig, Command, PlacerConfig};
use placer::core::engine::{read_placement_at, Placer};
use placer::core::report;
use placer::utils::{error::Result, logger, validation::Validate};
use placer::{LocalStore, PlacerError, RngSource};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::Path;

fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose);
    tracing::debug!("CLI config: {:?}", cli);

    if let Err(e) = run(&cli) {
        tracing::error!(
            "❌ placer failed: {} (Category: {:?})",
            e,
            e.category()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(e.exit_code());
    }
}

fn load_config(cli: &CliConfig, dir: &Path) -> Result<PlacerConfig> {
    let config = match &cli.config {
        Some(path) => PlacerConfig::from_file(path)?,
        None => PlacerConfig::discover(dir)?,
    };
    config.validate()?;
    Ok(config)
}

fn random_source(cli: &CliConfig, config: &PlacerConfig) -> RngSource<StdRng> {
    match cli.seed.or(config.selection.seed) {
        Some(seed) => {
            tracing::debug!("Using seed {}", seed);
            RngSource(StdRng::seed_from_u64(seed))
        }
        None => RngSource(StdRng::from_os_rng()),
    }
}

fn open(cli: &CliConfig) -> Result<(Placer<LocalStore>, PlacerConfig)> {
    let config = load_config(cli, &cli.dir)?;
    let placer = Placer::new(LocalStore::open(&cli.dir)?, config.layout.clone());
    Ok((placer, config))
}

fn run(cli: &CliConfig) -> Result<()> {
    match cli.command() {
        Command::Next { dry_run } => {
            let (placer, config) = open(cli)?;
            let mut rng = random_source(cli, &config);

            if dry_run {
                tracing::info!("🔍 DRY RUN MODE - no placement file will be written");
                if let Some(selection) = placer.choose(&mut rng)? {
                    println!("{}", selection.place());
                }
            } else if let Some(record) = placer.next(&mut rng)? {
                println!("{}", record.place);
            }
        }
        Command::Summary { format } => {
            let (placer, _) = open(cli)?;
            let entries = placer.summary()?;
            print!("{}", report::render(&entries, format)?);
        }
        Command::Print { path } => {
            let path = path.ok_or_else(|| {
                PlacerError::invalid_argument("Placement file wasn't specified.")
            })?;
            let dir = match path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                _ => Path::new(".").to_path_buf(),
            };
            let config = load_config(cli, &dir)?;
            let record = read_placement_at(&path, &config.layout)?;
            println!("{}", record.place);
        }
        Command::Peek => {
            let (placer, _) = open(cli)?;
            let record = placer.peek()?;
            println!("{}", record.place);
        }
    }

    Ok(())
}
